//! Mortgage amortisation engine.
//!
//! Pipeline: [`frequency`] → [`payment`] → [`schedule`], with [`costs`] and
//! [`summary`] consuming the results. [`calculator::calculate_mortgage`] runs
//! the whole pipeline once; [`export`] renders the schedule as CSV.

pub mod calculator;
pub mod costs;
pub mod export;
pub mod frequency;
pub mod payment;
pub mod schedule;
pub mod summary;

pub use calculator::{calculate_mortgage, AmortizationOutput, AmortizationStatus, LoanParameters, MortgageInput};
pub use costs::CostParameters;
pub use frequency::PaymentFrequency;
pub use payment::SolvingMode;
