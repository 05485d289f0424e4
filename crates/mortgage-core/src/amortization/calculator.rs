//! Mortgage calculator: one pass from loan parameters to schedule and summary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use super::costs::{aggregate_costs, CostParameters, PeriodCosts};
use super::frequency::{PaymentFrequency, ResolvedFrequency};
use super::payment::{solve_payment, PaymentSolution, PaymentSolverInput, SolvingMode};
use super::schedule::{
    generate_schedule, DerivedSchedule, PayoffStatus, PaymentCalendar, PeriodRecord, ScheduleInput,
};
use super::summary::{build_summary, SummaryContext, SummaryMetrics};
use crate::error::MortgageError;
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Years};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Loan terms for one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanParameters {
    pub home_price: Money,
    /// Down payment as a percentage of the home price (20 = 20%).
    pub down_payment_percent: Decimal,
    pub term_years: Years,
    /// Annual interest rate as a percentage (3 = 3%).
    pub annual_rate_percent: Decimal,
    pub frequency: PaymentFrequency,
    pub solving_mode: SolvingMode,
    /// First payment date; when set, every period is dated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl Default for LoanParameters {
    fn default() -> Self {
        LoanParameters {
            home_price: Decimal::ZERO,
            down_payment_percent: Decimal::ZERO,
            term_years: Decimal::from(30),
            annual_rate_percent: Decimal::ZERO,
            frequency: PaymentFrequency::Monthly,
            solving_mode: SolvingMode::Default,
            start_date: None,
        }
    }
}

/// Top-level calculator input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageInput {
    pub loan: LoanParameters,
    pub costs: CostParameters,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Tagged outcome of a computation. None of these are errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AmortizationStatus {
    EarlyPayoff { periods_saved: u32 },
    PaidAtTerm,
    /// All nominal periods ran without the balance reaching zero.
    NonAmortizing { residual_balance: Money },
    /// No payments resolved; payment is zero and the schedule is empty.
    ZeroLengthTerm,
    /// Lock-payment target does not cover per-period interest.
    UnamortizablePayment {
        target_payment: Money,
        period_interest: Money,
    },
}

impl From<&PayoffStatus> for AmortizationStatus {
    fn from(status: &PayoffStatus) -> Self {
        match status {
            PayoffStatus::EarlyPayoff { periods_saved } => AmortizationStatus::EarlyPayoff {
                periods_saved: *periods_saved,
            },
            PayoffStatus::PaidAtTerm => AmortizationStatus::PaidAtTerm,
            PayoffStatus::NonAmortizing { residual_balance } => AmortizationStatus::NonAmortizing {
                residual_balance: *residual_balance,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub status: AmortizationStatus,
    pub summary: SummaryMetrics,
    pub costs: PeriodCosts,
    pub schedule: Vec<PeriodRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute payment, costs, schedule and summary for one set of parameters.
pub fn calculate_mortgage(
    input: &MortgageInput,
) -> MortgageResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate_loan(&input.loan)?;

    let loan = &input.loan;
    let down_payment = loan.home_price * percent_to_rate(loan.down_payment_percent);
    let loan_amount = loan.home_price - down_payment;

    let base = loan.frequency.resolve();
    let extra = input.costs.extra_frequency.resolve();
    push_fallback_warning(&mut warnings, &base, "payment frequency");
    push_fallback_warning(&mut warnings, &extra, "extra payment frequency");

    let period_rate = percent_to_rate(loan.annual_rate_percent) / base.periods_per_year;

    if let SolvingMode::LockPayment { target_payment } = loan.solving_mode {
        if target_payment <= Decimal::ZERO {
            warnings.push(format!(
                "Locked payment {target_payment} is not positive; solved for payment over the entered term instead"
            ));
        }
    }

    let solution = solve_payment(&PaymentSolverInput {
        principal: loan_amount,
        period_rate,
        term_years: loan.term_years,
        periods_per_year: base.periods_per_year,
        mode: loan.solving_mode.clone(),
    })?;

    let costs = aggregate_costs(
        solution.payment(),
        loan.home_price,
        loan_amount,
        &base,
        &extra,
        &input.costs,
    )?;

    let (schedule, status) = match &solution {
        PaymentSolution::Amortizing {
            payment,
            total_payments,
            ..
        } => {
            let schedule = generate_schedule(&ScheduleInput {
                principal: loan_amount,
                period_rate,
                payment: *payment,
                extra_per_period: costs.extra_payment,
                total_payments: *total_payments,
                calendar: loan.start_date.map(|start_date| PaymentCalendar {
                    start_date,
                    interval_days: base.interval_days(),
                }),
            })?;
            let status = AmortizationStatus::from(&schedule.status);
            if let AmortizationStatus::NonAmortizing { residual_balance } = &status {
                warnings.push(format!(
                    "Loan is not paid off within {total_payments} payments; {residual_balance} remains outstanding"
                ));
            }
            (schedule, status)
        }
        PaymentSolution::ZeroLengthTerm => {
            warn!(term_years = %loan.term_years, "zero-length term");
            warnings.push("Resolved number of payments is zero; no schedule generated".into());
            (empty_schedule(), AmortizationStatus::ZeroLengthTerm)
        }
        PaymentSolution::UnamortizablePayment {
            target_payment,
            period_interest,
        } => {
            warn!(
                target_payment = %target_payment,
                period_interest = %period_interest,
                "locked payment does not cover interest"
            );
            warnings.push(format!(
                "Locked payment {target_payment} does not exceed per-period interest {period_interest}; the loan cannot be amortised"
            ));
            (
                empty_schedule(),
                AmortizationStatus::UnamortizablePayment {
                    target_payment: *target_payment,
                    period_interest: *period_interest,
                },
            )
        }
    };

    let has_extra_payment = input.costs.extra_payment > Decimal::ZERO;
    if has_extra_payment {
        warnings.push(
            "interest_saved is the cumulative interest paid through payoff, \
             not a comparison against a schedule without extra payments"
                .into(),
        );
    }

    let summary = build_summary(
        &SummaryContext {
            loan_amount,
            down_payment,
            frequency_label: &base.label,
            periods_per_year: base.periods_per_year,
            term_years: solution.term_years(),
            total_payments: solution.total_payments(),
            has_extra_payment,
        },
        &costs,
        &schedule,
    )?;

    let output = AmortizationOutput {
        status,
        summary,
        costs,
        schedule: schedule.periods,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology(&loan.solving_mode),
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn methodology(mode: &SolvingMode) -> &'static str {
    match mode {
        SolvingMode::LockPayment { target_payment } if *target_payment > Decimal::ZERO => {
            "Level-payment amortisation, term solved for locked payment"
        }
        SolvingMode::LockFrequency => {
            "Level-payment amortisation, payment solved for locked term and frequency"
        }
        _ => "Level-payment amortisation with extra principal payments",
    }
}

fn empty_schedule() -> DerivedSchedule {
    DerivedSchedule {
        periods: Vec::new(),
        periods_saved: 0,
        status: PayoffStatus::PaidAtTerm,
    }
}

fn push_fallback_warning(warnings: &mut Vec<String>, resolved: &ResolvedFrequency, what: &str) {
    if resolved.is_fallback {
        warn!(what, "custom interval missing or non-positive, using monthly");
        warnings.push(format!(
            "Custom {what} interval is missing or not positive; using 12 payments per year"
        ));
    }
}

fn validate_loan(loan: &LoanParameters) -> MortgageResult<()> {
    if loan.home_price < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "home_price".into(),
            reason: "Home price cannot be negative".into(),
        });
    }
    if loan.down_payment_percent < Decimal::ZERO || loan.down_payment_percent > Decimal::ONE_HUNDRED {
        return Err(MortgageError::InvalidInput {
            field: "down_payment_percent".into(),
            reason: "Down payment must be between 0 and 100 percent".into(),
        });
    }
    if loan.term_years < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "term_years".into(),
            reason: "Loan term cannot be negative".into(),
        });
    }
    if loan.annual_rate_percent < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    Ok(())
}
