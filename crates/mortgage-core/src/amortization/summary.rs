//! Headline metrics derived from a generated schedule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::costs::PeriodCosts;
use super::schedule::DerivedSchedule;
use crate::error::MortgageError;
use crate::types::{Money, Years};
use crate::MortgageResult;

/// Inputs to [`build_summary`] that do not come from the schedule itself.
#[derive(Debug, Clone)]
pub struct SummaryContext<'a> {
    pub loan_amount: Money,
    pub down_payment: Money,
    pub frequency_label: &'a str,
    pub periods_per_year: Decimal,
    /// Term from the payment solver (nominal, or solved in lock-payment mode).
    pub term_years: Years,
    pub total_payments: u32,
    /// Whether the borrower configured an extra payment.
    pub has_extra_payment: bool,
}

/// Summary reported alongside the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub loan_amount: Money,
    pub down_payment: Money,
    pub base_payment: Money,
    pub total_payment_per_period: Money,
    pub frequency_label: String,
    /// Nominal term, or the solved term in lock-payment mode.
    pub term_years_achieved: Years,
    pub total_payments: u32,
    pub payments_made: u32,
    pub time_saved_years: Years,
    /// Cumulative interest paid through payoff, reported only when an extra
    /// payment is configured. This is not a comparison against a
    /// no-extra-payment baseline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_saved: Option<Money>,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Only present when the balance reaches zero within the schedule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

pub fn build_summary(
    ctx: &SummaryContext<'_>,
    costs: &PeriodCosts,
    schedule: &DerivedSchedule,
) -> MortgageResult<SummaryMetrics> {
    if ctx.periods_per_year <= Decimal::ZERO {
        return Err(MortgageError::DivisionByZero {
            context: "periods per year in summary".into(),
        });
    }

    let total_interest = schedule.total_interest();
    let interest_saved = ctx.has_extra_payment.then_some(total_interest);

    Ok(SummaryMetrics {
        loan_amount: ctx.loan_amount,
        down_payment: ctx.down_payment,
        base_payment: costs.base_payment,
        total_payment_per_period: costs.total_payment,
        frequency_label: ctx.frequency_label.to_string(),
        term_years_achieved: ctx.term_years,
        total_payments: ctx.total_payments,
        payments_made: schedule.periods.len() as u32,
        time_saved_years: Decimal::from(schedule.periods_saved) / ctx.periods_per_year,
        interest_saved,
        total_interest,
        start_date: schedule.periods.first().and_then(|p| p.payment_date),
        payoff_date: schedule.payoff_date(),
    })
}
