//! Period-by-period amortisation with extra payments and early payoff.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Residual balance below which a full-term schedule counts as paid off.
const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Calendar used to date each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCalendar {
    /// Date of the first payment.
    pub start_date: NaiveDate,
    /// Days between consecutive payments.
    pub interval_days: u64,
}

/// Input to [`generate_schedule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    pub period_rate: Rate,
    pub payment: Money,
    /// Extra principal per base period, already normalised to the base frequency.
    pub extra_per_period: Money,
    /// Nominal number of payments.
    pub total_payments: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<PaymentCalendar>,
}

/// A single row of the amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based payment number.
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    /// Balance after this period's payment, floored at zero.
    pub remaining_balance: Money,
    /// Interest paid from period 1 through this period.
    pub cumulative_interest: Money,
}

/// How the schedule terminated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffStatus {
    /// Balance reached zero before the nominal term.
    EarlyPayoff { periods_saved: u32 },
    /// Balance reached zero at the last nominal payment.
    PaidAtTerm,
    /// Nominal term elapsed with a balance still outstanding.
    NonAmortizing { residual_balance: Money },
}

/// Generated schedule plus termination details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSchedule {
    pub periods: Vec<PeriodRecord>,
    /// Nominal payments not needed because of early payoff.
    pub periods_saved: u32,
    pub status: PayoffStatus,
}

impl DerivedSchedule {
    /// Cumulative interest at the last recorded period.
    pub fn total_interest(&self) -> Money {
        self.periods
            .last()
            .map(|p| p.cumulative_interest)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn is_paid_off(&self) -> bool {
        !matches!(self.status, PayoffStatus::NonAmortizing { .. })
    }

    /// Date of the final payment, when the loan is paid off and dated.
    pub fn payoff_date(&self) -> Option<NaiveDate> {
        if !self.is_paid_off() {
            return None;
        }
        self.periods.last().and_then(|p| p.payment_date)
    }
}

/// Iterate the nominal term, stopping as soon as the balance reaches zero.
///
/// A payment below the interest due grows the balance; that is reported as
/// [`PayoffStatus::NonAmortizing`], not an error.
pub fn generate_schedule(input: &ScheduleInput) -> MortgageResult<DerivedSchedule> {
    validate_schedule_input(input)?;

    let mut periods = Vec::with_capacity(input.total_payments as usize);
    let mut balance = input.principal;
    let mut cumulative_interest = Decimal::ZERO;
    let mut periods_saved = 0u32;
    let mut paid_off = false;

    for period in 1..=input.total_payments {
        let interest = balance
            .checked_mul(input.period_rate)
            .ok_or_else(|| overflow(period, "interest"))?;
        let principal = input.payment - interest;
        balance = balance
            .checked_sub(principal + input.extra_per_period)
            .ok_or_else(|| overflow(period, "balance"))?;
        cumulative_interest = cumulative_interest
            .checked_add(interest)
            .ok_or_else(|| overflow(period, "cumulative interest"))?;

        periods.push(PeriodRecord {
            period,
            payment_date: payment_date(input.calendar.as_ref(), period)?,
            remaining_balance: balance.max(Decimal::ZERO),
            cumulative_interest,
        });

        if balance <= Decimal::ZERO {
            periods_saved = input.total_payments - period;
            paid_off = true;
            break;
        }
    }

    let status = if paid_off && periods_saved > 0 {
        PayoffStatus::EarlyPayoff { periods_saved }
    } else if paid_off || balance < BALANCE_EPSILON {
        PayoffStatus::PaidAtTerm
    } else {
        PayoffStatus::NonAmortizing {
            residual_balance: balance,
        }
    };

    match &status {
        PayoffStatus::NonAmortizing { residual_balance } => warn!(
            total_payments = input.total_payments,
            residual_balance = %residual_balance,
            "schedule does not amortise within the nominal term"
        ),
        _ => debug!(
            periods = periods.len(),
            periods_saved,
            "schedule generated"
        ),
    }

    Ok(DerivedSchedule {
        periods,
        periods_saved,
        status,
    })
}

fn payment_date(calendar: Option<&PaymentCalendar>, period: u32) -> MortgageResult<Option<NaiveDate>> {
    let Some(cal) = calendar else {
        return Ok(None);
    };
    let offset = cal.interval_days * u64::from(period - 1);
    cal.start_date
        .checked_add_days(Days::new(offset))
        .map(Some)
        .ok_or_else(|| {
            MortgageError::DateError(format!(
                "payment {period} falls {offset} days after {} and is out of range",
                cal.start_date
            ))
        })
}

fn overflow(period: u32, what: &str) -> MortgageError {
    MortgageError::ArithmeticOverflow {
        context: format!("{what} at period {period}"),
    }
}

fn validate_schedule_input(input: &ScheduleInput) -> MortgageResult<()> {
    if input.principal < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if input.period_rate < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "period_rate".into(),
            reason: "Per-period rate cannot be negative".into(),
        });
    }
    if input.extra_per_period < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "extra_per_period".into(),
            reason: "Extra payment cannot be negative".into(),
        });
    }
    Ok(())
}
