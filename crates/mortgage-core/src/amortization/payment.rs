//! Payment solver: base payment and term under the three solving modes.
//!
//! - **Default**: annuity payment for the entered term.
//! - **LockFrequency**: term held fixed at the chosen frequency, payment solved.
//! - **LockPayment**: payment held fixed, number of periods solved.
//!
//! A zero per-period rate is always a separate path; the annuity
//! denominator `(1+r)^n - 1` is never formed at r = 0.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MortgageError;
use crate::time_value;
use crate::types::{Money, Rate, Years};
use crate::MortgageResult;

/// Upper bound on the number of periods in any schedule (daily for 100 years).
pub const MAX_TOTAL_PAYMENTS: u32 = 36_500;

/// How the payment/term pair is solved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SolvingMode {
    #[default]
    Default,
    /// Solve for term given a fixed per-period payment.
    LockPayment { target_payment: Money },
    /// Hold the term fixed and solve for the payment.
    LockFrequency,
}

impl SolvingMode {
    /// Build a mode from independent UI-style toggles.
    ///
    /// Lock-frequency wins when both toggles are set. A lock-payment toggle
    /// without a target resolves to `Default`.
    pub fn from_flags(lock_payment: bool, lock_frequency: bool, target_payment: Option<Money>) -> Self {
        if lock_frequency {
            return SolvingMode::LockFrequency;
        }
        match (lock_payment, target_payment) {
            (true, Some(target_payment)) => SolvingMode::LockPayment { target_payment },
            _ => SolvingMode::Default,
        }
    }
}

/// Input to [`solve_payment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSolverInput {
    pub principal: Money,
    /// Per-period rate (annual rate / periods per year).
    pub period_rate: Rate,
    /// Nominal term in years; ignored in lock-payment mode.
    pub term_years: Years,
    pub periods_per_year: Decimal,
    pub mode: SolvingMode,
}

/// Outcome of the payment solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentSolution {
    /// A usable payment/term pair.
    Amortizing {
        payment: Money,
        total_payments: u32,
        term_years: Years,
    },
    /// The resolved number of payments is zero; payment defaults to zero.
    ZeroLengthTerm,
    /// Lock-payment target does not exceed the first period's interest.
    UnamortizablePayment {
        target_payment: Money,
        period_interest: Money,
    },
}

impl PaymentSolution {
    pub fn payment(&self) -> Money {
        match self {
            PaymentSolution::Amortizing { payment, .. } => *payment,
            PaymentSolution::ZeroLengthTerm => Decimal::ZERO,
            PaymentSolution::UnamortizablePayment { target_payment, .. } => *target_payment,
        }
    }

    pub fn total_payments(&self) -> u32 {
        match self {
            PaymentSolution::Amortizing { total_payments, .. } => *total_payments,
            _ => 0,
        }
    }

    pub fn term_years(&self) -> Years {
        match self {
            PaymentSolution::Amortizing { term_years, .. } => *term_years,
            _ => Decimal::ZERO,
        }
    }
}

/// Solve the base payment and number of periods.
///
/// A `LockPayment` mode with a non-positive target is solved as `Default`;
/// [`calculate_mortgage`](super::calculator::calculate_mortgage) reports that
/// substitution as a warning.
pub fn solve_payment(input: &PaymentSolverInput) -> MortgageResult<PaymentSolution> {
    validate_solver_input(input)?;

    let solution = match input.mode {
        SolvingMode::LockPayment { target_payment } if target_payment > Decimal::ZERO => {
            solve_term(input, target_payment)?
        }
        SolvingMode::LockPayment { .. } | SolvingMode::LockFrequency | SolvingMode::Default => {
            solve_level_payment(input)?
        }
    };

    debug!(
        principal = %input.principal,
        period_rate = %input.period_rate,
        mode = ?input.mode,
        solution = ?solution,
        "payment solved"
    );
    Ok(solution)
}

/// Lock-frequency and default branches: hold the term, solve the payment.
fn solve_level_payment(input: &PaymentSolverInput) -> MortgageResult<PaymentSolution> {
    let nominal = (input.term_years * input.periods_per_year).floor();
    let total_payments = periods_to_u32(nominal, "term_years")?;

    if total_payments == 0 {
        return Ok(PaymentSolution::ZeroLengthTerm);
    }

    let payment = -time_value::pmt(input.period_rate, total_payments, input.principal, Decimal::ZERO)?;

    Ok(PaymentSolution::Amortizing {
        payment,
        total_payments,
        term_years: Decimal::from(total_payments) / input.periods_per_year,
    })
}

/// Lock-payment branch: hold the payment, solve the number of periods.
fn solve_term(input: &PaymentSolverInput, target_payment: Money) -> MortgageResult<PaymentSolution> {
    let period_interest = input.principal * input.period_rate;
    if !input.period_rate.is_zero() && target_payment <= period_interest {
        return Ok(PaymentSolution::UnamortizablePayment {
            target_payment,
            period_interest,
        });
    }

    let fractional = time_value::nper(input.period_rate, -target_payment, input.principal)?;
    let total_payments = periods_to_u32(fractional.floor(), "target_payment")?;

    if total_payments == 0 {
        return Ok(PaymentSolution::ZeroLengthTerm);
    }

    Ok(PaymentSolution::Amortizing {
        payment: target_payment,
        total_payments,
        term_years: Decimal::from(total_payments) / input.periods_per_year,
    })
}

fn periods_to_u32(periods: Decimal, field: &str) -> MortgageResult<u32> {
    let count = periods.to_u32().ok_or_else(|| MortgageError::InvalidInput {
        field: field.into(),
        reason: format!("Resolved payment count {periods} is not representable"),
    })?;
    if count > MAX_TOTAL_PAYMENTS {
        return Err(MortgageError::InvalidInput {
            field: field.into(),
            reason: format!(
                "Resolved payment count {count} exceeds the maximum of {MAX_TOTAL_PAYMENTS}"
            ),
        });
    }
    Ok(count)
}

fn validate_solver_input(input: &PaymentSolverInput) -> MortgageResult<()> {
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
    if input.term_years < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "term_years".into(),
            reason: "Term cannot be negative".into(),
        });
    }
    if input.periods_per_year <= Decimal::ZERO {
        return Err(MortgageError::DivisionByZero {
            context: "periods per year".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        assert!(
            (actual - expected).abs() <= tol,
            "{msg}: expected ~{expected}, got {actual}"
        );
    }

    fn monthly_input(mode: SolvingMode) -> PaymentSolverInput {
        PaymentSolverInput {
            principal: dec!(400000),
            period_rate: dec!(0.0025),
            term_years: dec!(30),
            periods_per_year: dec!(12),
            mode,
        }
    }

    #[test]
    fn test_default_mode_standard_payment() {
        let sol = solve_payment(&monthly_input(SolvingMode::Default)).unwrap();
        assert_eq!(sol.total_payments(), 360);
        assert_close(sol.payment(), dec!(1686.42), dec!(0.01), "30y 3% payment");
        assert_eq!(sol.term_years(), dec!(30));
    }

    #[test]
    fn test_term_achieved_follows_floored_count() {
        let mut input = monthly_input(SolvingMode::Default);
        input.periods_per_year = dec!(365) / dec!(7);
        let sol = solve_payment(&input).unwrap();
        assert_eq!(sol.total_payments(), 1564);
        assert_close(sol.term_years(), dec!(29.9945), dec!(0.0001), "7-day term");
        assert!(sol.term_years() < dec!(30));
    }

    #[test]
    fn test_lock_frequency_matches_default() {
        let default = solve_payment(&monthly_input(SolvingMode::Default)).unwrap();
        let locked = solve_payment(&monthly_input(SolvingMode::LockFrequency)).unwrap();
        assert_eq!(default, locked);
    }

    #[test]
    fn test_zero_rate_payment_is_principal_over_n() {
        let mut input = monthly_input(SolvingMode::Default);
        input.period_rate = Decimal::ZERO;
        let sol = solve_payment(&input).unwrap();
        assert_eq!(sol.payment(), dec!(400000) / dec!(360));
    }

    #[test]
    fn test_zero_term_is_zero_length() {
        let mut input = monthly_input(SolvingMode::LockFrequency);
        input.term_years = Decimal::ZERO;
        let sol = solve_payment(&input).unwrap();
        assert_eq!(sol, PaymentSolution::ZeroLengthTerm);
        assert_eq!(sol.payment(), Decimal::ZERO);
    }

    #[test]
    fn test_lock_payment_solves_term() {
        let sol = solve_payment(&monthly_input(SolvingMode::LockPayment {
            target_payment: dec!(2500),
        }))
        .unwrap();
        // ln(2500 / 1500) / ln(1.0025) ≈ 204.58 → 204 payments
        assert_eq!(sol.total_payments(), 204);
        assert_eq!(sol.payment(), dec!(2500));
        assert_eq!(sol.term_years(), dec!(204) / dec!(12));
    }

    #[test]
    fn test_lock_payment_zero_rate() {
        let mut input = monthly_input(SolvingMode::LockPayment {
            target_payment: dec!(3000),
        });
        input.period_rate = Decimal::ZERO;
        let sol = solve_payment(&input).unwrap();
        assert_eq!(sol.total_payments(), 133);
    }

    #[test]
    fn test_lock_payment_below_interest_is_unamortizable() {
        let sol = solve_payment(&monthly_input(SolvingMode::LockPayment {
            target_payment: dec!(1000),
        }))
        .unwrap();
        assert_eq!(
            sol,
            PaymentSolution::UnamortizablePayment {
                target_payment: dec!(1000),
                period_interest: dec!(1000),
            }
        );
    }

    #[test]
    fn test_lock_payment_non_positive_target_uses_default() {
        let sol = solve_payment(&monthly_input(SolvingMode::LockPayment {
            target_payment: Decimal::ZERO,
        }))
        .unwrap();
        assert_eq!(sol.total_payments(), 360);
    }

    #[test]
    fn test_lock_payment_round_trip() {
        let level = solve_payment(&monthly_input(SolvingMode::LockFrequency)).unwrap();
        let solved = solve_payment(&monthly_input(SolvingMode::LockPayment {
            target_payment: level.payment(),
        }))
        .unwrap();
        let diff = i64::from(level.total_payments()) - i64::from(solved.total_payments());
        assert!(diff.abs() <= 1, "round trip drifted by {diff} periods");
    }

    #[test]
    fn test_excessive_term_rejected() {
        let mut input = monthly_input(SolvingMode::Default);
        input.periods_per_year = dec!(365);
        input.term_years = dec!(200);
        assert!(matches!(
            solve_payment(&input),
            Err(MortgageError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_from_flags_precedence() {
        assert_eq!(
            SolvingMode::from_flags(true, true, Some(dec!(2000))),
            SolvingMode::LockFrequency
        );
        assert_eq!(
            SolvingMode::from_flags(true, false, Some(dec!(2000))),
            SolvingMode::LockPayment {
                target_payment: dec!(2000)
            }
        );
        assert_eq!(SolvingMode::from_flags(true, false, None), SolvingMode::Default);
        assert_eq!(SolvingMode::from_flags(false, false, Some(dec!(1))), SolvingMode::Default);
    }

    #[test]
    fn test_negative_principal_rejected() {
        let mut input = monthly_input(SolvingMode::Default);
        input.principal = dec!(-1);
        assert!(solve_payment(&input).is_err());
    }
}
