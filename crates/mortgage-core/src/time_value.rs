use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Payment (PMT)
///
/// Cash-flow sign convention: a positive `present_value` (money received)
/// produces a negative payment (money paid out).
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> MortgageResult<Money> {
    if nper == 0 {
        return Err(MortgageError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let one_plus_r = Decimal::ONE + rate;
    let factor = one_plus_r
        .checked_powu(u64::from(nper))
        .ok_or_else(|| MortgageError::ArithmeticOverflow {
            context: format!("PMT growth factor (1 + {rate})^{nper}"),
        })?;
    let annuity_factor = (factor - Decimal::ONE) / rate;

    if annuity_factor.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    Ok(-(present_value * factor + future_value) / annuity_factor)
}

/// Number of periods (NPER) for a level payment to fully amortise `present_value`.
///
/// Same sign convention as [`pmt`]: `payment` is negative for a positive
/// `present_value`. The result is fractional; callers decide how to round.
pub fn nper(rate: Rate, payment: Money, present_value: Money) -> MortgageResult<Decimal> {
    let outflow = -payment;
    if outflow <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "payment".into(),
            reason: "Payment must be an outflow (negative) to amortise a positive balance".into(),
        });
    }

    if rate.is_zero() {
        return Ok(present_value / outflow);
    }

    let period_interest = rate * present_value;
    if outflow <= period_interest {
        return Err(MortgageError::FinancialImpossibility(format!(
            "payment {outflow} does not cover per-period interest {period_interest}"
        )));
    }

    let numerator = (outflow / (outflow - period_interest))
        .checked_ln()
        .ok_or_else(|| MortgageError::FinancialImpossibility("NPER log argument out of range".into()))?;
    let denominator = (Decimal::ONE + rate).checked_ln().ok_or_else(|| {
        MortgageError::InvalidInput {
            field: "rate".into(),
            reason: "Rate must be greater than -100%".into(),
        }
    })?;

    if denominator.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "NPER log growth factor".into(),
        });
    }

    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pmt_standard_mortgage() {
        // 400k at 3%/12 over 360 months ≈ 1686.42
        let result = pmt(dec!(0.0025), 360, dec!(400000), Decimal::ZERO).unwrap();
        assert!((result + dec!(1686.42)).abs() < dec!(0.01), "got {result}");
    }

    #[test]
    fn test_pmt_zero_rate_is_straight_line() {
        let result = pmt(Decimal::ZERO, 120, dec!(12000), Decimal::ZERO).unwrap();
        assert_eq!(result, dec!(-100));
    }

    #[test]
    fn test_pmt_zero_periods_rejected() {
        assert!(pmt(dec!(0.01), 0, dec!(1000), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_nper_inverts_pmt() {
        let payment = pmt(dec!(0.005), 240, dec!(250000), Decimal::ZERO).unwrap();
        let n = nper(dec!(0.005), payment, dec!(250000)).unwrap();
        assert!((n - dec!(240)).abs() < dec!(0.0001), "got {n}");
    }

    #[test]
    fn test_nper_zero_rate() {
        let n = nper(Decimal::ZERO, dec!(-250), dec!(10000)).unwrap();
        assert_eq!(n, dec!(40));
    }

    #[test]
    fn test_nper_payment_below_interest() {
        // 1% of 10,000 is 100 interest per period; 100 never reduces principal
        let result = nper(dec!(0.01), dec!(-100), dec!(10000));
        assert!(matches!(result, Err(MortgageError::FinancialImpossibility(_))));
    }

    #[test]
    fn test_nper_rejects_inflow_payment() {
        assert!(nper(dec!(0.01), dec!(500), dec!(10000)).is_err());
    }
}
