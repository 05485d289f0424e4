//! Recurring housing costs normalised to the base payment period.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::frequency::{PaymentFrequency, ResolvedFrequency};
use crate::error::MortgageError;
use crate::types::{percent_to_rate, Money};
use crate::MortgageResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Recurring costs and extra principal payments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    /// Annual property tax as a percentage of the home price.
    pub property_tax_percent: Decimal,
    /// HOA dues per month.
    pub monthly_hoa: Money,
    /// Homeowner's insurance per year.
    pub annual_insurance: Money,
    /// Annual PMI as a percentage of the loan amount.
    pub pmi_percent: Decimal,
    /// Extra principal paid at `extra_frequency`.
    pub extra_payment: Money,
    /// Cadence of the extra payment, independent of the base frequency.
    pub extra_frequency: PaymentFrequency,
}

/// Per-period breakdown of the all-in payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCosts {
    pub base_payment: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub pmi: Money,
    pub extra_payment: Money,
    pub total_payment: Money,
}

/// Convert an extra payment made `extra_periods_per_year` times a year into
/// an amount per base period.
pub fn extra_per_period(
    extra_amount: Money,
    extra_periods_per_year: Decimal,
    base_periods_per_year: Decimal,
) -> MortgageResult<Money> {
    if base_periods_per_year <= Decimal::ZERO {
        return Err(MortgageError::DivisionByZero {
            context: "base periods per year in extra payment normalisation".into(),
        });
    }
    Ok(extra_amount * extra_periods_per_year / base_periods_per_year)
}

/// Combine the base payment with tax, insurance, HOA, PMI and extra payment.
pub fn aggregate_costs(
    base_payment: Money,
    home_price: Money,
    loan_amount: Money,
    base: &ResolvedFrequency,
    extra: &ResolvedFrequency,
    costs: &CostParameters,
) -> MortgageResult<PeriodCosts> {
    validate_costs(costs)?;

    let ppy = base.periods_per_year;
    if ppy <= Decimal::ZERO {
        return Err(MortgageError::DivisionByZero {
            context: "base periods per year in cost aggregation".into(),
        });
    }

    let property_tax = home_price * percent_to_rate(costs.property_tax_percent) / ppy;
    let insurance = costs.annual_insurance / ppy;
    let hoa = costs.monthly_hoa * MONTHS_PER_YEAR / ppy;
    let pmi = loan_amount * percent_to_rate(costs.pmi_percent) / ppy;
    let extra_payment = extra_per_period(costs.extra_payment, extra.periods_per_year, ppy)?;

    let total_payment = base_payment + property_tax + insurance + hoa + pmi + extra_payment;

    Ok(PeriodCosts {
        base_payment,
        property_tax,
        insurance,
        hoa,
        pmi,
        extra_payment,
        total_payment,
    })
}

fn validate_costs(costs: &CostParameters) -> MortgageResult<()> {
    let fields = [
        ("property_tax_percent", costs.property_tax_percent),
        ("monthly_hoa", costs.monthly_hoa),
        ("annual_insurance", costs.annual_insurance),
        ("pmi_percent", costs.pmi_percent),
        ("extra_payment", costs.extra_payment),
    ];
    for (field, value) in fields {
        if value < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: field.into(),
                reason: "Cost inputs cannot be negative".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly() -> ResolvedFrequency {
        PaymentFrequency::Monthly.resolve()
    }

    #[test]
    fn test_monthly_breakdown() {
        let costs = CostParameters {
            property_tax_percent: dec!(1.2),
            monthly_hoa: dec!(50),
            annual_insurance: dec!(1200),
            pmi_percent: dec!(0.5),
            extra_payment: dec!(100),
            extra_frequency: PaymentFrequency::Monthly,
        };
        let out = aggregate_costs(dec!(1686), dec!(500000), dec!(400000), &monthly(), &monthly(), &costs).unwrap();
        assert_eq!(out.property_tax, dec!(500));
        assert_eq!(out.insurance, dec!(100));
        assert_eq!(out.hoa, dec!(50));
        assert_eq!(out.pmi, dec!(2000) / dec!(12));
        assert_eq!(out.extra_payment, dec!(100));
        assert_eq!(
            out.total_payment,
            dec!(1686) + dec!(500) + dec!(100) + dec!(50) + dec!(2000) / dec!(12) + dec!(100)
        );
    }

    #[test]
    fn test_cross_frequency_extra() {
        // 200 bi-weekly = 5,200 a year = 433.33 per month
        let extra = extra_per_period(dec!(200), dec!(26), dec!(12)).unwrap();
        assert_eq!(extra, dec!(5200) / dec!(12));
    }

    #[test]
    fn test_hoa_on_weekly_base() {
        let costs = CostParameters {
            monthly_hoa: dec!(260),
            ..Default::default()
        };
        let weekly = PaymentFrequency::Weekly.resolve();
        let out = aggregate_costs(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, &weekly, &monthly(), &costs).unwrap();
        assert_eq!(out.hoa, dec!(60));
        assert_eq!(out.total_payment, dec!(60));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let costs = CostParameters {
            annual_insurance: dec!(-5),
            ..Default::default()
        };
        assert!(aggregate_costs(dec!(100), dec!(1), dec!(1), &monthly(), &monthly(), &costs).is_err());
    }
}
