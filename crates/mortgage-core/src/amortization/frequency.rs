//! Payment frequency resolution.
//!
//! Maps a frequency selection to a periods-per-year value and a display
//! label. Called once for the base payment and once, independently, for the
//! extra-payment cadence.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days used to convert a custom interval into periods per year.
const DAYS_PER_YEAR: Decimal = dec!(365);

/// Decimal places kept before flooring the day interval; `365 / (365 / d)`
/// otherwise lands a hair below `d`.
const INTERVAL_DAYS_DP: u32 = 10;

/// Periods per year used when a custom interval is missing or non-positive.
const FALLBACK_PERIODS_PER_YEAR: Decimal = dec!(12);

/// Payment cadence selected by the borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    /// 12 payments per year
    #[default]
    Monthly,
    /// 26 payments per year
    BiWeekly,
    /// 52 payments per year
    Weekly,
    /// One payment every `days` days (365 / days per year)
    EveryXDays {
        #[serde(default)]
        days: Option<i32>,
    },
}

/// Result of resolving a [`PaymentFrequency`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFrequency {
    pub periods_per_year: Decimal,
    pub label: String,
    /// True when an invalid custom interval was replaced by 12 periods per year.
    pub is_fallback: bool,
}

impl PaymentFrequency {
    /// Resolve to periods per year and a display label.
    pub fn resolve(&self) -> ResolvedFrequency {
        match *self {
            PaymentFrequency::Monthly => ResolvedFrequency::named(dec!(12), "Monthly"),
            PaymentFrequency::BiWeekly => ResolvedFrequency::named(dec!(26), "Bi-Weekly"),
            PaymentFrequency::Weekly => ResolvedFrequency::named(dec!(52), "Weekly"),
            PaymentFrequency::EveryXDays { days: Some(d) } if d > 0 => ResolvedFrequency {
                periods_per_year: DAYS_PER_YEAR / Decimal::from(d),
                label: format!("Every {d} Days"),
                is_fallback: false,
            },
            PaymentFrequency::EveryXDays { days } => ResolvedFrequency {
                periods_per_year: FALLBACK_PERIODS_PER_YEAR,
                label: match days {
                    Some(d) => format!("Every {d} Days"),
                    None => "Monthly".to_string(),
                },
                is_fallback: true,
            },
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolve().label)
    }
}

impl ResolvedFrequency {
    fn named(periods_per_year: Decimal, label: &str) -> Self {
        ResolvedFrequency {
            periods_per_year,
            label: label.to_string(),
            is_fallback: false,
        }
    }

    /// Whole calendar days between consecutive payments, `floor(365 / periods_per_year)`.
    pub fn interval_days(&self) -> u64 {
        if self.periods_per_year <= Decimal::ZERO {
            return 0;
        }
        (DAYS_PER_YEAR / self.periods_per_year)
            .round_dp(INTERVAL_DAYS_DP)
            .floor()
            .to_u64()
            .unwrap_or(0)
    }
}

/// Resolve a payment frequency selection.
pub fn resolve_frequency(frequency: &PaymentFrequency) -> ResolvedFrequency {
    frequency.resolve()
}
