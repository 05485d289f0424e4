use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs::File;
use std::io;

use mortgage_core::amortization::export;
use mortgage_core::amortization::frequency::PaymentFrequency;
use mortgage_core::amortization::{
    calculate_mortgage, CostParameters, LoanParameters, MortgageInput, SolvingMode,
};

use crate::input;

/// Payment frequency choices on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    BiWeekly,
    Weekly,
    /// Every N days; set N with the matching --*custom-days flag
    Custom,
}

impl FrequencyArg {
    fn to_frequency(self, custom_days: Option<i32>) -> PaymentFrequency {
        match self {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::BiWeekly => PaymentFrequency::BiWeekly,
            FrequencyArg::Weekly => PaymentFrequency::Weekly,
            FrequencyArg::Custom => PaymentFrequency::EveryXDays { days: custom_days },
        }
    }
}

/// Loan and cost parameters shared by `amortize` and `schedule`
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Home price
    #[arg(long, default_value = "500000")]
    pub home_price: Decimal,

    /// Down payment as a percentage of the home price
    #[arg(long, default_value = "20")]
    pub down_payment_percent: Decimal,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub term_years: Decimal,

    /// Annual interest rate in percent (e.g. 3.25)
    #[arg(long, default_value = "3")]
    pub rate: Decimal,

    /// Base payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Days between payments when --frequency custom
    #[arg(long)]
    pub custom_days: Option<i32>,

    /// Hold the payment fixed and solve for the term (requires --target-payment)
    #[arg(long)]
    pub lock_payment: bool,

    /// Hold the term fixed and solve for the payment; wins over --lock-payment
    #[arg(long)]
    pub lock_frequency: bool,

    /// Desired base payment per period for --lock-payment
    #[arg(long)]
    pub target_payment: Option<Decimal>,

    /// Annual property tax as a percentage of the home price
    #[arg(long, default_value = "1.2")]
    pub property_tax_percent: Decimal,

    /// HOA dues per month
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    /// Homeowner's insurance per year
    #[arg(long, default_value = "1200")]
    pub insurance: Decimal,

    /// Annual PMI as a percentage of the loan amount
    #[arg(long, default_value = "0")]
    pub pmi_percent: Decimal,

    /// Extra principal payment amount
    #[arg(long, default_value = "0")]
    pub extra_payment: Decimal,

    /// Extra payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub extra_frequency: FrequencyArg,

    /// Days between extra payments when --extra-frequency custom
    #[arg(long)]
    pub extra_custom_days: Option<i32>,

    /// First payment date (YYYY-MM-DD); dates every period when set
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

impl MortgageArgs {
    fn into_input(self) -> Result<MortgageInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_input(path);
        }
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(data);
        }
        if self.lock_payment && !self.lock_frequency && self.target_payment.is_none() {
            return Err("--target-payment is required with --lock-payment".into());
        }

        Ok(MortgageInput {
            loan: LoanParameters {
                home_price: self.home_price,
                down_payment_percent: self.down_payment_percent,
                term_years: self.term_years,
                annual_rate_percent: self.rate,
                frequency: self.frequency.to_frequency(self.custom_days),
                solving_mode: SolvingMode::from_flags(
                    self.lock_payment,
                    self.lock_frequency,
                    self.target_payment,
                ),
                start_date: self.start_date,
            },
            costs: CostParameters {
                property_tax_percent: self.property_tax_percent,
                monthly_hoa: self.hoa,
                annual_insurance: self.insurance,
                pmi_percent: self.pmi_percent,
                extra_payment: self.extra_payment,
                extra_frequency: self.extra_frequency.to_frequency(self.extra_custom_days),
            },
        })
    }
}

/// Arguments for the full amortization analysis
#[derive(Args)]
pub struct AmortizeArgs {
    #[command(flatten)]
    pub mortgage: MortgageArgs,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input = args.mortgage.into_input()?;
    let result = calculate_mortgage(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for CSV schedule export
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub mortgage: MortgageArgs,

    /// Write the CSV to this file instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mortgage_input = args.mortgage.into_input()?;
    let result = calculate_mortgage(&mortgage_input)?;
    for w in &result.warnings {
        tracing::warn!("{w}");
    }

    match args.out {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| format!("Failed to create '{}': {}", path, e))?;
            export::write_schedule_csv(&result.result.schedule, file)?;
            tracing::info!(path = %path, rows = result.result.schedule.len(), "schedule written");
        }
        None => export::write_schedule_csv(&result.result.schedule, io::stdout().lock())?,
    }
    Ok(())
}

/// Arguments for frequency resolution
#[derive(Args)]
pub struct FrequencyArgs {
    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Days between payments when --frequency custom
    #[arg(long)]
    pub custom_days: Option<i32>,
}

pub fn run_frequency(args: FrequencyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let resolved = args.frequency.to_frequency(args.custom_days).resolve();
    let mut value = serde_json::to_value(&resolved)?;
    if let Value::Object(ref mut map) = value {
        map.insert("interval_days".into(), Value::from(resolved.interval_days()));
    }
    Ok(value)
}
