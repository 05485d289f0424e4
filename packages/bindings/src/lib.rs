use napi::Result as NapiResult;
use napi_derive::napi;

use mortgage_core::amortization::frequency::PaymentFrequency;
use mortgage_core::amortization::{calculate_mortgage, export, MortgageInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<MortgageInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

/// Full computation: envelope with status, summary, costs and schedule.
#[napi]
pub fn calculate_mortgage_json(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = calculate_mortgage(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Schedule only, rendered as downloadable CSV text.
#[napi]
pub fn amortization_schedule_csv(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = calculate_mortgage(&input).map_err(to_napi_error)?;
    export::schedule_to_csv(&output.result.schedule).map_err(to_napi_error)
}

/// Periods per year and label for a frequency selection.
#[napi]
pub fn resolve_frequency(frequency_json: String) -> NapiResult<String> {
    let frequency: PaymentFrequency = serde_json::from_str(&frequency_json).map_err(to_napi_error)?;
    serde_json::to_string(&frequency.resolve()).map_err(to_napi_error)
}
