use mortgage_core::amortization::export;
use mortgage_core::amortization::schedule::PeriodRecord;
use serde_json::{Map, Value};
use std::io;

use super::plain;

/// Write output as CSV to stdout.
///
/// An amortization result prints its schedule in the export format; anything
/// else prints two-column `field,value` pairs.
pub fn print_csv(value: &Value) {
    let result = value.get("result").unwrap_or(value);
    if let Some(schedule) = result.get("schedule") {
        if let Err(e) = write_schedule(schedule, io::stdout().lock()) {
            eprintln!("CSV export error: {}", e);
        }
        return;
    }

    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    match result {
        Value::Object(map) => write_fields(&mut wtr, map),
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => {
            let _ = wtr.write_record([plain(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_schedule<W: io::Write>(
    schedule: &Value,
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let records: Vec<PeriodRecord> = serde_json::from_value(schedule.clone())?;
    export::write_schedule_csv(&records, writer)?;
    Ok(())
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &plain(val)]);
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(plain).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_core::amortization::{calculate_mortgage, LoanParameters, MortgageInput};
    use rust_decimal::Decimal;

    #[test]
    fn test_schedule_uses_export_format() {
        let input = MortgageInput {
            loan: LoanParameters {
                home_price: Decimal::from(250_000),
                down_payment_percent: Decimal::from(20),
                term_years: Decimal::from(15),
                annual_rate_percent: Decimal::new(45, 1),
                ..Default::default()
            },
            ..Default::default()
        };
        let out = calculate_mortgage(&input).unwrap();
        assert_eq!(out.result.schedule.len(), 180);
        let value = serde_json::to_value(&out).unwrap();

        let mut via_output = Vec::new();
        write_schedule(&value["result"]["schedule"], &mut via_output).unwrap();
        let via_export = export::schedule_to_csv(&out.result.schedule).unwrap();

        let text = String::from_utf8(via_output).unwrap();
        assert!(text.starts_with("Payment #,Remaining Balance,Cumulative Interest"));
        assert_eq!(text, via_export);
    }
}
