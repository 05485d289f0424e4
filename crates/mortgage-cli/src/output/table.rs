use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::plain;

/// Schedule rows shown before the table is elided.
const SCHEDULE_PREVIEW_ROWS: usize = 50;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result(result, map),
            _ => print_fields(map),
        },
        _ => println!("{}", value),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    if let Some(Value::Object(status)) = result.get("status") {
        let label = status.get("status").map(plain).unwrap_or_default();
        println!("Status: {}", label.replace('_', " "));
        for (key, val) in status.iter().filter(|(k, _)| k.as_str() != "status") {
            println!("  {}: {}", key, plain(val));
        }
        println!();
    }

    let sections = [("Summary", "summary"), ("Per-period payment", "costs")];
    let mut printed_section = false;
    for (title, key) in sections {
        if let Some(Value::Object(section)) = result.get(key) {
            println!("{}", title);
            print_fields(section);
            println!();
            printed_section = true;
        }
    }
    if !printed_section {
        print_fields(result);
    }

    if let Some(Value::Array(rows)) = result.get("schedule") {
        print_schedule(rows);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &plain(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_schedule(rows: &[Value]) {
    if rows.is_empty() {
        println!("Schedule: (empty)");
        return;
    }

    let dated = rows
        .first()
        .and_then(|r| r.get("payment_date"))
        .is_some();
    let mut builder = Builder::default();
    if dated {
        builder.push_record(["Payment #", "Payment Date", "Remaining Balance", "Cumulative Interest"]);
    } else {
        builder.push_record(["Payment #", "Remaining Balance", "Cumulative Interest"]);
    }

    for row in rows.iter().take(SCHEDULE_PREVIEW_ROWS) {
        let cell = |key: &str| row.get(key).map(plain).unwrap_or_default();
        if dated {
            builder.push_record([
                cell("period"),
                cell("payment_date"),
                cell("remaining_balance"),
                cell("cumulative_interest"),
            ]);
        } else {
            builder.push_record([
                cell("period"),
                cell("remaining_balance"),
                cell("cumulative_interest"),
            ]);
        }
    }

    println!("Schedule");
    println!("{}", Table::from(builder));
    if rows.len() > SCHEDULE_PREVIEW_ROWS {
        println!(
            "... {} more rows (use `schedule` for the full CSV)",
            rows.len() - SCHEDULE_PREVIEW_ROWS
        );
    }
}
