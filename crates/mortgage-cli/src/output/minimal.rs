use serde_json::Value;

use super::plain;

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in the result (and its `summary` section)
/// in priority order, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "total_payment_per_period",
        "base_payment",
        "periods_per_year",
    ];

    let sections = [Some(result_obj), result_obj.get("summary")];
    for key in &priority_keys {
        for section in sections.iter().flatten() {
            if let Some(val) = section.get(*key) {
                if !val.is_null() {
                    println!("{}", plain(val));
                    return;
                }
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain(val));
            return;
        }
    }

    println!("{}", plain(result_obj));
}
