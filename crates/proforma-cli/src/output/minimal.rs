use serde_json::Value;

use super::format_value;

/// Headline answers, most important first
const PRIORITY_PATHS: [&[&str]; 6] = [
    &["totals", "profit"],
    &["deltas", "profit_delta"],
    &["totals", "equity_irr_pct"],
    &["totals", "roi_pct"],
    &["totals", "total_cost"],
    &["valid"],
];

/// Print just the key answer value from the output.
///
/// Looks for the headline fields in order of priority, skipping nulls,
/// then falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result_obj, path).filter(|v| !v.is_null()) {
            println!("{}", format_value(val, "null"));
            return;
        }
    }

    match result_obj {
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_value(val, "null"));
            }
        }
        Value::Array(rows) => println!("{} rows", rows.len()),
        other => println!("{}", format_value(other, "null")),
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}
