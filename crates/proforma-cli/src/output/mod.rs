pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Scalar leaves of a nested object as dotted paths, in document order.
/// Arrays of objects are left out; callers print them as their own tables.
pub fn flatten_scalars(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    collect_scalars("", map, &mut out);
    out
}

fn collect_scalars(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => collect_scalars(&path, inner, out),
            Value::Array(items) if is_record_array(items) => {}
            _ => out.push((path, val.clone())),
        }
    }
}

/// Arrays of objects under a result, by dotted path.
pub fn record_arrays(map: &Map<String, Value>) -> Vec<(String, &[Value])> {
    let mut out = Vec::new();
    collect_arrays("", map, &mut out);
    out
}

fn collect_arrays<'a>(prefix: &str, map: &'a Map<String, Value>, out: &mut Vec<(String, &'a [Value])>) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => collect_arrays(&path, inner, out),
            Value::Array(items) if is_record_array(items) => out.push((path, items.as_slice())),
            _ => {}
        }
    }
}

fn is_record_array(items: &[Value]) -> bool {
    matches!(items.first(), Some(Value::Object(_)))
}

/// Render a scalar for a table cell or CSV field.
pub fn format_value(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| format_value(v, null))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
