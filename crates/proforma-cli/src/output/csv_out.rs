use serde_json::Value;
use std::io;

use super::{flatten_scalars, format_value, record_arrays};

/// Write output as CSV to stdout.
///
/// Results carrying records (monthly rows, sweep points) are written as one
/// row per record; anything else as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            if let Some((_, records)) = record_arrays(body)
                .into_iter()
                .find(|(path, _)| path == "points" || path == "monthly.rows")
            {
                write_records(&mut wtr, records);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in flatten_scalars(body) {
                    let _ = wtr.write_record([key, format_value(&val, "")]);
                }
            }
        }
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([format_value(value, "")]);
        }
    }

    let _ = wtr.flush();
}

fn write_records(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([format_value(item, "")]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(|v| format_value(v, "")).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
