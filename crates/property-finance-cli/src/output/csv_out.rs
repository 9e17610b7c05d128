use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// Analysis results become one row per ledger line; other results become
/// field / value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match result.get("line_items") {
                Some(Value::Array(lines)) => write_ledger_csv(&mut wtr, lines),
                _ => write_fields_csv(&mut wtr, result),
            },
            _ => write_fields_csv(&mut wtr, map),
        },
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_ledger_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, lines: &[Value]) {
    let _ = wtr.write_record(["kind", "label", "year_one", "steady_state", "tags"]);
    for line in lines {
        let Value::Object(item) = line else { continue };
        let field = |key: &str| item.get(key).map(format_csv_value).unwrap_or_default();
        let tags = match item.get("tags") {
            Some(Value::Array(t)) => t
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("|"),
            _ => String::new(),
        };
        let _ = wtr.write_record([
            field("kind"),
            field("label").trim().to_string(),
            field("year_one"),
            field("steady_state"),
            tags,
        ]);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
