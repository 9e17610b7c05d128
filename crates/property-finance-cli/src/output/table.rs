use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_amount;

/// Format output as tables using the tabled crate.
///
/// Analysis results render their ledger as a three-column table; anything
/// else renders as a field / value table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => match res_map.get("line_items") {
            Some(Value::Array(lines)) => print_analysis(res_map, lines),
            _ => print_flat_object(res_map),
        },
        other => println!("{}", other),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
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

fn print_analysis(result: &Map<String, Value>, lines: &[Value]) {
    if let Some(Value::String(location)) = result.get("location") {
        println!("{}\n", location.bold());
    }

    let mut builder = Builder::default();
    builder.push_record(["", "Year of acquisition", "Steady state"]);
    let mut verdicts = Vec::new();

    for line in lines {
        let Value::Object(item) = line else { continue };
        let label = item.get("label").and_then(Value::as_str).unwrap_or_default();
        let tags: Vec<&str> = match item.get("tags") {
            Some(Value::Array(t)) => t.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };

        if tags.contains(&"separator") {
            builder.push_record(["", "", ""]);
            continue;
        }
        let cell = |key: &str| item.get(key).map(format_amount).unwrap_or_default();
        let (year_one, steady) = (cell("year_one"), cell("steady_state"));

        if tags.contains(&"profit") || tags.contains(&"loss") {
            verdicts.push((label.trim().to_string(), steady.clone(), tags.contains(&"profit")));
        }
        let label = if tags.contains(&"title") {
            label.to_uppercase()
        } else {
            label.to_string()
        };
        builder.push_record([label, year_one, steady]);
    }
    println!("{}", Table::from(builder));

    for (label, amount, favourable) in verdicts {
        let line = format!("{label}: {amount}");
        if favourable {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line.red().bold());
        }
    }

    let mut summary = Builder::default();
    summary.push_record(["Figure", "Value"]);
    for key in ["total_investment", "annual_debt_service", "monthly_warm_rent"] {
        if let Some(v) = result.get(key) {
            summary.push_record([key.to_string(), format_amount(v)]);
        }
    }
    if let Some(Value::Object(ratios)) = result.get("ratios") {
        for (key, v) in ratios {
            summary.push_record([key.clone(), format_amount(v)]);
        }
    }
    if let Some(Value::Array(loans)) = result.get("loans") {
        for loan in loans {
            let label = loan.get("label").and_then(Value::as_str).unwrap_or("Loan");
            let text = loan.get("summary").and_then(Value::as_str).unwrap_or_default();
            summary.push_record([label.to_string(), text.to_string()]);
        }
    }
    println!("\n{}", Table::from(summary));
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(_) | Value::Number(_) => format_amount(value),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
