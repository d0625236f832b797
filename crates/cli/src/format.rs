//! Value → human/json/raw string formatting.
//!
//! Three modes:
//! - **Human** (default): `"text"`, `(integer) 42`, `(nil)`, numbered lists
//! - **JSON** (`--json`): `serde_json::to_string_pretty`
//! - **Raw** (`--raw`): Bare strings, compact JSON for everything else

use anyhow::Error;
use schemapath_core::Value;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Raw,
}

/// Format a resolved value.
pub fn format_value(value: &Value, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        OutputMode::Raw => match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        },
        OutputMode::Human => format_value_human(value),
    }
}

/// Format a list of names (ids, types).
pub fn format_list(items: &[String], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            serde_json::to_string_pretty(items).unwrap_or_else(|_| format!("{:?}", items))
        }
        OutputMode::Raw => items.join("\n"),
        OutputMode::Human => {
            if items.is_empty() {
                "(empty list)".to_string()
            } else {
                items
                    .iter()
                    .enumerate()
                    .map(|(i, s)| format!("{}) \"{}\"", i + 1, s))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    }
}

/// Format an error, including its cause chain.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    let message = format!("{:#}", err);
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": message
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", message)),
        OutputMode::Raw => message,
        OutputMode::Human => format!("(error) {}", message),
    }
}

fn format_value_human(v: &Value) -> String {
    match v {
        Value::Null => "(nil)".to_string(),
        Value::Bool(b) => format!("(boolean) {}", b),
        Value::Number(n) if n.is_f64() => format!("(float) {}", n),
        Value::Number(n) => format!("(integer) {}", n),
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) if arr.is_empty() => "(empty list)".to_string(),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{}) {}", i + 1, format_value_human(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(obj) if obj.is_empty() => "(empty object)".to_string(),
        Value::Object(_) => {
            serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
        }
    }
}
