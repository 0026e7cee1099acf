//! Pointer chains and value coercion for loosely typed upstream JSON

use serde_json::Value;

/// First value along `pointers` that is present and not null or blank
pub fn first_value<'a>(item: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers
        .iter()
        .filter_map(|pointer| item.pointer(pointer))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => true,
        })
}

/// Display text of a scalar value. Objects and arrays have none.
#[must_use]
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => n.as_f64().map(format_number),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric value of a number or a numeric-looking string ("$1,200.50")
#[must_use]
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            // "4.5 of 5 bubbles" keeps only the leading figure
            let leading = s
                .trim()
                .split(|c: char| c.is_whitespace() || c == '/')
                .next()
                .unwrap_or_default();
            leading
                .trim_start_matches(|c: char| !c.is_ascii_digit())
                .replace(',', "")
                .parse()
                .ok()
                .or_else(|| cleaned.parse().ok())
        }
        _ => None,
    }
}

pub fn first_text(item: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|pointer| item.pointer(pointer))
        .find_map(text)
}

pub fn first_number(item: &Value, pointers: &[&str]) -> Option<f64> {
    pointers
        .iter()
        .filter_map(|pointer| item.pointer(pointer))
        .find_map(number)
}

/// Format a float without a trailing ".0"
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let formatted = format!("{n:.2}");
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Rating display: numbers become "n/5", strings are kept verbatim
#[must_use]
pub fn rating_display(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().map(|r| {
            let rounded = (r * 10.0).round() / 10.0;
            format!("{}/5", format_number(rounded))
        }),
        other => text(other),
    }
}

/// Price display: numbers get the currency, strings are kept verbatim
#[must_use]
pub fn price_display(value: &Value, currency: &str) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().map(|amount| amount_display(amount, currency)),
        other => text(other),
    }
}

#[must_use]
pub fn amount_display(amount: f64, currency: &str) -> String {
    if currency.eq_ignore_ascii_case("USD") {
        format!("${}", format_number(amount))
    } else {
        format!("{} {}", format_number(amount), currency.to_uppercase())
    }
}

/// Human readable duration from a minute count
#[must_use]
pub fn minutes_display(minutes: f64) -> String {
    let minutes = minutes.max(0.0).round() as u64;
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
