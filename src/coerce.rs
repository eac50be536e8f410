//! Field-level coercion of untrusted JSON.
//!
//! Each function turns an optional, arbitrarily-typed value into a concrete
//! Rust value and never fails. Scraped rows and model output are both built
//! out of these.

use serde_json::Value;

/// Strings pass through, scalars are stringified, everything else is `""`
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Numbers pass through; strings are parsed by their leading numeric part
/// (`"12.5%"` is 12.5, `"₹8,450/sqft"` is 8450). Anything else is 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_leading_number(s),
        _ => 0.0,
    }
}

/// Array of strings; non-string entries are dropped, non-arrays are empty
pub fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse the first number appearing in `raw`, ignoring currency symbols,
/// thousands separators and trailing units
pub fn parse_leading_number(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let start = match cleaned.find(|c: char| c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
    {
        Some(idx) => idx,
        None => return 0.0,
    };

    let rest = &cleaned[start..];
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, c) in rest.char_indices() {
        match c {
            '-' | '+' if idx == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            c if c.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = idx + c.len_utf8();
    }

    if !seen_digit {
        return 0.0;
    }
    rest[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .unwrap_or(0.0)
}
