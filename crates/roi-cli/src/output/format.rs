//! Display formatting for ledger values. Formatting only changes how a
//! number reads, never its value.

use rust_decimal::Decimal;
use serde_json::Value;

/// Read a decimal out of a JSON value (decimals serialise as strings).
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

/// Plain text for a JSON cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// `-57750` -> `-£57,750`; keeps the amount's own decimal places.
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let text = amount.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{symbol}{grouped}.{f}"),
        None => format!("{sign}{symbol}{grouped}"),
    }
}

/// Fractional rate as a one-decimal percentage: `0.13` -> `13.0`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.1}", rate * Decimal::ONE_HUNDRED)
}

/// Already-percentage figure with a sign: `150.9` -> `150.9%`.
pub fn format_percent(percent: Decimal) -> String {
    format!("{:.1}%", percent)
}
