//! Lenient numeric parsing for form and query input. Anything that does not
//! start with a number becomes 0 rather than an error.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Leading integer of `text`, e.g. `"12.9"` -> 12 and `"abc"` -> 0.
pub fn parse_int_prefix(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let end = numeric_prefix_len(trimmed, false);
    trimmed[..end].parse::<f64>().unwrap_or(0.0)
}

/// Leading decimal of `text`, e.g. `"7.5%"` -> 7.5 and `"x"` -> 0.
pub fn parse_float_prefix(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let end = numeric_prefix_len(trimmed, true);
    trimmed[..end].parse::<f64>().unwrap_or(0.0)
}

fn numeric_prefix_len(text: &str, allow_fraction: bool) -> usize {
    let bytes = text.as_bytes();
    let mut idx = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }
    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let mut digits = idx - int_start;

    if allow_fraction && bytes.get(idx) == Some(&b'.') {
        let frac_start = idx + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            idx = frac_end;
        }
    }

    if digits == 0 {
        return 0;
    }

    if allow_fraction && matches!(bytes.get(idx), Some(b'e' | b'E')) {
        let mut exp = idx + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits_start {
            idx = exp;
        }
    }
    idx
}

pub fn lenient_int<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawNumber::Number(v) => v,
        RawNumber::Text(text) => parse_int_prefix(&text),
        RawNumber::Other(_) => 0.0,
    }))
}

pub fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawNumber::Number(v) => v,
        RawNumber::Text(text) => parse_float_prefix(&text),
        RawNumber::Other(_) => 0.0,
    }))
}
