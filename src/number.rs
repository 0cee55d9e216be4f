//! Lenient numeric coercion shared by the normalizer, exporter and view-model.
//!
//! Model output stores numbers as numbers, as numeric strings, as strings with
//! an inline formula (`"260 ((100+100)*1.3)"`) or as infinity tokens. These
//! helpers read all of them without failing.

use crate::classify::is_infinity_word;
use serde_json::Value;
use std::borrow::Cow;

/// Values at or above this are treated as unbounded.
pub const INF_THRESHOLD: f64 = 999_999_999.0;

/// Stored bond value meaning "maxed / unbounded".
pub const BOND_SENTINEL: f64 = 101.0;

/// Glyph written for unbounded bond on export.
pub const INFINITY_GLYPH: &str = "∞";

/// Strict numeric reading of a whole string: surrounding whitespace allowed,
/// empty text reads as zero, words such as `inf` or `nan` are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return Some(0.0);
    }
    let lower = t.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Reads the longest numeric prefix, ignoring leading whitespace and any
/// trailing text (`"260 (formula)"` reads as 260).
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    if t[i..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut saw_digit = i > digits_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start || saw_digit {
            saw_digit = saw_digit || j > frac_start;
            i = j;
        }
    }
    if !saw_digit {
        return None;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    t[..i].parse::<f64>().ok()
}

/// Text form of a JSON value the way string concatenation would show it.
pub fn value_text(v: &Value) -> Cow<'_, str> {
    match v {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Numeric reading of an arbitrary JSON value; `None` when not finite.
pub fn to_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_number(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        _ => None,
    }
}

pub fn number_or(v: Option<&Value>, fallback: f64) -> f64 {
    v.and_then(to_number).unwrap_or(fallback)
}

pub fn is_huge(s: &str) -> bool {
    parse_number(s).is_some_and(|n| n >= INF_THRESHOLD)
}

pub fn is_infinity_token(s: &str) -> bool {
    is_infinity_word(s) || is_huge(s)
}

/// Leading number of `s`, with infinity tokens mapped to `f64::INFINITY`.
pub fn parse_or_infinity(s: &str, fallback: f64) -> f64 {
    if is_infinity_token(s) {
        return f64::INFINITY;
    }
    parse_float_prefix(s)
        .filter(|n| n.is_finite())
        .unwrap_or(fallback)
}

/// Reads a bond value: plain numbers, `"N/100"` fractions, and infinity words
/// (mapped to [`BOND_SENTINEL`]). Anything else reads as zero.
pub fn parse_bond_text(s: &str) -> f64 {
    let t = s.trim();
    let t = t
        .strip_suffix("/100")
        .map(str::trim_end)
        .unwrap_or(t);
    if is_infinity_word(t) {
        return BOND_SENTINEL;
    }
    parse_number(t).unwrap_or(0.0)
}

pub fn parse_bond(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        other => parse_bond_text(&value_text(other)),
    }
}

pub fn clamp(n: f64, min: f64, max: f64) -> f64 {
    n.max(min).min(max)
}

/// Fill percentage of a gauge. Infinite on either side reads as full; a
/// non-positive maximum reads as empty.
pub fn percent(curr: &str, max: &str) -> f64 {
    let c = parse_or_infinity(curr, 0.0);
    let m = parse_or_infinity(max, 0.0);
    if !c.is_finite() || !m.is_finite() {
        return 100.0;
    }
    if m <= 0.0 {
        return 0.0;
    }
    clamp(c / m * 100.0, 0.0, 100.0)
}

/// JSON number for `n`, written without a fractional part when integral.
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

pub(crate) fn serialize_number<S: serde::Serializer>(n: &f64, s: S) -> Result<S::Ok, S::Error> {
    serde::Serialize::serialize(&number_value(*n), s)
}
