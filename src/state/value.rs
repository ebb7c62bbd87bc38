//! Runtime value representation
//!
//! Variables hold one of two shapes of data:
//!
//! - [`Value::Number`]: a 64-bit float (integers are just integral floats)
//! - [`Value::Text`]: a string captured from a quoted literal or a service reply
//!
//! There are no declared types. The command that writes a variable decides
//! which shape it gets, and the last write wins.
//!
//! # Rendering
//!
//! Numbers render without a trailing `.0` for integral values, so `42` shows
//! as `42` rather than `42.0`. See [`format_number`].
//!
//! # Serialization
//!
//! Finite numbers serialize as JSON numbers and text as JSON strings. JSON
//! has no NaN or infinities, so those serialize as `{"number": "NaN"}`,
//! `{"number": "Infinity"}` or `{"number": "-Infinity"}` and read back as
//! numbers. A text value that happens to spell `NaN` stays text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ValueRepr", into = "ValueRepr")]
pub enum Value {
    Number(f64),
    Text(String),
}

/// Wire shape of [`Value`]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Number(f64),
    Text(String),
    NonFinite { number: NonFinite },
}

#[derive(Serialize, Deserialize)]
enum NonFinite {
    NaN,
    Infinity,
    #[serde(rename = "-Infinity")]
    NegInfinity,
}

impl From<Value> for ValueRepr {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) if n.is_nan() => ValueRepr::NonFinite {
                number: NonFinite::NaN,
            },
            Value::Number(n) if n.is_infinite() => ValueRepr::NonFinite {
                number: if n > 0.0 {
                    NonFinite::Infinity
                } else {
                    NonFinite::NegInfinity
                },
            },
            Value::Number(n) => ValueRepr::Number(n),
            Value::Text(s) => ValueRepr::Text(s),
        }
    }
}

impl From<ValueRepr> for Value {
    fn from(repr: ValueRepr) -> Self {
        match repr {
            ValueRepr::Number(n) => Value::Number(n),
            ValueRepr::Text(s) => Value::Text(s),
            ValueRepr::NonFinite { number } => Value::Number(match number {
                NonFinite::NaN => f64::NAN,
                NonFinite::Infinity => f64::INFINITY,
                NonFinite::NegInfinity => f64::NEG_INFINITY,
            }),
        }
    }
}

impl Value {
    /// Get the number, returns None if this is text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Get the text, returns None if this is a number
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Numeric view used by arithmetic and mixed comparisons.
    ///
    /// Text is trimmed first; empty text is `0` and text that is not a
    /// decimal number is `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    parse_decimal(trimmed).unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// Number of characters in the rendered value
    pub fn char_len(&self) -> usize {
        match self {
            Value::Text(s) => s.chars().count(),
            Value::Number(n) => format_number(*n).chars().count(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Render a number the way scripts expect to read it back.
///
/// Integral values print without a fractional part, `-0` prints as `0`, and
/// non-finite values print as `Infinity`, `-Infinity` or `NaN`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    // f64's Display is already the shortest round-trip form and omits `.0`
    format!("{}", n)
}

/// Parse a plain decimal literal (`-?digits(.digits)?`, optional leading `+`
/// or exponent). Rejects the `inf`/`nan` spellings `f64::from_str` accepts.
fn parse_decimal(s: &str) -> Option<f64> {
    let body = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integral_numbers() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-10.0), "-10");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_fractional_and_special_numbers() {
        assert_eq!(format_number(3.14159), "3.14159");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_text_to_number_coercion() {
        assert_eq!(Value::from(" 12.5 ").to_number(), 12.5);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
    }

    #[test]
    fn test_char_len() {
        assert_eq!(Value::from("hello").char_len(), 5);
        assert_eq!(Value::from("héllo").char_len(), 5);
        assert_eq!(Value::Number(1234.0).char_len(), 4);
        assert_eq!(Value::Number(-1.5).char_len(), 4);
    }

    #[test]
    fn test_untagged_serialization() {
        let json = serde_json::to_string(&vec![Value::Number(3.0), Value::from("hi")]).unwrap();
        assert_eq!(json, r#"[3.0,"hi"]"#);
    }

    #[test]
    fn test_non_finite_numbers_survive_json() {
        let values = vec![
            Value::Number(f64::NAN),
            Value::Number(f64::INFINITY),
            Value::Number(f64::NEG_INFINITY),
            Value::from("NaN"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"[{"number":"NaN"},{"number":"Infinity"},{"number":"-Infinity"},"NaN"]"#
        );

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert!(back[0].as_number().is_some_and(f64::is_nan));
        assert_eq!(back[1], Value::Number(f64::INFINITY));
        assert_eq!(back[2], Value::Number(f64::NEG_INFINITY));
        assert_eq!(back[3], Value::from("NaN"));
    }
}
