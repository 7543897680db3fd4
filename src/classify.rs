//! Value classification: emptiness and numeric operands
//!
//! Two questions come up before almost every rule runs. Is the field empty, so
//! that `permit_empty` can skip the rest of the pipeline? And, for the ordering
//! rules, what number (if any) does this value or parameter stand for?
//!
//! Strict emptiness is narrow. Only the absence of input, `null`, the empty
//! string and an empty array count as empty:
//!
//! ```
//! use stillrules::classify::is_empty_strict;
//! use stillrules::Value;
//!
//! assert!(is_empty_strict(None));
//! assert!(is_empty_strict(Some(&Value::Null)));
//! assert!(is_empty_strict(Some(&Value::from(""))));
//!
//! assert!(!is_empty_strict(Some(&Value::from(0))));
//! assert!(!is_empty_strict(Some(&Value::from(0.0))));
//! assert!(!is_empty_strict(Some(&Value::from("0"))));
//! assert!(!is_empty_strict(Some(&Value::from(false))));
//! ```
//!
//! The `permit_empty` gate is wider. Zero, `0.0`, `false` and blank strings
//! also let a field through without its remaining named rules, while `"0"`
//! still counts as input:
//!
//! ```
//! use stillrules::classify::is_blank_strict;
//! use stillrules::Value;
//!
//! assert!(is_blank_strict(Some(&Value::from(0))));
//! assert!(is_blank_strict(Some(&Value::from(false))));
//! assert!(is_blank_strict(Some(&Value::from("  "))));
//! assert!(!is_blank_strict(Some(&Value::from("0"))));
//! ```

use std::cmp::Ordering;

use crate::{Value, ValueKind};

/// 2^63, the first `f64` past `i64::MAX`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// Classify a value for comparison.
pub fn classify(value: &Value) -> ValueKind {
    value.kind()
}

/// Strict emptiness: absent, null, `""`, or an empty list or map.
pub fn is_empty_strict(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::List(items)) => items.is_empty(),
        Some(Value::Map(map)) => map.is_empty(),
        Some(Value::Bool(_) | Value::Int(_) | Value::Float(_)) => false,
    }
}

/// Emptiness behind `permit_empty` under strict rules.
///
/// Everything [`is_empty_strict`] accepts, plus integer `0`, float `0.0`,
/// `false` and whitespace-only strings. `required` keeps the narrow test.
pub fn is_blank_strict(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => !b,
        Some(Value::Int(i)) => *i == 0,
        Some(Value::Float(f)) => *f == 0.0,
        Some(Value::String(s)) => s.trim().is_empty(),
        other => is_empty_strict(other),
    }
}

/// Loose emptiness, the way a weakly typed form layer sees it.
///
/// On top of everything [`is_empty_strict`] accepts, `false`, `0`, `0.0` and
/// `"0"` are empty too.
pub fn is_empty_loose(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => !b,
        Some(Value::Int(i)) => *i == 0,
        Some(Value::Float(f)) => *f == 0.0,
        Some(Value::String(s)) if s == "0" => true,
        other => is_empty_strict(other),
    }
}

/// A parsed numeric operand.
///
/// Integers and floats are kept apart so that large integers never lose
/// precision, and so that `10` and `10.0` compare equal without either side
/// being rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// An integral operand.
    Int(i64),
    /// A finite fractional operand.
    Float(f64),
}

impl Number {
    /// Exact ordering between two numbers.
    ///
    /// Returns `None` only when a float operand is NaN.
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use stillrules::classify::Number;
    ///
    /// assert_eq!(Number::Int(10).compare(&Number::Float(10.0)), Some(Ordering::Equal));
    /// assert_eq!(Number::Float(10.1).compare(&Number::Int(10)), Some(Ordering::Greater));
    /// assert_eq!(Number::Int(i64::MAX).compare(&Number::Float(9.3e18)), Some(Ordering::Less));
    /// ```
    pub fn compare(&self, other: &Number) -> Option<Ordering> {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
            (Number::Int(a), Number::Float(b)) => cmp_int_float(a, b),
            (Number::Float(a), Number::Int(b)) => cmp_int_float(b, a).map(Ordering::reverse),
        }
    }
}

fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if float < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }

    // In range, so the truncation is exact.
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        ordering => Some(ordering),
    }
}

/// Parse a rule parameter or string value as a number.
///
/// Signed decimal integers become [`Number::Int`]. Anything else that parses
/// as a finite float (`"1.5"`, `"-0.25"`, `"1e3"`) becomes [`Number::Float`].
/// Whitespace, `"inf"`, `"NaN"` and non-numeric text yield `None`.
///
/// ```
/// use stillrules::classify::{parse_number, Number};
///
/// assert_eq!(parse_number("-11"), Some(Number::Int(-11)));
/// assert_eq!(parse_number("1.5"), Some(Number::Float(1.5)));
/// assert_eq!(parse_number("a"), None);
/// assert_eq!(parse_number(" 1"), None);
/// ```
pub fn parse_number(text: &str) -> Option<Number> {
    if text.is_empty() || !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::Int(int));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Number::Float)
}

/// The numeric operand a value stands for under strict rules.
///
/// Integers, floats and numeric strings qualify. Booleans never do, and
/// neither do null or arrays.
pub fn numeric_operand(value: &Value) -> Option<Number> {
    match value {
        Value::Int(i) => Some(Number::Int(*i)),
        Value::Float(f) if !f.is_nan() => Some(Number::Float(*f)),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}
