//! Comparison semantics for the cross-field and ordering rules
//!
//! The comparison rule family (`matches`, `differs`, `greater_than`,
//! `greater_than_equal_to`, `less_than`, `less_than_equal_to`) plus the
//! emptiness test behind `permit_empty` is what separates a strict rule set
//! from a loose one. Both live behind the [`Comparator`] trait:
//!
//! - [`StrictComparator`] never coerces. Booleans are not numbers, null only
//!   equals null, and an absent operand fails both `matches` and `differs`.
//! - [`LooseComparator`] compares the way a weakly typed form layer does:
//!   through the textual form of each value, with booleans as `0`/`1`.
//!
//! [`SemanticsKind`] selects one of them by configuration.
//!
//! The free functions in this module ([`matches`], [`greater_than`], ...) are
//! the strict comparator applied to present values.
//!
//! ```
//! use stillrules::compare::{greater_than, greater_than_equal_to, less_than, less_than_equal_to};
//! use stillrules::Value;
//!
//! assert!(!greater_than_equal_to(&Value::from(true), "0"));
//! assert!(less_than(&Value::from(10), "a"));
//! assert!(!greater_than(&Value::from(10), "a"));
//! assert!(less_than_equal_to(&Value::from(1.0), "1"));
//! assert!(!greater_than(&Value::from(10.0), "10"));
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use crate::classify::{self, numeric_operand, parse_number, Number};
use crate::Value;

/// One of the four ordering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// `greater_than`
    GreaterThan,
    /// `greater_than_equal_to`
    GreaterThanEqualTo,
    /// `less_than`
    LessThan,
    /// `less_than_equal_to`
    LessThanEqualTo,
}

impl Bound {
    /// Whether `value <op> param` holds for the given ordering of value to param.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Bound::GreaterThan => ordering == Ordering::Greater,
            Bound::GreaterThanEqualTo => ordering != Ordering::Less,
            Bound::LessThan => ordering == Ordering::Less,
            Bound::LessThanEqualTo => ordering != Ordering::Greater,
        }
    }

    /// Result of the rule when the parameter is not a number.
    ///
    /// An unparseable bound sorts below every value: nothing is greater than
    /// it, everything is less.
    pub fn unbounded(self) -> bool {
        matches!(self, Bound::LessThan | Bound::LessThanEqualTo)
    }
}

/// Comparison semantics shared by the executor and the built-in rules.
///
/// Operands are `Option<&Value>`: `None` means the field is absent from the
/// input set, which is not the same as `Some(&Value::Null)`.
pub trait Comparator: fmt::Debug + Send + Sync {
    /// Whether the value counts as empty for `permit_empty`.
    fn is_empty(&self, value: Option<&Value>) -> bool;

    /// Equality of a field and another field.
    fn matches(&self, value: Option<&Value>, other: Option<&Value>) -> bool;

    /// Inequality of a field and another field.
    fn differs(&self, value: Option<&Value>, other: Option<&Value>) -> bool;

    /// Ordering of a field against a literal parameter.
    fn compare(&self, bound: Bound, value: Option<&Value>, param: &str) -> bool;
}

/// Which comparator a validator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SemanticsKind {
    /// Type-strict, non-coercive comparisons.
    #[default]
    Strict,
    /// Textual, coercive comparisons.
    Loose,
}

impl SemanticsKind {
    /// The comparator implementing these semantics.
    pub fn comparator(self) -> &'static dyn Comparator {
        match self {
            SemanticsKind::Strict => &StrictComparator,
            SemanticsKind::Loose => &LooseComparator,
        }
    }
}

/// Type-strict comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictComparator;

impl Comparator for StrictComparator {
    fn is_empty(&self, value: Option<&Value>) -> bool {
        classify::is_blank_strict(value)
    }

    fn matches(&self, value: Option<&Value>, other: Option<&Value>) -> bool {
        match (value, other) {
            (Some(a), Some(b)) => strict_eq(a, b),
            _ => false,
        }
    }

    fn differs(&self, value: Option<&Value>, other: Option<&Value>) -> bool {
        match (value, other) {
            (Some(a), Some(b)) => !strict_eq(a, b),
            _ => false,
        }
    }

    fn compare(&self, bound: Bound, value: Option<&Value>, param: &str) -> bool {
        let Some(lhs) = value.and_then(numeric_operand) else {
            return false;
        };
        match parse_number(param) {
            Some(rhs) => lhs.compare(&rhs).is_some_and(|o| bound.holds(o)),
            None => bound.unbounded(),
        }
    }
}

/// Strict, type-aware equality.
///
/// Null equals only null, booleans only booleans, strings compare byte for
/// byte. Numbers compare by value across integer and float (`10 == 10.0`), but
/// never with a numeric string. Lists and maps compare element-wise.
///
/// ```
/// use stillrules::compare::strict_eq;
/// use stillrules::Value;
///
/// assert!(strict_eq(&Value::Null, &Value::Null));
/// assert!(strict_eq(&Value::from(1.2), &Value::from(1.2)));
/// assert!(!strict_eq(&Value::from(1), &Value::from(true)));
/// assert!(!strict_eq(&Value::from(1), &Value::from("1")));
/// assert!(!strict_eq(&Value::Null, &Value::from("")));
/// ```
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (numeric_operand(a), numeric_operand(b)) {
                (Some(x), Some(y)) => x.compare(&y) == Some(Ordering::Equal),
                _ => false,
            }
        }
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| strict_eq(l, r))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, l)| y.get(k).is_some_and(|r| strict_eq(l, r)))
        }
        _ => false,
    }
}

/// Coercive comparisons through each value's textual form.
#[derive(Debug, Clone, Copy, Default)]
pub struct LooseComparator;

impl LooseComparator {
    fn text(value: &Value) -> Option<Cow<'_, str>> {
        match value {
            Value::Null | Value::Bool(false) => Some(Cow::Borrowed("")),
            Value::Bool(true) => Some(Cow::Borrowed("1")),
            other => other.as_text(),
        }
    }

    fn loose_eq(a: &Value, b: &Value) -> bool {
        match (Self::text(a), Self::text(b)) {
            (Some(x), Some(y)) => x == y,
            _ => strict_eq(a, b),
        }
    }
}

impl Comparator for LooseComparator {
    fn is_empty(&self, value: Option<&Value>) -> bool {
        classify::is_empty_loose(value)
    }

    fn matches(&self, value: Option<&Value>, other: Option<&Value>) -> bool {
        match (value, other) {
            (Some(a), Some(b)) => Self::loose_eq(a, b),
            _ => false,
        }
    }

    fn differs(&self, value: Option<&Value>, other: Option<&Value>) -> bool {
        match (value, other) {
            (Some(a), Some(b)) => !Self::loose_eq(a, b),
            _ => false,
        }
    }

    fn compare(&self, bound: Bound, value: Option<&Value>, param: &str) -> bool {
        let lhs = match value {
            Some(Value::Bool(b)) => Some(Number::Int(i64::from(*b))),
            Some(other) => Self::text(other).and_then(|t| parse_number(t.trim())),
            None => None,
        };
        match (lhs, parse_number(param.trim())) {
            (Some(lhs), Some(rhs)) => lhs.compare(&rhs).is_some_and(|o| bound.holds(o)),
            _ => false,
        }
    }
}

/// Strict `matches` of two present values.
pub fn matches(value: &Value, other: &Value) -> bool {
    StrictComparator.matches(Some(value), Some(other))
}

/// Strict `differs` of two present values.
pub fn differs(value: &Value, other: &Value) -> bool {
    StrictComparator.differs(Some(value), Some(other))
}

/// Strict `greater_than`.
pub fn greater_than(value: &Value, param: &str) -> bool {
    StrictComparator.compare(Bound::GreaterThan, Some(value), param)
}

/// Strict `greater_than_equal_to`.
pub fn greater_than_equal_to(value: &Value, param: &str) -> bool {
    StrictComparator.compare(Bound::GreaterThanEqualTo, Some(value), param)
}

/// Strict `less_than`.
pub fn less_than(value: &Value, param: &str) -> bool {
    StrictComparator.compare(Bound::LessThan, Some(value), param)
}

/// Strict `less_than_equal_to`.
pub fn less_than_equal_to(value: &Value, param: &str) -> bool {
    StrictComparator.compare(Bound::LessThanEqualTo, Some(value), param)
}
