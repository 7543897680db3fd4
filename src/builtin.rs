//! Built-in rules
//!
//! Every built-in is a [`BuiltinRule`] variant, resolved from its name once
//! when rules are compiled. Evaluation never fails: a value of the wrong shape
//! (an array given to a scalar rule, a boolean given to a numeric rule) simply
//! does not pass.
//!
//! The comparison family defers to the active [`Comparator`]. The format and
//! length rules are the same under strict and loose semantics, and are strict
//! about types: they accept strings and, where it makes sense, numbers.

use std::fmt;

use crate::classify::{self, parse_number};
use crate::compare::{Bound, Comparator};
use crate::{InputSet, Value};

/// A rule implemented by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinRule {
    /// Skip the remaining named rules when the value is empty.
    PermitEmpty,
    /// Skip the remaining rules when the field is absent.
    IfExist,
    /// The value must not be empty.
    Required,
    /// Equal to another field.
    Matches,
    /// Different from another field.
    Differs,
    /// Numerically greater than the parameter.
    GreaterThan,
    /// Numerically greater than or equal to the parameter.
    GreaterThanEqualTo,
    /// Numerically less than the parameter.
    LessThan,
    /// Numerically less than or equal to the parameter.
    LessThanEqualTo,
    /// ASCII letters only.
    Alpha,
    /// ASCII letters and digits only.
    AlphaNumeric,
    /// ASCII letters, digits and spaces only.
    AlphaNumericSpace,
    /// A number or numeric string.
    Numeric,
    /// An integer or integer string.
    Integer,
    /// A number or decimal string.
    Decimal,
    /// A non-negative integer.
    IsNatural,
    /// A positive integer.
    IsNaturalNoZero,
    /// At least `n` characters.
    MinLength,
    /// At most `n` characters.
    MaxLength,
    /// Exactly one of the given lengths.
    ExactLength,
    /// One of the given values.
    InList,
}

impl BuiltinRule {
    /// Every built-in rule.
    pub const ALL: [BuiltinRule; 21] = [
        BuiltinRule::PermitEmpty,
        BuiltinRule::IfExist,
        BuiltinRule::Required,
        BuiltinRule::Matches,
        BuiltinRule::Differs,
        BuiltinRule::GreaterThan,
        BuiltinRule::GreaterThanEqualTo,
        BuiltinRule::LessThan,
        BuiltinRule::LessThanEqualTo,
        BuiltinRule::Alpha,
        BuiltinRule::AlphaNumeric,
        BuiltinRule::AlphaNumericSpace,
        BuiltinRule::Numeric,
        BuiltinRule::Integer,
        BuiltinRule::Decimal,
        BuiltinRule::IsNatural,
        BuiltinRule::IsNaturalNoZero,
        BuiltinRule::MinLength,
        BuiltinRule::MaxLength,
        BuiltinRule::ExactLength,
        BuiltinRule::InList,
    ];

    /// The rule name used in rule strings.
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinRule::PermitEmpty => "permit_empty",
            BuiltinRule::IfExist => "if_exist",
            BuiltinRule::Required => "required",
            BuiltinRule::Matches => "matches",
            BuiltinRule::Differs => "differs",
            BuiltinRule::GreaterThan => "greater_than",
            BuiltinRule::GreaterThanEqualTo => "greater_than_equal_to",
            BuiltinRule::LessThan => "less_than",
            BuiltinRule::LessThanEqualTo => "less_than_equal_to",
            BuiltinRule::Alpha => "alpha",
            BuiltinRule::AlphaNumeric => "alpha_numeric",
            BuiltinRule::AlphaNumericSpace => "alpha_numeric_space",
            BuiltinRule::Numeric => "numeric",
            BuiltinRule::Integer => "integer",
            BuiltinRule::Decimal => "decimal",
            BuiltinRule::IsNatural => "is_natural",
            BuiltinRule::IsNaturalNoZero => "is_natural_no_zero",
            BuiltinRule::MinLength => "min_length",
            BuiltinRule::MaxLength => "max_length",
            BuiltinRule::ExactLength => "exact_length",
            BuiltinRule::InList => "in_list",
        }
    }

    /// Look a built-in up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.name() == name)
    }

    /// `permit_empty` and `if_exist` gate the pipeline instead of checking a value.
    pub fn is_gate(self) -> bool {
        matches!(self, BuiltinRule::PermitEmpty | BuiltinRule::IfExist)
    }

    /// Evaluate the rule against a field value.
    ///
    /// `value` is `None` when the field is absent. Gate rules always pass
    /// here; the executor applies their effect on the pipeline.
    pub fn check(
        self,
        value: Option<&Value>,
        params: &[String],
        input: &InputSet,
        comparator: &dyn Comparator,
    ) -> bool {
        let param = params.first().map(String::as_str).unwrap_or("");

        match self {
            BuiltinRule::PermitEmpty | BuiltinRule::IfExist => true,
            BuiltinRule::Required => !classify::is_empty_strict(value),
            BuiltinRule::Matches => comparator.matches(value, input.get(param)),
            BuiltinRule::Differs => comparator.differs(value, input.get(param)),
            BuiltinRule::GreaterThan => comparator.compare(Bound::GreaterThan, value, param),
            BuiltinRule::GreaterThanEqualTo => {
                comparator.compare(Bound::GreaterThanEqualTo, value, param)
            }
            BuiltinRule::LessThan => comparator.compare(Bound::LessThan, value, param),
            BuiltinRule::LessThanEqualTo => comparator.compare(Bound::LessThanEqualTo, value, param),
            BuiltinRule::Alpha => {
                string(value).is_some_and(|s| all_chars(s, |c| c.is_ascii_alphabetic()))
            }
            BuiltinRule::AlphaNumeric => text(value)
                .is_some_and(|s| all_chars(&s, |c| c.is_ascii_alphanumeric())),
            BuiltinRule::AlphaNumericSpace => string(value)
                .is_some_and(|s| all_chars(s, |c| c.is_ascii_alphanumeric() || c == ' ')),
            BuiltinRule::Numeric => match value {
                Some(Value::Int(_)) => true,
                Some(Value::Float(f)) => f.is_finite(),
                Some(Value::String(s)) => parse_number(s).is_some(),
                _ => false,
            },
            BuiltinRule::Integer => match value {
                Some(Value::Int(_)) => true,
                Some(Value::String(s)) => is_integer_text(s),
                _ => false,
            },
            BuiltinRule::Decimal => match value {
                Some(Value::Int(_)) => true,
                Some(Value::Float(f)) => f.is_finite(),
                Some(Value::String(s)) => is_decimal_text(s),
                _ => false,
            },
            BuiltinRule::IsNatural => natural(value).is_some(),
            BuiltinRule::IsNaturalNoZero => natural(value).is_some_and(|non_zero| non_zero),
            BuiltinRule::MinLength => length_against(value, param, |len, n| len >= n),
            BuiltinRule::MaxLength => length_against(value, param, |len, n| len <= n),
            BuiltinRule::ExactLength => {
                let lengths = params
                    .iter()
                    .map(|p| p.trim().parse::<usize>())
                    .collect::<Result<Vec<_>, _>>();
                match (text(value), lengths) {
                    (Some(s), Ok(lengths)) => lengths.contains(&s.chars().count()),
                    _ => false,
                }
            }
            BuiltinRule::InList => {
                text(value).is_some_and(|s| params.iter().any(|item| item.trim() == s))
            }
        }
    }
}

impl fmt::Display for BuiltinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn string(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

fn text(value: Option<&Value>) -> Option<std::borrow::Cow<'_, str>> {
    value.and_then(Value::as_text)
}

fn all_chars(s: &str, allowed: impl Fn(char) -> bool) -> bool {
    !s.is_empty() && s.chars().all(allowed)
}

fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal_text(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or(("", unsigned));
    !fraction.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// `Some(non_zero)` when the value is a non-negative integer.
fn natural(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Int(i) if *i >= 0 => Some(*i != 0),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Some(s.bytes().any(|b| b != b'0'))
        }
        _ => None,
    }
}

fn length_against(value: Option<&Value>, param: &str, cmp: impl Fn(usize, usize) -> bool) -> bool {
    match (text(value), param.trim().parse::<usize>()) {
        (Some(s), Ok(n)) => cmp(s.chars().count(), n),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::StrictComparator;

    fn check(rule: &str, value: impl Into<Value>, params: &[&str]) -> bool {
        let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        let value = value.into();
        BuiltinRule::from_name(rule)
            .unwrap()
            .check(Some(&value), &params, &InputSet::new(), &StrictComparator)
    }

    #[test]
    fn test_names_round_trip() {
        for rule in BuiltinRule::ALL {
            assert_eq!(BuiltinRule::from_name(rule.name()), Some(rule));
        }
        assert_eq!(BuiltinRule::from_name("nope"), None);
    }

    #[test]
    fn test_alpha_rejects_arrays_and_non_strings() {
        assert!(check("alpha", "abc", &[]));
        assert!(!check("alpha", "abc1", &[]));
        assert!(!check("alpha", "", &[]));
        assert!(!check("alpha", Value::from_iter([("bar", "12345")]), &[]));
        assert!(!check("alpha", vec!["abc"], &[]));
        assert!(!check("alpha", true, &[]));
        assert!(!check("alpha", 1, &[]));
    }

    #[test]
    fn test_alpha_numeric_variants() {
        assert!(check("alpha_numeric", "abc123", &[]));
        assert!(check("alpha_numeric", 123, &[]));
        assert!(!check("alpha_numeric", -123, &[]));
        assert!(!check("alpha_numeric", "a b", &[]));
        assert!(check("alpha_numeric_space", "a b 1", &[]));
        assert!(!check("alpha_numeric_space", 12, &[]));
    }

    #[test]
    fn test_numeric_family() {
        assert!(check("numeric", 1, &[]));
        assert!(check("numeric", 1.5, &[]));
        assert!(check("numeric", "-1.5", &[]));
        assert!(!check("numeric", true, &[]));
        assert!(!check("numeric", "1a", &[]));

        assert!(check("integer", "-12", &[]));
        assert!(check("integer", 12, &[]));
        assert!(!check("integer", 1.0, &[]));
        assert!(!check("integer", "1.0", &[]));
        assert!(!check("integer", "-", &[]));

        assert!(check("decimal", "1.25", &[]));
        assert!(check("decimal", "-.5", &[]));
        assert!(check("decimal", "42", &[]));
        assert!(!check("decimal", "1.", &[]));
        assert!(!check("decimal", "1e3", &[]));
        assert!(!check("decimal", false, &[]));
    }

    #[test]
    fn test_natural_numbers() {
        assert!(check("is_natural", 0, &[]));
        assert!(check("is_natural", "007", &[]));
        assert!(!check("is_natural", -1, &[]));
        assert!(!check("is_natural", 1.0, &[]));
        assert!(!check("is_natural_no_zero", 0, &[]));
        assert!(!check("is_natural_no_zero", "000", &[]));
        assert!(check("is_natural_no_zero", "010", &[]));
    }

    #[test]
    fn test_lengths() {
        assert!(check("min_length", "hello", &["5"]));
        assert!(!check("min_length", "hell", &["5"]));
        assert!(check("min_length", 12345, &["5"]));
        assert!(!check("min_length", true, &["1"]));
        assert!(!check("min_length", "hello", &["x"]));
        assert!(check("max_length", "héllo", &["5"]));
        assert!(!check("max_length", vec!["a"], &["5"]));
        assert!(check("exact_length", "abc", &["2", "3"]));
        assert!(!check("exact_length", "abc", &["2", "4"]));
        assert!(!check("exact_length", "abc", &["3", "x"]));
    }

    #[test]
    fn test_in_list() {
        assert!(check("in_list", "b", &["a", " b", "c"]));
        assert!(check("in_list", 2, &["1", "2"]));
        assert!(!check("in_list", "d", &["a", "b"]));
        assert!(!check("in_list", true, &["1"]));
    }

    #[test]
    fn test_required_is_strict() {
        assert!(check("required", 0, &[]));
        assert!(check("required", false, &[]));
        assert!(check("required", "0", &[]));
        assert!(!check("required", "", &[]));
        assert!(!check("required", Value::Null, &[]));
        assert!(!BuiltinRule::Required.check(None, &[], &InputSet::new(), &StrictComparator));
    }

    #[test]
    fn test_matches_reads_other_field() {
        let input = InputSet::new().with("bar", "x");
        let value = Value::from("x");
        let params = vec!["bar".to_string()];
        assert!(BuiltinRule::Matches.check(Some(&value), &params, &input, &StrictComparator));
        assert!(!BuiltinRule::Differs.check(Some(&value), &params, &input, &StrictComparator));

        let missing = vec!["baz".to_string()];
        assert!(!BuiltinRule::Matches.check(Some(&value), &missing, &input, &StrictComparator));
        assert!(!BuiltinRule::Differs.check(Some(&value), &missing, &input, &StrictComparator));
    }
}
