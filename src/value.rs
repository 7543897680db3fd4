//! Dynamically typed field values
//!
//! Input arrives untyped at the boundary: a form post, a decoded JSON body, a
//! query string. [`Value`] keeps the original type of every field so that rules
//! can compare without coercion. An integer `0`, a float `0.0`, the string `"0"`
//! and `false` are four different values here, and the strict rules treat them
//! that way.
//!
//! # Examples
//!
//! ```
//! use stillrules::{Value, ValueKind};
//!
//! assert_eq!(Value::from(10).kind(), ValueKind::Int);
//! assert_eq!(Value::from(10.0).kind(), ValueKind::Float);
//! assert_eq!(Value::from("10").kind(), ValueKind::String);
//! assert_eq!(Value::from(true).kind(), ValueKind::Bool);
//! assert_ne!(Value::from(10), Value::from(10.0));
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A single input value.
///
/// With the `serde` feature, `Value` deserializes untagged, so a JSON document
/// maps directly onto it: `null`, booleans, integers, floats, strings, arrays
/// and objects.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Value {
    /// Explicit null. Present in the input, but carries nothing.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// A sequence of values.
    List(Vec<Value>),
    /// A nested mapping.
    Map(BTreeMap<String, Value>),
}

/// The comparison type of a [`Value`].
///
/// Lists and maps both classify as [`ValueKind::Array`]: every scalar rule
/// rejects them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// `Value::Null`
    Null,
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::String`
    String,
    /// `Value::List` or `Value::Map`
    Array,
}

impl Value {
    /// The comparison type of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::List(_) | Value::Map(_) => ValueKind::Array,
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for lists and maps.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The textual form of a string or number.
    ///
    /// Strings are borrowed as-is. Numbers are rendered the way they would be
    /// written in a form field (`10.0` renders as `"10"`). Booleans, null and
    /// arrays have no textual form under strict rules.
    ///
    /// Floats never use exponent notation, so the length rules count every
    /// digit: `1e21` is 22 characters long and `1e-7` is 9.
    ///
    /// ```
    /// use stillrules::Value;
    ///
    /// assert_eq!(Value::from(1.5).as_text().as_deref(), Some("1.5"));
    /// assert_eq!(Value::from(-3).as_text().as_deref(), Some("-3"));
    /// assert_eq!(Value::from(true).as_text(), None);
    /// ```
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            Value::Float(f) => Some(Cow::Owned(f.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
        };
        f.write_str(name)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(feature = "proptest")]
impl proptest::arbitrary::Arbitrary for Value {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            (-1.0e9f64..1.0e9).prop_map(Value::Float),
            "[a-z0-9 ]{0,8}".prop_map(Value::String),
        ];

        leaf.prop_recursive(2, 8, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..4).prop_map(Value::Map),
            ]
        })
        .boxed()
    }
}
