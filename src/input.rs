//! The input set a validation run reads from
//!
//! [`InputSet`] is a read-only view of named field values. A lookup distinguishes
//! a field that is absent (`None`) from one that is present but null
//! (`Some(&Value::Null)`). Several rules depend on that difference.
//!
//! Field names may address nested data with dots: `address.city` reads the
//! `city` key of the `address` map and `tags.0` reads the first element of the
//! `tags` list. A literal key that contains a dot is preferred over the nested
//! path.

use std::collections::BTreeMap;

use crate::Value;

/// Named field values supplied by the caller for one validation run.
///
/// # Examples
///
/// ```
/// use stillrules::{InputSet, Value};
///
/// let input = InputSet::new()
///     .with("foo", Value::Null)
///     .with("address", Value::from_iter([("city", "Oslo")]));
///
/// assert_eq!(input.get("foo"), Some(&Value::Null));
/// assert_eq!(input.get("bar"), None);
/// assert_eq!(input.get("address.city"), Some(&Value::from("Oslo")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct InputSet {
    fields: BTreeMap<String, Value>,
}

impl InputSet {
    /// An empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Look up a field by name or dotted path.
    ///
    /// Returns `None` when the field is absent. An explicit null is
    /// `Some(&Value::Null)`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        if let Some(value) = self.fields.get(field) {
            return Some(value);
        }

        let mut segments = field.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Map(map) => map.get(segment)?,
                Value::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns `true` when the field (or dotted path) is present, even if null.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when there are no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over top-level fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for InputSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for InputSet {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}
