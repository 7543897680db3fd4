//! Rule entries and per-field rule pipelines
//!
//! A field's pipeline is an ordered [`RuleSpec`]. Each entry is either a
//! named rule with string parameters, resolved through the
//! [`RuleRegistry`](crate::RuleRegistry), or an inline predicate closure.
//!
//! Pipelines are usually written in the compact rule-string form:
//!
//! ```
//! use stillrules::{RuleEntry, RuleSpec};
//!
//! let spec = RuleSpec::parse("permit_empty|greater_than_equal_to[0]").unwrap();
//! assert_eq!(spec.len(), 2);
//! assert_eq!(
//!     spec.entries()[1],
//!     RuleEntry::with_params("greater_than_equal_to", ["0"])
//! );
//! ```
//!
//! Closures are appended with [`RuleSpec::predicate`]:
//!
//! ```
//! use stillrules::{RuleSpec, Value};
//!
//! let spec = RuleSpec::parse("permit_empty")
//!     .unwrap()
//!     .predicate(|value: &Value| value.as_str().is_some_and(|s| s.len() < 10));
//! assert_eq!(spec.len(), 2);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{ConfigurationError, Value};

/// An inline rule over a single field value.
///
/// Implemented for every `Fn(&Value) -> bool + Send + Sync` closure. The
/// closure receives `Value::Null` when the field is absent.
pub trait ValuePredicate: Send + Sync {
    /// Check if the value satisfies this predicate.
    fn check(&self, value: &Value) -> bool;
}

impl<F> ValuePredicate for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &Value) -> bool {
        self(value)
    }
}

/// The error key reported for a failed predicate without a label.
pub const PREDICATE_KEY: &str = "predicate";

/// One entry of a field's rule pipeline.
#[derive(Clone)]
pub enum RuleEntry {
    /// A rule resolved by name through the registry.
    Named {
        /// Rule name, e.g. `greater_than_equal_to`.
        name: String,
        /// Parameters from `name[p1,p2]`.
        params: Vec<String>,
    },
    /// An inline closure.
    Predicate {
        /// Error key to report on failure; defaults to [`PREDICATE_KEY`].
        label: Option<String>,
        /// The closure.
        check: Arc<dyn ValuePredicate>,
    },
}

impl RuleEntry {
    /// A named rule without parameters.
    pub fn named(name: impl Into<String>) -> Self {
        RuleEntry::Named {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// A named rule with parameters.
    pub fn with_params<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleEntry::Named {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// An unlabelled closure rule.
    pub fn predicate<P: ValuePredicate + 'static>(check: P) -> Self {
        RuleEntry::Predicate {
            label: None,
            check: Arc::new(check),
        }
    }

    /// A closure rule reported under `label` when it fails.
    pub fn labelled<P: ValuePredicate + 'static>(label: impl Into<String>, check: P) -> Self {
        RuleEntry::Predicate {
            label: Some(label.into()),
            check: Arc::new(check),
        }
    }

    /// The rule name, or `None` for a predicate.
    pub fn name(&self) -> Option<&str> {
        match self {
            RuleEntry::Named { name, .. } => Some(name),
            RuleEntry::Predicate { .. } => None,
        }
    }

    /// The key a failure of this entry is reported under.
    pub fn key(&self) -> &str {
        match self {
            RuleEntry::Named { name, .. } => name,
            RuleEntry::Predicate { label, .. } => label.as_deref().unwrap_or(PREDICATE_KEY),
        }
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleEntry::Named { name, params } => f
                .debug_struct("Named")
                .field("name", name)
                .field("params", params)
                .finish(),
            RuleEntry::Predicate { label, .. } => f
                .debug_struct("Predicate")
                .field("label", label)
                .finish_non_exhaustive(),
        }
    }
}

/// Named rules compare by name and parameters. Predicates compare by identity.
impl PartialEq for RuleEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                RuleEntry::Named { name, params },
                RuleEntry::Named {
                    name: other_name,
                    params: other_params,
                },
            ) => name == other_name && params == other_params,
            (
                RuleEntry::Predicate { label, check },
                RuleEntry::Predicate {
                    label: other_label,
                    check: other_check,
                },
            ) => label == other_label && Arc::ptr_eq(check, other_check),
            _ => false,
        }
    }
}

impl FromStr for RuleEntry {
    type Err = ConfigurationError;

    /// Parse `name` or `name[p1,p2]`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rule = input.trim();
        let (name, params) = match rule.find('[') {
            None if rule.contains(']') => {
                return Err(ConfigurationError::malformed(input, "unbalanced bracket"))
            }
            None => (rule, Vec::new()),
            Some(open) => {
                let inner = rule[open + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| ConfigurationError::malformed(input, "missing closing bracket"))?;
                let params = inner.split(',').map(|p| p.trim().to_string()).collect();
                (&rule[..open], params)
            }
        };

        if name.is_empty() {
            return Err(ConfigurationError::malformed(input, "empty rule name"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigurationError::malformed(input, "invalid rule name"));
        }

        Ok(RuleEntry::Named {
            name: name.to_string(),
            params,
        })
    }
}

/// The ordered rule pipeline of one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSpec {
    entries: Vec<RuleEntry>,
}

impl RuleSpec {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `|`-separated rule string.
    ///
    /// Pipes inside brackets belong to the parameter, so `in_list[a|b]` is a
    /// single rule.
    pub fn parse(rules: &str) -> Result<Self, ConfigurationError> {
        split_pipeline(rules)
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(str::parse::<RuleEntry>)
            .collect()
    }

    /// Append an entry.
    pub fn then(mut self, entry: RuleEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Append a named rule.
    pub fn rule(self, name: impl Into<String>) -> Self {
        self.then(RuleEntry::named(name))
    }

    /// Append a closure rule.
    pub fn predicate<P: ValuePredicate + 'static>(self, check: P) -> Self {
        self.then(RuleEntry::predicate(check))
    }

    /// Append an entry in place.
    pub fn push(&mut self, entry: RuleEntry) {
        self.entries.push(entry);
    }

    /// The entries in evaluation order.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the pipeline has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when a named rule called `name` is in the pipeline.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name() == Some(name))
    }
}

impl FromIterator<RuleEntry> for RuleSpec {
    fn from_iter<I: IntoIterator<Item = RuleEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<RuleEntry>> for RuleSpec {
    fn from(entries: Vec<RuleEntry>) -> Self {
        Self { entries }
    }
}

impl FromStr for RuleSpec {
    type Err = ConfigurationError;

    fn from_str(rules: &str) -> Result<Self, Self::Err> {
        RuleSpec::parse(rules)
    }
}

fn split_pipeline(rules: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in rules.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&rules[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&rules[start..]);
    parts
}

/// Field name to rule pipeline, in declaration order.
///
/// # Examples
///
/// ```
/// use stillrules::{RuleSpec, Rules};
///
/// let rules = Rules::new()
///     .field("foo", RuleSpec::parse("permit_empty").unwrap())
///     .field("bar", RuleSpec::parse("matches[foo]").unwrap());
///
/// assert_eq!(rules.len(), 2);
/// assert!(rules.get("bar").unwrap().contains("matches"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
    fields: Vec<(String, RuleSpec)>,
}

impl Rules {
    /// No fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `(field, rule string)` pairs.
    pub fn parse<I, F, S>(pairs: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (F, S)>,
        F: Into<String>,
        S: AsRef<str>,
    {
        pairs.into_iter().try_fold(Rules::new(), |rules, (field, spec)| {
            Ok(rules.field(field, RuleSpec::parse(spec.as_ref())?))
        })
    }

    /// Builder-style insert. A repeated field replaces its earlier pipeline.
    pub fn field(mut self, field: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.insert(field, spec);
        self
    }

    /// Insert or replace a field's pipeline.
    pub fn insert(&mut self, field: impl Into<String>, spec: impl Into<RuleSpec>) {
        let field = field.into();
        let spec = spec.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = spec,
            None => self.fields.push((field, spec)),
        }
    }

    /// The pipeline of a field.
    pub fn get(&self, field: &str) -> Option<&RuleSpec> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, spec)| spec)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no field has rules.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
