//! Validation results
//!
//! A [`ValidationResult`] reports the outcome of every field that had rules:
//! its final [`FieldState`] and the rules that failed, in pipeline order. The
//! message key of a failure is the rule name; a configured custom message is
//! carried alongside for a templating layer to use.
//!
//! Results accumulate like any other `Semigroup`, and convert into the
//! crate's [`Validation`] type for callers that want to keep all field errors
//! as a single failure value.

use crate::{Semigroup, Validation};

/// Where a field's pipeline is, or ended.
///
/// A finished [`FieldOutcome`] is always `Passed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FieldState {
    /// Not yet looked at.
    Pending,
    /// Rules are running.
    Evaluating,
    /// Every applicable rule passed.
    Passed,
    /// At least one rule failed.
    Failed,
}

/// A rule that did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FailedRule {
    /// Rule name, or the label of a closure rule.
    pub rule: String,
    /// Custom message configured for this field and rule.
    pub message: Option<String>,
}

impl FailedRule {
    /// A failure of `rule`, with an optional custom message.
    pub fn new(rule: impl Into<String>, message: Option<String>) -> Self {
        Self {
            rule: rule.into(),
            message,
        }
    }

    /// The key a message template is looked up by.
    pub fn message_key(&self) -> &str {
        &self.rule
    }
}

/// The outcome of one field's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldOutcome {
    /// Field name.
    pub field: String,
    /// Final state.
    pub state: FieldState,
    /// `true` when `if_exist` or `permit_empty` skipped the named rules.
    pub skipped: bool,
    /// Failed rules in pipeline order.
    pub failures: Vec<FailedRule>,
}

impl FieldOutcome {
    pub(crate) fn new(
        field: impl Into<String>,
        state: FieldState,
        skipped: bool,
        failures: Vec<FailedRule>,
    ) -> Self {
        Self {
            field: field.into(),
            state,
            skipped,
            failures,
        }
    }

    /// Returns `true` when the field passed.
    pub fn passed(&self) -> bool {
        self.state == FieldState::Passed
    }
}

/// The failures of one field, as carried by [`ValidationResult::into_validation`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldErrors {
    /// Field name.
    pub field: String,
    /// Failed rules in pipeline order.
    pub failures: Vec<FailedRule>,
}

/// The outcome of a validation run.
///
/// # Examples
///
/// ```
/// use stillrules::{InputSet, RuleRegistry, Rules};
///
/// let rules = Rules::parse([("foo", "matches[bar]"), ("bar", "alpha")]).unwrap();
/// let result = RuleRegistry::strict()
///     .compile(&rules)
///     .unwrap()
///     .run(&InputSet::new().with("foo", "a").with("bar", "b"));
///
/// assert!(!result.is_valid());
/// assert_eq!(result.failed_rules("foo"), ["matches"]);
/// assert!(result.failed_rules("bar").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    outcomes: Vec<FieldOutcome>,
}

impl ValidationResult {
    pub(crate) fn new(outcomes: Vec<FieldOutcome>) -> Self {
        Self { outcomes }
    }

    /// Returns `true` when every field passed.
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(FieldOutcome::passed)
    }

    /// Outcomes of every field, in declaration order.
    pub fn outcomes(&self) -> &[FieldOutcome] {
        &self.outcomes
    }

    /// The outcome of one field.
    pub fn field(&self, field: &str) -> Option<&FieldOutcome> {
        self.outcomes.iter().find(|o| o.field == field)
    }

    /// Names of the rules that failed for a field. Empty when it passed or
    /// had no rules.
    pub fn failed_rules(&self, field: &str) -> Vec<&str> {
        self.field(field)
            .map(|o| o.failures.iter().map(FailedRule::message_key).collect())
            .unwrap_or_default()
    }

    /// Outcomes of the fields that failed.
    pub fn errors(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// Convert to a [`Validation`], keeping every failed field.
    ///
    /// ```
    /// use stillrules::{InputSet, RuleRegistry, Rules, Validation};
    ///
    /// let rules = Rules::parse([("a", "alpha"), ("b", "alpha")]).unwrap();
    /// let result = RuleRegistry::strict()
    ///     .compile(&rules)
    ///     .unwrap()
    ///     .run(&InputSet::new().with("a", 1).with("b", 2));
    ///
    /// match result.into_validation() {
    ///     Validation::Failure(errors) => assert_eq!(errors.len(), 2),
    ///     Validation::Success(_) => panic!("expected failure"),
    /// }
    /// ```
    pub fn into_validation(self) -> Validation<(), Vec<FieldErrors>> {
        let per_field = self
            .outcomes
            .into_iter()
            .map(|outcome| match outcome.state {
                FieldState::Failed => Validation::failure(vec![FieldErrors {
                    field: outcome.field,
                    failures: outcome.failures,
                }]),
                _ => Validation::success(()),
            })
            .collect();

        Validation::all_vec(per_field).map(|_| ())
    }
}

impl Semigroup for ValidationResult {
    fn combine(mut self, other: Self) -> Self {
        self.outcomes.extend(other.outcomes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(field: &str, failures: &[&str]) -> FieldOutcome {
        let state = if failures.is_empty() {
            FieldState::Passed
        } else {
            FieldState::Failed
        };
        FieldOutcome::new(
            field,
            state,
            false,
            failures.iter().map(|r| FailedRule::new(*r, None)).collect(),
        )
    }

    #[test]
    fn test_empty_result_is_valid() {
        assert!(ValidationResult::default().is_valid());
        assert!(ValidationResult::default().into_validation().is_success());
    }

    #[test]
    fn test_failed_rules_and_errors() {
        let result = ValidationResult::new(vec![
            outcome("a", &[]),
            outcome("b", &["alpha", "min_length"]),
        ]);
        assert!(!result.is_valid());
        assert_eq!(result.failed_rules("b"), ["alpha", "min_length"]);
        assert!(result.failed_rules("missing").is_empty());
        assert_eq!(result.errors().count(), 1);
    }

    #[test]
    fn test_combine_concatenates() {
        let left = ValidationResult::new(vec![outcome("a", &[])]);
        let right = ValidationResult::new(vec![outcome("b", &["required"])]);
        let combined = left.combine(right);
        assert_eq!(combined.outcomes().len(), 2);
        assert!(!combined.is_valid());
    }

    #[test]
    fn test_into_validation_keeps_all_failed_fields() {
        let result = ValidationResult::new(vec![
            outcome("a", &["alpha"]),
            outcome("b", &[]),
            outcome("c", &["matches"]),
        ]);
        assert_eq!(
            result.into_validation(),
            Validation::Failure(vec![
                FieldErrors {
                    field: "a".to_string(),
                    failures: vec![FailedRule::new("alpha", None)],
                },
                FieldErrors {
                    field: "c".to_string(),
                    failures: vec![FailedRule::new("matches", None)],
                },
            ])
        );
    }

    #[test]
    fn test_message_key_is_rule_name() {
        let failure = FailedRule::new("min_length", Some("Too short.".to_string()));
        assert_eq!(failure.message_key(), "min_length");
    }
}
