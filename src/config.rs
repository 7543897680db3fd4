//! Validator configuration
//!
//! [`ValidatorConfig`] collects everything that is fixed for the lifetime of a
//! [`Validator`]: the rule-set sources in precedence order, the comparison
//! semantics, named rule groups and custom error messages. Building it merges
//! the registry and compiles every group up front, so a group that references
//! an unknown rule is reported at configuration time.
//!
//! # Examples
//!
//! ```
//! use stillrules::{InputSet, Rules, ValidatorConfig};
//!
//! let validator = ValidatorConfig::new()
//!     .group("groupA", Rules::parse([("foo", "required|min_length[5]")]).unwrap())
//!     .group_message("groupA", "foo", "min_length", "Shame, shame. Too short.")
//!     .build()
//!     .unwrap();
//!
//! let result = validator
//!     .run_group("groupA", &InputSet::new().with("foo", "abc"))
//!     .unwrap();
//!
//! let failure = &result.field("foo").unwrap().failures[0];
//! assert_eq!(failure.rule, "min_length");
//! assert_eq!(failure.message.as_deref(), Some("Shame, shame. Too short."));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::compare::SemanticsKind;
use crate::executor::CompiledRules;
use crate::registry::{CustomRule, RuleImpl, RuleRegistry, RuleSet};
use crate::{ConfigurationError, InputSet, Rules, ValidationResult};

/// Custom error messages by field and rule name.
///
/// Messages are cosmetic: they ride along on [`FailedRule`](crate::FailedRule)
/// and never change whether a rule passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Messages {
    by_field: HashMap<String, HashMap<String, String>>,
}

impl Messages {
    /// No messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Messages::set`].
    pub fn with(
        mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.set(field, rule, message);
        self
    }

    /// Set the message for a field and rule.
    pub fn set(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.by_field
            .entry(field.into())
            .or_default()
            .insert(rule.into(), message.into());
    }

    /// The message for a field and rule, if configured.
    pub fn get(&self, field: &str, rule: &str) -> Option<&str> {
        self.by_field
            .get(field)
            .and_then(|rules| rules.get(rule))
            .map(String::as_str)
    }

    /// `self` with every message of `top` layered over it.
    pub fn layered(&self, top: &Messages) -> Messages {
        let mut merged = self.clone();
        for (field, rules) in &top.by_field {
            for (rule, message) in rules {
                merged.set(field.as_str(), rule.as_str(), message.as_str());
            }
        }
        merged
    }

    /// Returns `true` when no message is configured.
    pub fn is_empty(&self) -> bool {
        self.by_field.values().all(HashMap::is_empty)
    }
}

/// Builder for a [`Validator`].
#[derive(Debug, Default)]
pub struct ValidatorConfig {
    rule_sets: Vec<RuleSet>,
    overrides: Vec<(String, RuleImpl)>,
    semantics: SemanticsKind,
    groups: Vec<(String, Rules)>,
    messages: Messages,
    group_messages: HashMap<String, Messages>,
}

impl ValidatorConfig {
    /// Strict semantics, no groups, no messages.
    ///
    /// Unless [`ValidatorConfig::rule_set`] is called, the built-in core
    /// and format rule sets are used.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule-set source. Earlier sources take precedence.
    pub fn rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_sets.push(rule_set);
        self
    }

    /// Replace a rule regardless of what the sources register.
    pub fn override_rule<R: CustomRule + 'static>(
        mut self,
        name: impl Into<String>,
        rule: R,
    ) -> Self {
        self.overrides.push((name.into(), RuleImpl::custom(rule)));
        self
    }

    /// Choose strict or loose comparison semantics.
    pub fn semantics(mut self, semantics: SemanticsKind) -> Self {
        self.semantics = semantics;
        self
    }

    /// Register a named rule group.
    pub fn group(mut self, name: impl Into<String>, rules: Rules) -> Self {
        self.groups.push((name.into(), rules));
        self
    }

    /// A message used for a field and rule in every run.
    pub fn message(
        mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.messages.set(field, rule, message);
        self
    }

    /// A message used for a field and rule when running one group.
    pub fn group_message(
        mut self,
        group: impl Into<String>,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.group_messages
            .entry(group.into())
            .or_default()
            .set(field, rule, message);
        self
    }

    /// Merge the registry and compile every group.
    pub fn build(self) -> Result<Validator, ConfigurationError> {
        let rule_sets = if self.rule_sets.is_empty() {
            vec![RuleSet::core(), RuleSet::format()]
        } else {
            self.rule_sets
        };

        let mut builder = rule_sets
            .into_iter()
            .fold(RuleRegistry::builder(), |builder, set| builder.source(set));
        for (name, rule) in self.overrides {
            builder = builder.override_with(name, rule);
        }
        let registry = Arc::new(builder.build());

        let mut groups = HashMap::with_capacity(self.groups.len());
        for (name, rules) in self.groups {
            let messages = match self.group_messages.get(&name) {
                Some(group) => self.messages.layered(group),
                None => self.messages.clone(),
            };
            let compiled = registry
                .compile(&rules)?
                .with_messages(messages)
                .with_semantics(self.semantics);
            groups.insert(name, compiled);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sources = ?registry.sources(),
            groups = groups.len(),
            semantics = ?self.semantics,
            "validator configured"
        );

        Ok(Validator {
            registry,
            semantics: self.semantics,
            groups,
            messages: self.messages,
        })
    }
}

/// Runs rule configurations against input sets.
///
/// A validator is immutable once built. Clone it freely: the registry is
/// shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use stillrules::{InputSet, Rules, Validator, Value};
///
/// let validator = Validator::strict();
/// let rules = Rules::parse([("foo", "matches[bar]")]).unwrap();
///
/// let both_null = InputSet::new().with("foo", Value::Null).with("bar", Value::Null);
/// assert!(validator.validate(&rules, &both_null).unwrap().is_valid());
///
/// let bar_missing = InputSet::new().with("foo", Value::Null);
/// assert!(!validator.validate(&rules, &bar_missing).unwrap().is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    semantics: SemanticsKind,
    groups: HashMap<String, CompiledRules>,
    messages: Messages,
}

impl Validator {
    /// The built-in rule sets with strict semantics.
    pub fn strict() -> Self {
        Self::from_registry(Arc::new(RuleRegistry::strict()), SemanticsKind::Strict)
    }

    /// The built-in rule sets with loose semantics.
    pub fn loose() -> Self {
        Self::from_registry(Arc::new(RuleRegistry::strict()), SemanticsKind::Loose)
    }

    /// A validator over an existing registry, without groups or messages.
    pub fn from_registry(registry: Arc<RuleRegistry>, semantics: SemanticsKind) -> Self {
        Self {
            registry,
            semantics,
            groups: HashMap::new(),
            messages: Messages::default(),
        }
    }

    /// The merged rule registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// The comparison semantics.
    pub fn semantics(&self) -> SemanticsKind {
        self.semantics
    }

    /// Names of the configured groups.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Resolve rules against the registry with this validator's semantics
    /// and messages.
    pub fn compile(&self, rules: &Rules) -> Result<CompiledRules, ConfigurationError> {
        Ok(self
            .registry
            .compile(rules)?
            .with_messages(self.messages.clone())
            .with_semantics(self.semantics))
    }

    /// Compile and run in one step.
    pub fn validate(
        &self,
        rules: &Rules,
        input: &InputSet,
    ) -> Result<ValidationResult, ConfigurationError> {
        Ok(self.compile(rules)?.run(input))
    }

    /// Run a configured group.
    pub fn run_group(
        &self,
        group: &str,
        input: &InputSet,
    ) -> Result<ValidationResult, ConfigurationError> {
        let compiled = self.groups.get(group).ok_or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::warn!(group, "unknown rule group");

            ConfigurationError::UnknownGroup(group.to_string())
        })?;
        Ok(compiled.run(input))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::strict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Value, ValueKind};

    #[test]
    fn test_messages_layering() {
        let base = Messages::new()
            .with("foo", "required", "Foo is required.")
            .with("foo", "alpha", "Letters only.");
        let top = Messages::new().with("foo", "alpha", "Only a-z, please.");

        let merged = base.layered(&top);
        assert_eq!(merged.get("foo", "required"), Some("Foo is required."));
        assert_eq!(merged.get("foo", "alpha"), Some("Only a-z, please."));
        assert_eq!(merged.get("bar", "alpha"), None);
        assert!(Messages::new().is_empty());
    }

    #[test]
    fn test_unknown_group() {
        let validator = ValidatorConfig::new().build().unwrap();
        assert_eq!(
            validator.run_group("nope", &InputSet::new()).unwrap_err(),
            ConfigurationError::UnknownGroup("nope".to_string())
        );
    }

    #[test]
    fn test_group_with_unknown_rule_fails_at_build() {
        let err = ValidatorConfig::new()
            .group("g", Rules::parse([("foo", "required|bogus")]).unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownRule { .. }));
    }

    #[test]
    fn test_group_passes_and_fails() {
        let validator = ValidatorConfig::new()
            .group("groupA", Rules::parse([("foo", "required|min_length[5]")]).unwrap())
            .build()
            .unwrap();

        assert!(validator
            .run_group("groupA", &InputSet::new().with("foo", "abcde"))
            .unwrap()
            .is_valid());

        let result = validator.run_group("groupA", &InputSet::new()).unwrap();
        assert_eq!(result.failed_rules("foo"), ["required", "min_length"]);
    }

    #[test]
    fn test_validator_messages_apply_to_ad_hoc_rules() {
        let validator = ValidatorConfig::new()
            .message("age", "greater_than_equal_to", "Must not be negative.")
            .build()
            .unwrap();

        let rules = Rules::parse([("age", "greater_than_equal_to[0]")]).unwrap();
        let result = validator
            .validate(&rules, &InputSet::new().with("age", -1))
            .unwrap();
        let failure = &result.field("age").unwrap().failures[0];
        assert_eq!(failure.message.as_deref(), Some("Must not be negative."));
    }

    #[test]
    fn test_custom_rule_set_after_builtins() {
        let validator = ValidatorConfig::new()
            .rule_set(RuleSet::core())
            .rule_set(RuleSet::new("app").rule(
                "kind_is",
                |value: Option<&Value>, params: &[String], _: &InputSet| {
                    value.is_some_and(|v| v.kind().to_string() == params[0])
                },
            ))
            .build()
            .unwrap();

        let rules = Rules::parse([("foo", "kind_is[float]")]).unwrap();
        assert!(validator
            .validate(&rules, &InputSet::new().with("foo", 1.5))
            .unwrap()
            .is_valid());
        assert!(!validator.registry().contains("alpha"));
        assert_eq!(ValueKind::Float.to_string(), "float");
    }

    #[test]
    fn test_override_rule() {
        let validator = ValidatorConfig::new()
            .override_rule("alpha", |_: Option<&Value>, _: &[String], _: &InputSet| true)
            .build()
            .unwrap();
        let rules = Rules::parse([("foo", "alpha")]).unwrap();
        assert!(validator
            .validate(&rules, &InputSet::new().with("foo", 123))
            .unwrap()
            .is_valid());
    }

    #[test]
    fn test_loose_semantics_from_config() {
        let validator = ValidatorConfig::new()
            .semantics(SemanticsKind::Loose)
            .build()
            .unwrap();
        let rules = Rules::parse([("foo", "greater_than_equal_to[0]")]).unwrap();
        assert!(validator
            .validate(&rules, &InputSet::new().with("foo", true))
            .unwrap()
            .is_valid());
        assert!(!Validator::strict()
            .validate(&rules, &InputSet::new().with("foo", true))
            .unwrap()
            .is_valid());
    }
}
