//! Configuration errors
//!
//! A broken rule configuration is a programming mistake, not a validation
//! failure. Unknown rule names, unknown groups and malformed rule strings are
//! reported as [`ConfigurationError`] when rules are compiled, before any input
//! is looked at. Everything that can go wrong with an input *value* (an array
//! where a scalar is expected, a boolean given to an ordering rule, a missing
//! comparison field) resolves to a failing rule instead.

use std::fmt;

/// A rule configuration that cannot be compiled.
///
/// # Examples
///
/// ```
/// use stillrules::{ConfigurationError, RuleRegistry, Rules};
///
/// let registry = RuleRegistry::strict();
/// let rules = Rules::parse([("foo", "no_such_rule")]).unwrap();
///
/// match registry.compile(&rules) {
///     Err(ConfigurationError::UnknownRule { field, rule }) => {
///         assert_eq!(field, "foo");
///         assert_eq!(rule, "no_such_rule");
///     }
///     other => panic!("expected UnknownRule, got {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A field references a rule name no rule set provides.
    UnknownRule {
        /// The field whose pipeline references the rule.
        field: String,
        /// The unresolved rule name.
        rule: String,
    },
    /// A named rule group was requested but never configured.
    UnknownGroup(String),
    /// A rule string could not be parsed.
    MalformedRule {
        /// The offending rule string.
        input: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl ConfigurationError {
    pub(crate) fn malformed(input: impl Into<String>, reason: &'static str) -> Self {
        ConfigurationError::MalformedRule {
            input: input.into(),
            reason,
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownRule { field, rule } => {
                write!(f, "field `{}` references unknown rule `{}`", field, rule)
            }
            ConfigurationError::UnknownGroup(name) => {
                write!(f, "no rule group named `{}`", name)
            }
            ConfigurationError::MalformedRule { input, reason } => {
                write!(f, "malformed rule `{}`: {}", input, reason)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ConfigurationError::UnknownRule {
            field: "foo".to_string(),
            rule: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "field `foo` references unknown rule `bogus`");

        let err = ConfigurationError::UnknownGroup("signup".to_string());
        assert_eq!(err.to_string(), "no rule group named `signup`");

        let err = ConfigurationError::malformed("min_length[5", "missing closing bracket");
        assert_eq!(
            err.to_string(),
            "malformed rule `min_length[5`: missing closing bracket"
        );
    }

    #[test]
    fn test_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&ConfigurationError::UnknownGroup("x".to_string()));
    }
}
