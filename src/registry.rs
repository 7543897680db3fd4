//! Rule-set sources and the rule registry
//!
//! A [`RuleSet`] is a named collection of rule implementations: the built-in
//! core rules, the built-in format rules, or an application's own
//! closures. A [`RuleRegistry`] merges several sources in a fixed order. The
//! first source to register a name wins, so an application rule set added after
//! the built-ins cannot shadow `matches` by accident. Replacing a rule on
//! purpose goes through [`RuleRegistryBuilder::override_rule`].
//!
//! The registry is built once and is read-only afterwards. It is `Send + Sync`
//! and can be shared across threads behind an `Arc` or a plain reference.
//!
//! # Examples
//!
//! ```
//! use stillrules::{InputSet, RuleRegistry, RuleSet, Rules, Value};
//!
//! let registry = RuleRegistry::builder()
//!     .source(RuleSet::core())
//!     .source(RuleSet::new("app").rule("even", |value: Option<&Value>, _: &[String], _: &InputSet| {
//!         matches!(value, Some(Value::Int(i)) if i % 2 == 0)
//!     }))
//!     .build();
//!
//! let rules = Rules::parse([("count", "greater_than[0]|even")]).unwrap();
//! let compiled = registry.compile(&rules).unwrap();
//!
//! assert!(compiled.run(&InputSet::new().with("count", 4)).is_valid());
//! assert!(!compiled.run(&InputSet::new().with("count", 3)).is_valid());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::builtin::BuiltinRule;
use crate::executor::{CompiledField, CompiledRules, Step};
use crate::rule::RuleEntry;
use crate::{ConfigurationError, InputSet, Rules, Value};

/// A caller-supplied named rule.
///
/// Implemented for every `Fn(Option<&Value>, &[String], &InputSet) -> bool`
/// closure that is `Send + Sync`. The value is `None` when the field is
/// absent.
pub trait CustomRule: Send + Sync {
    /// Check the field value with the rule's parameters.
    fn check(&self, value: Option<&Value>, params: &[String], input: &InputSet) -> bool;
}

impl<F> CustomRule for F
where
    F: Fn(Option<&Value>, &[String], &InputSet) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: Option<&Value>, params: &[String], input: &InputSet) -> bool {
        self(value, params, input)
    }
}

/// What a rule name resolves to.
#[derive(Clone)]
pub enum RuleImpl {
    /// A rule implemented by this crate.
    Builtin(BuiltinRule),
    /// A caller-supplied rule.
    Custom(Arc<dyn CustomRule>),
}

impl RuleImpl {
    /// Wrap a closure or [`CustomRule`] implementation.
    pub fn custom<R: CustomRule + 'static>(rule: R) -> Self {
        RuleImpl::Custom(Arc::new(rule))
    }
}

impl fmt::Debug for RuleImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleImpl::Builtin(rule) => f.debug_tuple("Builtin").field(rule).finish(),
            RuleImpl::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named collection of rules, merged into a registry as one source.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    rules: Vec<(String, RuleImpl)>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// The built-in core rules: gating, presence, comparison, length and
    /// list membership.
    ///
    /// `permit_empty`, `if_exist`, `required`, `matches`, `differs`, the four
    /// ordering rules, `min_length`, `max_length`, `exact_length` and
    /// `in_list`.
    pub fn core() -> Self {
        use BuiltinRule as B;

        [
            B::PermitEmpty,
            B::IfExist,
            B::Required,
            B::Matches,
            B::Differs,
            B::GreaterThan,
            B::GreaterThanEqualTo,
            B::LessThan,
            B::LessThanEqualTo,
            B::MinLength,
            B::MaxLength,
            B::ExactLength,
            B::InList,
        ]
        .into_iter()
        .fold(RuleSet::new("core"), RuleSet::builtin)
    }

    /// The built-in character class and number format rules.
    pub fn format() -> Self {
        use BuiltinRule as B;

        [
            B::Alpha,
            B::AlphaNumeric,
            B::AlphaNumericSpace,
            B::Numeric,
            B::Integer,
            B::Decimal,
            B::IsNatural,
            B::IsNaturalNoZero,
        ]
        .into_iter()
        .fold(RuleSet::new("format"), RuleSet::builtin)
    }

    /// Add a built-in rule under its own name.
    pub fn builtin(mut self, rule: BuiltinRule) -> Self {
        self.rules
            .push((rule.name().to_string(), RuleImpl::Builtin(rule)));
        self
    }

    /// Add a custom rule.
    pub fn rule<R: CustomRule + 'static>(mut self, name: impl Into<String>, rule: R) -> Self {
        self.rules.push((name.into(), RuleImpl::custom(rule)));
        self
    }

    /// The source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule names in registration order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }
}

/// Builder for [`RuleRegistry`].
#[derive(Debug, Default)]
pub struct RuleRegistryBuilder {
    sources: Vec<RuleSet>,
    overrides: Vec<(String, RuleImpl)>,
}

impl RuleRegistryBuilder {
    /// Append a rule-set source. Earlier sources take precedence.
    pub fn source(mut self, rule_set: RuleSet) -> Self {
        self.sources.push(rule_set);
        self
    }

    /// Replace (or add) a rule regardless of what the sources register.
    pub fn override_rule<R: CustomRule + 'static>(self, name: impl Into<String>, rule: R) -> Self {
        self.override_with(name, RuleImpl::custom(rule))
    }

    /// Like [`RuleRegistryBuilder::override_rule`], with an already wrapped
    /// implementation.
    pub fn override_with(mut self, name: impl Into<String>, rule: RuleImpl) -> Self {
        self.overrides.push((name.into(), rule));
        self
    }

    /// Merge the sources and overrides into a registry.
    pub fn build(self) -> RuleRegistry {
        let mut rules: HashMap<String, RuleImpl> = HashMap::new();
        let mut sources = Vec::with_capacity(self.sources.len());

        for source in self.sources {
            for (name, rule) in source.rules {
                rules.entry(name).or_insert(rule);
            }
            sources.push(source.name);
        }
        for (name, rule) in self.overrides {
            rules.insert(name, rule);
        }

        RuleRegistry { rules, sources }
    }
}

/// Rule name to implementation, merged from rule-set sources.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleImpl>,
    sources: Vec<String>,
}

impl RuleRegistry {
    /// Start building a registry.
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// The core and format rule sets, in that order.
    pub fn strict() -> Self {
        Self::builder()
            .source(RuleSet::core())
            .source(RuleSet::format())
            .build()
    }

    /// Resolve a rule name.
    pub fn resolve(&self, name: &str) -> Option<&RuleImpl> {
        self.rules.get(name)
    }

    /// Returns `true` when `name` resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Source names in precedence order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Resolve every rule of every field.
    ///
    /// Fails on the first rule name that does not resolve; a broken
    /// configuration never turns into a failing field.
    pub fn compile(&self, rules: &Rules) -> Result<CompiledRules, ConfigurationError> {
        let fields = rules
            .iter()
            .map(|(field, spec)| -> Result<CompiledField, ConfigurationError> {
                let steps = spec
                    .entries()
                    .iter()
                    .map(|entry| self.compile_entry(field, entry))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledField::new(field, steps, spec.contains("required")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledRules::new(fields))
    }

    fn compile_entry(&self, field: &str, entry: &RuleEntry) -> Result<Step, ConfigurationError> {
        match entry {
            RuleEntry::Predicate { check, .. } => Ok(Step::Predicate {
                key: entry.key().to_string(),
                check: Arc::clone(check),
            }),
            RuleEntry::Named { name, params } => match self.resolve(name) {
                Some(RuleImpl::Builtin(rule)) => Ok(Step::Builtin {
                    rule: *rule,
                    params: params.clone(),
                }),
                Some(RuleImpl::Custom(rule)) => Ok(Step::Custom {
                    name: name.clone(),
                    rule: Arc::clone(rule),
                    params: params.clone(),
                }),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(field, rule = %name, "unknown rule in configuration");

                    Err(ConfigurationError::UnknownRule {
                        field: field.to_string(),
                        rule: name.clone(),
                    })
                }
            },
        }
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::strict()
    }
}
