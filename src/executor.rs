//! Rule pipeline execution
//!
//! [`CompiledRules`] is the output of [`RuleRegistry::compile`]: every rule
//! name already resolved, so a run cannot hit a configuration error. Running
//! it against an [`InputSet`] walks each field's pipeline:
//!
//! 1. `if_exist` and the field is absent: nothing runs, the field passes.
//! 2. `permit_empty` (without `required`) and the value is empty to the
//!    active comparator (strict: absent, null, blank, `0`, `0.0` or `false`):
//!    named rules are skipped, but closure rules still run on the value.
//! 3. Otherwise every rule runs, in order. A failure does not stop the
//!    pipeline; all failures are collected.
//!
//! [`RuleRegistry::compile`]: crate::RuleRegistry::compile

use std::fmt;
use std::sync::Arc;

use crate::builtin::BuiltinRule;
use crate::compare::{Comparator, SemanticsKind};
use crate::config::Messages;
use crate::registry::CustomRule;
use crate::result::{FailedRule, FieldOutcome, FieldState, ValidationResult};
use crate::rule::ValuePredicate;
use crate::{InputSet, Value};

/// One resolved entry of a field's pipeline.
#[derive(Clone)]
pub(crate) enum Step {
    Builtin {
        rule: BuiltinRule,
        params: Vec<String>,
    },
    Custom {
        name: String,
        rule: Arc<dyn CustomRule>,
        params: Vec<String>,
    },
    Predicate {
        key: String,
        check: Arc<dyn ValuePredicate>,
    },
}

impl Step {
    fn key(&self) -> &str {
        match self {
            Step::Builtin { rule, .. } => rule.name(),
            Step::Custom { name, .. } => name,
            Step::Predicate { key, .. } => key,
        }
    }

    fn is_gate(&self, gate: BuiltinRule) -> bool {
        matches!(self, Step::Builtin { rule, .. } if *rule == gate)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Builtin { rule, params } => write!(f, "{}{:?}", rule, params),
            Step::Custom { name, params, .. } => write!(f, "{}{:?} (custom)", name, params),
            Step::Predicate { key, .. } => write!(f, "{} (closure)", key),
        }
    }
}

/// A field's pipeline with every rule resolved.
#[derive(Debug, Clone)]
pub(crate) struct CompiledField {
    field: String,
    steps: Vec<Step>,
    if_exist: bool,
    permit_empty: bool,
}

impl CompiledField {
    pub(crate) fn new(field: &str, steps: Vec<Step>, required: bool) -> Self {
        let if_exist = steps.iter().any(|s| s.is_gate(BuiltinRule::IfExist));
        let permit_empty = !required && steps.iter().any(|s| s.is_gate(BuiltinRule::PermitEmpty));
        Self {
            field: field.to_string(),
            steps,
            if_exist,
            permit_empty,
        }
    }

    fn evaluate(
        &self,
        input: &InputSet,
        comparator: &dyn Comparator,
        messages: &Messages,
    ) -> FieldOutcome {
        let mut run = FieldRun::new(&self.field);
        let value = input.get(&self.field);

        if self.if_exist && value.is_none() {
            #[cfg(feature = "tracing")]
            tracing::debug!(field = %self.field, "absent, skipped by if_exist");
            return run.skip();
        }

        let skip_named = self.permit_empty && comparator.is_empty(value);
        if skip_named {
            #[cfg(feature = "tracing")]
            tracing::debug!(field = %self.field, "empty, named rules skipped by permit_empty");
        }

        run.begin();
        for step in &self.steps {
            let passed = match step {
                Step::Builtin { rule, .. } if rule.is_gate() => continue,
                Step::Predicate { check, .. } => check.check(value.unwrap_or(&Value::Null)),
                _ if skip_named => continue,
                Step::Builtin { rule, params } => rule.check(value, params, input, comparator),
                Step::Custom { rule, params, .. } => rule.check(value, params, input),
            };

            #[cfg(feature = "tracing")]
            tracing::trace!(field = %self.field, rule = step.key(), passed, "rule evaluated");

            if !passed {
                #[cfg(feature = "tracing")]
                tracing::debug!(field = %self.field, rule = step.key(), "rule failed");

                let message = messages.get(&self.field, step.key()).map(str::to_string);
                run.fail(FailedRule::new(step.key(), message));
            }
        }

        run.finish(skip_named)
    }
}

/// Per-field progress through `Pending → Evaluating → {Passed, Failed}`.
struct FieldRun<'a> {
    field: &'a str,
    state: FieldState,
    failures: Vec<FailedRule>,
}

impl<'a> FieldRun<'a> {
    fn new(field: &'a str) -> Self {
        Self {
            field,
            state: FieldState::Pending,
            failures: Vec::new(),
        }
    }

    fn begin(&mut self) {
        debug_assert_eq!(self.state, FieldState::Pending);
        self.state = FieldState::Evaluating;
    }

    fn fail(&mut self, failure: FailedRule) {
        debug_assert_ne!(self.state, FieldState::Pending);
        self.state = FieldState::Failed;
        self.failures.push(failure);
    }

    fn skip(self) -> FieldOutcome {
        FieldOutcome::new(self.field, FieldState::Passed, true, Vec::new())
    }

    fn finish(self, skipped: bool) -> FieldOutcome {
        let state = match self.state {
            FieldState::Failed => FieldState::Failed,
            _ => FieldState::Passed,
        };
        FieldOutcome::new(self.field, state, skipped, self.failures)
    }
}

/// A rule configuration resolved against a registry, ready to run.
///
/// Compiled rules are immutable and `Send + Sync`; compile once and run
/// against as many input sets as needed.
///
/// # Examples
///
/// ```
/// use stillrules::{InputSet, RuleRegistry, Rules};
///
/// let compiled = RuleRegistry::strict()
///     .compile(&Rules::parse([("foo", "greater_than_equal_to[0]")]).unwrap())
///     .unwrap();
///
/// assert!(compiled.run(&InputSet::new().with("foo", 0)).is_valid());
/// assert!(!compiled.run(&InputSet::new().with("foo", -1)).is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct CompiledRules {
    fields: Vec<CompiledField>,
    messages: Messages,
    semantics: SemanticsKind,
}

impl CompiledRules {
    pub(crate) fn new(fields: Vec<CompiledField>) -> Self {
        Self {
            fields,
            messages: Messages::default(),
            semantics: SemanticsKind::default(),
        }
    }

    /// Attach custom error messages to failures.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Choose the comparison semantics. Strict by default.
    pub fn with_semantics(mut self, semantics: SemanticsKind) -> Self {
        self.semantics = semantics;
        self
    }

    /// The comparison semantics in use.
    pub fn semantics(&self) -> SemanticsKind {
        self.semantics
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.as_str())
    }

    /// Validate an input set.
    pub fn run(&self, input: &InputSet) -> ValidationResult {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("validate", fields = self.fields.len()).entered();

        let comparator = self.semantics.comparator();
        let outcomes = self
            .fields
            .iter()
            .map(|field| field.evaluate(input, comparator, &self.messages))
            .collect();
        let result = ValidationResult::new(outcomes);

        #[cfg(feature = "tracing")]
        tracing::debug!(valid = result.is_valid(), "validation finished");

        result
    }
}
