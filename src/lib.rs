//! # Stillrules
//!
//! Strict-typed field validation rules with accumulated errors.
//!
//! A rule configuration maps field names to pipelines such as
//! `"permit_empty|greater_than_equal_to[0]"`. Rule names are resolved against a
//! [`RuleRegistry`] once, up front; running the compiled rules against an
//! [`InputSet`] evaluates every field and collects every failed rule.
//!
//! Under the default strict semantics, values keep their types:
//!
//! - `required` treats only absent, `null`, `""` and empty lists or maps as
//!   empty, so `0`, `0.0`, `"0"` and `false` satisfy it;
//! - `permit_empty` also lets `0`, `0.0`, `false` and blank strings skip the
//!   remaining named rules, while `"0"` is still checked;
//! - booleans never satisfy an ordering rule;
//! - integers and floats compare exactly, so `10` equals `10.0`;
//! - `matches` and `differs` fail when either side is absent.
//!
//! ## Quick Example
//!
//! ```rust
//! use stillrules::{InputSet, Rules, Validator, Value};
//!
//! let validator = Validator::strict();
//! let rules = Rules::parse([
//!     ("age", "permit_empty|greater_than_equal_to[0]"),
//!     ("password_confirm", "matches[password]"),
//! ])
//! .unwrap();
//!
//! let input = InputSet::new()
//!     .with("age", 0)
//!     .with("password", "hunter2")
//!     .with("password_confirm", "hunter2");
//! assert!(validator.validate(&rules, &input).unwrap().is_valid());
//!
//! let input = InputSet::new()
//!     .with("age", true)
//!     .with("password", "hunter2")
//!     .with("password_confirm", Value::Null);
//! let result = validator.validate(&rules, &input).unwrap();
//! assert_eq!(result.failed_rules("age"), ["greater_than_equal_to"]);
//! assert_eq!(result.failed_rules("password_confirm"), ["matches"]);
//! ```
//!
//! ## Features
//!
//! - `tracing`: log configuration and rule evaluation through `tracing`
//! - `serde`: (de)serialize values, input sets, messages and results
//! - `proptest`: `Arbitrary` for [`Value`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod builtin;
pub mod classify;
pub mod compare;
pub mod config;
pub mod error;
pub mod executor;
pub mod input;
pub mod registry;
pub mod result;
pub mod rule;
pub mod semigroup;
pub mod testing;
pub mod validation;
pub mod value;

// Re-exports
pub use builtin::BuiltinRule;
pub use compare::{Comparator, SemanticsKind};
pub use config::{Messages, Validator, ValidatorConfig};
pub use error::ConfigurationError;
pub use executor::CompiledRules;
pub use input::InputSet;
pub use registry::{CustomRule, RuleImpl, RuleRegistry, RuleRegistryBuilder, RuleSet};
pub use result::{FailedRule, FieldErrors, FieldOutcome, FieldState, ValidationResult};
pub use rule::{RuleEntry, RuleSpec, Rules, ValuePredicate};
pub use semigroup::Semigroup;
pub use validation::Validation;
pub use value::{Value, ValueKind};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Validator, ValidatorConfig};
    pub use crate::input::InputSet;
    pub use crate::result::ValidationResult;
    pub use crate::rule::{RuleEntry, RuleSpec, Rules};
    pub use crate::semigroup::Semigroup;
    pub use crate::validation::Validation;
    pub use crate::value::Value;
}
