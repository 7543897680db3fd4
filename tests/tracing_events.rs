//! Tracing output of configuration and rule evaluation
#![cfg(feature = "tracing")]

use stillrules::prelude::*;
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_failed_rule_is_logged() {
    let rules = Rules::parse([("age", "greater_than_equal_to[0]")]).unwrap();
    let result = Validator::strict()
        .validate(&rules, &InputSet::new().with("age", true))
        .unwrap();

    assert!(!result.is_valid());
    assert!(logs_contain("rule failed"));
    assert!(logs_contain("greater_than_equal_to"));
    assert!(logs_contain("validation finished"));
}

#[traced_test]
#[test]
fn test_unknown_rule_is_logged() {
    let rules = Rules::parse([("age", "greater_then[0]")]).unwrap();
    assert!(Validator::strict().compile(&rules).is_err());
    assert!(logs_contain("unknown rule in configuration"));
}

#[traced_test]
#[test]
fn test_permit_empty_skip_is_logged() {
    let rules = Rules::parse([("age", "permit_empty|greater_than[0]")]).unwrap();
    let result = Validator::strict()
        .validate(&rules, &InputSet::new().with("age", ""))
        .unwrap();

    assert!(result.is_valid());
    assert!(logs_contain("named rules skipped by permit_empty"));
}

#[traced_test]
#[test]
fn test_configuration_is_logged() {
    let validator = ValidatorConfig::new()
        .group("signup", Rules::parse([("name", "required")]).unwrap())
        .build()
        .unwrap();

    assert!(validator.run_group("login", &InputSet::new()).is_err());
    assert!(logs_contain("validator configured"));
    assert!(logs_contain("unknown rule group"));
}
