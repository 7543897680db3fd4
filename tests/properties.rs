//! Property-based tests for rule evaluation

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use stillrules::classify::{is_blank_strict, is_empty_strict};
use stillrules::prelude::*;
use stillrules::RuleRegistry;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "-?[0-9]{0,4}(\\.[0-9]{1,2})?".prop_map(Value::String),
        "[a-z ]{0,6}".prop_map(Value::String),
    ]
}

fn ordering_rule() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("greater_than"),
        Just("greater_than_equal_to"),
        Just("less_than"),
        Just("less_than_equal_to"),
    ]
}

proptest! {
    #[test]
    fn prop_run_is_deterministic(value in scalar(), other in scalar(), param in -50i64..50) {
        let rules = Rules::parse([
            ("foo", format!("permit_empty|greater_than[{param}]|differs[bar]")),
        ])
        .unwrap();
        let compiled = Validator::strict().compile(&rules).unwrap();
        let input = InputSet::new().with("foo", value).with("bar", other);

        prop_assert_eq!(compiled.run(&input), compiled.run(&input));
    }

    #[test]
    fn prop_booleans_fail_every_ordering_rule(
        flag in any::<bool>(),
        rule in ordering_rule(),
        param in "-?[0-9]{1,3}|[a-z]{1,3}",
    ) {
        let rules = Rules::parse([("foo", format!("{rule}[{param}]"))]).unwrap();
        let result = Validator::strict()
            .validate(&rules, &InputSet::new().with("foo", flag))
            .unwrap();
        prop_assert_eq!(result.failed_rules("foo"), vec![rule]);
    }

    #[test]
    fn prop_only_null_and_blank_are_empty(value in scalar()) {
        let expected = matches!(&value, Value::Null)
            || matches!(&value, Value::String(s) if s.is_empty());
        prop_assert_eq!(is_empty_strict(Some(&value)), expected);
    }

    #[test]
    fn prop_permit_empty_gate_contains_strict_emptiness(value in scalar()) {
        if is_empty_strict(Some(&value)) {
            prop_assert!(is_blank_strict(Some(&value)));
        }
        let zero_like = matches!(&value, Value::Bool(false) | Value::Int(0))
            || matches!(&value, Value::Float(f) if *f == 0.0);
        if zero_like {
            prop_assert!(is_blank_strict(Some(&value)));
        }
    }

    #[test]
    fn prop_integer_and_float_agree(n in -1_000_000i64..1_000_000, param in -1_000_000i64..1_000_000) {
        let validator = Validator::strict();
        let rules = Rules::parse([("foo", format!("greater_than_equal_to[{param}]"))]).unwrap();
        let as_int = validator.validate(&rules, &InputSet::new().with("foo", n)).unwrap();
        let as_float = validator
            .validate(&rules, &InputSet::new().with("foo", n as f64))
            .unwrap();

        prop_assert_eq!(as_int.is_valid(), n >= param);
        prop_assert_eq!(as_float.is_valid(), n >= param);
    }

    #[test]
    fn prop_matches_and_differs_are_exclusive_when_both_present(a in scalar(), b in scalar()) {
        let validator = Validator::strict();
        let input = InputSet::new().with("foo", a).with("bar", b);
        let matches = Rules::parse([("foo", "matches[bar]")]).unwrap();
        let differs = Rules::parse([("foo", "differs[bar]")]).unwrap();

        prop_assert_ne!(
            validator.validate(&matches, &input).unwrap().is_valid(),
            validator.validate(&differs, &input).unwrap().is_valid()
        );
    }
}

#[test]
fn test_compiled_rules_shared_across_threads() {
    let registry = Arc::new(RuleRegistry::strict());
    let rules = Rules::parse([("n", "required|integer|less_than[50]")]).unwrap();
    let compiled = Arc::new(registry.compile(&rules).unwrap());

    let handles: Vec<_> = (0..8i64)
        .map(|i| {
            let compiled = Arc::clone(&compiled);
            thread::spawn(move || {
                (0..100i64)
                    .map(|n| compiled.run(&InputSet::new().with("n", i * 100 + n)).is_valid())
                    .filter(|valid| *valid)
                    .count()
            })
        })
        .collect();

    let valid: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(valid, 50);
}
