//! Assertion macros for validation results
//!
//! # Examples
//!
//! ```rust
//! use stillrules::{assert_invalid, assert_valid, InputSet, Rules, Validator};
//!
//! let validator = Validator::strict();
//! let rules = Rules::parse([("foo", "alpha|min_length[3]")]).unwrap();
//!
//! assert_valid!(validator.validate(&rules, &InputSet::new().with("foo", "abc")).unwrap());
//! assert_invalid!(
//!     validator.validate(&rules, &InputSet::new().with("foo", "a1")).unwrap(),
//!     "foo" => ["alpha", "min_length"]
//! );
//! ```

/// Assert that every field of a [`ValidationResult`](crate::ValidationResult)
/// passed.
///
/// On failure the panic message lists each failed field with its rules.
#[macro_export]
macro_rules! assert_valid {
    ($result:expr) => {
        let result: &$crate::ValidationResult = &$result;
        if !result.is_valid() {
            let failed: ::std::vec::Vec<_> = result
                .errors()
                .map(|outcome| (outcome.field.as_str(), result.failed_rules(&outcome.field)))
                .collect();
            panic!("Expected a valid result, got failures: {:?}", failed);
        }
    };
}

/// Assert that a [`ValidationResult`](crate::ValidationResult) failed.
///
/// With `field => [rules]` pairs, each listed field must have failed exactly
/// those rules, in order. Fields not listed are not checked.
///
/// ```rust
/// use stillrules::{assert_invalid, InputSet, Rules, Validator};
///
/// let rules = Rules::parse([("a", "required"), ("b", "greater_than[1]")]).unwrap();
/// let result = Validator::strict()
///     .validate(&rules, &InputSet::new().with("b", true))
///     .unwrap();
///
/// assert_invalid!(result);
/// assert_invalid!(result, "a" => ["required"], "b" => ["greater_than"]);
/// ```
#[macro_export]
macro_rules! assert_invalid {
    ($result:expr) => {
        let result: &$crate::ValidationResult = &$result;
        if result.is_valid() {
            panic!("Expected an invalid result, every field passed");
        }
    };
    ($result:expr, $($field:expr => [$($rule:expr),* $(,)?]),+ $(,)?) => {
        let result: &$crate::ValidationResult = &$result;
        if result.is_valid() {
            panic!("Expected an invalid result, every field passed");
        }
        $(
            let expected: ::std::vec::Vec<&str> = ::std::vec![$($rule),*];
            assert_eq!(
                result.failed_rules($field),
                expected,
                "failed rules of field {:?}",
                $field
            );
        )+
    };
}

/// Assert that a [`Validation`](crate::Validation) succeeds.
///
/// ```rust
/// use stillrules::{assert_success, InputSet, Rules, Validator};
///
/// let rules = Rules::parse([("n", "integer")]).unwrap();
/// let result = Validator::strict()
///     .validate(&rules, &InputSet::new().with("n", "42"))
///     .unwrap();
/// assert_success!(result.into_validation());
/// ```
#[macro_export]
macro_rules! assert_success {
    ($validation:expr) => {
        match $validation {
            $crate::Validation::Success(_) => {}
            $crate::Validation::Failure(e) => {
                panic!("Expected Success, got Failure: {:?}", e);
            }
        }
    };
}

/// Assert that a [`Validation`](crate::Validation) fails.
#[macro_export]
macro_rules! assert_failure {
    ($validation:expr) => {
        match $validation {
            $crate::Validation::Failure(_) => {}
            $crate::Validation::Success(v) => {
                panic!("Expected Failure, got Success: {:?}", v);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{InputSet, Rules, Validator};

    fn result(value: i64) -> crate::ValidationResult {
        let rules = Rules::parse([("n", "greater_than[0]|less_than[10]")]).unwrap();
        Validator::strict()
            .validate(&rules, &InputSet::new().with("n", value))
            .unwrap()
    }

    #[test]
    fn test_assert_valid() {
        assert_valid!(result(5));
    }

    #[test]
    fn test_assert_invalid_with_rules() {
        assert_invalid!(result(-1), "n" => ["greater_than"]);
        assert_invalid!(result(11), "n" => ["less_than"],);
    }

    #[test]
    #[should_panic(expected = "Expected a valid result")]
    fn test_assert_valid_panics() {
        assert_valid!(result(0));
    }

    #[test]
    #[should_panic(expected = "failed rules of field")]
    fn test_assert_invalid_wrong_rules_panics() {
        assert_invalid!(result(0), "n" => ["less_than"]);
    }

    #[test]
    fn test_validation_assertions() {
        assert_success!(result(1).into_validation());
        assert_failure!(result(10).into_validation());
    }
}
