//! Validation type for accumulating errors
//!
//! `Validation` is like `Result`, except that combining two failures keeps
//! both. A rule run reports every failed field rather than the first one, and
//! [`ValidationResult::into_validation`](crate::ValidationResult::into_validation)
//! hands that report over in this shape.
//!
//! # Examples
//!
//! ```
//! use stillrules::Validation;
//!
//! let age = Validation::<u8, Vec<&str>>::success(30);
//! let email = Validation::<&str, _>::failure(vec!["email: matches"]);
//! let name = Validation::<&str, _>::failure(vec!["name: alpha"]);
//!
//! assert_eq!(
//!     age.and(email).and(name),
//!     Validation::Failure(vec!["email: matches", "name: alpha"])
//! );
//! ```

use crate::Semigroup;

/// A validation that either succeeds with a value or fails with accumulated errors
///
/// # Type Parameters
///
/// * `T` - The type of the success value
/// * `E` - The type of the error value (must implement `Semigroup` for accumulation)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validation<T, E> {
    /// Successful validation with a value
    Success(T),
    /// Failed validation with accumulated errors
    Failure(E),
}

impl<T, E> Validation<T, E> {
    /// Create a successful validation
    #[inline]
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    /// Create a failed validation
    #[inline]
    pub fn failure(error: E) -> Self {
        Validation::Failure(error)
    }

    /// Create a validation from a Result
    ///
    /// ```
    /// use stillrules::Validation;
    ///
    /// let v = Validation::from_result("12".parse::<i64>().map_err(|_| vec!["integer"]));
    /// assert_eq!(v, Validation::Success(12));
    /// ```
    #[inline]
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Validation::Success(value),
            Err(error) => Validation::Failure(error),
        }
    }

    /// Convert this validation to a Result
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(error) => Err(error),
        }
    }

    /// Check if this validation is successful
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    /// Check if this validation failed
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Validation::Failure(_))
    }

    /// Transform the success value if present
    #[inline]
    pub fn map<U, F>(self, f: F) -> Validation<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Validation::Success(value) => Validation::Success(f(value)),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    /// Transform the error value if present
    ///
    /// ```
    /// use stillrules::Validation;
    ///
    /// let v = Validation::<(), _>::failure(vec!["alpha", "min_length"]);
    /// assert_eq!(v.map_err(|rules| rules.len()), Validation::Failure(2));
    /// ```
    #[inline]
    pub fn map_err<E2, F>(self, f: F) -> Validation<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Validation::Success(value) => Validation::Success(value),
            Validation::Failure(error) => Validation::Failure(f(error)),
        }
    }
}

impl<T, E: Semigroup> Validation<T, E> {
    /// Combine two validations, accumulating errors using the Semigroup instance
    ///
    /// If both succeed, the values are paired. If either fails, the failures
    /// are combined in order.
    pub fn and<U>(self, other: Validation<U, E>) -> Validation<(T, U), E> {
        match (self, other) {
            (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
            (Validation::Failure(e1), Validation::Failure(e2)) => {
                Validation::Failure(e1.combine(e2))
            }
            (Validation::Failure(e), _) | (_, Validation::Failure(e)) => Validation::Failure(e),
        }
    }

    /// Chain a dependent validation
    ///
    /// The function only runs when this validation succeeded.
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Validation<U, E>
    where
        F: FnOnce(T) -> Validation<U, E>,
    {
        match self {
            Validation::Success(value) => f(value),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    /// Combine all validations in a Vec
    ///
    /// Succeeds with every value when all succeed. Otherwise fails with every
    /// error, combined in order.
    ///
    /// ```
    /// use stillrules::Validation;
    ///
    /// let fields = vec![
    ///     Validation::<(), _>::failure(vec!["foo"]),
    ///     Validation::success(()),
    ///     Validation::failure(vec!["baz"]),
    /// ];
    /// assert_eq!(Validation::all_vec(fields), Validation::Failure(vec!["foo", "baz"]));
    /// ```
    pub fn all_vec(validations: Vec<Validation<T, E>>) -> Validation<Vec<T>, E> {
        let mut successes = Vec::new();
        let mut failure: Option<E> = None;

        for validation in validations {
            match validation {
                Validation::Success(value) => successes.push(value),
                Validation::Failure(error) => {
                    failure = Some(match failure {
                        Some(acc) => acc.combine(error),
                        None => error,
                    });
                }
            }
        }

        match failure {
            Some(error) => Validation::Failure(error),
            None => Validation::Success(successes),
        }
    }
}
