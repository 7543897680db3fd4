//! Semigroup trait for associative operations
//!
//! Error accumulation rests on one operation: combine two error values into
//! one, associatively. Field error lists concatenate, and whole validation
//! results combine field by field.
//!
//! # Examples
//!
//! ```
//! use stillrules::Semigroup;
//!
//! let first = vec!["foo: required"];
//! let second = vec!["bar: alpha"];
//! assert_eq!(first.combine(second), vec!["foo: required", "bar: alpha"]);
//! ```

/// A type that supports an associative binary operation
///
/// # Laws
///
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl Semigroup for String {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_string_combine() {
        assert_eq!("foo.".to_string().combine("bar".to_string()), "foo.bar");
    }

    proptest! {
        #[test]
        fn prop_vec_combine_is_associative(
            a in prop::collection::vec(any::<u8>(), 0..8),
            b in prop::collection::vec(any::<u8>(), 0..8),
            c in prop::collection::vec(any::<u8>(), 0..8),
        ) {
            prop_assert_eq!(
                a.clone().combine(b.clone()).combine(c.clone()),
                a.combine(b.combine(c))
            );
        }
    }
}
