//! Tools to check if an argument to a mocked method matches
//! expectations.

mod any;
mod eq;
mod from_fn;
mod invocation_matcher;
mod same;

pub use any::{any, Any};
pub use eq::{eq, eq_against, Eq, EqAgainst};
pub use from_fn::from_fn;
pub use invocation_matcher::{AnyInvocation, InvocationMatcher, Mismatch};
pub use same::{same, Same};

use std::fmt;

/// Matcher for single argument of a method.
///
/// Implementors provide an expectation to match an argument against.
///
/// The crate provides the following matchers:
/// * [`any()`]: matches any argument
/// * [`eq()`]: matches based on [`PartialEq`]
/// * [`eq_against()`]: matches against a value of a different type
/// * [`same()`]: matches a shared pointer to the same allocation
/// * [`from_fn!`](crate::from_fn!): matches based on a closure
/// * [`pattern!`](crate::pattern!): matches based on a pattern
///
/// Implement this trait to provide custom matchers.
///
/// # Examples
///
/// ```
/// use cqlx_mock::matcher::ArgMatcher;
/// use std::fmt::{self, Formatter};
///
/// struct NotEmpty;
///
/// impl fmt::Display for NotEmpty {
///     fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
///         f.write_str("!_.is_empty()")
///     }
/// }
///
/// impl ArgMatcher<String> for NotEmpty {
///     fn matches(&self, argument: &String) -> bool {
///         !argument.is_empty()
///     }
/// }
///
/// assert!(NotEmpty.matches(&"SELECT".to_string()));
/// assert!(!NotEmpty.matches(&String::new()));
/// ```
pub trait ArgMatcher<Arg: ?Sized>: fmt::Display {
    /// Checks if the argument matches the determined expectation.
    fn matches(&self, argument: &Arg) -> bool;
}
