use super::ArgMatcher;
use std::fmt;

struct FromFn<F> {
    message: String,
    matcher: F,
}

impl<Arg, F> ArgMatcher<Arg> for FromFn<F>
where
    Arg: ?Sized,
    F: Fn(&Arg) -> bool,
{
    fn matches(&self, argument: &Arg) -> bool {
        (self.matcher)(argument)
    }
}

impl<F> fmt::Display for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Returns an [`ArgMatcher`] that succeeds based on the provided
/// closure, described by `message` in mismatch reports.
///
/// Prefer the [`from_fn!`](crate::from_fn!) macro, which uses the
/// closure's source as the message.
pub fn from_fn<Arg>(
    matcher: impl Fn(&Arg) -> bool,
    message: impl fmt::Display,
) -> impl ArgMatcher<Arg>
where
    Arg: ?Sized,
{
    FromFn {
        matcher,
        message: message.to_string(),
    }
}

/// Returns an [`ArgMatcher`] that succeeds based on the provided
/// closure.
///
/// The returned matcher implements [`fmt::Display`] using the string
/// representation of the closure.
///
/// This is only meant to be used for simple closures. For complex
/// argument matching implement your own [`ArgMatcher`] to make the
/// mismatch report more specific and less verbose.
///
/// ```
/// use cqlx_mock::{from_fn, matcher::ArgMatcher};
///
/// let is_insert = from_fn!(|stmt: &String| stmt.starts_with("INSERT"));
/// assert!(is_insert.matches(&"INSERT INTO t (id) VALUES (?)".to_string()));
/// assert!(!is_insert.matches(&"SELECT * FROM t".to_string()));
/// println!("{}", is_insert); // '|stmt: &String| stmt.starts_with("INSERT")'
/// ```
#[macro_export]
macro_rules! from_fn {
    ($matcher:expr) => {
        $crate::matcher::from_fn($matcher, stringify!($matcher))
    };
}

/// Returns an [`ArgMatcher`] that succeeds if the pattern matches.
///
/// The returned matcher implements [`fmt::Display`] using the string
/// representation of the pattern.
///
/// This macro has two forms:
/// * `pattern!(pattern)`
/// * `pattern!(type => pattern)`
///
/// Use the latter to be specific about the type being matched
/// against.
///
/// ```
/// use cqlx_mock::{cql::Consistency, matcher::ArgMatcher, pattern};
///
/// let quorum = pattern!(Consistency => Consistency::Quorum | Consistency::LocalQuorum);
/// assert!(quorum.matches(&Consistency::LocalQuorum));
/// assert!(!quorum.matches(&Consistency::One));
///
/// let small_page = pattern!(i32 => n if *n <= 100);
/// assert!(small_page.matches(&50));
/// ```
#[macro_export]
macro_rules! pattern {
    ($( $pattern:pat_param )|+ $( if $guard: expr )? $(,)?) => (
        $crate::matcher::from_fn(
            move |arg| matches!(arg, $($pattern)|+ $(if $guard)?),
            stringify!($($pattern)|+ $(if $guard)?),
        )
    );
    ($ty:ty => $( $pattern:pat_param )|+ $( if $guard: expr )? $(,)?) => (
        $crate::matcher::from_fn(
            move |arg: &$ty| matches!(arg, $($pattern)|+ $(if $guard)?),
            stringify!($($pattern)|+ $(if $guard)?),
        )
    );
}
