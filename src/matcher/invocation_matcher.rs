use core::fmt::{self, Formatter};
use paste::paste;

use super::ArgMatcher;

/// Matcher for the invocation of a method.
///
/// Implementors provide an expectation for each method argument.
///
/// This trait is implemented for tuples of [`ArgMatcher`] of up to
/// ten elements, matching the tuple of recorded arguments
/// position-by-position, and for [`AnyInvocation`].
///
/// # Examples
///
/// ## Simple
///
/// ```
/// use cqlx_mock::matcher::{self, InvocationMatcher};
///
/// let matcher = (matcher::eq_against("SELECT"), matcher::any());
/// assert!(matcher.matches(&("SELECT".to_string(), vec!["id".to_string()])).is_ok());
/// assert!(matcher.matches(&("DELETE".to_string(), vec!["id".to_string()])).is_err());
/// ```
///
/// ## Single argument
///
/// ```
/// use cqlx_mock::matcher::{self, InvocationMatcher};
///
/// // single arg matchers are wrapped in a tuple, as are the
/// // recorded arguments. Don't forget the trailing comma.
/// let matcher = (matcher::eq(20_i32),);
/// assert!(matcher.matches(&(20_i32,)).is_ok());
/// ```
pub trait InvocationMatcher<Args> {
    /// Returns `Ok(())` when all arguments match.
    ///
    /// Returns `Err(Mismatch)` if any argument fails to match. The
    /// error details what the actual arguments were and whether they
    /// matched or not.
    fn matches(&self, args: &Args) -> Result<(), Mismatch>;

    /// Returns a formatted expectation, one per argument.
    fn expectations(&self) -> Vec<String>;
}

impl<Args, M: InvocationMatcher<Args> + ?Sized> InvocationMatcher<Args> for Box<M> {
    fn matches(&self, args: &Args) -> Result<(), Mismatch> {
        (**self).matches(args)
    }

    fn expectations(&self) -> Vec<String> {
        (**self).expectations()
    }
}

/// Failure report of an [`InvocationMatcher`].
#[derive(Debug)]
pub struct Mismatch {
    arguments: Vec<ArgumentMatch>,
}

#[derive(Debug)]
struct ArgumentMatch {
    did_match: bool,
    actual: String,
}

impl Mismatch {
    /// Pairs the report with the expectations of the matcher that
    /// produced it.
    pub fn formatted(self, expected: Vec<String>) -> FormattedMismatch {
        let arguments = self
            .arguments
            .into_iter()
            .zip(expected)
            .map(|(ArgumentMatch { did_match, actual }, expected)| {
                let width = expected.len().max(actual.len());
                FormattedArgumentMatch {
                    did_match,
                    expected: format!("{:<width$}", expected, width = width),
                    actual: format!("{:<width$}", actual, width = width),
                }
            })
            .collect();

        FormattedMismatch { arguments }
    }
}

#[derive(Debug)]
#[doc(hidden)]
pub struct FormattedMismatch {
    arguments: Vec<FormattedArgumentMatch>,
}

#[derive(Debug)]
struct FormattedArgumentMatch {
    did_match: bool,
    expected: String,
    actual: String,
}

impl fmt::Display for FormattedMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let [FormattedArgumentMatch {
            expected, actual, ..
        }] = self.arguments.as_slice()
        {
            return write!(
                f,
                "Argument did not match.
  Expected: {}
  Actual:   {}",
                expected.trim_end(),
                actual.trim_end()
            );
        }

        f.write_str("Arguments did not match.\n  Expected: [")?;
        let mut arguments = self.arguments.iter();
        if let Some(arg) = arguments.next() {
            f.write_str(&arg.expected)?;
        }
        arguments.try_for_each(|arg| write!(f, ", {}", arg.expected))?;
        f.write_str("]\n  Actual:   [")?;
        let mut arguments = self.arguments.iter();
        if let Some(arg) = arguments.next() {
            f.write_str(&arg.actual)?;
        }
        arguments.try_for_each(|arg| write!(f, ", {}", arg.actual))?;
        f.write_str("]")?;

        self.arguments
            .iter()
            .enumerate()
            .filter(|(_, arg)| !arg.did_match)
            .try_for_each(|(i, arg)| {
                write!(
                    f,
                    "\n  Argument {}:
    Expected: {}
    Actual:   {}",
                    i,
                    arg.expected.trim_end(),
                    arg.actual.trim_end()
                )
            })
    }
}

impl std::error::Error for FormattedMismatch {}

/// Matches every invocation regardless of its arguments.
///
/// Used when an expectation is registered without
/// [`with_args`](crate::When::with_args).
pub struct AnyInvocation;

impl<Args> InvocationMatcher<Args> for AnyInvocation {
    /// Always returns `Ok(())`
    fn matches(&self, _: &Args) -> Result<(), Mismatch> {
        Ok(())
    }

    fn expectations(&self) -> Vec<String> {
        vec!["<any>".to_string()]
    }
}

impl InvocationMatcher<()> for () {
    /// Always succeeds, as there are no arguments to match against.
    fn matches(&self, _: &()) -> Result<(), Mismatch> {
        Ok(())
    }

    fn expectations(&self) -> Vec<String> {
        vec![]
    }
}

// (a,b,c) => tuple!(b,c)
macro_rules! peel {
    ($idx:tt) => ();
    ($idx:tt, $($other:tt),+) => (tuple! { $($other),+ })
}

// implement InvocationMatcher for tuples of ArgMatchers
macro_rules! tuple {
    ($($idx:tt),+) => (
        paste! {
            impl<$([<A $idx>]: fmt::Debug),+, $([<AM $idx>]: ArgMatcher<[<A $idx>]>),+>
                InvocationMatcher<($([<A $idx>],)+)> for ($([<AM $idx>],)+)
            {
                /// Succeeds if every argument matches its corresponding [`ArgMatcher`].
                fn matches(&self, ($([<a $idx>],)+): &($([<A $idx>],)+)) -> Result<(), Mismatch> {
                    let ($([<am $idx>],)+) = self;
                    let arguments = vec![
                        $(ArgumentMatch {
                            did_match: [<am $idx>].matches([<a $idx>]),
                            actual: format!("{:?}", [<a $idx>]),
                        }),+
                    ];

                    if arguments.iter().all(|arg| arg.did_match) {
                        Ok(())
                    } else {
                        Err(Mismatch { arguments })
                    }
                }

                fn expectations(&self) -> Vec<String> {
                    let ($([<am $idx>],)+) = self;
                    vec![$([<am $idx>].to_string()),+]
                }
            }
        }
        peel! { $($idx),+ }
    )
}

tuple! { 9, 8, 7, 6, 5, 4, 3, 2, 1, 0 }
