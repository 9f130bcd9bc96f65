use std::{
    borrow::Borrow,
    fmt::{self, Formatter},
};

use super::ArgMatcher;

/// Equality matcher for equal types.
///
/// Unlike [`EqAgainst`], it only allows equality matching of the same
/// type. In exchange it matches across borrows: `Eq<T>` implements
/// `ArgMatcher<Arg>` for every `Arg: Borrow<T>`.
pub struct Eq<Expected>(Expected);

/// Creates an [`Eq`](struct@Eq) matcher.
///
/// ```
/// use cqlx_mock::matcher::{self, ArgMatcher};
///
/// let names = matcher::eq(vec!["id".to_string()]);
/// assert!(names.matches(&vec!["id".to_string()]));
/// assert!(!names.matches(&Vec::<String>::new()));
/// ```
pub fn eq<Expected: fmt::Debug + PartialEq>(expected: Expected) -> Eq<Expected> {
    Eq(expected)
}

impl<Arg, Expected> ArgMatcher<Arg> for Eq<Expected>
where
    Arg: Borrow<Expected> + ?Sized,
    Expected: fmt::Debug + PartialEq,
{
    fn matches(&self, actual: &Arg) -> bool {
        &self.0 == actual.borrow()
    }
}

impl<Expected: fmt::Debug> fmt::Display for Eq<Expected> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Equality matcher for different types.
///
/// Unlike [`Eq`](struct@Eq), it matches even if the types are
/// different, as long as `Expected: PartialEq<Arg>`. This is handy to
/// match a recorded `String` statement against a `&str` literal.
pub struct EqAgainst<Expected>(Expected);

/// Creates an [`EqAgainst`] matcher.
///
/// ```
/// use cqlx_mock::matcher::{self, ArgMatcher};
///
/// let stmt = matcher::eq_against("SELECT * FROM t");
/// assert!(stmt.matches(&"SELECT * FROM t".to_string()));
/// ```
pub fn eq_against<Expected: fmt::Debug>(expected: Expected) -> EqAgainst<Expected> {
    EqAgainst(expected)
}

impl<Arg, Expected> ArgMatcher<Arg> for EqAgainst<Expected>
where
    Arg: ?Sized,
    Expected: fmt::Debug + PartialEq<Arg>,
{
    fn matches(&self, actual: &Arg) -> bool {
        &self.0 == actual
    }
}

impl<Expected: fmt::Debug> fmt::Display for EqAgainst<Expected> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "_ == {:?}", self.0)
    }
}
