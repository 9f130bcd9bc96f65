use super::ArgMatcher;
use std::fmt::{self, Formatter};

/// Matches any argument.
///
/// The default matcher for positions that should not constrain a
/// call, e.g., the context handed to a context-aware query.
pub struct Any;

/// Returns an [`ArgMatcher`] that always succeeds.
///
/// ```
/// use cqlx_mock::matcher::{self, ArgMatcher};
///
/// let any = matcher::any();
/// assert!(ArgMatcher::<i32>::matches(&any, &5));
/// assert!(ArgMatcher::<str>::matches(&any, "SELECT * FROM t"));
/// ```
pub fn any() -> Any {
    Any
}

impl<Arg: ?Sized> ArgMatcher<Arg> for Any {
    fn matches(&self, _: &Arg) -> bool {
        true
    }
}

impl fmt::Display for Any {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("_")
    }
}
