use std::{
    fmt::{self, Formatter},
    sync::Arc,
};

use super::ArgMatcher;

/// Identity matcher for shared pointers.
///
/// Policies, tracers and observers are handed to queries as
/// `Arc<dyn Trait>`, which rarely implement [`PartialEq`]. `Same`
/// matches when the argument points to the same allocation as the
/// expected pointer.
pub struct Same<T: ?Sized>(Arc<T>);

/// Creates a [`Same`] matcher.
///
/// ```
/// use cqlx_mock::matcher::{self, ArgMatcher};
/// use std::sync::Arc;
///
/// let shared = Arc::new(5);
/// let matcher = matcher::same(&shared);
/// assert!(matcher.matches(&shared.clone()));
/// assert!(!matcher.matches(&Arc::new(5)));
/// ```
pub fn same<T: ?Sized>(expected: &Arc<T>) -> Same<T> {
    Same(Arc::clone(expected))
}

impl<T: ?Sized> ArgMatcher<Arc<T>> for Same<T> {
    fn matches(&self, actual: &Arc<T>) -> bool {
        // compare addresses only, vtables may be duplicated across codegen units
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const u8,
            Arc::as_ptr(actual) as *const u8,
        )
    }
}

impl<T: ?Sized> fmt::Display for Same<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "same as {:p}", Arc::as_ptr(&self.0) as *const u8)
    }
}
