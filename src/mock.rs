mod expectations;
mod store;
mod stub;

pub use self::store::Store;
pub(crate) use self::stub::{Answer, Fill, Stub, Times};

use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    error::{self, MockError},
    matcher::InvocationMatcher,
    when::When,
};

/// Identifies one mocked method of the mock `R`.
///
/// The arguments the method records are the tuple `I`, and it returns
/// `O`. Every mock exposes one associated constant per method, e.g.,
/// [`SessionxMock::QUERY`](crate::SessionxMock::QUERY).
pub struct Method<R, I, O> {
    name: &'static str,
    _marker: PhantomData<fn(&R, I) -> O>,
}

impl<R, I, O> Method<R, I, O> {
    #[doc(hidden)]
    pub const fn new(name: &'static str) -> Self {
        Method {
            name,
            _marker: PhantomData,
        }
    }

    /// The name of the mocked method, as used in failure reports.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<R, I, O> Clone for Method<R, I, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, I, O> Copy for Method<R, I, O> {}

impl<R, I, O> fmt::Debug for Method<R, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Method").field(&self.name).finish()
    }
}

/// Converts a shared mock into the value its chainable methods
/// return.
///
/// Implemented by mocks with fluent methods so those methods can be
/// told to [`then_return_self`](When::then_return_self).
pub trait Chain<O>: Sized {
    fn chain(self: Arc<Self>) -> O;
}

/// A test double that records calls in a [`Store`].
///
/// Provides the means to program answers ([`on`](Mock::on)) and to
/// assert on the recorded calls afterwards.
///
/// # Examples
///
/// ```
/// use cqlx_mock::{cql::CqlError, matcher::eq_against, Mock, Sessionx, SessionxMock};
///
/// let session = SessionxMock::new();
/// session
///     .on(SessionxMock::EXEC_STMT)
///     .with_args((eq_against("TRUNCATE t"),))
///     .once()
///     .then_return(Err(CqlError::Timeout));
///
/// assert_eq!(session.exec_stmt("TRUNCATE t"), Err(CqlError::Timeout));
///
/// session.assert_expectations();
/// session.assert_called(SessionxMock::EXEC_STMT, (eq_against("TRUNCATE t"),));
/// session.assert_number_of_calls(SessionxMock::EXEC_STMT, 1);
/// ```
pub trait Mock: Sized {
    #[doc(hidden)]
    fn store(&self) -> &Store;

    /// Starts programming an answer for `method`.
    ///
    /// A method may be programmed several times. Calls are answered by
    /// the first expectation, in registration order, that matches the
    /// arguments and is not used up. Register narrower expectations
    /// before catch-all ones: a catch-all registered first answers
    /// every call and the narrower one is never reached.
    ///
    /// ```
    /// use cqlx_mock::{cql::CqlError, matcher::eq_against, Mock, Sessionx, SessionxMock};
    ///
    /// let session = SessionxMock::new();
    /// session
    ///     .on(SessionxMock::EXEC_STMT)
    ///     .with_args((eq_against("DROP TABLE t"),))
    ///     .then_return(Err(CqlError::msg("not allowed")));
    /// session.on(SessionxMock::EXEC_STMT).then_return(Ok(()));
    ///
    /// assert!(session.exec_stmt("DROP TABLE t").is_err());
    /// assert!(session.exec_stmt("TRUNCATE t").is_ok());
    /// ```
    fn on<I, O>(&self, method: Method<Self, I, O>) -> When<'_, Self, I, O>
    where
        I: fmt::Debug + Send + 'static,
        O: Send + 'static,
    {
        When::new(method, self.store())
    }

    /// Checks that every non-optional expectation was answered as
    /// many times as it was programmed for.
    fn verify(&self) -> Result<(), MockError> {
        self.store().verify()
    }

    /// Fails the test unless [`verify`](Mock::verify) succeeds.
    fn assert_expectations(&self) {
        if let Err(e) = self.verify() {
            error::fail(e)
        }
    }

    /// Returns whether any recorded call to `method` matches.
    fn called<I, O>(&self, method: Method<Self, I, O>, matcher: impl InvocationMatcher<I>) -> bool
    where
        I: 'static,
        O: 'static,
    {
        self.store().count_matching(method, &matcher) > 0
    }

    /// Fails the test unless a recorded call to `method` matches.
    fn assert_called<I, O>(&self, method: Method<Self, I, O>, matcher: impl InvocationMatcher<I>)
    where
        I: 'static,
        O: 'static,
    {
        if self.store().count_matching(method, &matcher) == 0 {
            error::fail(MockError::NotCalled {
                method: method.name(),
                expected: format!("({})", matcher.expectations().join(", ")),
                calls: self.store().recorded(method),
            })
        }
    }

    /// Fails the test if a recorded call to `method` matches.
    fn assert_not_called<I, O>(
        &self,
        method: Method<Self, I, O>,
        matcher: impl InvocationMatcher<I>,
    ) where
        I: 'static,
        O: 'static,
    {
        let count = self.store().count_matching(method, &matcher);
        if count > 0 {
            error::fail(MockError::UnexpectedlyCalled {
                method: method.name(),
                expected: format!("({})", matcher.expectations().join(", ")),
                count,
            })
        }
    }

    /// Number of recorded calls to `method`, regardless of arguments.
    fn number_of_calls<I, O>(&self, method: Method<Self, I, O>) -> usize {
        self.store().call_count(method)
    }

    /// Fails the test unless `method` was called exactly `expected`
    /// times.
    fn assert_number_of_calls<I, O>(&self, method: Method<Self, I, O>, expected: usize) {
        let actual = self.number_of_calls(method);
        if actual != expected {
            error::fail(MockError::CallCount {
                method: method.name(),
                expected,
                actual,
            })
        }
    }

    /// Arguments of every recorded call to `method`, oldest first.
    fn calls<I, O>(&self, method: Method<Self, I, O>) -> Vec<I>
    where
        I: Clone + 'static,
        O: 'static,
    {
        self.store().calls(method)
    }
}
