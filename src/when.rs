mod once;

pub use once::Once;

use std::{fmt, num::NonZeroUsize};

use crate::{
    error::{self, MockError},
    matcher::{AnyInvocation, InvocationMatcher},
    mock::{Answer, Chain, Fill, Method, Store, Stub, Times},
};

/// Provides methods to program the answer of a mocked method.
///
/// Created using [`Mock::on`](crate::Mock::on).
///
/// By default, an expectation accepts any arguments and answers every
/// call. See [`with_args`](When::with_args), [`times`](When::times)
/// and [`once`](When::once) to narrow it down.
///
/// Expectations are tried in the order they were registered; the
/// first one that matches and is not used up answers the call.
pub struct When<'m, R, I, O> {
    method: Method<R, I, O>,
    store: &'m Store,
    matcher: Box<dyn InvocationMatcher<I> + Send>,
    fill: Option<Fill<I>>,
    times: Times,
    optional: bool,
}

impl<'m, R, I, O> When<'m, R, I, O>
where
    I: fmt::Debug + Send + 'static,
    O: Send + 'static,
{
    #[doc(hidden)]
    pub fn new(method: Method<R, I, O>, store: &'m Store) -> Self {
        When {
            method,
            store,
            matcher: Box::new(AnyInvocation),
            fill: None,
            times: Times::Always,
            optional: false,
        }
    }

    /// Only answers calls whose arguments match.
    ///
    /// The matcher is a tuple with one
    /// [`ArgMatcher`](crate::matcher::ArgMatcher) per argument.
    ///
    /// # Usage
    ///
    /// ```
    /// use cqlx_mock::{matcher::eq, Mock, Queryx, QueryxMock};
    /// use std::sync::Arc;
    ///
    /// let query = Arc::new(QueryxMock::new());
    /// query
    ///     .on(QueryxMock::PAGE_SIZE)
    ///     .with_args((eq(100_i32),))
    ///     .then_return_self();
    ///
    /// let paged = query.clone().page_size(100);
    /// let paged = paged.downcast_ref::<QueryxMock>().unwrap();
    /// assert!(std::ptr::eq(paged, &*query));
    /// ```
    ///
    /// # Panics
    ///
    /// Calls that no expectation accepts fail the test.
    ///
    /// ```should_panic
    /// use cqlx_mock::{matcher::eq, Mock, Queryx, QueryxMock};
    /// use std::sync::Arc;
    ///
    /// let query = Arc::new(QueryxMock::new());
    /// query.on(QueryxMock::PAGE_SIZE).with_args((eq(100_i32),)).then_return_self();
    ///
    /// query.page_size(5000);
    /// ```
    pub fn with_args(mut self, matcher: impl InvocationMatcher<I> + Send + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Limits the number of calls the expectation answers.
    ///
    /// Calls past the limit fall through to expectations registered
    /// after this one, failing the test if there are none.
    /// [`assert_expectations`](crate::Mock::assert_expectations)
    /// requires all `times` calls to happen.
    ///
    /// # Panics
    ///
    /// Panics if `times` is zero. Use
    /// [`assert_not_called`](crate::Mock::assert_not_called) to check
    /// a method was never invoked.
    pub fn times(mut self, times: usize) -> Self {
        match NonZeroUsize::new(times) {
            Some(times) => self.times = Times::Times(times),
            None => error::fail(MockError::ZeroTimes {
                method: self.method.name(),
            }),
        }
        self
    }

    /// Writes into the `&mut` destinations of the mocked method before
    /// it returns.
    ///
    /// `fill` receives the tuple of arguments, where each destination
    /// holds its content at call time. Whatever `fill` leaves in it is
    /// copied back to the caller. Recorded calls keep the content from
    /// before the fill.
    ///
    /// ```
    /// use cqlx_mock::{cql::{Row, Value}, Iterx, IterxMock, Mock};
    ///
    /// let iter = IterxMock::new();
    /// iter.on(IterxMock::GET)
    ///     .fill(|(row,)| row.set("name", "russet"))
    ///     .then_return(Ok(()));
    ///
    /// let mut row = Row::new();
    /// iter.get(&mut row).unwrap();
    /// assert_eq!(row.get("name"), Some(&Value::from("russet")));
    /// ```
    pub fn fill(mut self, fill: impl FnMut(&mut I) + Send + 'static) -> Self {
        self.fill = Some(Box::new(fill));
        self
    }

    /// Marks the expectation as optional: it does not need to be
    /// called for [`verify`](crate::Mock::verify) to succeed.
    pub fn maybe(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Limits the expectation to one call, allowing answers that are
    /// not cloneable and closures that consume captured variables.
    pub fn once(self) -> Once<'m, R, I, O> {
        Once::new(self.method, self.store, self.matcher, self.fill, self.optional)
    }

    /// Sets the value returned by the mocked method.
    ///
    /// ```
    /// use cqlx_mock::{cql::{CasOutcome, CqlError}, Mock, Queryx, QueryxMock};
    ///
    /// let query = QueryxMock::new();
    /// query
    ///     .on(QueryxMock::EXEC_CAS)
    ///     .then_return(CasOutcome::new(true, Err(CqlError::msg("queryx_error"))));
    ///
    /// let outcome = query.exec_cas();
    /// assert!(outcome.applied);
    /// assert_eq!(outcome.result, Err(CqlError::msg("queryx_error")));
    /// ```
    pub fn then_return(self, value: O)
    where
        O: Clone,
    {
        self.then(move |_: I| value.clone())
    }

    /// Sets the closure called when the mocked method is invoked.
    ///
    /// The input of the closure is the tuple of recorded arguments.
    /// The closure runs while the method is locked: it must not call
    /// back into the same method of the same mock.
    ///
    /// ```
    /// use cqlx_mock::{cql::CqlError, Mock, Sessionx, SessionxMock};
    ///
    /// let session = SessionxMock::new();
    /// session.on(SessionxMock::EXEC_STMT).then(|(stmt,)| {
    ///     if stmt.starts_with("DROP") {
    ///         Err(CqlError::msg("not allowed"))
    ///     } else {
    ///         Ok(())
    ///     }
    /// });
    ///
    /// assert!(session.exec_stmt("CREATE TABLE t (id int PRIMARY KEY)").is_ok());
    /// assert!(session.exec_stmt("DROP TABLE t").is_err());
    /// ```
    pub fn then(self, stub: impl FnMut(I) -> O + Send + 'static) {
        let answer = Answer::Many {
            stub: Box::new(stub),
            times: self.times,
        };
        let stub = Stub::new(answer, self.matcher, self.fill, self.optional);
        self.store.add_stub(self.method, stub);
    }

    /// Makes a chainable method return the mock it was called on.
    pub fn then_return_self(self)
    where
        R: Chain<O>,
    {
        let answer = Answer::Receiver { times: self.times };
        let stub = Stub::new(answer, self.matcher, self.fill, self.optional);
        self.store.add_stub(self.method, stub);
    }
}
