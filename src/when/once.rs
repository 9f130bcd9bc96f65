use std::fmt;

use crate::{
    matcher::InvocationMatcher,
    mock::{Answer, Chain, Fill, Method, Store, Stub, Times},
};

/// Similar to [`When`](crate::When), but only answers once.
///
/// Answers do not need to be cloneable. Closures may consume captured
/// variables.
pub struct Once<'m, R, I, O> {
    method: Method<R, I, O>,
    store: &'m Store,
    matcher: Box<dyn InvocationMatcher<I> + Send>,
    fill: Option<Fill<I>>,
    optional: bool,
}

impl<'m, R, I, O> Once<'m, R, I, O>
where
    I: fmt::Debug + Send + 'static,
    O: Send + 'static,
{
    pub(crate) fn new(
        method: Method<R, I, O>,
        store: &'m Store,
        matcher: Box<dyn InvocationMatcher<I> + Send>,
        fill: Option<Fill<I>>,
        optional: bool,
    ) -> Self {
        Once {
            method,
            store,
            matcher,
            fill,
            optional,
        }
    }

    /// Analog of [`When::then_return`](crate::When::then_return)
    /// where the value does not need to be cloneable.
    ///
    /// ```
    /// use cqlx_mock::{IterxMock, Mock, Queryx, QueryxMock};
    /// use std::sync::Arc;
    ///
    /// let query = QueryxMock::new();
    /// let iter = Arc::new(IterxMock::new());
    /// query.on(QueryxMock::ITER).once().then_return(iter.clone());
    ///
    /// assert!(std::ptr::eq(
    ///     Arc::as_ptr(&query.iter()) as *const u8,
    ///     Arc::as_ptr(&iter) as *const u8,
    /// ));
    /// ```
    pub fn then_return(self, value: O) {
        self.then(move |_: I| value)
    }

    /// Analog of [`When::then`](crate::When::then) where the closure
    /// may consume captured variables.
    pub fn then(self, stub: impl FnOnce(I) -> O + Send + 'static) {
        self.add(Answer::Once(Box::new(stub)))
    }

    /// Makes a chainable method return the mock it was called on,
    /// once.
    pub fn then_return_self(self)
    where
        R: Chain<O>,
    {
        self.add(Answer::Receiver { times: Times::ONCE })
    }

    fn add(self, answer: Answer<I, O>) {
        let stub = Stub::new(answer, self.matcher, self.fill, self.optional);
        self.store.add_stub(self.method, stub);
    }
}
