use thiserror::Error;

/// A defect in the test itself, as opposed to a simulated domain
/// error returned by a mocked method.
///
/// Mocked methods and the `assert_*` helpers of [`Mock`] panic with
/// the message of this error so the enclosing test fails.
/// [`Store::try_call`] and [`Mock::verify`] return it as a value
/// instead.
///
/// [`Mock`]: crate::Mock
/// [`Mock::verify`]: crate::Mock::verify
/// [`Store::try_call`]: crate::Store::try_call
#[derive(Debug, Error)]
pub enum MockError {
    #[error("`{method}` was called with {args} but it has no expectations")]
    Unregistered { method: &'static str, args: String },

    #[error("`{method}` was called with {args} but no expectation matched:\n{report}")]
    Unmatched {
        method: &'static str,
        args: String,
        report: String,
    },

    #[error("`{method}` was called with {args} more times than expected")]
    Exhausted { method: &'static str, args: String },

    #[error("`{method}` was told to return its receiver but it was invoked without one")]
    NoReceiver { method: &'static str },

    #[error("`{method}` was registered with different argument or return types")]
    TypeMismatch { method: &'static str },

    #[error("`{method}` cannot be limited to zero calls, check it with `assert_not_called` instead")]
    ZeroTimes { method: &'static str },

    #[error("unsatisfied expectations:\n{}", .0.join("\n"))]
    Unsatisfied(Vec<String>),

    #[error("expected `{method}` to be called with {expected} but recorded calls were: [{calls}]")]
    NotCalled {
        method: &'static str,
        expected: String,
        calls: String,
    },

    #[error("expected `{method}` not to be called with {expected} but it was called {count} time(s)")]
    UnexpectedlyCalled {
        method: &'static str,
        expected: String,
        count: usize,
    },

    #[error("expected `{method}` to be called {expected} time(s) but it was called {actual} time(s)")]
    CallCount {
        method: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Fails the running test.
pub(crate) fn fail(error: MockError) -> ! {
    tracing::error!(%error, "mock expectation failed");
    panic!("cqlx_mock: {}", error)
}
