use std::{collections::BTreeMap, time::Duration};

/// Request-scoped values handed to context-aware queries.
///
/// Carries an optional timeout and string key/value pairs. Two
/// contexts are equal when both carry the same timeout and values, so
/// a test can match the context a query was bound to.
///
/// ```
/// use cqlx_mock::cql::Context;
/// use std::time::Duration;
///
/// let ctx = Context::background()
///     .with_timeout(Duration::from_secs(5))
///     .with_value("request_id", "42");
///
/// assert_eq!(ctx.value("request_id"), Some("42"));
/// assert_eq!(ctx.timeout(), Some(Duration::from_secs(5)));
/// assert_ne!(ctx, Context::background());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    timeout: Option<Duration>,
    values: BTreeMap<String, String>,
}

impl Context {
    /// An empty context: no timeout, no values.
    pub fn background() -> Self {
        Context::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}
