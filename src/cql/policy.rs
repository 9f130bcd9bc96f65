use std::{
    fmt,
    sync::Arc,
    time::{Duration, SystemTime},
};

use super::{Context, Value};

/// Receives the trace id of a traced query.
pub trait Tracer: fmt::Debug + Send + Sync {
    fn trace(&self, trace_id: &[u8]);
}

/// A query as seen by a [`QueryObserver`].
#[derive(Debug, Clone)]
pub struct ObservedQuery {
    pub keyspace: String,
    pub statement: String,
    pub start: SystemTime,
    pub end: SystemTime,
    pub rows: usize,
    pub attempt: usize,
}

/// Notified after each attempt of a query.
pub trait QueryObserver: fmt::Debug + Send + Sync {
    fn observe_query(&self, ctx: &Context, query: &ObservedQuery);
}

/// What to do with a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryType {
    Retry,
    RetryNextHost,
    Ignore,
    Rethrow,
}

/// Decides whether a failed query is retried.
pub trait RetryPolicy: fmt::Debug + Send + Sync {
    fn attempt(&self, attempts: usize) -> bool;
    fn retry_type(&self, error: &super::CqlError) -> RetryType;
}

/// Decides how many speculative executions are started, and when.
pub trait SpeculativeExecutionPolicy: fmt::Debug + Send + Sync {
    fn attempts(&self) -> usize;
    fn delay(&self) -> Duration;
}

/// Rewrites a bound value by column name before it is sent.
///
/// Cloning shares the closure. Two transformers are equal only when
/// they share the same closure.
///
/// ```
/// use cqlx_mock::cql::{Transformer, Value};
///
/// let upper = Transformer::new(|_, value| match value {
///     Value::Text(text) => Value::Text(text.to_uppercase()),
///     other => other,
/// });
///
/// assert_eq!(upper.apply("name", Value::from("potato")), Value::from("POTATO"));
/// assert_eq!(upper, upper.clone());
/// assert_ne!(upper, Transformer::new(|_, value| value));
/// ```
#[derive(Clone)]
pub struct Transformer(Arc<dyn Fn(&str, Value) -> Value + Send + Sync>);

impl Transformer {
    pub fn new(transform: impl Fn(&str, Value) -> Value + Send + Sync + 'static) -> Self {
        Transformer(Arc::new(transform))
    }

    pub fn apply(&self, name: &str, value: Value) -> Value {
        (self.0)(name, value)
    }
}

impl PartialEq for Transformer {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const u8,
            Arc::as_ptr(&other.0) as *const u8,
        )
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transformer({:p})", Arc::as_ptr(&self.0) as *const u8)
    }
}
