//! Types of the CQL query-binding API that the mocked traits take
//! and return.
//!
//! None of them talks to a database: they exist so that the mocked
//! method signatures can be expressed, and so arguments can be
//! recorded and matched.

mod consistency;
mod context;
mod error;
mod policy;
mod value;

pub use consistency::{Consistency, SerialConsistency};
pub use context::Context;
pub use error::{CasOutcome, CqlError};
pub use policy::{
    ObservedQuery, QueryObserver, RetryPolicy, RetryType, SpeculativeExecutionPolicy, Tracer,
    Transformer,
};
pub use value::{Row, Value, ValueMap};

use std::any::Any;

/// Gives access to the concrete type behind a trait object so a test
/// can get its mock back from a `dyn Sessionx`, `dyn Queryx` or
/// `dyn Iterx`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
