//! Call-recording test doubles for a CQL session, query and iterator
//! API.
//!
//! The crate exposes three traits, [`Sessionx`], [`Queryx`] and
//! [`Iterx`], that code under test depends on instead of a concrete
//! database client, and one mock per trait. Each mock is programmed
//! through [`Mock::on`], answers calls from its registered
//! expectations and records every call so the test can assert on it
//! afterwards.
//!
//! # Usage
//!
//! ```
//! use cqlx_mock::{
//!     cql::{Context, CqlError},
//!     matcher::{eq, eq_against},
//!     Mock, Queryx, QueryxMock, Sessionx, SessionxMock,
//! };
//! use std::sync::Arc;
//!
//! // code under test
//! fn delete_user(session: &dyn Sessionx, ctx: &Context, id: i64) -> Result<(), CqlError> {
//!     let names = vec!["id".to_string()];
//!     session
//!         .query("DELETE FROM users WHERE id = ?", &names)
//!         .with_context(ctx.clone())
//!         .bind(vec![id.into()])
//!         .exec_release()
//! }
//!
//! let query = Arc::new(QueryxMock::new());
//! query.on(QueryxMock::WITH_CONTEXT).then_return_self();
//! query.on(QueryxMock::BIND).then_return_self();
//! query
//!     .on(QueryxMock::EXEC_RELEASE)
//!     .once()
//!     .then_return(Err(CqlError::Timeout));
//!
//! let session = SessionxMock::new();
//! session
//!     .on(SessionxMock::QUERY)
//!     .with_args((eq_against("DELETE FROM users WHERE id = ?"), eq(vec!["id".to_string()])))
//!     .then_return(query.clone());
//!
//! let result = delete_user(&session, &Context::background(), 7);
//!
//! assert_eq!(result, Err(CqlError::Timeout));
//! session.assert_expectations();
//! query.assert_expectations();
//! ```
//!
//! # Chaining
//!
//! Configuration and binding methods of [`Queryx`] and [`Iterx`]
//! take `self: Arc<Self>` and return the trait object. Program them
//! with [`then_return_self`](When::then_return_self) to hand back the
//! very same mock so the chain keeps going.
//!
//! # Failures
//!
//! A call that no expectation accepts, an expectation used more times
//! than allowed, and a failed `assert_*` helper all panic with a
//! [`MockError`] message prefixed by `cqlx_mock:`. Errors the mocked
//! methods were told to return are [`cql::CqlError`]s and never
//! panic.
//!
//! # Logging
//!
//! Registrations are logged at `debug` level, every mocked call at
//! `trace` level and harness failures at `error` level through
//! [`tracing`](https://docs.rs/tracing).

#[macro_use]
mod macros;

pub mod cql;
mod error;
mod iterx;
pub mod matcher;
mod mock;
mod queryx;
mod sessionx;
mod when;

pub use crate::{
    error::MockError,
    iterx::{Iterx, IterxMock},
    mock::{Chain, Method, Mock, Store},
    queryx::{Queryx, QueryxMock},
    sessionx::{Sessionx, SessionxMock},
    when::{Once, When},
};
