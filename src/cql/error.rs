use thiserror::Error;

/// Error returned by the query-binding API.
///
/// Mocks hand these back verbatim to simulate database failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CqlError {
    #[error("not found")]
    NotFound,

    #[error("request timed out")]
    Timeout,

    #[error("no connections were made when creating the session")]
    NoConnections,

    #[error("request failed with code {code:#06x}: {message}")]
    Request { code: i32, message: String },

    #[error("{0}")]
    Message(String),
}

impl CqlError {
    /// A free-form error, e.g., `CqlError::msg("queryx_error")`.
    pub fn msg(message: impl Into<String>) -> Self {
        CqlError::Message(message.into())
    }
}

/// Outcome of a conditional (lightweight transaction) statement.
///
/// The `applied` flag and the error are independent: a mock may be
/// programmed with both, and the caller can observe both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasOutcome {
    pub applied: bool,
    pub result: Result<(), CqlError>,
}

impl CasOutcome {
    pub fn new(applied: bool, result: Result<(), CqlError>) -> Self {
        CasOutcome { applied, result }
    }

    /// The statement ran and its condition held.
    pub fn applied() -> Self {
        CasOutcome::new(true, Ok(()))
    }

    /// The statement ran and its condition did not hold.
    pub fn not_applied() -> Self {
        CasOutcome::new(false, Ok(()))
    }

    /// Collapses the outcome, favouring the error.
    pub fn into_result(self) -> Result<bool, CqlError> {
        self.result.map(|()| self.applied)
    }
}
