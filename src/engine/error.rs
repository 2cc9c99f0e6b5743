//! Error types for engine operations.

use thiserror::Error;

use crate::backing::RemoteError;
use crate::operation::OperationKind;
use crate::validation::Violation;

/// Errors returned by orchestrated operations.
///
/// `Validation`, `InvariantViolation` and `Busy` are raised before any
/// backing-store call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A field value failed validation.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The backing store rejected the call.
    #[error("{0}")]
    Remote(String),

    /// The action would break a settings invariant.
    #[error("{0}")]
    InvariantViolation(String),

    /// Another orchestrated operation has not settled yet.
    #[error("Operation '{operation}' is still in progress")]
    Busy { operation: OperationKind },
}

impl EngineError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Stable error type string for UI banners and logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            EngineError::Validation { .. } => "validation_error",
            EngineError::Remote(_) => "remote_operation_error",
            EngineError::InvariantViolation(_) => "invariant_violation",
            EngineError::Busy { .. } => "busy",
        }
    }

    /// True when the error was raised without contacting the backing store.
    pub fn is_local(&self) -> bool {
        !matches!(self, EngineError::Remote(_))
    }
}

impl From<Violation> for EngineError {
    fn from(violation: Violation) -> Self {
        EngineError::Validation {
            field: violation.field.to_string(),
            message: violation.message,
        }
    }
}

impl From<RemoteError> for EngineError {
    fn from(err: RemoteError) -> Self {
        EngineError::Remote(err.message().to_string())
    }
}
