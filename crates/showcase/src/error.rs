use std::fmt;

use crate::status::StatusSpec;

/// Main error type for Showcase service operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowcaseError {
    RetryNotFound {
        id: String,
    },
    /// Every status bound to the retry id has already been replayed.
    RetryExhausted {
        id: String,
        attempts: usize,
    },
    OperationNotFound {
        name: String,
    },
    InvalidPageToken {
        token: String,
        reason: String,
    },
    InvalidArgument {
        field: String,
        reason: String,
    },
    /// A status supplied by the caller and returned verbatim as the outcome.
    Configured(StatusSpec),
}

impl fmt::Display for ShowcaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowcaseError::RetryNotFound { id } => {
                write!(f, "Retry id '{id}' not found")
            }
            ShowcaseError::RetryExhausted { id, attempts } => {
                write!(
                    f,
                    "Retry id '{id}' has no responses left after {attempts} attempts"
                )
            }
            ShowcaseError::OperationNotFound { name } => {
                write!(f, "Operation '{name}' not found")
            }
            ShowcaseError::InvalidPageToken { token, reason } => {
                write!(f, "Invalid page token '{token}': {reason}")
            }
            ShowcaseError::InvalidArgument { field, reason } => {
                write!(f, "Invalid argument '{field}': {reason}")
            }
            ShowcaseError::Configured(status) => f.write_str(&status.message),
        }
    }
}

impl std::error::Error for ShowcaseError {}

impl ShowcaseError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ShowcaseError::RetryNotFound { .. } | ShowcaseError::OperationNotFound { .. }
        )
    }

    /// True for errors caused by the request itself rather than a configured outcome.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShowcaseError::RetryNotFound { .. }
                | ShowcaseError::RetryExhausted { .. }
                | ShowcaseError::OperationNotFound { .. }
                | ShowcaseError::InvalidPageToken { .. }
                | ShowcaseError::InvalidArgument { .. }
        )
    }

    pub fn invalid_argument(field: &str, reason: impl fmt::Display) -> Self {
        ShowcaseError::InvalidArgument {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
