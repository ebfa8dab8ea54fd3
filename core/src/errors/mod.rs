//! Domain-specific error types and error handling.

mod types;

pub use types::{ErrorKind, Remedy};

use ev_shared::error_codes;
use thiserror::Error;

/// Failures of the verification operations, one variant per error kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("No pending verification code for this email")]
    NotFound,

    #[error("Verification code has expired")]
    Expired,

    #[error("Verification code does not match")]
    CodeMismatch,

    #[error("Failed to send verification email: {message}")]
    NotificationFailed { message: String },

    #[error("Verification store unavailable: {message}")]
    StoreUnavailable { message: String },
}

impl DomainError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        DomainError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        DomainError::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn notification_failed(message: impl Into<String>) -> Self {
        DomainError::NotificationFailed {
            message: message.into(),
        }
    }

    /// The error kind, without payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            DomainError::NotFound => ErrorKind::NotFound,
            DomainError::Expired => ErrorKind::Expired,
            DomainError::CodeMismatch => ErrorKind::CodeMismatch,
            DomainError::NotificationFailed { .. } => ErrorKind::NotificationFailed,
            DomainError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
        }
    }

    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidArgument => error_codes::INVALID_ARGUMENT,
            ErrorKind::NotFound => error_codes::NOT_FOUND,
            ErrorKind::Expired => error_codes::CODE_EXPIRED,
            ErrorKind::CodeMismatch => error_codes::CODE_MISMATCH,
            ErrorKind::NotificationFailed => error_codes::NOTIFICATION_FAILED,
            ErrorKind::StoreUnavailable => error_codes::STORE_UNAVAILABLE,
        }
    }

    /// What the caller should do next
    pub fn remedy(&self) -> Remedy {
        match self.kind() {
            ErrorKind::CodeMismatch => Remedy::RetryCode,
            ErrorKind::NotFound | ErrorKind::Expired => Remedy::RequestNewCode,
            ErrorKind::InvalidArgument => Remedy::FixRequest,
            ErrorKind::NotificationFailed | ErrorKind::StoreUnavailable => Remedy::RetryLater,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
