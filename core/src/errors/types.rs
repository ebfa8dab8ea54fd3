//! Error classification types

use serde::Serialize;

/// Payload-free error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Expired,
    CodeMismatch,
    NotificationFailed,
    StoreUnavailable,
}

/// Suggested caller reaction to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Remedy {
    /// Try a different code for the same pending record
    RetryCode,
    /// The pending code is gone; request a new one
    RequestNewCode,
    /// The input itself is malformed
    FixRequest,
    /// A system problem; retry the operation later
    RetryLater,
}

impl Remedy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Remedy::RetryCode => "retry_code",
            Remedy::RequestNewCode => "request_new_code",
            Remedy::FixRequest => "fix_request",
            Remedy::RetryLater => "retry_later",
        }
    }
}

impl std::fmt::Display for Remedy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
