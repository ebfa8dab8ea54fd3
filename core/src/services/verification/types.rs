//! Types for verification service results

use chrono::{DateTime, Utc};

/// Result of issuing a verification code. Never carries the code itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeIssued {
    /// Normalized email the code was sent to
    pub email: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Message id reported by the email provider
    pub message_id: String,
}
