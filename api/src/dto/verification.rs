use serde::{Deserialize, Serialize};
use validator::Validate;

/// Longest address accepted by SMTP (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: u64 = 254;

/// Upper bound on submitted codes; anything longer cannot match
pub const MAX_CODE_LENGTH: u64 = 64;

/// Request to issue a verification code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RequestCodeRequest {
    /// Address to send the code to
    #[validate(length(max = "MAX_EMAIL_LENGTH", message = "Email must be at most 254 characters"))]
    pub email: String,
}

/// Request to confirm a previously issued code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmCodeRequest {
    #[validate(length(max = "MAX_EMAIL_LENGTH", message = "Email must be at most 254 characters"))]
    pub email: String,

    /// Code as typed by the user
    #[validate(length(max = "MAX_CODE_LENGTH", message = "Code must be at most 64 characters"))]
    pub code: String,
}

/// Body of a successful request-code or confirm-code call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
