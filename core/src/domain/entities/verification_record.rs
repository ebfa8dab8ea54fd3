//! Verification record entity for email-based verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default validity window for verification codes (10 minutes)
pub const DEFAULT_TTL_MINUTES: i64 = 10;

/// A pending verification code for one email address.
///
/// At most one record exists per normalized email; issuing a new code
/// replaces the previous record. The serialized form is the stored document:
/// `{ "email", "code", "createdAt", "expiresAt" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    /// Normalized (trimmed, lower-cased) email address
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Issues a record with a freshly generated code
    ///
    /// # Arguments
    ///
    /// * `email` - Normalized email address
    /// * `now` - Issuance time
    /// * `ttl` - Validity window
    pub fn issue(email: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self::with_code(email, Self::generate_code(), now, ttl)
    }

    /// Builds a record around a known code
    pub fn with_code(email: String, code: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            email,
            code,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Generates a 6-digit code from the operating system CSPRNG.
    ///
    /// Each digit is drawn independently and uniformly from 0-9; leading
    /// zeros are kept.
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        (0..CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Whether the record is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Compares a submitted code in constant time
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }
}
