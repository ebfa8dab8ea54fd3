//! Email verification route handlers
//!
//! - `POST /api/v1/verification/request-code`
//! - `POST /api/v1/verification/confirm-code`

pub mod confirm_code;
pub mod request_code;

use std::sync::Arc;

use ev_core::services::verification::{Notifier, RecordStore, VerificationService};

pub use confirm_code::confirm_code;
pub use request_code::request_code;

/// Application state that holds shared services
pub struct AppState<S, N>
where
    S: RecordStore + ?Sized,
    N: Notifier + ?Sized,
{
    pub verification_service: Arc<VerificationService<S, N>>,
}

impl<S, N> AppState<S, N>
where
    S: RecordStore + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(verification_service: Arc<VerificationService<S, N>>) -> Self {
        Self {
            verification_service,
        }
    }
}
