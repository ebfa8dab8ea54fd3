//! Email delivery module
//!
//! Notifier implementations for sending verification codes:
//!
//! - **SendGrid**: production delivery through the SendGrid v3 mail API
//! - **Mock**: logs messages and records them for inspection in tests

pub mod mock_email;
pub mod sendgrid;

pub use mock_email::MockEmailService;
pub use sendgrid::{SendGridConfig, SendGridEmailService};

use std::sync::Arc;

use ev_core::services::verification::Notifier;
use ev_shared::{NotifierConfig, NotifierProvider};

use crate::InfrastructureError;

/// Create the notifier selected by configuration
pub fn create_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>, InfrastructureError> {
    match config.provider {
        NotifierProvider::Mock => {
            tracing::warn!("Using mock email service; verification emails are not delivered");
            Ok(Arc::new(MockEmailService::new()))
        }
        NotifierProvider::SendGrid => {
            let service = SendGridEmailService::new(SendGridConfig::from_notifier_config(config)?)?;
            Ok(Arc::new(service))
        }
    }
}
