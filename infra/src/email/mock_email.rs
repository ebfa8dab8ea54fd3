//! Mock email service
//!
//! Logs verification emails instead of sending them and keeps a copy of
//! every message for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use ev_core::services::verification::{EmailMessage, Notifier};
use ev_shared::email::mask_email;

/// Mock notifier for development and testing
#[derive(Clone, Default)]
pub struct MockEmailService {
    /// Messages sent so far
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    /// Whether to simulate failures
    simulate_failure: Arc<AtomicBool>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that fails every send
    pub fn failing() -> Self {
        let service = Self::default();
        service.set_simulate_failure(true);
        service
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Total number of messages sent
    pub fn message_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }

    /// Most recent message addressed to `to`
    pub fn last_message_to(&self, to: &str) -> Option<EmailMessage> {
        let sent = self.sent.lock().ok()?;
        sent.iter().rev().find(|m| m.to == to).cloned()
    }

    /// Code from the most recent message addressed to `to`
    pub fn last_code_to(&self, to: &str) -> Option<String> {
        let message = self.last_message_to(to)?;
        let code: String = message
            .text_body
            .split("code is ")
            .nth(1)?
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        Some(code)
    }
}

#[async_trait]
impl Notifier for MockEmailService {
    async fn send(&self, message: &EmailMessage) -> Result<String, String> {
        let masked = mask_email(&message.to);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(provider = "mock", email = %masked, "Mock email service simulating failure");
            return Err("Simulated email sending failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        self.sent
            .lock()
            .map_err(|_| "Mock email outbox poisoned".to_string())?
            .push(message.clone());

        info!(
            target: "email_service",
            provider = "mock",
            email = %masked,
            message_id = %message_id,
            subject = %message.subject,
            "Mock verification email recorded"
        );

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Your Budget Buddy verification code".to_string(),
            text_body: "Your verification code is 004213. It expires in 10 minutes.".to_string(),
            html_body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_records_messages() {
        let service = MockEmailService::new();
        let id = service.send(&message("erin@example.com")).await.unwrap();

        assert!(id.starts_with("mock_"));
        assert_eq!(service.message_count(), 1);
        assert_eq!(service.last_code_to("erin@example.com").as_deref(), Some("004213"));
        assert!(service.last_message_to("frank@example.com").is_none());
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let service = MockEmailService::failing();
        assert!(service.send(&message("erin@example.com")).await.is_err());
        assert_eq!(service.message_count(), 0);

        service.set_simulate_failure(false);
        assert!(service.send(&message("erin@example.com")).await.is_ok());
    }
}
