//! SendGrid email service implementation
//!
//! Sends verification emails through the SendGrid v3 `mail/send` endpoint.
//! Delivery is attempted once; a failed send is reported to the caller and
//! never retried here, so a user does not receive duplicate codes.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

use ev_core::services::verification::{EmailMessage, Notifier};
use ev_shared::email::mask_email;
use ev_shared::NotifierConfig;

use crate::InfrastructureError;

/// SendGrid service configuration
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// API key (sent as a bearer token)
    pub api_key: String,
    /// Sender address
    pub from_address: String,
    /// API base URL, without trailing slash
    pub api_base_url: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl SendGridConfig {
    /// Build from the notifier section of the application configuration
    pub fn from_notifier_config(config: &NotifierConfig) -> Result<Self, InfrastructureError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| InfrastructureError::Config("NOTIFIER_API_KEY not set".to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            from_address: config.from_address.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: config.request_timeout_secs,
        })
    }

    fn send_url(&self) -> String {
        format!("{}/v3/mail/send", self.api_base_url)
    }
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SendMailBody<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

impl<'a> SendMailBody<'a> {
    fn new(from: &'a str, message: &'a EmailMessage) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address { email: &message.to }],
            }],
            from: Address { email: from },
            subject: &message.subject,
            content: vec![
                Content {
                    content_type: "text/plain",
                    value: &message.text_body,
                },
                Content {
                    content_type: "text/html",
                    value: &message.html_body,
                },
            ],
        }
    }
}

/// SendGrid notifier
pub struct SendGridEmailService {
    client: Client,
    config: SendGridConfig,
}

impl SendGridEmailService {
    /// Create a new SendGrid email service
    pub fn new(config: SendGridConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "SendGrid email service initialized with sender: {}",
            mask_email(&config.from_address)
        );

        Ok(Self { client, config })
    }

    /// Send one message; returns the SendGrid message id
    pub async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        let masked = mask_email(&message.to);
        debug!(email = %masked, "Sending verification email via SendGrid");

        let response = self
            .client
            .post(self.config.send_url())
            .bearer_auth(&self.config.api_key)
            .json(&SendMailBody::new(&self.config.from_address, message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                email = %masked,
                status = status.as_u16(),
                "SendGrid rejected verification email"
            );
            return Err(InfrastructureError::Email(format!(
                "SendGrid send failed (status={}): {}",
                status.as_u16(),
                body
            )));
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        info!(
            provider = "sendgrid",
            email = %masked,
            message_id = %message_id,
            "Verification email accepted by SendGrid"
        );

        Ok(message_id)
    }
}

#[async_trait]
impl Notifier for SendGridEmailService {
    async fn send(&self, message: &EmailMessage) -> Result<String, String> {
        self.send_email(message).await.map_err(|e| e.to_string())
    }
}
