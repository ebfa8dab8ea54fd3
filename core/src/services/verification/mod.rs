//! Verification service module for email-based code verification
//!
//! This module provides the verification code lifecycle:
//! - Code generation and issuance by email
//! - Single-use confirmation with lazy expiry
//! - A code store over an abstract key-value record store
//! - An optional background sweeper for stores without native expiry

mod code_store;
mod config;
mod message;
mod service;
mod sweeper;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use code_store::{CodeStore, StoredRecord};
pub use config::VerificationServiceConfig;
pub use message::{compose_message, format_ttl};
pub use service::VerificationService;
pub use sweeper::{ExpiredRecordSweeper, SweepResult};
pub use traits::{EmailMessage, Notifier, RecordStore};
pub use types::CodeIssued;
