//! # Email Verification Core
//!
//! Core business logic for the email verification service.
//! This crate contains the verification record entity, the error taxonomy,
//! the collaborator traits (record store, notifier), the code store and the
//! verification service that issues and confirms codes.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
