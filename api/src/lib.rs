//! HTTP surface of the email verification service
//!
//! Exposes the request-code and confirm-code operations as JSON endpoints
//! and maps domain failures to status codes.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
