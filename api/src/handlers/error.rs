//! Conversion of domain and request failures into HTTP error responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use std::collections::HashMap;
use validator::ValidationErrors;

use ev_core::errors::{DomainError, Remedy};
use ev_shared::{error_codes, ErrorResponse};

/// HTTP status for each domain failure
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::InvalidArgument { .. } | DomainError::CodeMismatch => StatusCode::BAD_REQUEST,
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Expired => StatusCode::GONE,
        DomainError::NotificationFailed { .. } => StatusCode::BAD_GATEWAY,
        DomainError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Client-facing message; system failures do not expose their cause
fn public_message(error: &DomainError) -> String {
    match error {
        DomainError::InvalidArgument { message } => message.clone(),
        DomainError::NotificationFailed { .. } => {
            "Verification email could not be sent. Please try again later".to_string()
        }
        DomainError::StoreUnavailable { .. } => {
            "Verification service is temporarily unavailable. Please try again later".to_string()
        }
        other => other.to_string(),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let status = status_for(&error);

    if status.is_server_error() {
        tracing::error!(error = %error, code = error.code(), "Verification request failed");
    } else {
        tracing::debug!(error = %error, code = error.code(), "Verification request rejected");
    }

    let body = ErrorResponse::new(error.code(), public_message(&error))
        .with_remedy(error.remedy().as_str());

    HttpResponse::build(status).json(body)
}

/// Handle request body validation failures
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();

    for (field, errors) in errors.field_errors() {
        let messages = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        field_errors.insert(field.to_string(), messages);
    }

    tracing::debug!(fields = ?field_errors.keys().collect::<Vec<_>>(), "Request validation failed");

    let body = ErrorResponse::new(error_codes::INVALID_ARGUMENT, "Invalid request data")
        .with_remedy(Remedy::FixRequest.as_str())
        .add_detail("fields", field_errors);

    HttpResponse::BadRequest().json(body)
}

/// Error handler for malformed or oversized JSON bodies
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected JSON payload");

    let message = match &err {
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large".to_string()
        }
        other => format!("Invalid request body: {}", other),
    };

    let response = HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::INVALID_ARGUMENT, message)
            .with_remedy(Remedy::FixRequest.as_str()),
    );

    actix_web::error::InternalError::from_response(err, response).into()
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
