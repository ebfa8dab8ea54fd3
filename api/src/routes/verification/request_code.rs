use actix_web::{web, HttpResponse};
use validator::Validate;

use ev_core::services::verification::{Notifier, RecordStore};
use ev_shared::email::mask_email;

use crate::dto::{RequestCodeRequest, SuccessResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/verification/request-code
///
/// Issues a fresh code for the address and emails it, replacing any code
/// still pending for that address.
///
/// # Request Body
///
/// ```json
/// { "email": "grace@example.com" }
/// ```
///
/// # Response
///
/// `200 OK` with `{ "success": true }`; failures use the standard error body.
pub async fn request_code<S, N>(
    state: web::Data<AppState<S, N>>,
    request: web::Json<RequestCodeRequest>,
) -> HttpResponse
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    tracing::debug!(email = %mask_email(&request.email), "Processing request-code");

    match state.verification_service.request_code(&request.email).await {
        Ok(_) => HttpResponse::Ok().json(SuccessResponse::ok()),
        Err(e) => handle_domain_error(e),
    }
}
