use actix_web::{web, HttpResponse};
use validator::Validate;

use ev_core::services::verification::{Notifier, RecordStore};
use ev_shared::email::mask_email;

use crate::dto::{ConfirmCodeRequest, SuccessResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/verification/confirm-code
///
/// Consumes the pending code for the address when it matches and has not
/// expired.
///
/// # Request Body
///
/// ```json
/// { "email": "grace@example.com", "code": "042917" }
/// ```
///
/// # Errors
///
/// - `400 CODE_MISMATCH` - wrong code, the pending code stays valid
/// - `404 NOT_FOUND` - nothing pending (never issued or already used)
/// - `410 CODE_EXPIRED` - the pending code is past its expiry
pub async fn confirm_code<S, N>(
    state: web::Data<AppState<S, N>>,
    request: web::Json<ConfirmCodeRequest>,
) -> HttpResponse
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    tracing::debug!(email = %mask_email(&request.email), "Processing confirm-code");

    match state
        .verification_service
        .confirm_code(&request.email, &request.code)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse::ok()),
        Err(e) => handle_domain_error(e),
    }
}
