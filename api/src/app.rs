//! Application factory
//!
//! Builds the Actix-web application around an [`AppState`] so the binary
//! and the route tests share one routing table.

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use ev_core::services::verification::{Notifier, RecordStore};
use ev_shared::AppConfig;

use crate::handlers::{json_error_handler, not_found};
use crate::middleware::create_cors;
use crate::routes::verification::{confirm_code, request_code, AppState};

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "email-verification-api";

/// Create and configure the application with all dependencies
pub fn create_app<S, N>(
    app_state: web::Data<AppState<S, N>>,
    config: &AppConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: RecordStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Middleware runs outermost-last: tracing wraps CORS
        .wrap(create_cors(&config.cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/verification")
                    .route("/request-code", web::post().to(request_code::<S, N>))
                    .route("/confirm-code", web::post().to(confirm_code::<S, N>)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
