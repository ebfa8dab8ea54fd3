use actix_web::{web, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use ev_api::app::create_app;
use ev_api::routes::verification::AppState;
use ev_api::telemetry::init_tracing;
use ev_core::services::verification::{VerificationService, VerificationServiceConfig};
use ev_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment file, config file, then environment overrides
    let config = AppConfig::load()?;

    init_tracing(&config.logging)?;

    info!(
        environment = %config.environment,
        "Starting email verification API server"
    );

    let infra = ev_infra::initialize(&config).await?;

    let verification_service = Arc::new(VerificationService::new(
        infra.record_store.clone(),
        infra.notifier.clone(),
        VerificationServiceConfig::from_app_config(&config),
    ));
    let app_state = web::Data::new(AppState::new(verification_service));

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(app_state.clone(), &app_config))
        .keep_alive(Duration::from_secs(config.server.keep_alive));

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    info!("Server stopped");
    Ok(())
}
