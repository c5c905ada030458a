//! Google Meet OAuth broker: links application users to their Google account and
//! creates Meet-backed calendar events on their behalf.

use log::*;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!(
        "Starting meet_broker [{}] in {} mode",
        env!("CARGO_PKG_VERSION"),
        config.runtime_env()
    );

    if config.google_client_id().is_none() || config.google_redirect_uri().is_none() {
        warn!("Google OAuth is not configured; /auth/google will answer 500");
    }
    if config.identity_service_url().is_none() {
        warn!("Identity service is not configured; /api routes will answer 500");
    }

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(config, &db);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server terminated: {e}");
        std::process::exit(1);
    }
}
