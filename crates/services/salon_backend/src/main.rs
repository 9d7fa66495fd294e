// File: services/salon_backend/src/main.rs
use salon_backend::{build_app, StartupError};
use salon_config::load_config;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = load_config()?;
    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = salon_common::init_with_config(&config.logging);

    let app = build_app(&config).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
