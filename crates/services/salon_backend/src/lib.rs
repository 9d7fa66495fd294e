//! Application assembly for the salon booking server.
//!
//! `main` loads the configuration and calls [`build_app`]; tests call
//! [`build_router`] with their own store.

use axum::{extract::State, routing::get, Json, Router};
use salon_common::BookingStore;
use salon_config::AppConfig;
use salon_db::{BookingStoreFactory, DbError};
use salon_scheduling::routes::routes as scheduling_routes;
use salon_scheduling::{Salon, SchedulingError, SchedulingService};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] salon_config::ConfigError),
    #[error("Invalid salon setup: {0}")]
    Salon(#[from] SchedulingError),
    #[error("Failed to open the booking store: {0}")]
    Store(#[from] DbError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    salon: String,
}

async fn health(State(salon): State<Arc<Salon>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        salon: salon.name().to_string(),
    })
}

/// Validates the salon configuration, opens the store and builds the router.
pub async fn build_app(config: &AppConfig) -> Result<Router, StartupError> {
    let salon = Arc::new(Salon::from_config(&config.salon)?);
    info!(
        "Salon '{}' ({}) with {} stylists and {} services",
        salon.name(),
        salon.time_zone(),
        salon.roster().len(),
        salon.catalog().iter().count()
    );
    let store = BookingStoreFactory::from_app_config(config).await?;
    Ok(build_router(salon, store))
}

/// Booking API under `/api`, plus Swagger UI at `/api/docs` with the
/// `openapi` feature.
pub fn build_router(salon: Arc<Salon>, store: Arc<dyn BookingStore>) -> Router {
    let service = SchedulingService::new(salon.clone(), store);

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Salon booking API!" }))
        .route("/health", get(health))
        .with_state(salon)
        .merge(scheduling_routes(service));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use salon_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Salon Booking API",
                version = "0.1.0",
                description = "Services, availability and appointment booking",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
}
