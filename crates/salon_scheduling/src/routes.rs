// File: crates/salon_scheduling/src/routes.rs
use crate::booking::SchedulingService;
use crate::handlers::{
    book_appointment_handler, create_blocked_time_handler, get_availability_handler,
    get_blocked_times_handler, get_business_hours_handler, get_services_handler,
    get_stylist_appointments_handler, get_stylists_handler, SchedulingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// All booking routes, relative to the `/api` prefix the backend nests them under.
pub fn routes(service: SchedulingService) -> Router {
    let state = Arc::new(SchedulingState { service });

    Router::new()
        .route("/services", get(get_services_handler))
        .route("/stylists", get(get_stylists_handler))
        .route("/business-hours", get(get_business_hours_handler))
        .route("/availability", get(get_availability_handler))
        .route("/appointments", post(book_appointment_handler))
        .route(
            "/stylists/{stylist_id}/appointments",
            get(get_stylist_appointments_handler),
        )
        .route(
            "/stylists/{stylist_id}/blocked-times",
            get(get_blocked_times_handler).post(create_blocked_time_handler),
        )
        .with_state(state)
}
