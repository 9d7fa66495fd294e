// File: crates/salon_scheduling/src/handlers.rs
use crate::booking::{AvailableTimes, BlockTimeRequest, BookingRequest, SchedulingService};
use crate::catalog::Stylist;
use crate::presentation::{service_menu, weekly_hours, DayHoursDisplay, ServiceCategoryDisplay};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use salon_common::models::{Appointment, BlockedTime};
use salon_common::{validation_error, SalonError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

// Shared state for the scheduling routes
#[derive(Clone)]
pub struct SchedulingState {
    pub service: SchedulingService,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = Date, example = "2030-01-08"))]
    pub date: String,
    #[cfg_attr(feature = "openapi", schema(example = "womens-cut"))]
    pub service_id: String,
    /// Omit to search across all stylists
    pub stylist_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct DateQuery {
    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = Date, example = "2030-01-08"))]
    pub date: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServicesResponse {
    pub categories: Vec<ServiceCategoryDisplay>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StylistsResponse {
    pub stylists: Vec<Stylist>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BusinessHoursResponse {
    pub salon: String,
    pub time_zone: String,
    pub days: Vec<DayHoursDisplay>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub message: String,
    pub appointment: Appointment,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlockedTimesResponse {
    pub blocked_times: Vec<BlockedTime>,
}

fn parse_date(value: &str) -> Result<NaiveDate, SalonError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| validation_error(format!("Invalid date {value:?} (expected YYYY-MM-DD)")))
}

/// Service menu grouped by category.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/services",
    responses((status = 200, description = "Service menu", body = ServicesResponse)),
    tag = "Salon"
))]
pub async fn get_services_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Json<ServicesResponse> {
    Json(ServicesResponse {
        categories: service_menu(state.service.salon().catalog()),
    })
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stylists",
    responses((status = 200, description = "Stylists in roster order", body = StylistsResponse)),
    tag = "Salon"
))]
pub async fn get_stylists_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Json<StylistsResponse> {
    Json(StylistsResponse {
        stylists: state.service.salon().roster().iter().cloned().collect(),
    })
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/business-hours",
    responses((status = 200, description = "Weekly business hours", body = BusinessHoursResponse)),
    tag = "Salon"
))]
pub async fn get_business_hours_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Json<BusinessHoursResponse> {
    let salon = state.service.salon();
    Json(BusinessHoursResponse {
        salon: salon.name().to_string(),
        time_zone: salon.time_zone().name().to_string(),
        days: weekly_hours(salon.hours()),
    })
}

/// Available start times for a service on a date.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Available times and status message", body = AvailableTimes),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "Unknown service or stylist"),
        (status = 500, description = "Storage error")
    ),
    tag = "Booking"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableTimes>, SalonError> {
    let date = parse_date(&query.date)?;
    let stylist_id = query.stylist_id.as_deref().filter(|id| !id.is_empty());
    let available = state
        .service
        .available_times(date, &query.service_id, stylist_id)
        .await?;
    info!(
        "Availability for {} on {}: {} times",
        query.service_id,
        date,
        available.times.len()
    );
    Ok(Json(available))
}

/// Books an appointment. Rejections come back as 409 with a reason code.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Appointment booked", body = BookingResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown service or stylist"),
        (status = 409, description = "no_stylist_available or slot_no_longer_available"),
        (status = 500, description = "Storage error")
    ),
    tag = "Booking"
))]
pub async fn book_appointment_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), SalonError> {
    let appointment = state.service.book(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: "Appointment booked successfully.".to_string(),
            appointment,
        }),
    ))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stylists/{stylist_id}/appointments",
    params(("stylist_id" = String, Path, description = "Stylist id"), DateQuery),
    responses(
        (status = 200, description = "The stylist's appointments that day", body = AppointmentsResponse),
        (status = 404, description = "Unknown stylist")
    ),
    tag = "Stylist"
))]
pub async fn get_stylist_appointments_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(stylist_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<AppointmentsResponse>, SalonError> {
    let date = parse_date(&query.date)?;
    let appointments = state
        .service
        .appointments(date, Some(&stylist_id))
        .await?;
    Ok(Json(AppointmentsResponse { appointments }))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/stylists/{stylist_id}/blocked-times",
    params(("stylist_id" = String, Path, description = "Stylist id")),
    responses(
        (status = 200, description = "Blocked times by date", body = BlockedTimesResponse),
        (status = 404, description = "Unknown stylist")
    ),
    tag = "Stylist"
))]
pub async fn get_blocked_times_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(stylist_id): Path<String>,
) -> Result<Json<BlockedTimesResponse>, SalonError> {
    let blocked_times = state.service.blocked_times(&stylist_id).await?;
    Ok(Json(BlockedTimesResponse { blocked_times }))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/stylists/{stylist_id}/blocked-times",
    params(("stylist_id" = String, Path, description = "Stylist id")),
    request_body = BlockTimeRequest,
    responses(
        (status = 201, description = "Time blocked", body = BlockedTime),
        (status = 400, description = "Invalid time range"),
        (status = 404, description = "Unknown stylist")
    ),
    tag = "Stylist"
))]
pub async fn create_blocked_time_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(stylist_id): Path<String>,
    Json(payload): Json<BlockTimeRequest>,
) -> Result<(StatusCode, Json<BlockedTime>), SalonError> {
    let block = state.service.block_time(&stylist_id, payload).await?;
    Ok((StatusCode::CREATED, Json(block)))
}
