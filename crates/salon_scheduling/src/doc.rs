// File: crates/salon_scheduling/src/doc.rs
#![cfg(feature = "openapi")]
use crate::booking::{AvailableTimes, BlockTimeRequest, BookingRequest};
use crate::catalog::Stylist;
use crate::handlers::{
    self, AppointmentsResponse, AvailabilityQuery, BlockedTimesResponse, BookingResponse,
    BusinessHoursResponse, DateQuery, ServicesResponse, StylistsResponse,
};
use crate::presentation::{
    AvailabilityStatus, DayHoursDisplay, ServiceCategoryDisplay, ServiceDisplay,
};
use salon_common::models::{Appointment, AppointmentStatus, BlockedTime};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_services_handler,
        handlers::get_stylists_handler,
        handlers::get_business_hours_handler,
        handlers::get_availability_handler,
        handlers::book_appointment_handler,
        handlers::get_stylist_appointments_handler,
        handlers::get_blocked_times_handler,
        handlers::create_blocked_time_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            DateQuery,
            AvailableTimes,
            AvailabilityStatus,
            BookingRequest,
            BookingResponse,
            BlockTimeRequest,
            BlockedTime,
            BlockedTimesResponse,
            Appointment,
            AppointmentStatus,
            AppointmentsResponse,
            Stylist,
            StylistsResponse,
            ServiceDisplay,
            ServiceCategoryDisplay,
            ServicesResponse,
            DayHoursDisplay,
            BusinessHoursResponse
        )
    ),
    tags(
        (name = "Salon", description = "Services, stylists and business hours"),
        (name = "Booking", description = "Availability and appointment booking"),
        (name = "Stylist", description = "Stylist dashboard: appointments and time off")
    ),
    servers(
        (url = "/api", description = "Salon booking API")
    )
)]
pub struct SchedulingApiDoc;
