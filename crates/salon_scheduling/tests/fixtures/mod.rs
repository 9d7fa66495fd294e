//! Test fixtures for the scheduling integration tests
//!
//! Builds a salon from the default configuration and a booking service over
//! a fresh in-memory store.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use salon_common::models::{Appointment, AppointmentStatus};
use salon_common::BookingStore;
use salon_config::SalonConfig;
use salon_db::InMemoryBookingStore;
use salon_scheduling::routes::routes;
use salon_scheduling::{BookingRequest, Salon, SchedulingService};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A Tuesday, open 9:00 AM - 5:00 PM under the default hours
pub fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 8).unwrap()
}

/// A Monday, closed under the default hours
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
}

pub fn salon() -> Arc<Salon> {
    Arc::new(Salon::from_config(&SalonConfig::default()).unwrap())
}

pub struct Harness {
    pub store: InMemoryBookingStore,
    pub service: SchedulingService,
}

impl Harness {
    pub fn new() -> Self {
        let store = InMemoryBookingStore::new();
        let service = SchedulingService::new(salon(), Arc::new(store.clone()));
        Self { store, service }
    }

    pub fn router(&self) -> Router {
        routes(self.service.clone())
    }

    /// Stores an appointment directly, bypassing validation.
    pub async fn seed(&self, stylist: &str, time: &str, duration: u32) {
        self.store
            .create_appointment(Appointment {
                id: None,
                stylist_id: stylist.to_string(),
                service_id: "updo".to_string(),
                service_name: "Special Occasion Updo".to_string(),
                date: tuesday(),
                time: time.to_string(),
                duration_minutes: duration,
                customer_name: "Existing Customer".to_string(),
                customer_phone: "2565550199".to_string(),
                status: AppointmentStatus::Scheduled,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }
}

pub fn booking_request(service: &str, time: &str, stylist: Option<&str>) -> BookingRequest {
    BookingRequest {
        service_id: service.to_string(),
        date: tuesday(),
        time: time.to_string(),
        stylist_id: stylist.map(str::to_string),
        customer_name: "Ann Example".to_string(),
        customer_phone: "256-555-0100".to_string(),
    }
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::String(String::from_utf8_lossy(&body).into()))
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
