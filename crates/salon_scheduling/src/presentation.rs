//! Display data for the booking UI. Wording here is matched by UI snapshot tests.

use crate::catalog::{ServiceCatalog, ServiceOffering};
use crate::hours::{BusinessHours, DayHours};
use salon_common::format_clock_minutes;
use serde::Serialize;

pub const CLOSED_MESSAGE: &str = "Salon is closed on this day.";

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityStatus {
    pub is_open: bool,
    pub message: String,
    /// Slots that fit the business hours, before conflict filtering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_slots: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<usize>,
}

impl AvailabilityStatus {
    pub fn closed() -> Self {
        Self {
            is_open: false,
            message: CLOSED_MESSAGE.to_string(),
            total_slots: None,
            available_slots: None,
        }
    }

    pub fn open(start: u32, end: u32, total_slots: usize, available_slots: usize) -> Self {
        Self {
            is_open: true,
            message: open_message(start, end),
            total_slots: Some(total_slots),
            available_slots: Some(available_slots),
        }
    }
}

/// `"Open from 9:00 AM to 5:00 PM"`
pub fn open_message(start: u32, end: u32) -> String {
    format!(
        "Open from {} to {}",
        format_clock_minutes(start),
        format_clock_minutes(end)
    )
}

/// `"$45"`, `"$45.50"`, `"$70+"` for starting prices.
pub fn price_label(price_cents: u32, variable_pricing: bool) -> String {
    let dollars = price_cents / 100;
    let cents = price_cents % 100;
    let amount = if cents == 0 {
        format!("${dollars}")
    } else {
        format!("${dollars}.{cents:02}")
    };
    if variable_pricing {
        amount + "+"
    } else {
        amount
    }
}

pub fn duration_label(minutes: u32) -> String {
    format!("{minutes} minutes")
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDisplay {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub duration: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&ServiceOffering> for ServiceDisplay {
    fn from(service: &ServiceOffering) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            duration_minutes: service.duration_minutes,
            duration: duration_label(service.duration_minutes),
            price: price_label(service.price_cents, service.variable_pricing),
            note: service.note.clone(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCategoryDisplay {
    pub category: String,
    pub services: Vec<ServiceDisplay>,
}

pub fn service_menu(catalog: &ServiceCatalog) -> Vec<ServiceCategoryDisplay> {
    catalog
        .by_category()
        .into_iter()
        .map(|(category, services)| ServiceCategoryDisplay {
            category: category.to_string(),
            services: services.into_iter().map(ServiceDisplay::from).collect(),
        })
        .collect()
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayHoursDisplay {
    /// Full weekday name, e.g. "Tuesday"
    pub day: String,
    pub is_open: bool,
    /// "9:00 AM - 5:00 PM" or "Closed"
    pub hours: String,
}

pub fn hours_label(day: DayHours) -> String {
    match day {
        DayHours::Closed => "Closed".to_string(),
        DayHours::Open { start, end } => format!(
            "{} - {}",
            format_clock_minutes(start),
            format_clock_minutes(end)
        ),
    }
}

/// Monday to Sunday.
pub fn weekly_hours(hours: &BusinessHours) -> Vec<DayHoursDisplay> {
    hours
        .weekly()
        .map(|(weekday, day)| DayHoursDisplay {
            day: weekday_name(weekday).to_string(),
            is_open: day.is_open(),
            hours: hours_label(day),
        })
        .collect()
}

fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    use chrono::Weekday::*;
    match weekday {
        Mon => "Monday",
        Tue => "Tuesday",
        Wed => "Wednesday",
        Thu => "Thursday",
        Fri => "Friday",
        Sat => "Saturday",
        Sun => "Sunday",
    }
}
