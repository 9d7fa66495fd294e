// --- File: crates/salon_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. "sqlite:data/salon.db", or "secret_from_env" to read DATABASE_URL
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, a daily rolling log file is written into this directory as well.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

// --- Salon Config ---
// Raw, unvalidated tables. The scheduling crate turns these into typed
// business hours, roster and catalog at start-up.

/// Opening hours for one weekday, as written in the config file.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DayHoursConfig {
    #[serde(default)]
    pub is_open: bool,
    /// 12-hour clock string, e.g. "9:00 AM"
    #[serde(default)]
    pub start: Option<String>,
    /// 12-hour clock string, e.g. "5:00 PM"
    #[serde(default)]
    pub end: Option<String>,
}

impl DayHoursConfig {
    pub fn closed() -> Self {
        Self {
            is_open: false,
            start: None,
            end: None,
        }
    }

    pub fn open(start: &str, end: &str) -> Self {
        Self {
            is_open: true,
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StylistConfig {
    pub id: String,
    pub name: String,
    pub phone: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub id: String,
    pub name: String,
    pub category: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    /// Price is a starting price ("$45+").
    #[serde(default)]
    pub variable_pricing: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SalonConfig {
    #[serde(default = "default_salon_name")]
    pub name: String,
    /// IANA time zone used to decide what "today" is for the salon.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Weekday name (any case, "Monday" or "Mon") to opening hours.
    /// Missing weekdays are treated as closed.
    #[serde(default = "default_business_hours")]
    pub business_hours: BTreeMap<String, DayHoursConfig>,
    /// Roster in preference order; auto-assignment walks it front to back.
    #[serde(default = "default_stylists")]
    pub stylists: Vec<StylistConfig>,
    #[serde(default = "default_services")]
    pub services: Vec<ServiceConfig>,
}

fn default_salon_name() -> String {
    "Salon".to_string()
}

fn default_time_zone() -> String {
    "America/Chicago".to_string()
}

fn default_business_hours() -> BTreeMap<String, DayHoursConfig> {
    let mut hours = BTreeMap::new();
    hours.insert("monday".to_string(), DayHoursConfig::closed());
    for day in ["tuesday", "wednesday", "thursday", "friday", "saturday"] {
        hours.insert(day.to_string(), DayHoursConfig::open("9:00 AM", "5:00 PM"));
    }
    hours.insert("sunday".to_string(), DayHoursConfig::closed());
    hours
}

fn default_stylists() -> Vec<StylistConfig> {
    vec![
        StylistConfig {
            id: "jennifer".to_string(),
            name: "Jennifer".to_string(),
            phone: "2566132308".to_string(),
        },
        StylistConfig {
            id: "heather".to_string(),
            name: "Heather".to_string(),
            phone: "2565577173".to_string(),
        },
    ]
}

fn service(
    id: &str,
    name: &str,
    category: &str,
    duration_minutes: i64,
    price_cents: i64,
    variable_pricing: bool,
    note: Option<&str>,
) -> ServiceConfig {
    ServiceConfig {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        duration_minutes,
        price_cents,
        variable_pricing,
        note: note.map(str::to_string),
    }
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        service("womens-cut", "Women's Haircut", "haircuts", 45, 4500, false, None),
        service("mens-cut", "Men's Haircut", "haircuts", 30, 2500, false, None),
        service("kids-cut", "Kids Haircut", "haircuts", 30, 1800, false, Some("Ages 12 and under")),
        service("root-touch-up", "Root Touch-Up", "color", 90, 7000, true, None),
        service(
            "full-highlights",
            "Full Highlights",
            "color",
            150,
            12000,
            true,
            Some("Price varies with hair length"),
        ),
        service("blowout", "Blowout", "styling", 45, 3500, false, None),
        service("updo", "Special Occasion Updo", "styling", 60, 6500, true, None),
    ]
}

impl Default for SalonConfig {
    fn default() -> Self {
        Self {
            name: default_salon_name(),
            time_zone: default_time_zone(),
            business_hours: default_business_hours(),
            stylists: default_stylists(),
            services: default_services(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // Without a database the backend keeps bookings in memory.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub salon: SalonConfig,
}
