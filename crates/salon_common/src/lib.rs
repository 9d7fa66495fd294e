// --- File: crates/salon_common/src/lib.rs ---

// Declare modules within this crate
pub mod clock; // 12-hour clock strings <-> minutes since midnight, interval overlap
#[cfg(test)]
mod clock_proptest;
pub mod error; // Error handling
pub mod http; // HTTP error responses
pub mod logging; // Logging utilities
pub mod models; // Appointment, blocked time and busy interval records
pub mod services; // Datastore contract

// Re-export the time model so every crate shares one definition
pub use clock::{format_clock_minutes, parse_clock_minutes, ClockError, MinuteRange};

// Re-export error types and utilities for easier access
pub use error::{conflict, internal_error, not_found, validation_error, HttpStatusCode, SalonError};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_config, init_with_level, log_error, log_result};

pub use services::{BookingStore, BoxFuture, StoreError};
