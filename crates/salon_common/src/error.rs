// --- File: crates/salon_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

use crate::services::StoreError;

/// The base error type shared by all salon crates.
///
/// Crate-specific errors convert into it with `From` so handlers can turn any
/// failure into a consistent HTTP response.
#[derive(Error, Debug)]
pub enum SalonError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// The request conflicts with existing bookings. `reason` is a stable
    /// machine-readable code, `message` is shown to the customer.
    #[error("{message}")]
    ConflictError {
        reason: &'static str,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SalonError {
    /// Stable reason code included in error responses.
    pub fn reason(&self) -> &'static str {
        match self {
            SalonError::ConfigError(_) => "config_error",
            SalonError::ValidationError(_) => "validation_error",
            SalonError::DatabaseError(_) => "storage_error",
            SalonError::ConflictError { reason, .. } => reason,
            SalonError::NotFoundError(_) => "not_found",
            SalonError::InternalError(_) => "internal_error",
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SalonError {
    fn status_code(&self) -> u16 {
        match self {
            SalonError::ConfigError(_) => 500,
            SalonError::ValidationError(_) => 400,
            SalonError::DatabaseError(_) => 500,
            SalonError::ConflictError { .. } => 409,
            SalonError::NotFoundError(_) => 404,
            SalonError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<StoreError> for SalonError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => conflict("slot_no_longer_available", err),
            StoreError::Backend(_) | StoreError::InvalidRecord(_) => {
                SalonError::DatabaseError(err.to_string())
            }
        }
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> SalonError {
    SalonError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> SalonError {
    SalonError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(reason: &'static str, message: T) -> SalonError {
    SalonError::ConflictError {
        reason,
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> SalonError {
    SalonError::InternalError(message.to_string())
}
