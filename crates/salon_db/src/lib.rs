//! Datastores for the salon booking service
//!
//! Two implementations of [`salon_common::BookingStore`]:
//!
//! - [`SqlBookingStore`] on an SQLx `Any` pool (SQLite by default, PostgreSQL
//!   through the `postgres` feature). Appointments are inserted with a
//!   conditional statement inside a transaction, so an overlapping booking is
//!   never written.
//! - [`InMemoryBookingStore`] for deployments without a database and for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use salon_db::{DbClient, SqlBookingStore};
//!
//! async fn setup() -> Result<SqlBookingStore, Box<dyn std::error::Error>> {
//!     let client = DbClient::from_url("sqlite:data/salon.db").await?;
//!     let store = SqlBookingStore::new(client);
//!     store.init_schema().await?;
//!     Ok(store)
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod repositories;

// Re-export the client, factory, and stores for ease of use
pub use client::{DbBackend, DbClient};
pub use error::DbError;
pub use factory::DbClientFactory;
pub use repositories::{BookingStoreFactory, InMemoryBookingStore, SqlBookingStore};
