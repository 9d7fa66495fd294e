//! Selects the booking store for the current configuration

use crate::factory::DbClientFactory;
use crate::repositories::{InMemoryBookingStore, SqlBookingStore};
use crate::DbError;
use salon_common::BookingStore;
use salon_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Factory for [`BookingStore`] implementations.
pub struct BookingStoreFactory;

impl BookingStoreFactory {
    /// SQL store when a `[database]` section is configured, in-memory otherwise.
    ///
    /// The SQL schema is created on the way.
    pub async fn from_app_config(config: &AppConfig) -> Result<Arc<dyn BookingStore>, DbError> {
        match DbClientFactory::new().from_app_config(config).await? {
            Some(client) => {
                if !client.is_healthy().await {
                    warn!("Database did not answer the health probe");
                }
                let store = SqlBookingStore::new(client);
                store.init_schema().await?;
                info!("Using SQL booking store");
                Ok(Arc::new(store))
            }
            None => {
                warn!("No database configured, bookings are kept in memory only");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Arc<dyn BookingStore> {
        Arc::new(InMemoryBookingStore::new())
    }
}
