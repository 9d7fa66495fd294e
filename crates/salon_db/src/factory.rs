//! Factory for creating database clients

use crate::client::DbClient;
use crate::error::DbError;
use salon_config::AppConfig;
use tracing::debug;

/// Factory for creating database clients from different configuration sources.
#[derive(Debug, Clone, Default)]
pub struct DbClientFactory;

impl DbClientFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create a database client from the application configuration.
    ///
    /// Returns `Ok(None)` when no `[database]` section is configured.
    pub async fn from_app_config(&self, config: &AppConfig) -> Result<Option<DbClient>, DbError> {
        match config.database.as_ref() {
            Some(db_config) => {
                debug!("Creating database client from application configuration");
                DbClient::from_config(db_config).await.map(Some)
            }
            None => {
                debug!("No database configured");
                Ok(None)
            }
        }
    }

    /// Create a database client from a database URL
    pub async fn from_url(&self, db_url: &str) -> Result<DbClient, DbError> {
        debug!("Creating database client from URL");
        DbClient::from_url(db_url).await
    }
}
