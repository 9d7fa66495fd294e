//! The salon's static configuration, validated once at start-up.

use crate::catalog::{Roster, ServiceCatalog};
use crate::error::SchedulingError;
use crate::hours::BusinessHours;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use salon_config::SalonConfig;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Salon {
    name: String,
    time_zone: Tz,
    hours: BusinessHours,
    roster: Roster,
    catalog: ServiceCatalog,
}

impl Salon {
    pub fn new(
        name: impl Into<String>,
        time_zone: Tz,
        hours: BusinessHours,
        roster: Roster,
        catalog: ServiceCatalog,
    ) -> Self {
        Self {
            name: name.into(),
            time_zone,
            hours,
            roster,
            catalog,
        }
    }

    /// Validates the raw configuration. Fails with
    /// [`SchedulingError::InvalidConfiguration`] on the first problem found.
    pub fn from_config(config: &SalonConfig) -> Result<Self, SchedulingError> {
        let time_zone = Tz::from_str(&config.time_zone).map_err(|_| {
            SchedulingError::InvalidConfiguration(format!(
                "unknown time zone {:?}",
                config.time_zone
            ))
        })?;
        let hours = BusinessHours::from_config(&config.business_hours)?;
        let roster = Roster::from_config(&config.stylists)?;
        let catalog = ServiceCatalog::from_config(&config.services)?;

        info!(
            "Loaded salon {:?}: {} stylists, {} services, time zone {}",
            config.name,
            roster.len(),
            catalog.iter().count(),
            time_zone
        );
        Ok(Self::new(config.name.clone(), time_zone, hours, roster, catalog))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn hours(&self) -> &BusinessHours {
        &self.hours
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Today's date in the salon's time zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.time_zone).date_naive()
    }
}
