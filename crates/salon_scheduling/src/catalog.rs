//! Stylist roster and service catalog.

use crate::error::SchedulingError;
use salon_config::{ServiceConfig, StylistConfig};
use serde::Serialize;
use std::collections::HashSet;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stylist {
    pub id: String,
    pub name: String,
    pub phone: String,
}

/// Stylists in declared order. Auto-assignment walks this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    stylists: Vec<Stylist>,
}

impl Roster {
    pub fn new(stylists: Vec<Stylist>) -> Result<Self, SchedulingError> {
        if stylists.is_empty() {
            return Err(SchedulingError::InvalidConfiguration(
                "the stylist roster is empty".to_string(),
            ));
        }
        ensure_unique("stylist", stylists.iter().map(|s| s.id.as_str()))?;
        Ok(Self { stylists })
    }

    pub fn from_config(config: &[StylistConfig]) -> Result<Self, SchedulingError> {
        Self::new(
            config
                .iter()
                .map(|s| Stylist {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    phone: s.phone.clone(),
                })
                .collect(),
        )
    }

    pub fn get(&self, id: &str) -> Option<&Stylist> {
        self.stylists.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stylist> {
        self.stylists.iter()
    }

    pub fn len(&self) -> usize {
        self.stylists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stylists.is_empty()
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceOffering {
    pub id: String,
    pub name: String,
    pub category: String,
    pub duration_minutes: u32,
    pub price_cents: u32,
    /// Price is a starting price ("$70+").
    pub variable_pricing: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: Vec<ServiceOffering>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceOffering>) -> Result<Self, SchedulingError> {
        if let Some(bad) = services.iter().find(|s| s.duration_minutes == 0) {
            return Err(SchedulingError::InvalidConfiguration(format!(
                "service {} has no duration",
                bad.id
            )));
        }
        ensure_unique("service", services.iter().map(|s| s.id.as_str()))?;
        Ok(Self { services })
    }

    pub fn from_config(config: &[ServiceConfig]) -> Result<Self, SchedulingError> {
        let services = config
            .iter()
            .map(|s| {
                let duration_minutes = u32::try_from(s.duration_minutes)
                    .ok()
                    .filter(|d| *d > 0)
                    .ok_or_else(|| {
                        SchedulingError::InvalidConfiguration(format!(
                            "service {} must have a positive duration, got {}",
                            s.id, s.duration_minutes
                        ))
                    })?;
                let price_cents = u32::try_from(s.price_cents).map_err(|_| {
                    SchedulingError::InvalidConfiguration(format!(
                        "service {} has an invalid price {}",
                        s.id, s.price_cents
                    ))
                })?;
                Ok(ServiceOffering {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    category: s.category.clone(),
                    duration_minutes,
                    price_cents,
                    variable_pricing: s.variable_pricing,
                    note: s.note.clone(),
                })
            })
            .collect::<Result<Vec<_>, SchedulingError>>()?;
        Self::new(services)
    }

    pub fn get(&self, id: &str) -> Option<&ServiceOffering> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceOffering> {
        self.services.iter()
    }

    /// Services grouped by category, categories in order of first appearance.
    pub fn by_category(&self) -> Vec<(&str, Vec<&ServiceOffering>)> {
        let mut groups: Vec<(&str, Vec<&ServiceOffering>)> = Vec::new();
        for service in &self.services {
            match groups.iter_mut().find(|(name, _)| *name == service.category) {
                Some((_, members)) => members.push(service),
                None => groups.push((service.category.as_str(), vec![service])),
            }
        }
        groups
    }
}

fn ensure_unique<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), SchedulingError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(SchedulingError::InvalidConfiguration(format!(
                "a {kind} has an empty id"
            )));
        }
        if !seen.insert(id) {
            return Err(SchedulingError::InvalidConfiguration(format!(
                "duplicate {kind} id {id:?}"
            )));
        }
    }
    Ok(())
}
