//! Construction sites ("cells"): named locations with an infrastructure
//! level and a pool of build slots.

use crate::bounded::{new_infrastructure, BoundedInt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Country tag for sites that belong to no configured country.
pub const COUNTRY_UNDEFINED: &str = "undefined";

/// Name prefix reserved for engine-allocated sites.
pub const GENERIC_PREFIX: &str = "generic_";

/// Infrastructure level cap.
pub const MAX_INFRASTRUCTURE: u8 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    #[error("'{0}' is not a valid site name (the '{GENERIC_PREFIX}' prefix is reserved)")]
    ReservedName(String),
    #[error("infrastructure level {0} is outside 0..={MAX_INFRASTRUCTURE}")]
    InfrastructureOutOfRange(u8),
}

/// A named construction location.
///
/// Only the engine mutates a site: infrastructure rises by one on an
/// infrastructure completion, the slot pool shrinks by one on any other
/// completion. Sites are never destroyed mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSite {
    name: String,
    infrastructure: BoundedInt,
    /// Remaining build slots; `None` means unlimited.
    slots: Option<u32>,
    country: String,
}

impl ConstructionSite {
    pub fn new(
        name: impl Into<String>,
        infrastructure: u8,
        slots: Option<u32>,
        country: impl Into<String>,
    ) -> Result<Self, SiteError> {
        let name = name.into();
        if name.starts_with(GENERIC_PREFIX) {
            return Err(SiteError::ReservedName(name));
        }
        if infrastructure > MAX_INFRASTRUCTURE {
            return Err(SiteError::InfrastructureOutOfRange(infrastructure));
        }
        Ok(Self {
            name,
            infrastructure: new_infrastructure(i32::from(infrastructure)),
            slots,
            country: country.into(),
        })
    }

    /// Site created on demand for a build-order entry: default country,
    /// unlimited slots. Generic names are allowed here, which is why this
    /// constructor is engine-internal.
    pub(crate) fn lazy(name: String, infrastructure: u8) -> Self {
        Self {
            name,
            infrastructure: new_infrastructure(i32::from(infrastructure)),
            slots: None,
            country: COUNTRY_UNDEFINED.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn infrastructure(&self) -> u8 {
        self.infrastructure.get() as u8
    }

    pub fn slots(&self) -> Option<u32> {
        self.slots
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Throughput multiplier for non-infrastructure construction:
    /// `(10 + level) / 10`.
    pub fn throughput_bonus(&self) -> f64 {
        (10.0 + f64::from(self.infrastructure())) / 10.0
    }

    pub(crate) fn infrastructure_up(&mut self) {
        self.infrastructure.add(1);
    }

    pub(crate) fn slots_down(&mut self) {
        if let Some(slots) = &mut self.slots {
            *slots = slots.saturating_sub(1);
        }
    }
}

impl std::fmt::Display for ConstructionSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (infrastructure {}, slots ",
            self.name,
            self.infrastructure()
        )?;
        match self.slots {
            Some(n) => write!(f, "{n}")?,
            None => write!(f, "unlimited")?,
        }
        write!(f, ", {})", self.country)
    }
}
