use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use flux_types::{Amount, Facet, FacetLimits};
use serde::{Deserialize, Serialize};

use crate::error::{ContainerError, Result};

/// What an abort restores when the capacity shrank during the transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePolicy {
    /// Restore the recorded amount as-is, even above the current capacity.
    /// The next insert sees no room; extracts bring it back in range.
    #[default]
    TrustHistory,
    /// Clamp the recorded amount into `[0, capacity]` while restoring.
    Reclamp,
}

/// How a direct [`set_amount`](crate::SidedContainer::set_amount) treats
/// values outside `[0, capacity]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Reject with [`ContainerError::PolicyViolation`].
    #[default]
    Strict,
    /// Clamp into range and log a warning.
    Clamp,
}

/// Configuration for a field-backed container.
///
/// Loaded from TOML; every field is optional.
///
/// ```toml
/// capacity = 1000
/// initial_amount = 250
/// restore = "reclamp"
///
/// [default_limits]
/// max_insert = 64
/// max_extract = 64
///
/// [facets.up]
/// max_insert = 128
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Initial capacity.
    pub capacity: Amount,
    /// Amount stored when the container is built.
    pub initial_amount: Amount,
    pub restore: RestorePolicy,
    pub bounds: BoundsPolicy,
    /// Limits for every facet without an override.
    pub default_limits: FacetLimits,
    /// Per-facet overrides, keyed by facet name (`"down"` .. `"unsided"`).
    pub facets: BTreeMap<String, FacetLimits>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            initial_amount: 0,
            restore: RestorePolicy::default(),
            bounds: BoundsPolicy::default(),
            default_limits: FacetLimits::UNLIMITED,
            facets: BTreeMap::new(),
        }
    }
}

impl ContainerConfig {
    /// A config with `capacity` and the same limits on every facet.
    pub fn uniform(capacity: Amount, limits: FacetLimits) -> Self {
        Self {
            capacity,
            default_limits: limits,
            ..Default::default()
        }
    }

    /// Override the limits of one facet.
    pub fn with_facet(mut self, facet: Facet, limits: FacetLimits) -> Self {
        self.facets.insert(facet.name().to_string(), limits);
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ContainerError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ContainerError::ConfigParse(e.to_string()))
    }

    /// Check that the config describes a reachable container state.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 0 {
            return Err(ContainerError::InvalidConfig(format!(
                "capacity must not be negative, got {}",
                self.capacity
            )));
        }
        if !(0..=self.capacity).contains(&self.initial_amount) {
            return Err(ContainerError::InvalidConfig(format!(
                "initial_amount {} is outside 0..={}",
                self.initial_amount, self.capacity
            )));
        }
        let mut seen = BTreeSet::new();
        for name in self.facets.keys() {
            let facet = name.parse::<Facet>()?;
            if !seen.insert(facet) {
                return Err(ContainerError::InvalidConfig(format!(
                    "facet {facet} is configured more than once (key {name:?})"
                )));
            }
        }
        Ok(())
    }

    /// Effective limits of `facet`: its override, or the defaults.
    pub fn limits_for(&self, facet: Facet) -> FacetLimits {
        self.facets
            .iter()
            .find(|(name, _)| name.parse::<Facet>().ok() == Some(facet))
            .map(|(_, limits)| *limits)
            .unwrap_or(self.default_limits)
    }
}
