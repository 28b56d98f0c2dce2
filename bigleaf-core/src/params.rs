//! Canopy parameters.
//!
//! Run-constant plant and stand properties consumed by the canopy engine.
//! Sub-models carry their own parameter sets; only the quantities the engine
//! itself needs live here.

use crate::constants::KG_AS_G;
use serde::{Deserialize, Serialize};

/// Run-constant parameters for the two-leaf canopy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanopyParameters {
    /// Specific leaf area
    /// unit: m2 leaf kg-1 DM
    /// default: 20.0
    pub sla: f64,

    /// Carbon fraction of dry biomass
    /// unit: dimensionless
    /// default: 0.5
    pub cfracts: f64,

    /// Leaf absorptance of shortwave radiation
    /// unit: dimensionless
    /// default: 0.8
    pub leaf_abs: f64,

    /// Carbon-use efficiency (NPP:GPP ratio)
    /// unit: dimensionless
    /// default: 0.5
    pub cue: f64,

    /// Apply soil moisture limitation at day end. When false both soil
    /// moisture availability factors are forced to 1.0 (debugging bypass,
    /// not a physical result).
    /// default: true
    pub water_stress: bool,
}

impl Default for CanopyParameters {
    fn default() -> Self {
        Self {
            sla: 20.0,
            cfracts: 0.5,
            leaf_abs: 0.8,
            cue: 0.5,
            water_stress: true,
        }
    }
}

impl CanopyParameters {
    /// Leaf mass per unit leaf area (g C m-2 leaf), derived from SLA and the
    /// carbon fraction of dry mass.
    pub fn leaf_mass_per_area(&self) -> f64 {
        1.0 / self.sla * self.cfracts * KG_AS_G
    }

    /// Parse parameters from a TOML document.
    pub fn from_toml(doc: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(doc)
    }
}
