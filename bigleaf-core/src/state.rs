//! Ecosystem state shared across simulated days.

use serde::{Deserialize, Serialize};

/// State that outlives a single simulated day.
///
/// The canopy engine reads all of it, but writes only the soil moisture
/// availability factors (at day end) and the day-accumulated soil
/// temperature. Everything else is maintained by collaborating subsystems
/// (phenology, growth, soil water balance) between days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcosystemState {
    /// Leaf area index (m2 leaf m-2 ground).
    pub lai: f64,

    /// Shoot nitrogen:carbon ratio (g N g-1 C).
    pub shootnc: f64,

    /// Soil moisture availability factor for the topsoil, in [0, 1].
    pub wtfac_topsoil: f64,

    /// Soil moisture availability factor for the whole root zone, in [0, 1].
    pub wtfac_root: f64,

    /// Soil temperature (deg C). Accumulated over the day as a running sum of
    /// air temperature and normalised by the slot count at day end.
    pub tsoil: f64,

    /// Plant-available water in the topsoil (mm).
    pub pawater_topsoil: f64,

    /// Plant-available water in the root zone (mm).
    pub pawater_root: f64,

    /// Pre-dawn soil water potential of the topsoil (MPa).
    pub psi_s_topsoil: f64,

    /// Pre-dawn soil water potential of the root zone (MPa).
    pub psi_s_root: f64,
}

impl Default for EcosystemState {
    fn default() -> Self {
        Self {
            lai: 3.0,
            shootnc: 0.03,
            wtfac_topsoil: 1.0,
            wtfac_root: 1.0,
            tsoil: 15.0,
            pawater_topsoil: 50.0,
            pawater_root: 300.0,
            psi_s_topsoil: -0.1,
            psi_s_root: -0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unstressed() {
        let s = EcosystemState::default();
        assert_eq!(s.wtfac_topsoil, 1.0);
        assert_eq!(s.wtfac_root, 1.0);
        assert!(s.lai > 0.0);
    }
}
