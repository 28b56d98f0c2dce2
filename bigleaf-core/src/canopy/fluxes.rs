//! Daily flux accumulation.
//!
//! Carbon uptake is accumulated each half-hour from the canopy-scaled
//! assimilation; NPP and autotrophic respiration are recomputed from the
//! running GPP total on every step, so the accumulator invariants
//! `npp == gpp * cue` and `auto_resp == gpp - npp` hold at all times.

use crate::canopy::workspace::CanopyWorkspace;
use crate::constants::{GRAM_C_2_TONNES_HA, MOL_C_TO_GRAMS_C, SEC_2_HLFHR, UMOL_TO_MOL};
use crate::params::CanopyParameters;
use serde::{Deserialize, Serialize};

/// Daily carbon and water flux accumulator.
///
/// Zeroed by the caller at day start ([`DailyFluxes::zero_carbon_day`],
/// [`DailyFluxes::zero_water_day`]) and filled incrementally by the day
/// orchestrator and the water-balance sub-model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyFluxes {
    /// Gross primary production (g C m-2 d-1).
    pub gpp_gc_m2: f64,
    /// Net primary production (g C m-2 d-1).
    pub npp_gc_m2: f64,
    /// Gross primary production (t C ha-1 d-1).
    pub gpp: f64,
    /// Net primary production (t C ha-1 d-1).
    pub npp: f64,
    /// Autotrophic respiration (t C ha-1 d-1).
    pub auto_resp: f64,
    /// Absorbed PAR, summed over the day (umol m-2 s-1 accumulated per slot).
    pub apar: f64,
    /// Canopy stomatal conductance to CO2, summed over the day
    /// (mol m-2 s-1 accumulated per slot).
    pub gs_mol_m2_sec: f64,
    /// Canopy decoupling coefficient, summed over sunlit slots and
    /// normalised to a daytime mean at day end.
    pub omega: f64,

    /// Canopy transpiration (mm d-1).
    pub transpiration: f64,
    /// Soil evaporation (mm d-1).
    pub soil_evap: f64,
    /// Total evapotranspiration (mm d-1).
    pub et: f64,
    /// Canopy interception (mm d-1).
    pub interception: f64,
    /// Drainage/runoff out of the profile (mm d-1).
    pub runoff: f64,
}

impl DailyFluxes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the daily carbon ledger.
    pub fn zero_carbon_day(&mut self) {
        self.gpp_gc_m2 = 0.0;
        self.npp_gc_m2 = 0.0;
        self.gpp = 0.0;
        self.npp = 0.0;
        self.auto_resp = 0.0;
        self.apar = 0.0;
        self.gs_mol_m2_sec = 0.0;
        self.omega = 0.0;
    }

    /// Reset the daily water ledger.
    pub fn zero_water_day(&mut self) {
        self.transpiration = 0.0;
        self.soil_evap = 0.0;
        self.et = 0.0;
        self.interception = 0.0;
        self.runoff = 0.0;
    }

    /// Accumulate one half-hour of canopy-scaled carbon flux.
    ///
    /// Converts umol CO2 m-2 s-1 to g C m-2 per half-hour, then re-derives
    /// NPP and autotrophic respiration from the running GPP total.
    pub fn sum_half_hourly_carbon(&mut self, cw: &CanopyWorkspace, params: &CanopyParameters) {
        self.gpp_gc_m2 += cw.an_canopy * UMOL_TO_MOL * MOL_C_TO_GRAMS_C * SEC_2_HLFHR;
        self.npp_gc_m2 = self.gpp_gc_m2 * params.cue;
        self.gpp = self.gpp_gc_m2 * GRAM_C_2_TONNES_HA;
        self.npp = self.npp_gc_m2 * GRAM_C_2_TONNES_HA;
        self.auto_resp = self.gpp - self.npp;
        self.apar += cw.apar_canopy;
        self.gs_mol_m2_sec += cw.gsc_canopy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn workspace_with_assimilation(an: f64) -> CanopyWorkspace {
        let mut cw = CanopyWorkspace::new();
        cw.an_canopy = an;
        cw.apar_canopy = 1000.0;
        cw.gsc_canopy = 0.3;
        cw
    }

    #[test]
    fn worked_example_single_slot() {
        // 10 umol m-2 s-1 over 1800 s: 10e-6 * 12 * 1800 = 0.216 g C m-2
        let mut f = DailyFluxes::new();
        f.zero_carbon_day();
        let params = CanopyParameters {
            cue: 0.5,
            ..Default::default()
        };

        f.sum_half_hourly_carbon(&workspace_with_assimilation(10.0), &params);
        assert_relative_eq!(f.gpp_gc_m2, 0.216, epsilon = 1e-12);
        assert_relative_eq!(f.npp_gc_m2, 0.108, epsilon = 1e-12);
        assert_relative_eq!(f.gpp, 0.00216, epsilon = 1e-12);
        assert_relative_eq!(f.auto_resp, f.gpp - f.npp, epsilon = 1e-15);
    }

    #[test]
    fn invariants_hold_after_every_step() {
        let mut f = DailyFluxes::new();
        f.zero_carbon_day();
        let params = CanopyParameters {
            cue: 0.47,
            ..Default::default()
        };

        for an in [0.0, 2.5, 14.0, 7.3, 0.1] {
            f.sum_half_hourly_carbon(&workspace_with_assimilation(an), &params);
            assert_relative_eq!(f.npp, f.gpp * params.cue, epsilon = 1e-15);
            assert_relative_eq!(f.auto_resp, f.gpp - f.npp, epsilon = 1e-15);
        }
    }

    #[test]
    fn apar_and_conductance_are_running_sums() {
        let mut f = DailyFluxes::new();
        f.zero_carbon_day();
        let params = CanopyParameters::default();

        f.sum_half_hourly_carbon(&workspace_with_assimilation(5.0), &params);
        f.sum_half_hourly_carbon(&workspace_with_assimilation(5.0), &params);
        assert_relative_eq!(f.apar, 2000.0, epsilon = 1e-12);
        assert_relative_eq!(f.gs_mol_m2_sec, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn zeroing_clears_both_ledgers() {
        let mut f = DailyFluxes::new();
        let params = CanopyParameters::default();
        f.sum_half_hourly_carbon(&workspace_with_assimilation(10.0), &params);
        f.transpiration = 2.0;
        f.et = 3.0;

        f.zero_carbon_day();
        f.zero_water_day();
        assert_eq!(f.gpp, 0.0);
        assert_eq!(f.apar, 0.0);
        assert_eq!(f.omega, 0.0);
        assert_eq!(f.transpiration, 0.0);
        assert_eq!(f.et, 0.0);
    }
}
