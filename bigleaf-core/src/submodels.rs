//! Trait seams for the sub-models the canopy engine is coupled to.
//!
//! The engine drives four collaborating sub-models each half-hour: a
//! radiation sub-model (solar geometry, diffuse fraction, two-leaf PAR
//! partitioning), a C3 photosynthesis model, a Penman-type combined
//! conductance/transpiration solver, and a soil water balance. Production
//! implementations live outside this crate; [`crate::example_submodels`]
//! provides simple reference implementations for tests and demos.
//!
//! All calls are synchronous and infallible: a sub-model always returns a
//! value. The only failure paths in the engine itself are the fatal kinds in
//! [`crate::errors::CanopyError`].

use crate::canopy::fluxes::DailyFluxes;
use crate::canopy::workspace::{CanopyWorkspace, Leaf};
use crate::control::SubDailyControl;
use crate::met::Met;
use crate::params::CanopyParameters;
use crate::state::EcosystemState;

/// Net assimilation and stomatal conductance for one leaf class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafAssimilation {
    /// Net assimilation (umol m-2 s-1).
    pub an: f64,
    /// Stomatal conductance to CO2 (mol m-2 s-1).
    pub gsc: f64,
}

/// Conductances, transpiration and decoupling for one leaf class, as
/// returned by the combination-equation solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafExchange {
    /// Transpiration (mol m-2 s-1).
    pub transpiration: f64,
    /// Latent heat flux (W m-2).
    pub latent_heat: f64,
    /// Boundary-layer conductance to CO2 (mol m-2 s-1).
    pub gbc: f64,
    /// Total conductance to heat (mol m-2 s-1).
    pub gh: f64,
    /// Total conductance to water vapour (mol m-2 s-1).
    pub gv: f64,
    /// Decoupling coefficient (dimensionless).
    pub omega: f64,
}

/// Solar geometry and canopy radiation partitioning.
pub trait SolarRadiation {
    /// Solar elevation angle (deg) for `half_hour` of day-of-year `doy`.
    fn solar_geometry(&self, doy: f64, half_hour: usize) -> f64;

    /// Diffuse fraction of incident radiation, from day-of-year and
    /// half-hourly shortwave irradiance (W m-2).
    fn diffuse_fraction(&self, doy: f64, sw_rad: f64) -> f64;

    /// Partition incident PAR (umol m-2 s-1) into absorbed PAR for the
    /// sunlit and shaded leaves, written to `cw.apar_leaf`. Reads the solar
    /// elevation and diffuse fraction previously stored on the workspace.
    fn absorbed_par(
        &self,
        cw: &mut CanopyWorkspace,
        params: &CanopyParameters,
        state: &EcosystemState,
        par: f64,
    );
}

/// C3 leaf photosynthesis biochemistry.
pub trait Photosynthesis {
    /// Net assimilation and stomatal conductance for `leaf`, given the
    /// current leaf-surface state on the workspace (leaf temperature,
    /// surface CO2, surface vapour pressure deficit, absorbed PAR,
    /// top-of-canopy nitrogen).
    ///
    /// The engine validates the configured pathway before any call, so
    /// implementations may assume C3 biochemistry.
    fn assimilate(
        &self,
        control: &SubDailyControl,
        cw: &CanopyWorkspace,
        met: &Met,
        params: &CanopyParameters,
        state: &EcosystemState,
        leaf: Leaf,
    ) -> LeafAssimilation;
}

/// Penman-type combined conductance/transpiration solver for a single leaf.
pub trait LeafGasExchange {
    /// Solve transpiration, latent heat and the conductance set for a leaf
    /// at temperature `tleaf` (deg C) with isothermal net radiation `rnet`
    /// (W m-2) and stomatal conductance to CO2 `gsc` (mol m-2 s-1).
    fn conductance_transpiration(
        &self,
        met: &Met,
        params: &CanopyParameters,
        state: &EcosystemState,
        tleaf: f64,
        rnet: f64,
        gsc: f64,
    ) -> LeafExchange;
}

/// Soil water balance and soil moisture status.
pub trait SoilWaterBalance {
    /// Update the soil water store with this half-hour's canopy fluxes.
    /// May also accumulate day-level water fluxes on `fluxes`.
    #[allow(clippy::too_many_arguments)]
    fn update(
        &self,
        control: &SubDailyControl,
        fluxes: &mut DailyFluxes,
        met: &Met,
        params: &CanopyParameters,
        state: &mut EcosystemState,
        trans_canopy: f64,
        omega_canopy: f64,
        rnet_canopy: f64,
    );

    /// Evaluate the pre-dawn soil water potential, writing the result to the
    /// state. Invoked once per day at the configured pre-dawn slot.
    fn soil_water_potential(
        &self,
        control: &SubDailyControl,
        params: &CanopyParameters,
        state: &mut EcosystemState,
    );

    /// Soil moisture availability factors `(topsoil, root_zone)`, each in
    /// [0, 1].
    fn soil_moisture_factors(
        &self,
        control: &SubDailyControl,
        params: &CanopyParameters,
        state: &EcosystemState,
    ) -> (f64, f64);
}

/// The set of sub-models driven by the day orchestrator.
#[derive(Clone, Copy)]
pub struct CanopySubmodels<'a> {
    pub radiation: &'a dyn SolarRadiation,
    pub photosynthesis: &'a dyn Photosynthesis,
    pub gas_exchange: &'a dyn LeafGasExchange,
    pub water_balance: &'a dyn SoilWaterBalance,
}
