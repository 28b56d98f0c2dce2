//! Example sub-model implementations.
//!
//! Deliberately simple reference implementations of the four trait seams in
//! [`crate::submodels`], used by the integration tests and the Python
//! bindings' default runner. They are physically sensible but reduced:
//! geometric solar elevation, a transmissivity-style diffuse fraction,
//! Beer's-law two-leaf PAR partitioning, a rectangular-hyperbola light
//! response with a Leuning-style conductance model, a Penman-Monteith
//! combination equation with the McNaughton & Jarvis decoupling
//! coefficient, and a bucket soil water balance.
//!
//! Production runs couple the engine to full sub-models through the same
//! traits; nothing in the engine depends on the implementations here.

use crate::canopy::fluxes::DailyFluxes;
use crate::canopy::workspace::{CanopyWorkspace, Leaf, PerLeaf};
use crate::constants::{
    CP, DEG_TO_KELVIN, GBC_2_GBH, GSV_2_GSC, MASS_AIR, MASS_WATER, RGAS, SEC_2_HLFHR, SIGMA,
};
use crate::control::SubDailyControl;
use crate::met::Met;
use crate::meteo::{
    latent_heat_of_vapourisation, psychrometric_constant, slope_saturation_vapour_pressure,
};
use crate::params::CanopyParameters;
use crate::state::EcosystemState;
use crate::submodels::{
    LeafAssimilation, LeafExchange, LeafGasExchange, Photosynthesis, SoilWaterBalance,
    SolarRadiation,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Radiation
// ============================================================================

/// Solar geometry and two-leaf PAR partitioning for a site at a fixed
/// latitude.
///
/// Beam radiation is absorbed entirely by the sunlit leaf; diffuse radiation
/// is shared between the leaf classes in proportion to the sunlit leaf-area
/// fraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleRadiation {
    /// Site latitude
    /// unit: deg (negative south)
    /// default: -33.6
    pub latitude: f64,
}

impl Default for SimpleRadiation {
    fn default() -> Self {
        Self { latitude: -33.6 }
    }
}

impl SimpleRadiation {
    /// Solar declination (rad) for day-of-year `doy`.
    fn declination(doy: f64) -> f64 {
        -23.4_f64.to_radians() * (2.0 * std::f64::consts::PI * (doy + 10.0) / 365.0).cos()
    }

    /// Beam extinction coefficient for black leaves at the current solar
    /// elevation (deg).
    fn beam_extinction(elevation: f64) -> f64 {
        let sin_elev = elevation.to_radians().sin().max(0.05);
        (0.5 / sin_elev).min(4.0)
    }
}

impl SolarRadiation for SimpleRadiation {
    fn solar_geometry(&self, doy: f64, half_hour: usize) -> f64 {
        let dec = Self::declination(doy);
        let hour = (half_hour as f64 + 0.5) * 0.5;
        let hour_angle = (15.0 * (hour - 12.0)).to_radians();
        let lat = self.latitude.to_radians();

        (lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos())
            .asin()
            .to_degrees()
    }

    fn diffuse_fraction(&self, _doy: f64, sw_rad: f64) -> f64 {
        // Transmissivity proxy: the brighter the sky, the smaller the
        // diffuse share.
        (1.0 - sw_rad / 900.0).clamp(0.12, 1.0)
    }

    fn absorbed_par(
        &self,
        cw: &mut CanopyWorkspace,
        _params: &CanopyParameters,
        state: &EcosystemState,
        par: f64,
    ) {
        let lai = state.lai;
        if lai <= 0.0 {
            cw.apar_leaf = PerLeaf::default();
            return;
        }

        // extinction coefficient for diffuse radiation and black leaves
        let kd = 0.8;
        let kb = Self::beam_extinction(cw.elevation);

        let beam = (1.0 - cw.diffuse_frac) * par;
        let diffuse = cw.diffuse_frac * par;

        let abs_beam = beam * (1.0 - (-kb * lai).exp());
        let abs_diffuse = diffuse * (1.0 - (-kd * lai).exp());

        // sunlit leaf-area fraction of the canopy
        let lai_sun = (1.0 - (-kb * lai).exp()) / kb;
        let fsun = (lai_sun / lai).clamp(0.0, 1.0);

        cw.apar_leaf[Leaf::Sunlit] = abs_beam + abs_diffuse * fsun;
        cw.apar_leaf[Leaf::Shaded] = abs_diffuse * (1.0 - fsun);
    }
}

// ============================================================================
// Photosynthesis
// ============================================================================

/// Parameters for the light-response photosynthesis example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightResponseParameters {
    /// Apparent quantum yield of assimilation
    /// unit: mol CO2 mol-1 photons
    /// default: 0.07
    pub quantum_yield: f64,

    /// Light-saturated assimilation per unit top-of-canopy nitrogen
    /// unit: umol CO2 g-1 N s-1
    /// default: 12.0
    pub amax_per_n: f64,

    /// Dark respiration as a fraction of light-saturated assimilation
    /// unit: dimensionless
    /// default: 0.015
    pub dark_resp_frac: f64,

    /// Optimum leaf temperature for assimilation
    /// unit: deg C
    /// default: 25.0
    pub t_opt: f64,

    /// Breadth of the temperature response
    /// unit: deg C
    /// default: 18.0
    pub t_breadth: f64,

    /// Residual stomatal conductance to CO2
    /// unit: mol m-2 s-1
    /// default: 0.01
    pub g0: f64,

    /// Stomatal conductance slope
    /// unit: dimensionless
    /// default: 9.0
    pub a1: f64,

    /// Vapour pressure deficit sensitivity of stomata
    /// unit: Pa
    /// default: 1500.0
    pub d0: f64,
}

impl Default for LightResponseParameters {
    fn default() -> Self {
        Self {
            quantum_yield: 0.07,
            amax_per_n: 12.0,
            dark_resp_frac: 0.015,
            t_opt: 25.0,
            t_breadth: 18.0,
            g0: 0.01,
            a1: 9.0,
            d0: 1500.0,
        }
    }
}

/// Rectangular-hyperbola light response scaled by top-of-canopy nitrogen,
/// with a Leuning-style coupling of stomatal conductance to assimilation,
/// surface CO2 and surface vapour pressure deficit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightResponsePhotosynthesis {
    pub parameters: LightResponseParameters,
}

impl LightResponsePhotosynthesis {
    pub fn from_parameters(parameters: LightResponseParameters) -> Self {
        Self { parameters }
    }

    /// Gaussian temperature response, 1.0 at the optimum.
    fn temperature_factor(&self, tleaf: f64) -> f64 {
        let z = (tleaf - self.parameters.t_opt) / self.parameters.t_breadth;
        (-z * z).exp()
    }
}

impl Photosynthesis for LightResponsePhotosynthesis {
    fn assimilate(
        &self,
        _control: &SubDailyControl,
        cw: &CanopyWorkspace,
        _met: &Met,
        _params: &CanopyParameters,
        state: &EcosystemState,
        leaf: Leaf,
    ) -> LeafAssimilation {
        let p = &self.parameters;

        let amax = (p.amax_per_n * cw.n0 * self.temperature_factor(cw.tleaf) * state.wtfac_root)
            .max(0.0);
        if amax <= 0.0 {
            return LeafAssimilation { an: 0.0, gsc: p.g0 };
        }

        let light = p.quantum_yield * cw.apar_leaf[leaf];
        let an_gross = amax * light / (light + amax);
        let an = an_gross - p.dark_resp_frac * amax;

        let gsc = if an > 0.0 {
            p.g0 + p.a1 * an / (cw.cs.max(1.0) * (1.0 + cw.dleaf / p.d0))
        } else {
            p.g0
        };

        LeafAssimilation { an, gsc }
    }
}

// ============================================================================
// Leaf gas exchange
// ============================================================================

/// Parameters for the Penman-Monteith leaf gas exchange example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenmanMonteithParameters {
    /// Characteristic leaf width
    /// unit: m
    /// default: 0.02
    pub leaf_width: f64,
}

impl Default for PenmanMonteithParameters {
    fn default() -> Self {
        Self { leaf_width: 0.02 }
    }
}

/// Penman-Monteith combination equation for a single leaf.
///
/// Boundary-layer conductance assumes forced convection over a flat leaf;
/// the heat conductance includes both leaf sides and a radiative
/// conductance. The decoupling coefficient follows McNaughton & Jarvis
/// (1983).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PenmanMonteithExchange {
    pub parameters: PenmanMonteithParameters,
}

impl PenmanMonteithExchange {
    pub fn from_parameters(parameters: PenmanMonteithParameters) -> Self {
        Self { parameters }
    }
}

impl LeafGasExchange for PenmanMonteithExchange {
    fn conductance_transpiration(
        &self,
        met: &Met,
        _params: &CanopyParameters,
        _state: &EcosystemState,
        _tleaf: f64,
        rnet: f64,
        gsc: f64,
    ) -> LeafExchange {
        let tk = met.tair + DEG_TO_KELVIN;

        // molar density of air (mol m-3)
        let cmolar = met.press / (RGAS * tk);

        // one-sided boundary-layer conductance to heat, forced convection
        let gbh = 0.003 * (met.wind.max(0.1) / self.parameters.leaf_width).sqrt() * cmolar;

        // radiative conductance (mol m-2 s-1)
        let gr = 4.0 * SIGMA * tk.powi(3) / (CP * MASS_AIR);

        // heat leaves through both sides and by re-radiation
        let gh = 2.0 * gbh + gr;

        let gbc = gbh * GBC_2_GBH;
        let gsv = gsc * GSV_2_GSC;
        let gbv = 1.075 * gbh;
        let gv = gbv * gsv / (gbv + gsv);

        let lambda = latent_heat_of_vapourisation(met.tair);
        let slope = slope_saturation_vapour_pressure(met.tair);
        let gamma = psychrometric_constant(met.press);

        let latent_heat =
            (slope * rnet + met.vpd * gh * CP * MASS_AIR) / (slope + gamma * gh / gv);
        let transpiration = (latent_heat / lambda).max(0.0);

        let epsilon = slope / gamma;
        let omega = (1.0 + epsilon) / (1.0 + epsilon + gbv / gsv);

        LeafExchange {
            transpiration,
            latent_heat,
            gbc,
            gh,
            gv,
            omega,
        }
    }
}

// ============================================================================
// Soil water balance
// ============================================================================

/// Parameters for the bucket soil water balance example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketWaterBalanceParameters {
    /// Plant-available water capacity of the topsoil
    /// unit: mm
    /// default: 100.0
    pub topsoil_capacity: f64,

    /// Plant-available water capacity of the root zone
    /// unit: mm
    /// default: 300.0
    pub root_capacity: f64,

    /// Fraction of rainfall intercepted by the canopy
    /// unit: dimensionless
    /// default: 0.15
    pub interception_frac: f64,

    /// Fraction of transpiration drawn from the topsoil store
    /// unit: dimensionless
    /// default: 0.3
    pub topsoil_uptake_frac: f64,

    /// Soil water potential at saturation
    /// unit: MPa
    /// default: -0.0008
    pub psi_sat: f64,

    /// Exponent of the water-retention curve
    /// unit: dimensionless
    /// default: 6.0
    pub retention_b: f64,
}

impl Default for BucketWaterBalanceParameters {
    fn default() -> Self {
        Self {
            topsoil_capacity: 100.0,
            root_capacity: 300.0,
            interception_frac: 0.15,
            topsoil_uptake_frac: 0.3,
            psi_sat: -0.0008,
            retention_b: 6.0,
        }
    }
}

/// Two-store bucket water balance with a power-law retention curve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketWaterBalance {
    pub parameters: BucketWaterBalanceParameters,
}

impl BucketWaterBalance {
    pub fn from_parameters(parameters: BucketWaterBalanceParameters) -> Self {
        Self { parameters }
    }

    fn potential_from_fraction(&self, fraction: f64) -> f64 {
        let f = fraction.clamp(0.05, 1.0);
        self.parameters.psi_sat * f.powf(-self.parameters.retention_b)
    }
}

impl SoilWaterBalance for BucketWaterBalance {
    fn update(
        &self,
        _control: &SubDailyControl,
        fluxes: &mut DailyFluxes,
        met: &Met,
        _params: &CanopyParameters,
        state: &mut EcosystemState,
        trans_canopy: f64,
        _omega_canopy: f64,
        _rnet_canopy: f64,
    ) {
        let p = &self.parameters;

        // mol m-2 s-1 -> mm per half-hour (1 kg m-2 == 1 mm)
        let trans_mm = trans_canopy * MASS_WATER * SEC_2_HLFHR;

        let interception = met.rain * p.interception_frac;
        let throughfall = met.rain - interception;

        fluxes.transpiration += trans_mm;
        fluxes.interception += interception;
        fluxes.et += trans_mm + interception;

        let topsoil = state.pawater_topsoil + throughfall - trans_mm * p.topsoil_uptake_frac;
        state.pawater_topsoil = topsoil.clamp(0.0, p.topsoil_capacity);

        let root = state.pawater_root + throughfall - trans_mm;
        if root > p.root_capacity {
            fluxes.runoff += root - p.root_capacity;
        }
        state.pawater_root = root.clamp(0.0, p.root_capacity);
    }

    fn soil_water_potential(
        &self,
        _control: &SubDailyControl,
        _params: &CanopyParameters,
        state: &mut EcosystemState,
    ) {
        let p = &self.parameters;
        state.psi_s_topsoil =
            self.potential_from_fraction(state.pawater_topsoil / p.topsoil_capacity);
        state.psi_s_root = self.potential_from_fraction(state.pawater_root / p.root_capacity);
    }

    fn soil_moisture_factors(
        &self,
        _control: &SubDailyControl,
        _params: &CanopyParameters,
        state: &EcosystemState,
    ) -> (f64, f64) {
        let p = &self.parameters;
        let topsoil = (state.pawater_topsoil / p.topsoil_capacity).clamp(0.0, 1.0);
        let root = (state.pawater_root / p.root_capacity).clamp(0.0, 1.0);
        (topsoil, root)
    }
}
