//! Physical constants and unit conversions used across the canopy engine.
//!
//! Values follow the conventions of the micrometeorological literature
//! (temperatures in °C at the interface, Pa for vapour pressures, mol-based
//! conductances). Conversion constants are written as explicit products where
//! the derivation is not obvious.

/// Celsius to Kelvin offset.
pub const DEG_TO_KELVIN: f64 = 273.15;

/// Stefan-Boltzmann constant (W m-2 K-4).
pub const SIGMA: f64 = 5.6704e-8;

/// Specific heat capacity of dry air (J kg-1 K-1).
pub const CP: f64 = 1010.0;

/// Molar mass of dry air (kg mol-1).
pub const MASS_AIR: f64 = 29.0e-3;

/// Molar mass of water (kg mol-1).
pub const MASS_WATER: f64 = 18.02e-3;

/// Latent heat of vaporisation of water at 0 °C (J kg-1).
pub const H2OLV0: f64 = 2.501e6;

/// Universal gas constant (J mol-1 K-1).
pub const RGAS: f64 = 8.314;

/// Ratio of the molecular weights of water vapour and dry air.
pub const EPSILON: f64 = 0.622;

/// Incident PAR (umol m-2 s-1) to shortwave irradiance (W m-2).
pub const PAR_2_SW: f64 = 1.0 / 2.3;

/// kPa to Pa.
pub const KPA_2_PA: f64 = 1000.0;

/// umol to mol.
pub const UMOL_TO_MOL: f64 = 1e-6;

/// mol C to g C.
pub const MOL_C_TO_GRAMS_C: f64 = 12.0;

/// Seconds in a half-hour flux-averaging period.
pub const SEC_2_HLFHR: f64 = 1800.0;

/// g C m-2 to t C ha-1 (1e-6 t g-1 / 1e-4 ha m-2).
pub const GRAM_C_2_TONNES_HA: f64 = 0.01;

/// kg to g.
pub const KG_AS_G: f64 = 1000.0;

/// Ratio of boundary-layer conductances for CO2 and heat.
pub const GBC_2_GBH: f64 = 1.0 / 1.37;

/// Ratio of stomatal conductances for water vapour and CO2.
pub const GSV_2_GSC: f64 = 1.57;
