//! Half-hourly meteorological forcing.
//!
//! Forcing is stored column-wise ([`MetArrays`]) and read through a global
//! half-hour cursor held by [`SubDailyControl`](crate::control::SubDailyControl).
//! [`Met`] is the unpacked record for the slot currently being processed;
//! unpacking also performs the kPa -> Pa conversions so all downstream vapour
//! pressure arithmetic is in Pa.

use crate::constants::KPA_2_PA;
use crate::control::SubDailyControl;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Column-wise half-hourly forcing arrays for a whole run.
///
/// All columns share one length; values are indexed by the global half-hour
/// cursor. Units follow the forcing-file convention: temperatures in deg C,
/// vapour pressure deficit and air pressure in kPa, PAR in umol m-2 s-1,
/// shortwave irradiance in W m-2, CO2 in umol mol-1, rainfall in mm per
/// half-hour, wind speed in m s-1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetArrays {
    pub year: Array1<f64>,
    pub doy: Array1<f64>,
    pub tair: Array1<f64>,
    pub vpd: Array1<f64>,
    pub par: Array1<f64>,
    pub sw_rad: Array1<f64>,
    pub press: Array1<f64>,
    pub co2: Array1<f64>,
    pub rain: Array1<f64>,
    pub wind: Array1<f64>,
}

impl MetArrays {
    /// Number of half-hourly records.
    pub fn len(&self) -> usize {
        self.tair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tair.is_empty()
    }
}

/// Unpacked forcing record for the current half-hour.
///
/// Vapour pressure deficit and air pressure are converted to Pa on unpacking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Met {
    pub year: f64,
    pub doy: f64,
    /// Air temperature (deg C).
    pub tair: f64,
    /// Vapour pressure deficit (Pa).
    pub vpd: f64,
    /// Incident PAR (umol m-2 s-1).
    pub par: f64,
    /// Incident shortwave irradiance (W m-2).
    pub sw_rad: f64,
    /// Air pressure (Pa).
    pub press: f64,
    /// Ambient CO2 mole fraction (umol mol-1).
    pub ca: f64,
    /// Rainfall (mm per half-hour).
    pub rain: f64,
    /// Wind speed (m s-1).
    pub wind: f64,
}

/// Unpack the record at the control cursor into `met`.
pub fn unpack_met_data(control: &SubDailyControl, ma: &MetArrays, met: &mut Met) {
    let i = control.hour_idx;

    met.year = ma.year[i];
    met.doy = ma.doy[i];
    met.tair = ma.tair[i];
    met.vpd = ma.vpd[i] * KPA_2_PA;
    met.par = ma.par[i];
    met.sw_rad = ma.sw_rad[i];
    met.press = ma.press[i] * KPA_2_PA;
    met.ca = ma.co2[i];
    met.rain = ma.rain[i];
    met.wind = ma.wind[i];
}
