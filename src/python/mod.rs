use numpy::PyReadonlyArray1;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use serde::Serialize;

use bigleaf_core::example_submodels::{
    BucketWaterBalance, LightResponsePhotosynthesis, PenmanMonteithExchange, SimpleRadiation,
};
use bigleaf_core::{
    run_canopy_day, CanopyParameters, CanopySubmodels, CanopyWorkspace, DailyFluxes,
    EcosystemState, Met, MetArrays, SubDailyControl,
};

/// Day-level outputs returned to Python as a dict.
#[derive(Serialize)]
struct DayResult {
    fluxes: DailyFluxes,
    state: EcosystemState,
    hour_idx: usize,
}

/// Simulate one day of canopy carbon and water exchange.
///
/// Forcing arrays are half-hourly and must all share one length; `hour_idx`
/// selects the first slot of the simulated day. `params` and `state` are
/// optional dicts matching the field names of `CanopyParameters` and
/// `EcosystemState`. Returns a dict with the daily fluxes, the updated
/// ecosystem state and the advanced half-hour cursor.
///
/// The engine is driven through the example sub-models; couple your own
/// sub-models via the Rust API for production use.
#[pyfunction]
#[pyo3(signature = (year, doy, tair, vpd, par, sw_rad, press, co2, rain, wind, params=None, state=None, hour_idx=0))]
#[allow(clippy::too_many_arguments)]
fn run_day<'py>(
    py: Python<'py>,
    year: PyReadonlyArray1<'py, f64>,
    doy: PyReadonlyArray1<'py, f64>,
    tair: PyReadonlyArray1<'py, f64>,
    vpd: PyReadonlyArray1<'py, f64>,
    par: PyReadonlyArray1<'py, f64>,
    sw_rad: PyReadonlyArray1<'py, f64>,
    press: PyReadonlyArray1<'py, f64>,
    co2: PyReadonlyArray1<'py, f64>,
    rain: PyReadonlyArray1<'py, f64>,
    wind: PyReadonlyArray1<'py, f64>,
    params: Option<Bound<'py, PyAny>>,
    state: Option<Bound<'py, PyAny>>,
    hour_idx: usize,
) -> PyResult<Bound<'py, PyAny>> {
    let ma = MetArrays {
        year: year.as_array().to_owned(),
        doy: doy.as_array().to_owned(),
        tair: tair.as_array().to_owned(),
        vpd: vpd.as_array().to_owned(),
        par: par.as_array().to_owned(),
        sw_rad: sw_rad.as_array().to_owned(),
        press: press.as_array().to_owned(),
        co2: co2.as_array().to_owned(),
        rain: rain.as_array().to_owned(),
        wind: wind.as_array().to_owned(),
    };

    let params: CanopyParameters = match params {
        Some(obj) => pythonize::depythonize_bound(obj)
            .map_err(|e| PyValueError::new_err(format!("invalid params: {e}")))?,
        None => CanopyParameters::default(),
    };
    let mut state: EcosystemState = match state {
        Some(obj) => pythonize::depythonize_bound(obj)
            .map_err(|e| PyValueError::new_err(format!("invalid state: {e}")))?,
        None => EcosystemState::default(),
    };

    let mut control = SubDailyControl {
        hour_idx,
        ..Default::default()
    };
    if ma.len() < control.hour_idx + control.num_half_hours {
        return Err(PyValueError::new_err(format!(
            "forcing arrays hold {} records; need {} from hour_idx {}",
            ma.len(),
            control.num_half_hours,
            control.hour_idx
        )));
    }

    let radiation = SimpleRadiation::default();
    let photosynthesis = LightResponsePhotosynthesis::default();
    let gas_exchange = PenmanMonteithExchange::default();
    let water_balance = BucketWaterBalance::default();
    let submodels = CanopySubmodels {
        radiation: &radiation,
        photosynthesis: &photosynthesis,
        gas_exchange: &gas_exchange,
        water_balance: &water_balance,
    };

    let mut cw = CanopyWorkspace::new();
    let mut fluxes = DailyFluxes::new();
    fluxes.zero_carbon_day();
    fluxes.zero_water_day();
    let mut met = Met::default();

    run_canopy_day(
        &mut cw,
        &mut control,
        &mut fluxes,
        &ma,
        &mut met,
        &params,
        &mut state,
        &submodels,
    )
    .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;

    let result = DayResult {
        fluxes,
        state,
        hour_idx: control.hour_idx,
    };
    pythonize::pythonize(py, &result)
        .map(|obj| obj.into_bound(py))
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

#[pymodule]
pub fn bigleaf(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(run_day, m)?)?;
    Ok(())
}
