//! Day-level orchestration of the two-leaf canopy model.
//!
//! [`run_canopy_day`] walks the half-hours of one simulated day. For each
//! slot it computes solar geometry and the diffuse fraction, then either
//! solves the coupled leaf energy balance for both leaf classes (sun up) or
//! zeroes the leaf quantities (sun down, with the pre-dawn soil water
//! potential evaluated at its fixed slot). Every slot ends by scaling leaf
//! quantities to canopy level, accumulating daily carbon fluxes and handing
//! the canopy water fluxes to the soil water balance. Day-level averages are
//! normalised after the last slot.

use crate::canopy::energy_balance::solve_leaf;
use crate::canopy::fluxes::DailyFluxes;
use crate::canopy::nitrogen::top_of_canopy_nitrogen;
use crate::canopy::workspace::{CanopyWorkspace, Leaf};
use crate::control::{PhotosynthesisPathway, SubDailyControl};
use crate::errors::{CanopyError, CanopyResult};
use crate::met::{unpack_met_data, Met, MetArrays};
use crate::params::CanopyParameters;
use crate::state::EcosystemState;
use crate::submodels::CanopySubmodels;
use log::warn;

/// Incident PAR above which the sun counts as up (umol m-2 s-1). An
/// operational threshold for skipping the leaf solves in twilight, not a
/// physical constant.
const PAR_SUN_UP: f64 = 20.0;

/// Simulate one day of canopy carbon and water exchange.
///
/// The daily flux ledgers must be zeroed by the caller beforehand
/// ([`DailyFluxes::zero_carbon_day`], [`DailyFluxes::zero_water_day`]).
/// `control.hour_idx` is advanced by one per processed slot and is left
/// pointing at the first slot of the next day on success.
///
/// # Errors
///
/// [`CanopyError::UnimplementedPathway`] if the configured pathway is not
/// C3 (checked on entry, before any leaf solve);
/// [`CanopyError::ConvergenceFailure`] if a leaf energy balance fails to
/// converge. Both are fatal to the day: no partial result is produced.
#[allow(clippy::too_many_arguments)]
pub fn run_canopy_day(
    cw: &mut CanopyWorkspace,
    control: &mut SubDailyControl,
    fluxes: &mut DailyFluxes,
    ma: &MetArrays,
    met: &mut Met,
    params: &CanopyParameters,
    state: &mut EcosystemState,
    submodels: &CanopySubmodels<'_>,
) -> CanopyResult<()> {
    if control.ps_pathway != PhotosynthesisPathway::C3 {
        return Err(CanopyError::UnimplementedPathway(control.ps_pathway));
    }

    let doy = ma.doy[control.hour_idx];
    let mut sunlight_hrs: usize = 0;

    // Running daily mean of air temperature stands in for soil temperature.
    state.tsoil = 0.0;

    for hod in 0..control.num_half_hours {
        unpack_met_data(control, ma, met);
        state.tsoil += met.tair;

        cw.elevation = submodels.radiation.solar_geometry(doy, hod);
        cw.diffuse_frac = submodels.radiation.diffuse_fraction(doy, met.sw_rad);

        if cw.elevation > 0.0 && met.par > PAR_SUN_UP {
            submodels
                .radiation
                .absorbed_par(cw, params, state, met.par);
            cw.n0 = top_of_canopy_nitrogen(params, state);

            for leaf in Leaf::ALL {
                solve_leaf(control, cw, met, params, state, submodels, leaf)?;
            }
            sunlight_hrs += 1;
        } else {
            cw.zero_half_hourly();

            // Pre-dawn soil water potential; the fixed slot stands in for
            // actual sunrise.
            if hod == control.pre_dawn_idx {
                submodels
                    .water_balance
                    .soil_water_potential(control, params, state);
            }
        }

        cw.scale_to_canopy();
        fluxes.sum_half_hourly_carbon(cw, params);
        fluxes.omega += cw.omega_canopy;

        submodels.water_balance.update(
            control,
            fluxes,
            met,
            params,
            state,
            cw.trans_canopy,
            cw.omega_canopy,
            cw.rnet_canopy,
        );

        control.hour_idx += 1;
    }

    // Daytime mean decoupling coefficient. A fully dark day has nothing to
    // normalise by; the accumulator stays at zero.
    if sunlight_hrs > 0 {
        fluxes.omega /= sunlight_hrs as f64;
    } else {
        warn!(
            "no sunlit half-hours on day {}; daytime mean decoupling left at zero",
            doy
        );
    }

    state.tsoil /= control.num_half_hours as f64;

    if params.water_stress {
        let (topsoil, root) = submodels
            .water_balance
            .soil_moisture_factors(control, params, state);
        state.wtfac_topsoil = topsoil;
        state.wtfac_root = root;
    } else {
        // Debugging bypass, not a physical result.
        state.wtfac_topsoil = 1.0;
        state.wtfac_root = 1.0;
    }

    Ok(())
}
