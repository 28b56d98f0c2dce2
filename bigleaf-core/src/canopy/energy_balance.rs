//! Coupled leaf energy balance, photosynthesis and stomatal conductance.
//!
//! For each leaf class the engine iterates a fixed-point loop: photosynthesis
//! gives assimilation and stomatal conductance for the current leaf surface
//! state, the combination-equation solver partitions absorbed net radiation
//! between sensible and latent heat, and the residual updates the leaf
//! temperature and the CO2 and vapour deficit at the leaf surface. The loop
//! stops when successive leaf temperatures agree to within 0.02 deg C.
//!
//! References
//! ----------
//! * Wang & Leuning (1998) Agricultural & Forest Meteorology, 91, 89-111.
//! * Leuning et al. (1995) Plant, Cell & Environment, 18, 1183-1200.
//! * Dai et al. (2004) Journal of Climate, 17, 2281-2299.

use crate::canopy::workspace::{CanopyWorkspace, Leaf};
use crate::constants::{CP, DEG_TO_KELVIN, MASS_AIR, PAR_2_SW, SIGMA};
use crate::control::SubDailyControl;
use crate::errors::{CanopyError, CanopyResult};
use crate::met::Met;
use crate::meteo::saturation_vapour_pressure;
use crate::params::CanopyParameters;
use crate::state::EcosystemState;
use crate::submodels::CanopySubmodels;
use log::debug;

/// Iteration bound for one leaf solve.
const MAX_ITERATIONS: usize = 100;

/// Convergence tolerance on successive leaf temperatures (deg C).
const TLEAF_TOLERANCE: f64 = 0.02;

/// Assimilation below which the leaf is treated as non-transpiring for the
/// slot (umol m-2 s-1).
const AN_NON_TRANSPIRING: f64 = 1e-4;

/// Seed the leaf surface state from ambient conditions.
pub fn initialise_leaf_surface(cw: &mut CanopyWorkspace, met: &Met) {
    cw.tleaf = met.tair;
    cw.dleaf = met.vpd;
    cw.cs = met.ca;
}

/// Isothermal net radiation of a leaf (W m-2).
///
/// Absorbed shortwave less the net isothermal longwave loss, with the
/// longwave term attenuated through the canopy. The apparent emissivity of
/// the atmosphere follows Leuning et al. (1995), eqn D4.
pub fn leaf_net_radiation(
    params: &CanopyParameters,
    state: &EcosystemState,
    tair: f64,
    vpd: f64,
    sw_rad: f64,
) -> f64 {
    // extinction coefficient for diffuse radiation and black leaves
    // (m2 ground m-2 leaf)
    let kd = 0.8;

    let tk = tair + DEG_TO_KELVIN;

    // actual vapour pressure of the air (Pa)
    let ea = saturation_vapour_pressure(tair) - vpd;

    // apparent emissivity for a hemisphere radiating at air temperature
    let emissivity_atm = 0.642 * (ea / tk).powf(1.0 / 7.0);

    let net_lw_rad = (1.0 - emissivity_atm) * SIGMA * tk.powi(4);

    params.leaf_abs * sw_rad - net_lw_rad * kd * (-kd * state.lai).exp()
}

/// Resolve a self-consistent leaf state for `leaf`.
///
/// On success the workspace holds the converged assimilation, conductance,
/// transpiration, net radiation and decoupling coefficient for the leaf,
/// together with the leaf-surface temperature, CO2 and vapour deficit. A
/// leaf whose assimilation is at or below the light-compensation floor is
/// left non-transpiring with its radiation and water terms at zero.
///
/// Each call runs its own bounded iteration; exceeding
/// [`MAX_ITERATIONS`] returns [`CanopyError::ConvergenceFailure`] with no
/// partial result.
pub fn solve_leaf(
    control: &SubDailyControl,
    cw: &mut CanopyWorkspace,
    met: &Met,
    params: &CanopyParameters,
    state: &EcosystemState,
    submodels: &CanopySubmodels<'_>,
    leaf: Leaf,
) -> CanopyResult<()> {
    initialise_leaf_surface(cw, met);

    // A leaf that never assimilates this slot must report zero water and
    // radiation terms, not values left over from the previous half-hour.
    cw.trans_leaf[leaf] = 0.0;
    cw.rnet_leaf[leaf] = 0.0;
    cw.omega_leaf[leaf] = 0.0;

    let mut iterations = 0;
    loop {
        let assim = submodels
            .photosynthesis
            .assimilate(control, cw, met, params, state, leaf);
        cw.an_leaf[leaf] = assim.an;
        cw.gsc_leaf[leaf] = assim.gsc;

        if assim.an <= AN_NON_TRANSPIRING {
            // Non-transpiring this slot: transpiration-related quantities
            // keep their zeroed values.
            break;
        }

        let sw_rad = cw.apar_leaf[leaf] * PAR_2_SW;
        cw.rnet_leaf[leaf] = leaf_net_radiation(params, state, met.tair, met.vpd, sw_rad);

        let exch = submodels.gas_exchange.conductance_transpiration(
            met,
            params,
            state,
            cw.tleaf,
            cw.rnet_leaf[leaf],
            cw.gsc_leaf[leaf],
        );
        cw.trans_leaf[leaf] = exch.transpiration;
        cw.omega_leaf[leaf] = exch.omega;

        // Residual energy drives the leaf away from air temperature; a
        // quarter-step keeps the fixed point stable.
        let tdiff = (cw.rnet_leaf[leaf] - exch.latent_heat) / (CP * MASS_AIR * exch.gh);
        cw.tleaf_new = met.tair + tdiff / 4.0;

        cw.cs = met.ca - cw.an_leaf[leaf] / exch.gbc;
        cw.dleaf = cw.trans_leaf[leaf] * met.press / exch.gv;

        let step = (cw.tleaf - cw.tleaf_new).abs();
        if step < TLEAF_TOLERANCE {
            debug!(
                "{:?} leaf converged after {} iterations (tleaf {:.2} deg C)",
                leaf, iterations, cw.tleaf
            );
            break;
        }

        iterations += 1;
        if iterations >= MAX_ITERATIONS {
            return Err(CanopyError::ConvergenceFailure {
                leaf,
                iterations,
                last_step: step,
            });
        }

        cw.tleaf = cw.tleaf_new;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submodels::{
        LeafAssimilation, LeafExchange, LeafGasExchange, Photosynthesis, SoilWaterBalance,
        SolarRadiation,
    };
    use approx::assert_relative_eq;
    use std::cell::Cell;

    // -- Minimal sub-model doubles --

    struct FixedAssimilation {
        an: f64,
        gsc: f64,
    }

    impl Photosynthesis for FixedAssimilation {
        fn assimilate(
            &self,
            _control: &SubDailyControl,
            _cw: &CanopyWorkspace,
            _met: &Met,
            _params: &CanopyParameters,
            _state: &EcosystemState,
            _leaf: Leaf,
        ) -> LeafAssimilation {
            LeafAssimilation {
                an: self.an,
                gsc: self.gsc,
            }
        }
    }

    /// Returns half the net radiation as latent heat; the resulting
    /// temperature update is independent of the current leaf temperature, so
    /// the loop settles on the second pass.
    struct HalfLatentExchange;

    impl LeafGasExchange for HalfLatentExchange {
        fn conductance_transpiration(
            &self,
            _met: &Met,
            _params: &CanopyParameters,
            _state: &EcosystemState,
            _tleaf: f64,
            rnet: f64,
            _gsc: f64,
        ) -> LeafExchange {
            LeafExchange {
                transpiration: 0.002,
                latent_heat: rnet / 2.0,
                gbc: 1.0,
                gh: 2.0,
                gv: 1.5,
                omega: 0.2,
            }
        }
    }

    /// Alternates the latent heat term every call so successive candidate
    /// temperatures never agree.
    struct OscillatingExchange {
        calls: Cell<usize>,
    }

    impl LeafGasExchange for OscillatingExchange {
        fn conductance_transpiration(
            &self,
            _met: &Met,
            _params: &CanopyParameters,
            _state: &EcosystemState,
            _tleaf: f64,
            rnet: f64,
            _gsc: f64,
        ) -> LeafExchange {
            let n = self.calls.get();
            self.calls.set(n + 1);
            let latent_heat = if n % 2 == 0 { rnet + 500.0 } else { rnet - 500.0 };
            LeafExchange {
                transpiration: 0.002,
                latent_heat,
                gbc: 1.0,
                gh: 2.0,
                gv: 1.5,
                omega: 0.2,
            }
        }
    }

    struct UnusedRadiation;

    impl SolarRadiation for UnusedRadiation {
        fn solar_geometry(&self, _doy: f64, _half_hour: usize) -> f64 {
            unreachable!("leaf solve never queries solar geometry")
        }
        fn diffuse_fraction(&self, _doy: f64, _sw_rad: f64) -> f64 {
            unreachable!()
        }
        fn absorbed_par(
            &self,
            _cw: &mut CanopyWorkspace,
            _params: &CanopyParameters,
            _state: &EcosystemState,
            _par: f64,
        ) {
            unreachable!()
        }
    }

    struct UnusedWaterBalance;

    impl SoilWaterBalance for UnusedWaterBalance {
        fn update(
            &self,
            _control: &SubDailyControl,
            _fluxes: &mut crate::canopy::fluxes::DailyFluxes,
            _met: &Met,
            _params: &CanopyParameters,
            _state: &mut EcosystemState,
            _trans_canopy: f64,
            _omega_canopy: f64,
            _rnet_canopy: f64,
        ) {
            unreachable!("leaf solve never touches the water balance")
        }
        fn soil_water_potential(
            &self,
            _control: &SubDailyControl,
            _params: &CanopyParameters,
            _state: &mut EcosystemState,
        ) {
            unreachable!()
        }
        fn soil_moisture_factors(
            &self,
            _control: &SubDailyControl,
            _params: &CanopyParameters,
            _state: &EcosystemState,
        ) -> (f64, f64) {
            unreachable!()
        }
    }

    fn daytime_met() -> Met {
        Met {
            tair: 25.0,
            vpd: 1500.0,
            par: 1500.0,
            sw_rad: 650.0,
            press: 101_325.0,
            ca: 400.0,
            wind: 2.5,
            ..Default::default()
        }
    }

    fn solve_with(
        photosynthesis: &dyn Photosynthesis,
        gas_exchange: &dyn LeafGasExchange,
        cw: &mut CanopyWorkspace,
    ) -> CanopyResult<()> {
        let control = SubDailyControl::default();
        let met = daytime_met();
        let params = CanopyParameters::default();
        let state = EcosystemState::default();
        let submodels = CanopySubmodels {
            radiation: &UnusedRadiation,
            photosynthesis,
            gas_exchange,
            water_balance: &UnusedWaterBalance,
        };
        solve_leaf(&control, cw, &met, &params, &state, &submodels, Leaf::Sunlit)
    }

    // -- Isothermal net radiation --

    #[test]
    fn net_radiation_regression_value() {
        // tair 25 deg C, vpd 1000 Pa, absorbed shortwave 200 W m-2, LAI 3,
        // absorptance 0.8
        let params = CanopyParameters {
            leaf_abs: 0.8,
            ..Default::default()
        };
        let state = EcosystemState {
            lai: 3.0,
            ..Default::default()
        };
        let rnet = leaf_net_radiation(&params, &state, 25.0, 1000.0, 200.0);
        assert_relative_eq!(rnet, 155.2212021635548, epsilon = 1e-6);
    }

    #[test]
    fn denser_canopy_loses_less_longwave() {
        let params = CanopyParameters::default();
        let sparse = EcosystemState {
            lai: 0.5,
            ..Default::default()
        };
        let dense = EcosystemState {
            lai: 5.0,
            ..Default::default()
        };
        let rnet_sparse = leaf_net_radiation(&params, &sparse, 25.0, 1000.0, 200.0);
        let rnet_dense = leaf_net_radiation(&params, &dense, 25.0, 1000.0, 200.0);
        assert!(
            rnet_dense > rnet_sparse,
            "longwave loss should attenuate with LAI: {} vs {}",
            rnet_dense,
            rnet_sparse
        );
    }

    // -- Leaf surface initialisation --

    #[test]
    fn leaf_surface_seeded_from_ambient() {
        let mut cw = CanopyWorkspace::new();
        let met = daytime_met();
        initialise_leaf_surface(&mut cw, &met);
        assert_eq!(cw.tleaf, met.tair);
        assert_eq!(cw.dleaf, met.vpd);
        assert_eq!(cw.cs, met.ca);
    }

    // -- Fixed-point iteration --

    #[test]
    fn converged_solve_updates_leaf_surface_state() {
        let photo = FixedAssimilation { an: 10.0, gsc: 0.25 };
        let mut cw = CanopyWorkspace::new();
        cw.apar_leaf[Leaf::Sunlit] = 1000.0;

        solve_with(&photo, &HalfLatentExchange, &mut cw).unwrap();

        let met = daytime_met();
        assert_eq!(cw.an_leaf[Leaf::Sunlit], 10.0);
        assert_eq!(cw.gsc_leaf[Leaf::Sunlit], 0.25);
        assert!(cw.rnet_leaf[Leaf::Sunlit] > 0.0);
        assert_eq!(cw.trans_leaf[Leaf::Sunlit], 0.002);
        assert_eq!(cw.omega_leaf[Leaf::Sunlit], 0.2);
        // Cs = Ca - An/gbc and dleaf = E * P / gv at the returned conductances
        assert_relative_eq!(cw.cs, met.ca - 10.0 / 1.0, epsilon = 1e-12);
        assert_relative_eq!(cw.dleaf, 0.002 * met.press / 1.5, epsilon = 1e-9);
        // warmer than air: latent heat only removes half the net radiation
        assert!(cw.tleaf > met.tair);
    }

    #[test]
    fn non_transpiring_leaf_terminates_immediately() {
        let photo = FixedAssimilation {
            an: 0.0,
            gsc: 0.001,
        };
        let mut cw = CanopyWorkspace::new();
        cw.apar_leaf[Leaf::Sunlit] = 15.0;

        solve_with(&photo, &OscillatingExchange { calls: Cell::new(0) }, &mut cw).unwrap();

        assert_eq!(cw.an_leaf[Leaf::Sunlit], 0.0);
        assert_eq!(cw.gsc_leaf[Leaf::Sunlit], 0.001);
        assert_eq!(cw.trans_leaf[Leaf::Sunlit], 0.0);
        assert_eq!(cw.rnet_leaf[Leaf::Sunlit], 0.0);
        assert_eq!(cw.omega_leaf[Leaf::Sunlit], 0.0);
    }

    #[test]
    fn oscillating_energy_balance_is_a_convergence_failure() {
        let photo = FixedAssimilation { an: 10.0, gsc: 0.25 };
        let mut cw = CanopyWorkspace::new();
        cw.apar_leaf[Leaf::Sunlit] = 1000.0;

        let err = solve_with(
            &photo,
            &OscillatingExchange { calls: Cell::new(0) },
            &mut cw,
        )
        .unwrap_err();

        match err {
            CanopyError::ConvergenceFailure {
                leaf, iterations, ..
            } => {
                assert_eq!(leaf, Leaf::Sunlit);
                assert_eq!(iterations, 100);
            }
            other => panic!("expected ConvergenceFailure, got {:?}", other),
        }
    }
}
