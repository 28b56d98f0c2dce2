//! Nitrogen at the top of the canopy.

use crate::params::CanopyParameters;
use crate::state::EcosystemState;

/// Nitrogen extinction coefficient through the canopy; shallower than the
/// radiation extinction coefficient (Chen et al. 1993, Oecologia 93, 63-69).
const KN: f64 = 0.3;

/// Nitrogen content at the top of the canopy, N0 (g N m-2).
///
/// The canopy nitrogen pool follows from the shoot N:C ratio and leaf mass
/// per area; N0 is the value of the exponentially declining nitrogen profile
/// at the canopy top. Zero for a leafless canopy.
pub fn top_of_canopy_nitrogen(params: &CanopyParameters, state: &EcosystemState) -> f64 {
    if state.lai > 0.0 {
        let ntot = state.shootnc * params.leaf_mass_per_area() * state.lai;
        ntot * KN / (1.0 - (-KN * state.lai).exp())
    } else {
        0.0
    }
}
