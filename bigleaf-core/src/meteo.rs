//! Meteorological helper functions shared by the engine and its sub-models.

/// Saturation vapour pressure of air (Pa) at temperature `tair` (deg C).
///
/// Magnus-type formulation from Jones (1992), Appendix 4.
pub fn saturation_vapour_pressure(tair: f64) -> f64 {
    613.75 * (17.502 * tair / (240.97 + tair)).exp()
}

/// Slope of the saturation vapour pressure curve (Pa K-1) at `tair` (deg C).
///
/// Analytical derivative of [`saturation_vapour_pressure`]; used by
/// Penman-type combination equations.
pub fn slope_saturation_vapour_pressure(tair: f64) -> f64 {
    let denom = 240.97 + tair;
    saturation_vapour_pressure(tair) * 17.502 * 240.97 / (denom * denom)
}

/// Psychrometric constant (Pa K-1) at air pressure `press` (Pa).
pub fn psychrometric_constant(press: f64) -> f64 {
    use crate::constants::{CP, EPSILON, H2OLV0};
    CP * press / (EPSILON * H2OLV0)
}

/// Latent heat of vaporisation of water (J mol-1) at `tair` (deg C).
///
/// Linear temperature correction about the 0 deg C value.
pub fn latent_heat_of_vapourisation(tair: f64) -> f64 {
    use crate::constants::{H2OLV0, MASS_WATER};
    (H2OLV0 - 2365.0 * tair) * MASS_WATER
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn saturation_vapour_pressure_reference_values() {
        assert_relative_eq!(saturation_vapour_pressure(0.0), 613.75, epsilon = 1e-10);
        assert_relative_eq!(
            saturation_vapour_pressure(25.0),
            3180.1957481450127,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            saturation_vapour_pressure(20.0),
            2346.995496985419,
            epsilon = 1e-6
        );
    }

    #[test]
    fn slope_matches_finite_difference() {
        let t = 25.0;
        let dt = 1e-4;
        let numeric = (saturation_vapour_pressure(t + dt) - saturation_vapour_pressure(t - dt))
            / (2.0 * dt);
        assert_relative_eq!(
            slope_saturation_vapour_pressure(t),
            numeric,
            max_relative = 1e-6
        );
    }

    #[test]
    fn psychrometric_constant_near_standard_pressure() {
        // ~67 Pa K-1 at sea level
        let gamma = psychrometric_constant(101_325.0);
        assert!(
            (60.0..75.0).contains(&gamma),
            "gamma at sea level should be ~67 Pa K-1, got {}",
            gamma
        );
    }

    #[test]
    fn latent_heat_decreases_with_temperature() {
        assert!(latent_heat_of_vapourisation(0.0) > latent_heat_of_vapourisation(30.0));
        // ~44 kJ mol-1 near 20 deg C
        let lambda = latent_heat_of_vapourisation(20.0);
        assert!(
            (43_000.0..46_000.0).contains(&lambda),
            "lambda near 20 deg C should be ~44 kJ mol-1, got {}",
            lambda
        );
    }
}
