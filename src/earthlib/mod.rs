//! Earth rotation, sidereal time and atmospheric refraction
//!
//! Implements the Earth Rotation Angle (ERA) per IAU 2000 Resolution B1.8,
//! Greenwich Mean Sidereal Time (GMST) per USNO Circular 179, Section 2.6.2,
//! and atmospheric refraction per the Bennett (1982) formula.

use crate::config::Atmosphere;
use crate::constants::{DEG2RAD, J2000};

/// Compute the Earth Rotation Angle (ERA) for a UT1 date
///
/// Returns a fraction between 0.0 and 1.0 representing whole rotations.
///
/// # Arguments
/// * `jd_ut1` - UT1 Julian date (whole part)
/// * `fraction_ut1` - UT1 Julian date (fractional part)
pub fn earth_rotation_angle(jd_ut1: f64, fraction_ut1: f64) -> f64 {
    let th = 0.7790572732640 + 0.00273781191135448 * (jd_ut1 - J2000 + fraction_ut1);
    (th.rem_euclid(1.0) + jd_ut1.rem_euclid(1.0) + fraction_ut1).rem_euclid(1.0)
}

/// Compute Greenwich Mean Sidereal Time (GMST) in hours
///
/// Equinox method: ERA plus the precession-in-RA polynomial of
/// Capitaine et al. (2003), eq. (42).
///
/// # Arguments
/// * `jd_ut1_whole` - UT1 Julian date (whole part)
/// * `ut1_fraction` - UT1 Julian date (fractional part)
/// * `tt_centuries` - TT in Julian centuries since J2000.0
pub fn sidereal_time(jd_ut1_whole: f64, ut1_fraction: f64, tt_centuries: f64) -> f64 {
    let theta = earth_rotation_angle(jd_ut1_whole, ut1_fraction);

    let t = tt_centuries;
    let st = 0.014506
        + ((((-0.0000000368 * t - 0.000029956) * t - 0.00000044) * t + 1.3915817) * t
            + 4612.156534)
            * t;

    // st is in arcseconds (54000 per hour), theta in rotations
    (st / 54000.0 + theta * 24.0).rem_euclid(24.0)
}

/// Compute atmospheric refraction for an observed altitude.
///
/// Given the altitude at which a body is observed, returns the amount by
/// which the atmosphere has raised it, in degrees. Zero outside the range
/// [-1°, 89.9°] and for an atmosphere without pressure.
pub fn refraction(alt_degrees: f64, atmosphere: &Atmosphere) -> f64 {
    if !atmosphere.refracts() || !(-1.0..=89.9).contains(&alt_degrees) {
        return 0.0;
    }
    let r = 0.016667 / ((alt_degrees + 7.31 / (alt_degrees + 4.4)) * DEG2RAD).tan();
    r * (0.28 * atmosphere.pressure_mbar / (atmosphere.temperature_c + 273.0))
}

/// Apply atmospheric refraction to a true (geometric) altitude.
///
/// Returns the altitude at which the body appears. Fixed-point iteration on
/// [`refraction`], converging in three or four steps.
pub fn refract(alt_degrees: f64, atmosphere: &Atmosphere) -> f64 {
    let mut refracted = alt_degrees;
    for _ in 0..10 {
        let new = alt_degrees + refraction(refracted, atmosphere);
        if (new - refracted).abs() < 3.0e-5 {
            return new;
        }
        refracted = new;
    }
    refracted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_era_at_j2000() {
        let era = earth_rotation_angle(J2000, 0.0);
        assert_relative_eq!(era, 0.7790572732640, epsilon = 1e-10);
    }

    #[test]
    fn test_era_range() {
        for offset in &[-1000.0, -100.0, 0.0, 100.0, 1000.0] {
            let era = earth_rotation_angle(J2000 + offset, 0.0);
            assert!(
                (0.0..1.0).contains(&era),
                "ERA out of range for offset {offset}: {era}"
            );
        }
    }

    #[test]
    fn test_gmst_at_j2000() {
        let gmst = sidereal_time(J2000, 0.0, 0.0);
        assert_relative_eq!(gmst, 18.697, epsilon = 0.01);
    }

    #[test]
    fn test_gmst_increases_with_time() {
        let gmst1 = sidereal_time(J2000, 0.0, 0.0);
        let gmst2 = sidereal_time(J2000, 0.01, 0.01 / 36525.0);
        let diff = (gmst2 - gmst1 + 24.0) % 24.0;
        assert!(diff > 0.2 && diff < 0.3, "GMST increase = {diff}");
    }

    #[test]
    fn test_sidereal_day_length() {
        // One sidereal day later GMST returns to the same value
        let sidereal_day = 0.997_269_566_3;
        let g1 = sidereal_time(J2000, 0.0, 0.0);
        let g2 = sidereal_time(J2000, sidereal_day, sidereal_day / 36525.0);
        assert_relative_eq!(g1, g2, epsilon = 1e-5);
    }

    #[test]
    fn test_refraction_at_horizon() {
        let r = refraction(0.0, &Atmosphere::default());
        assert!(r > 0.4 && r < 0.7, "Horizon refraction should be ~0.5°, got {r}");
    }

    #[test]
    fn test_refraction_at_zenith() {
        assert_relative_eq!(refraction(90.0, &Atmosphere::default()), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_refraction_without_atmosphere() {
        assert_eq!(refraction(0.0, &Atmosphere::none()), 0.0);
        assert_eq!(refract(5.0, &Atmosphere::none()), 5.0);
    }

    #[test]
    fn test_refraction_at_45() {
        let r = refraction(45.0, &Atmosphere::default());
        assert!(r > 0.01 && r < 0.03, "45° refraction should be ~0.02°, got {r}");
    }

    #[test]
    fn test_refract_is_self_consistent() {
        let atm = Atmosphere {
            temperature_c: 15.0,
            pressure_mbar: 1013.25,
        };
        let true_alt = 10.0;
        let apparent = refract(true_alt, &atm);
        assert!(apparent > true_alt && apparent - true_alt < 0.2);
        assert_relative_eq!(apparent - refraction(apparent, &atm), true_alt, epsilon = 1e-4);
    }
}
