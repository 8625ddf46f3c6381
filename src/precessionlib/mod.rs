//! Precession of the equator and ecliptic
//!
//! Capitaine et al. (2003) four-angle formulation (A&A 412, 567-586),
//! P = R3(χA) · R1(-ωA) · R3(-ψA) · R1(ε0), mapping the J2000 mean equator
//! onto the mean equator of date. The polynomials are only accurate to a few
//! arcseconds at the ends of the multi-millennium model windows, which is
//! below the truncation error of the planetary series.

use crate::constants::{ASEC2RAD, DAYS_PER_CENTURY, J2000};
use crate::framelib::{rot_x, rot_z};
use nalgebra::Matrix3;

/// Mean obliquity at J2000.0 in arcseconds
const EPS0: f64 = 84381.406;

/// The three time-dependent precession angles, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecessionAngles {
    /// Luni-solar precession ψA
    pub psi_a: f64,
    /// Inclination of the mean equator of date on the J2000 ecliptic, ωA
    pub omega_a: f64,
    /// Planetary precession χA
    pub chi_a: f64,
}

/// Precession angles at `t` Julian centuries (TT) from J2000.0
pub fn precession_angles(t: f64) -> PrecessionAngles {
    let psi_a = ((((-0.0000000951 * t + 0.000132851) * t - 0.00114045) * t - 1.0790069) * t
        + 5038.481507)
        * t;
    let omega_a =
        ((((0.0000003337 * t - 0.000000467) * t - 0.00772503) * t + 0.0512623) * t - 0.025754) * t
            + EPS0;
    let chi_a = ((((-0.0000000560 * t + 0.000170663) * t - 0.00121197) * t - 2.3814292) * t
        + 10.556403)
        * t;

    PrecessionAngles {
        psi_a: psi_a * ASEC2RAD,
        omega_a: omega_a * ASEC2RAD,
        chi_a: chi_a * ASEC2RAD,
    }
}

/// Compute the precession matrix for a TT Julian date
///
/// Maps vectors on the J2000 mean equator to the mean equator of date;
/// its transpose goes back.
pub fn compute_precession(jd_tt: f64) -> Matrix3<f64> {
    let a = precession_angles((jd_tt - J2000) / DAYS_PER_CENTURY);
    rot_z(a.chi_a) * rot_x(-a.omega_a) * rot_z(-a.psi_a) * rot_x(EPS0 * ASEC2RAD)
}

/// General precession in longitude accumulated since J2000.0, in radians
///
/// Lieske et al. (1977) rate, sufficient to strip the equinox drift from
/// longitudes referred to the ecliptic of date.
pub fn general_precession_in_longitude(t_centuries: f64) -> f64 {
    (5029.0966 + 1.11113 * t_centuries) * t_centuries * ASEC2RAD
}

/// Rate of [`general_precession_in_longitude`] in radians per century
pub fn general_precession_rate(t_centuries: f64) -> f64 {
    (5029.0966 + 2.0 * 1.11113 * t_centuries) * ASEC2RAD
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthonormal(m: &Matrix3<f64>) {
        let product = m.transpose() * m;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-14);
            }
        }
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_precession_at_j2000_is_identity() {
        let p = compute_precession(J2000);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(p[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_precession_orthogonality() {
        assert_orthonormal(&compute_precession(J2000 + 3652.5));
        assert_orthonormal(&compute_precession(J2000 - 365_250.0));
    }

    #[test]
    fn test_equinox_moves_west() {
        // A century of precession raises the RA of the J2000 equinox by ~1.28°
        let p = compute_precession(J2000 + DAYS_PER_CENTURY);
        let v = p * nalgebra::Vector3::new(1.0, 0.0, 0.0);
        let ra = v.y.atan2(v.x).to_degrees();
        assert_relative_eq!(ra, 1.2816, epsilon = 1e-3);
    }

    #[test]
    fn test_general_precession() {
        // About 50.29 arcseconds per year
        let one_year = general_precession_in_longitude(0.01) / ASEC2RAD;
        assert_relative_eq!(one_year, 50.29, epsilon = 0.01);
        assert_relative_eq!(
            general_precession_rate(0.0),
            5029.0966 * ASEC2RAD,
            epsilon = 1e-15
        );
    }
}
