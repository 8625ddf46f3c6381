//! Nutation in longitude and obliquity
//!
//! The 1980 IAU theory as tabulated by Meeus (*Astronomical Algorithms*,
//! table 22.A): the 63 largest lunisolar terms, good to about 0.01″ over
//! the historical era. Arguments are the Delaunay variables of the IERS 2003
//! conventions. Also provides the mean obliquity, the nutation rotation
//! matrix and the equation of the equinoxes.

use crate::constants::{ASEC2RAD, DAYS_PER_CENTURY, J2000};
use nalgebra::Matrix3;

/// Table units are 0.0001 arcsecond
const TABLE_UNIT_RAD: f64 = ASEC2RAD * 1e-4;

/// Fundamental argument polynomial coefficients
///
/// Each row: [constant, t^1, t^2, t^3, t^4] in arcseconds
/// From IERS Conventions (2003), Chapter 5
#[rustfmt::skip]
const FA_COEFFS: [[f64; 5]; 5] = [
    // Mean Anomaly of the Moon (l)
    [485868.249036, 1717915923.2178, 31.8792, 0.051635, -0.00024470],
    // Mean Anomaly of the Sun (l')
    [1287104.79305, 129596581.0481, -0.5532, 0.000136, -0.00001149],
    // Mean Longitude of Moon - Ascending Node (F)
    [335779.526232, 1739527262.8478, -12.7512, -0.001037, 0.00000417],
    // Mean Elongation of Moon from Sun (D)
    [1072260.70369, 1602961601.2090, -6.3706, 0.006593, -0.00003169],
    // Mean Longitude of Ascending Node of Moon (Omega)
    [450160.398036, -6962890.5431, 7.4722, 0.007702, -0.00005939],
];

/// Multipliers of (l, l', F, D, Ω) and coefficients
/// [Δψ sin, Δψ sin · t, Δε cos, Δε cos · t] in 0.0001″.
#[rustfmt::skip]
const NUTATION_TERMS: [([i8; 5], [f64; 4]); 63] = [
    ([  0,   0,   0,   0,   1], [ -171996.0, -174.2,  92025.0,   8.9]),
    ([  0,   0,   2,  -2,   2], [  -13187.0,   -1.6,   5736.0,  -3.1]),
    ([  0,   0,   2,   0,   2], [   -2274.0,   -0.2,    977.0,  -0.5]),
    ([  0,   0,   0,   0,   2], [    2062.0,    0.2,   -895.0,   0.5]),
    ([  0,   1,   0,   0,   0], [    1426.0,   -3.4,     54.0,  -0.1]),
    ([  1,   0,   0,   0,   0], [     712.0,    0.1,     -7.0,   0.0]),
    ([  0,   1,   2,  -2,   2], [    -517.0,    1.2,    224.0,  -0.6]),
    ([  0,   0,   2,   0,   1], [    -386.0,   -0.4,    200.0,   0.0]),
    ([  1,   0,   2,   0,   2], [    -301.0,    0.0,    129.0,  -0.1]),
    ([  0,  -1,   2,  -2,   2], [     217.0,   -0.5,    -95.0,   0.3]),
    ([  1,   0,   0,  -2,   0], [    -158.0,    0.0,      0.0,   0.0]),
    ([  0,   0,   2,  -2,   1], [     129.0,    0.1,    -70.0,   0.0]),
    ([ -1,   0,   2,   0,   2], [     123.0,    0.0,    -53.0,   0.0]),
    ([  0,   0,   0,   2,   0], [      63.0,    0.0,      0.0,   0.0]),
    ([  1,   0,   0,   0,   1], [      63.0,    0.1,    -33.0,   0.0]),
    ([ -1,   0,   2,   2,   2], [     -59.0,    0.0,     26.0,   0.0]),
    ([ -1,   0,   0,   0,   1], [     -58.0,   -0.1,     32.0,   0.0]),
    ([  1,   0,   2,   0,   1], [     -51.0,    0.0,     27.0,   0.0]),
    ([  2,   0,   0,  -2,   0], [      48.0,    0.0,      0.0,   0.0]),
    ([ -2,   0,   2,   0,   1], [      46.0,    0.0,    -24.0,   0.0]),
    ([  0,   0,   2,   2,   2], [     -38.0,    0.0,     16.0,   0.0]),
    ([  2,   0,   2,   0,   2], [     -31.0,    0.0,     13.0,   0.0]),
    ([  2,   0,   0,   0,   0], [      29.0,    0.0,      0.0,   0.0]),
    ([  1,   0,   2,  -2,   2], [      29.0,    0.0,    -12.0,   0.0]),
    ([  0,   0,   2,   0,   0], [      26.0,    0.0,      0.0,   0.0]),
    ([  0,   0,   2,  -2,   0], [     -22.0,    0.0,      0.0,   0.0]),
    ([ -1,   0,   2,   0,   1], [      21.0,    0.0,    -10.0,   0.0]),
    ([  0,   2,   0,   0,   0], [      17.0,   -0.1,      0.0,   0.0]),
    ([ -1,   0,   0,   2,   1], [      16.0,    0.0,     -8.0,   0.0]),
    ([  0,   2,   2,  -2,   2], [     -16.0,    0.1,      7.0,   0.0]),
    ([  0,   1,   0,   0,   1], [     -15.0,    0.0,      9.0,   0.0]),
    ([  1,   0,   0,  -2,   1], [     -13.0,    0.0,      7.0,   0.0]),
    ([  0,  -1,   0,   0,   1], [     -12.0,    0.0,      6.0,   0.0]),
    ([  2,   0,  -2,   0,   0], [      11.0,    0.0,      0.0,   0.0]),
    ([ -1,   0,   2,   2,   1], [     -10.0,    0.0,      5.0,   0.0]),
    ([  1,   0,   2,   2,   2], [      -8.0,    0.0,      3.0,   0.0]),
    ([  0,   1,   2,   0,   2], [       7.0,    0.0,     -3.0,   0.0]),
    ([  1,   1,   0,  -2,   0], [      -7.0,    0.0,      0.0,   0.0]),
    ([  0,  -1,   2,   0,   2], [      -7.0,    0.0,      3.0,   0.0]),
    ([  0,   0,   2,   2,   1], [      -7.0,    0.0,      3.0,   0.0]),
    ([  1,   0,   0,   2,   0], [       6.0,    0.0,      0.0,   0.0]),
    ([  2,   0,   2,  -2,   2], [       6.0,    0.0,     -3.0,   0.0]),
    ([  1,   0,   2,  -2,   1], [       6.0,    0.0,     -3.0,   0.0]),
    ([ -2,   0,   0,   2,   1], [      -6.0,    0.0,      3.0,   0.0]),
    ([  0,   0,   0,   2,   1], [      -6.0,    0.0,      3.0,   0.0]),
    ([  1,  -1,   0,   0,   0], [       5.0,    0.0,      0.0,   0.0]),
    ([  0,  -1,   2,  -2,   1], [      -5.0,    0.0,      3.0,   0.0]),
    ([  0,   0,   0,  -2,   1], [      -5.0,    0.0,      3.0,   0.0]),
    ([  2,   0,   2,   0,   1], [      -5.0,    0.0,      3.0,   0.0]),
    ([  2,   0,   0,  -2,   1], [       4.0,    0.0,      0.0,   0.0]),
    ([  0,   1,   2,  -2,   1], [       4.0,    0.0,      0.0,   0.0]),
    ([  1,   0,  -2,   0,   0], [       4.0,    0.0,      0.0,   0.0]),
    ([  1,   0,   0,  -1,   0], [      -4.0,    0.0,      0.0,   0.0]),
    ([  0,   1,   0,  -2,   0], [      -4.0,    0.0,      0.0,   0.0]),
    ([  0,   0,   0,   1,   0], [      -4.0,    0.0,      0.0,   0.0]),
    ([  1,   0,   2,   0,   0], [       3.0,    0.0,      0.0,   0.0]),
    ([ -2,   0,   2,   0,   2], [      -3.0,    0.0,      0.0,   0.0]),
    ([  1,  -1,   0,  -1,   0], [      -3.0,    0.0,      0.0,   0.0]),
    ([  1,   1,   0,   0,   0], [      -3.0,    0.0,      0.0,   0.0]),
    ([  1,  -1,   2,   0,   2], [      -3.0,    0.0,      0.0,   0.0]),
    ([ -1,  -1,   2,   2,   2], [      -3.0,    0.0,      0.0,   0.0]),
    ([  3,   0,   2,   0,   2], [      -3.0,    0.0,      0.0,   0.0]),
    ([  0,  -1,   2,   2,   2], [      -3.0,    0.0,      0.0,   0.0]),
];

/// Compute the five fundamental arguments (Delaunay variables) in radians
///
/// # Arguments
/// * `t` - TT in Julian centuries since J2000.0
pub fn fundamental_arguments(t: f64) -> [f64; 5] {
    let mut fa = [0.0f64; 5];
    for (i, coeffs) in FA_COEFFS.iter().enumerate() {
        let val = coeffs[0] + (coeffs[1] + (coeffs[2] + (coeffs[3] + coeffs[4] * t) * t) * t) * t;
        fa[i] = val * ASEC2RAD;
    }
    fa
}

/// Compute nutation angles (delta-psi, delta-epsilon) in radians
///
/// Terms are summed in table order.
///
/// # Arguments
/// * `jd_tt` - TT Julian date
pub fn nutation(jd_tt: f64) -> (f64, f64) {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;
    let fa = fundamental_arguments(t);

    let mut d_psi = 0.0;
    let mut d_eps = 0.0;
    for (multipliers, [psi, psi_t, eps, eps_t]) in NUTATION_TERMS.iter() {
        let arg: f64 = multipliers
            .iter()
            .zip(fa.iter())
            .map(|(&k, &a)| f64::from(k) * a)
            .sum();
        let (sin_arg, cos_arg) = arg.sin_cos();
        d_psi += (psi + psi_t * t) * sin_arg;
        d_eps += (eps + eps_t * t) * cos_arg;
    }

    (d_psi * TABLE_UNIT_RAD, d_eps * TABLE_UNIT_RAD)
}

/// Compute the mean obliquity of the ecliptic in radians
///
/// From Capitaine et al. (2003), Astronomy and Astrophysics 412, 567-586.
///
/// # Arguments
/// * `jd_tt` - TT Julian date
pub fn mean_obliquity(jd_tt: f64) -> f64 {
    let t = (jd_tt - J2000) / DAYS_PER_CENTURY;

    let epsilon = ((((-0.0000000434 * t - 0.000000576) * t + 0.00200340) * t - 0.0001831) * t
        - 46.836769)
        * t
        + 84381.406;

    epsilon * ASEC2RAD
}

/// True obliquity of the ecliptic (mean plus nutation) in radians
pub fn true_obliquity(jd_tt: f64) -> f64 {
    let (_, d_eps) = nutation(jd_tt);
    mean_obliquity(jd_tt) + d_eps
}

/// Equation of the equinoxes (apparent minus mean sidereal time) in radians
///
/// Δψ cos ε, without the sub-milliarcsecond complementary terms.
pub fn equation_of_the_equinoxes(jd_tt: f64) -> f64 {
    let (d_psi, d_eps) = nutation(jd_tt);
    d_psi * (mean_obliquity(jd_tt) + d_eps).cos()
}

/// Build the nutation rotation matrix
///
/// Maps the mean equator and equinox of date onto the true equator and
/// equinox of date.
///
/// # Arguments
/// * `mean_obliquity_rad` - mean obliquity of ecliptic in radians
/// * `d_psi` - nutation in longitude in radians
/// * `d_eps` - nutation in obliquity in radians
pub fn build_nutation_matrix(mean_obliquity_rad: f64, d_psi: f64, d_eps: f64) -> Matrix3<f64> {
    let eps_mean = mean_obliquity_rad;
    let eps_true = eps_mean + d_eps;

    let (sobm, cobm) = eps_mean.sin_cos();
    let (sobt, cobt) = eps_true.sin_cos();
    let (spsi, cpsi) = d_psi.sin_cos();

    #[rustfmt::skip]
    let n = Matrix3::new(
        cpsi,          -spsi * cobm,                      -spsi * sobm,
        spsi * cobt,    cpsi * cobm * cobt + sobm * sobt,  cpsi * sobm * cobt - cobm * sobt,
        spsi * sobt,    cpsi * cobm * sobt - sobm * cobt,  cpsi * sobm * sobt + cobm * cobt,
    );

    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fundamental_arguments_at_j2000() {
        let fa = fundamental_arguments(0.0);
        assert_relative_eq!(fa[0], FA_COEFFS[0][0] * ASEC2RAD, epsilon = 1e-10);
        assert_relative_eq!(fa[4], FA_COEFFS[4][0] * ASEC2RAD, epsilon = 1e-10);
    }

    #[test]
    fn test_nutation_meeus_example_22a() {
        // 1987 April 10, 0h TD
        let (d_psi, d_eps) = nutation(2_446_895.5);
        assert_relative_eq!(d_psi / ASEC2RAD, -3.788, epsilon = 0.002);
        assert_relative_eq!(d_eps / ASEC2RAD, 9.443, epsilon = 0.002);
    }

    #[test]
    fn test_mean_obliquity_at_j2000() {
        let eps_deg = mean_obliquity(J2000).to_degrees();
        assert_relative_eq!(eps_deg, 23.4393, epsilon = 0.001);
    }

    #[test]
    fn test_true_obliquity_meeus_example_22a() {
        // Meeus gives 23°26'36.850" for the true obliquity
        let eps = true_obliquity(2_446_895.5).to_degrees();
        assert_relative_eq!(eps, 23.0 + 26.0 / 60.0 + 36.85 / 3600.0, epsilon = 2e-5);
    }

    #[test]
    fn test_nutation_matrix_orthogonality() {
        let eps = mean_obliquity(J2000);
        let (d_psi, d_eps) = nutation(J2000);
        let n = build_nutation_matrix(eps, d_psi, d_eps);
        let product = n.transpose() * n;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-14);
            }
        }
        assert_relative_eq!(n.determinant(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_equation_of_the_equinoxes_bounded() {
        for k in 0..20 {
            let eqeq = equation_of_the_equinoxes(J2000 + 1000.0 * k as f64) / ASEC2RAD;
            assert!(eqeq.abs() < 18.0, "eqeq = {eqeq} arcseconds");
        }
    }
}
