//! Unit helpers built on the `uom` crate
//!
//! Engine internals work in plain `f64` (AU, AU/day, radians, days). The
//! functions here convert at the boundary, either to typed `uom` quantities
//! or between the handful of plain units the public API reports.

pub use uom::si::angle;
pub use uom::si::f64::Angle;
pub use uom::si::f64::Length;
pub use uom::si::f64::Time;
pub use uom::si::f64::Velocity;

pub use uom::si::angle::degree;
pub use uom::si::angle::radian;
pub use uom::si::angle::second as arcsecond;
pub use uom::si::length::astronomical_unit;
pub use uom::si::length::kilometer;
pub use uom::si::length::meter;
pub use uom::si::time::day;
pub use uom::si::time::second;
pub use uom::si::velocity::kilometer_per_second;
pub use uom::si::velocity::meter_per_second;

use crate::constants::AU_M;

/// A distance in AU as a typed length.
///
/// Goes through meters so the exact AU is used rather than `uom`'s rounded one.
pub fn length_from_au(au: f64) -> Length {
    Length::new::<meter>(au * AU_M)
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
///
/// Used whenever a difference of circular quantities is compared against
/// zero, so that the wraparound at 0/360 never looks like a sign change.
pub fn normalize_signed_degrees(degrees: f64) -> f64 {
    let d = normalize_degrees(degrees);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Wrap an angle in hours into `[0, 24)`.
pub fn normalize_hours(hours: f64) -> f64 {
    let h = hours.rem_euclid(24.0);
    if h >= 24.0 {
        0.0
    } else {
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_au_to_km_value() {
        let one_au = Length::new::<astronomical_unit>(1.0);
        let km = one_au.get::<kilometer>();
        // uom's built-in AU is rounded (1.495979e11 m)
        assert_relative_eq!(km, 149_597_900.0, epsilon = 200.0);
        assert_relative_eq!(
            length_from_au(1.0).get::<kilometer>(),
            149_597_870.700,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_length_from_au_units() {
        let d = length_from_au(0.002_569);
        assert_relative_eq!(d.get::<kilometer>(), 0.002_569 * 149_597_870.700, epsilon = 1e-6);
        assert_relative_eq!(d.get::<meter>(), 0.002_569 * AU_M, epsilon = 1e-3);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_relative_eq!(normalize_degrees(370.0), 10.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_degrees(-10.0), 350.0, epsilon = 1e-12);
        assert_eq!(normalize_degrees(-1e-18), 0.0);
    }

    #[test]
    fn test_normalize_signed_degrees() {
        assert_relative_eq!(normalize_signed_degrees(190.0), -170.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_signed_degrees(-180.0), 180.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_signed_degrees(180.0), 180.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_signed_degrees(-179.0), -179.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_hours() {
        assert_relative_eq!(normalize_hours(25.5), 1.5, epsilon = 1e-12);
        assert_relative_eq!(normalize_hours(-1.0), 23.0, epsilon = 1e-12);
    }
}
