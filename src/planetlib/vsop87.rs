//! VSOP87D evaluation
//!
//! VSOP87D gives heliocentric spherical coordinates (L, B, R) referred to
//! the mean ecliptic and equinox of date, as power series in τ, Julian
//! millennia of TT from J2000.0. This module turns them into a Cartesian
//! state on the J2000 mean equator. Velocities come from the analytic
//! derivative of the same series.

use nalgebra::Vector3;

use crate::constants::DAYS_PER_MILLENNIUM;
use crate::framelib::{mean_ecliptic_of_date_to_j2000, Frame, Origin, StateVector};
use crate::precessionlib::general_precession_rate;
use crate::serieslib::{PowerSeries, Term};
use crate::time::Time;

/// Coefficient tables of one planet
#[derive(Debug, Clone, Copy)]
pub(crate) struct Vsop87Model {
    pub longitude: &'static [&'static [Term]],
    pub latitude: &'static [&'static [Term]],
    pub radius: &'static [&'static [Term]],
}

/// Spherical coordinates and their rates, per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SphericalState {
    /// Longitude, latitude (radians) and radius (AU)
    pub lbr: [f64; 3],
    /// Rates of the above per day, in the rotating ecliptic of date
    pub rates: [f64; 3],
}

impl Vsop87Model {
    /// (L, B, R) referred to the mean ecliptic and equinox of date
    pub fn spherical(&self, time: &Time) -> SphericalState {
        let tau = time.tt_millennia();
        let (l, dl) = PowerSeries::new(self.longitude).value_and_rate(tau);
        let (b, db) = PowerSeries::new(self.latitude).value_and_rate(tau);
        let (r, dr) = PowerSeries::new(self.radius).value_and_rate(tau);
        SphericalState {
            lbr: [l.rem_euclid(std::f64::consts::TAU), b, r],
            rates: [
                dl / DAYS_PER_MILLENNIUM,
                db / DAYS_PER_MILLENNIUM,
                dr / DAYS_PER_MILLENNIUM,
            ],
        }
    }

    /// Heliocentric state on the J2000 mean equator
    pub fn heliocentric_state(&self, time: Time) -> StateVector {
        let SphericalState {
            lbr: [l, b, r],
            rates: [dl, db, dr],
        } = self.spherical(&time);

        // The equinox of date drifts along the ecliptic; remove that drift so
        // the velocity is inertial.
        let dl = dl - general_precession_rate(time.tt_centuries()) / 36_525.0;

        let (sl, cl) = l.sin_cos();
        let (sb, cb) = b.sin_cos();
        let position = Vector3::new(r * cb * cl, r * cb * sl, r * sb);
        let velocity = Vector3::new(
            dr * cb * cl - r * sb * db * cl - r * cb * sl * dl,
            dr * cb * sl - r * sb * db * sl + r * cb * cl * dl,
            dr * sb + r * cb * db,
        );

        let to_j2000 = mean_ecliptic_of_date_to_j2000(&time);
        StateVector::new(
            to_j2000 * position,
            to_j2000 * velocity,
            time,
            Frame::EquatorialJ2000,
            Origin::Heliocentric,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::vsop87_data::{EARTH, JUPITER, VENUS};
    use super::*;
    use crate::time::Timescale;
    use approx::assert_relative_eq;

    #[test]
    fn test_venus_meeus_example_32a() {
        // 1992 December 20, 0h TD
        let t = Timescale::default().tt_jd(2_448_976.5);
        let s = VENUS.spherical(&t);
        assert_relative_eq!(s.lbr[0].to_degrees(), 26.114_28, epsilon = 1e-4);
        assert_relative_eq!(s.lbr[1].to_degrees(), -2.620_70, epsilon = 1e-4);
        assert_relative_eq!(s.lbr[2], 0.724_603, epsilon = 1e-6);
    }

    #[test]
    fn test_earth_meeus_example_25b() {
        // 1992 October 13, 0h TD
        let t = Timescale::default().tt_jd(2_448_908.5);
        let s = EARTH.spherical(&t);
        assert_relative_eq!(s.lbr[0].to_degrees(), 19.907_372, epsilon = 1e-5);
        assert_relative_eq!(s.lbr[1].to_degrees(), -0.000_179, epsilon = 1e-5);
        assert_relative_eq!(s.lbr[2], 0.997_607_75, epsilon = 1e-7);
    }

    #[test]
    fn test_earth_orbital_speed() {
        let t = Timescale::default().tt_jd(2_451_545.0);
        let s = EARTH.heliocentric_state(t);
        // Near perihelion: ~30.3 km/s = ~0.01749 AU/day
        assert_relative_eq!(s.velocity.norm(), 0.017_49, epsilon = 1e-4);
        assert_relative_eq!(s.distance(), 0.9833, epsilon = 1e-3);
    }

    #[test]
    fn test_velocity_matches_position_change() {
        let ts = Timescale::default();
        let t = ts.tt_jd(2_460_000.0);
        let h = 0.01;
        let before = JUPITER.heliocentric_state(t.add_days(-h));
        let after = JUPITER.heliocentric_state(t.add_days(h));
        let numeric = (after.position - before.position) / (2.0 * h);
        let analytic = JUPITER.heliocentric_state(t).velocity;
        assert_relative_eq!(analytic, numeric, epsilon = 1e-7);
    }
}
