//! Geocentric Moon
//!
//! Chapter 47 of Meeus, *Astronomical Algorithms*: the ELP-2000/82 theory cut
//! down to the 120 largest periodic terms in longitude, latitude and
//! distance, plus the additive Venus, Jupiter and flattening terms. Accuracy
//! is about 10″ in longitude and 4″ in latitude near the present.
//!
//! Every quantity is carried together with its time derivative, so the
//! velocity is exact for the truncated theory.

mod terms;

use nalgebra::Vector3;

use crate::constants::{AU_KM, DAYS_PER_CENTURY};
use crate::errors::Result;
use crate::framelib::{mean_ecliptic_of_date_to_j2000, Frame, Origin, StateVector};
use crate::planetlib::Body;
use crate::precessionlib::general_precession_rate;
use crate::serieslib::{sum_cosines, sum_sines, Harmonic};
use crate::time::Time;
use crate::units::normalize_degrees;

use terms::{LATITUDE, LONGITUDE_DISTANCE};

/// Mean distance term of the distance series, in km
const MEAN_DISTANCE_KM: f64 = 385_000.56;

// Polynomials in T (Julian centuries TT), degrees
const MEAN_LONGITUDE: [f64; 5] = [
    218.316_447_7,
    481_267.881_234_21,
    -0.001_578_6,
    1.0 / 538_841.0,
    -1.0 / 65_194_000.0,
];
const MEAN_ELONGATION: [f64; 5] = [
    297.850_192_1,
    445_267.111_403_4,
    -0.001_881_9,
    1.0 / 545_868.0,
    -1.0 / 113_065_000.0,
];
const SUN_MEAN_ANOMALY: [f64; 4] = [
    357.529_109_2,
    35_999.050_290_9,
    -0.000_153_6,
    1.0 / 24_490_000.0,
];
const MOON_MEAN_ANOMALY: [f64; 5] = [
    134.963_396_4,
    477_198.867_505_5,
    0.008_741_4,
    1.0 / 69_699.0,
    -1.0 / 14_712_000.0,
];
const ARGUMENT_OF_LATITUDE: [f64; 5] = [
    93.272_095_0,
    483_202.017_523_3,
    -0.003_653_9,
    -1.0 / 3_526_000.0,
    1.0 / 863_310_000.0,
];
const VENUS_ARGUMENT: [f64; 2] = [119.75, 131.849];
const JUPITER_ARGUMENT: [f64; 2] = [53.09, 479_264.290];
const FLATTENING_ARGUMENT: [f64; 2] = [313.45, 481_266.484];
/// Decrease of the Earth's orbital eccentricity, applied to terms in M
const ECCENTRICITY_FACTOR: [f64; 3] = [1.0, -0.002_516, -0.000_007_4];

/// An angle in degrees with its rate in degrees per century
#[derive(Debug, Clone, Copy)]
struct Arg {
    value: f64,
    rate: f64,
}

impl Arg {
    fn from_poly(coeffs: &[f64], t: f64) -> Self {
        let (value, rate) = poly_with_rate(coeffs, t);
        Arg { value, rate }
    }

    fn combine(d: i8, m: i8, mp: i8, f: i8, args: &Fundamentals) -> Self {
        let (d, m, mp, f) = (f64::from(d), f64::from(m), f64::from(mp), f64::from(f));
        Arg {
            value: d * args.d.value + m * args.m.value + mp * args.mp.value + f * args.f.value,
            rate: d * args.d.rate + m * args.m.rate + mp * args.mp.rate + f * args.f.rate,
        }
    }

    fn plus(self, other: Arg) -> Arg {
        Arg {
            value: self.value + other.value,
            rate: self.rate + other.rate,
        }
    }

    fn minus(self, other: Arg) -> Arg {
        Arg {
            value: self.value - other.value,
            rate: self.rate - other.rate,
        }
    }

    /// (c·sin x, d/dT c·sin x)
    fn sin_term(self, c: f64) -> (f64, f64) {
        let (s, co) = self.value.to_radians().sin_cos();
        (c * s, c * co * self.rate.to_radians())
    }
}

/// Value and derivative of a polynomial with ascending coefficients
fn poly_with_rate(coeffs: &[f64], t: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut rate = 0.0;
    for &c in coeffs.iter().rev() {
        rate = rate * t + value;
        value = value * t + c;
    }
    (value, rate)
}

struct Fundamentals {
    l: Arg,
    d: Arg,
    m: Arg,
    mp: Arg,
    f: Arg,
    e: (f64, f64),
}

impl Fundamentals {
    fn at(t: f64) -> Self {
        Fundamentals {
            l: Arg::from_poly(&MEAN_LONGITUDE, t),
            d: Arg::from_poly(&MEAN_ELONGATION, t),
            m: Arg::from_poly(&SUN_MEAN_ANOMALY, t),
            mp: Arg::from_poly(&MOON_MEAN_ANOMALY, t),
            f: Arg::from_poly(&ARGUMENT_OF_LATITUDE, t),
            e: poly_with_rate(&ECCENTRICITY_FACTOR, t),
        }
    }

    /// E^|m| and its derivative
    fn eccentricity_power(&self, m: i8) -> (f64, f64) {
        let (e, de) = self.e;
        match m.unsigned_abs() {
            0 => (1.0, 0.0),
            1 => (e, de),
            _ => (e * e, 2.0 * e * de),
        }
    }
}

/// Geocentric ecliptic coordinates of the Moon, mean equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LunarPosition {
    /// Longitude in degrees, [0, 360)
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Distance between the centres of Earth and Moon in km
    pub distance_km: f64,
    /// Longitude rate in degrees per day
    pub longitude_rate: f64,
    /// Latitude rate in degrees per day
    pub latitude_rate: f64,
    /// Distance rate in km per day
    pub distance_rate: f64,
}

/// Evaluate the lunar series. Does not check the validity window.
pub fn moon_ecliptic(time: &Time) -> LunarPosition {
    let t = time.tt_centuries();
    let fa = Fundamentals::at(t);

    // Arguments are quartics in T and amplitudes carry powers of E, so each
    // term is evaluated to a harmonic before summing.
    let harmonic = |amplitude: f64, d: i8, m: i8, mp: i8, f: i8| {
        let arg = Arg::combine(d, m, mp, f, &fa);
        let (e, de) = fa.eccentricity_power(m);
        Harmonic {
            amplitude: amplitude * e,
            amplitude_rate: amplitude * de,
            angle: arg.value.to_radians(),
            angle_rate: arg.rate.to_radians(),
        }
    };

    let (mut sum_l, mut rate_l) =
        sum_sines(LONGITUDE_DISTANCE.iter().map(|t| harmonic(t.longitude, t.d, t.m, t.mp, t.f)));
    let (sum_r, rate_r) =
        sum_cosines(LONGITUDE_DISTANCE.iter().map(|t| harmonic(t.distance, t.d, t.m, t.mp, t.f)));
    let (mut sum_b, mut rate_b) =
        sum_sines(LATITUDE.iter().map(|t| harmonic(t.latitude, t.d, t.m, t.mp, t.f)));

    let a1 = Arg::from_poly(&VENUS_ARGUMENT, t);
    let a2 = Arg::from_poly(&JUPITER_ARGUMENT, t);
    let a3 = Arg::from_poly(&FLATTENING_ARGUMENT, t);

    for (value, rate) in [
        a1.sin_term(3958.0),
        fa.l.minus(fa.f).sin_term(1962.0),
        a2.sin_term(318.0),
    ] {
        sum_l += value;
        rate_l += rate;
    }
    for (value, rate) in [
        fa.l.sin_term(-2235.0),
        a3.sin_term(382.0),
        a1.minus(fa.f).sin_term(175.0),
        a1.plus(fa.f).sin_term(175.0),
        fa.l.minus(fa.mp).sin_term(127.0),
        fa.l.plus(fa.mp).sin_term(-115.0),
    ] {
        sum_b += value;
        rate_b += rate;
    }

    LunarPosition {
        longitude: normalize_degrees(fa.l.value + sum_l / 1e6),
        latitude: sum_b / 1e6,
        distance_km: MEAN_DISTANCE_KM + sum_r / 1000.0,
        longitude_rate: (fa.l.rate + rate_l / 1e6) / DAYS_PER_CENTURY,
        latitude_rate: rate_b / 1e6 / DAYS_PER_CENTURY,
        distance_rate: rate_r / 1000.0 / DAYS_PER_CENTURY,
    }
}

/// Geocentric state of the Moon on the J2000 mean equator
pub fn geocentric_moon_state(time: Time) -> Result<StateVector> {
    Body::Moon.check_validity(&time)?;
    Ok(moon_state(time))
}

/// Geocentric state of the Moon without the validity check.
pub(crate) fn moon_state(time: Time) -> StateVector {
    let p = moon_ecliptic(&time);

    let l = p.longitude.to_radians();
    let b = p.latitude.to_radians();
    let r = p.distance_km / AU_KM;
    let dl = p.longitude_rate.to_radians()
        - general_precession_rate(time.tt_centuries()) / DAYS_PER_CENTURY;
    let db = p.latitude_rate.to_radians();
    let dr = p.distance_rate / AU_KM;

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
        Origin::Geocentric,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AlmagestError;
    use crate::time::Timescale;
    use approx::assert_relative_eq;

    #[test]
    fn test_meeus_example_47a() {
        // 1992 April 12, 0h TD
        let t = Timescale::default().tt_jd(2_448_724.5);
        let p = moon_ecliptic(&t);
        assert_relative_eq!(p.longitude, 133.162_655, epsilon = 1e-5);
        assert_relative_eq!(p.latitude, -3.229_126, epsilon = 1e-5);
        assert_relative_eq!(p.distance_km, 368_409.7, epsilon = 0.1);
    }

    #[test]
    fn test_rates_match_finite_difference() {
        let ts = Timescale::default();
        let t = ts.tt_jd(2_459_000.3);
        let h = 1e-3;
        let before = moon_ecliptic(&t.add_days(-h));
        let after = moon_ecliptic(&t.add_days(h));
        let p = moon_ecliptic(&t);
        assert_relative_eq!(
            p.longitude_rate,
            (after.longitude - before.longitude) / (2.0 * h),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            p.latitude_rate,
            (after.latitude - before.latitude) / (2.0 * h),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            p.distance_rate,
            (after.distance_km - before.distance_km) / (2.0 * h),
            epsilon = 1e-2
        );
        // The Moon moves roughly 12 to 15 degrees a day
        assert!(p.longitude_rate > 11.5 && p.longitude_rate < 15.5);
    }

    #[test]
    fn test_state_velocity_matches_position_change() {
        let t = Timescale::default().tt_jd(2_460_100.0);
        let h = 1e-3;
        let a = geocentric_moon_state(t.add_days(-h)).unwrap();
        let b = geocentric_moon_state(t.add_days(h)).unwrap();
        let s = geocentric_moon_state(t).unwrap();
        let numeric = (b.position - a.position) / (2.0 * h);
        assert_relative_eq!(s.velocity, numeric, epsilon = 1e-9);
    }

    #[test]
    fn test_out_of_range() {
        let ts = Timescale::default();
        let err = geocentric_moon_state(ts.tt_jd(2_451_545.0 + 3001.0 * 365.25)).unwrap_err();
        assert!(matches!(
            err,
            AlmagestError::OutOfRange {
                body: Body::Moon,
                ..
            }
        ));
    }

    #[test]
    fn test_poly_with_rate() {
        // 1 + 2t + 3t²
        let (v, r) = poly_with_rate(&[1.0, 2.0, 3.0], 2.0);
        assert_eq!(v, 17.0);
        assert_eq!(r, 14.0);
    }
}
