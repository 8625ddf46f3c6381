//! Body models
//!
//! [`Body`] is the closed set of bodies the engine knows, and
//! [`body_state`] is the single dispatch point from a body to its model:
//!
//! - Mercury to Neptune, and the Earth: VSOP87D series ([`vsop87`])
//! - Moon: the Earth's state plus the lunar series of [`crate::lunarlib`]
//! - Pluto: numerical integration in [`crate::plutolib`]
//! - Sun: the origin of the heliocentric frame
//!
//! Every model checks its validity window first and fails with
//! `OutOfRange` instead of extrapolating.

pub(crate) mod vsop87;
mod vsop87_data;

use std::fmt;
use std::str::FromStr;

use crate::constants::J2000;
use crate::errors::{AlmagestError, Result};
use crate::framelib::{Frame, Origin, StateVector};
use crate::time::Time;
use crate::{lunarlib, plutolib};

/// Half-width of the VSOP87D window: 4000 Julian years
const PLANET_HALF_SPAN_DAYS: f64 = 4000.0 * 365.25;

/// Half-width of the lunar series window: 3000 Julian years
const MOON_HALF_SPAN_DAYS: f64 = 3000.0 * 365.25;

/// Half-width of the Pluto integration window: 5000 Julian years
const PLUTO_HALF_SPAN_DAYS: f64 = 5000.0 * 365.25;

/// Slack below a window's lower edge allowed for light-time back-dating.
///
/// Light from Pluto takes under 0.3 d to arrive, so a day covers every body
/// in the engine.
pub const LIGHT_TIME_MARGIN_DAYS: f64 = 1.0;

/// Major solar system bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// Inclusive TT Julian date range over which a body model is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validity {
    pub min_jd: f64,
    pub max_jd: f64,
}

impl Validity {
    fn around_j2000(half_span_days: f64) -> Self {
        Validity {
            min_jd: J2000 - half_span_days,
            max_jd: J2000 + half_span_days,
        }
    }

    /// Whether a TT Julian date falls inside the window, edges included
    pub fn contains(&self, jd_tt: f64) -> bool {
        jd_tt >= self.min_jd && jd_tt <= self.max_jd
    }
}

impl Body {
    /// Every body, in dispatch order
    pub const ALL: [Body; 11] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Get the body's name
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    /// Mean equatorial radius in kilometers
    pub fn radius_km(&self) -> f64 {
        match self {
            Body::Sun => 695_700.0,
            Body::Moon => 1737.4,
            Body::Mercury => 2439.7,
            Body::Venus => 6051.8,
            Body::Earth => 6378.137,
            Body::Mars => 3396.19,
            Body::Jupiter => 71_492.0,
            Body::Saturn => 60_268.0,
            Body::Uranus => 25_559.0,
            Body::Neptune => 24_764.0,
            Body::Pluto => 1188.3,
        }
    }

    /// Mass of the Sun divided by the mass of the body
    pub fn reciprocal_mass(&self) -> f64 {
        match self {
            Body::Sun => 1.0,
            Body::Moon => 27_068_700.387_534,
            Body::Mercury => 6_023_600.0,
            Body::Venus => 408_523.71,
            Body::Earth => 332_946.050_895,
            Body::Mars => 3_098_708.0,
            Body::Jupiter => 1047.3486,
            Body::Saturn => 3497.898,
            Body::Uranus => 22_902.98,
            Body::Neptune => 19_412.24,
            Body::Pluto => 135_200_000.0,
        }
    }

    /// Whether the body orbits the Sun directly
    pub fn is_planet(&self) -> bool {
        !matches!(self, Body::Sun | Body::Moon)
    }

    /// Whether the body orbits inside the Earth's orbit
    pub fn is_inferior(&self) -> bool {
        matches!(self, Body::Mercury | Body::Venus)
    }

    /// Window over which [`body_state`] succeeds for this body
    pub fn validity(&self) -> Validity {
        match self {
            Body::Sun => Validity {
                min_jd: f64::NEG_INFINITY,
                max_jd: f64::INFINITY,
            },
            Body::Moon => Validity::around_j2000(MOON_HALF_SPAN_DAYS),
            Body::Pluto => Validity::around_j2000(PLUTO_HALF_SPAN_DAYS),
            Body::Mercury
            | Body::Venus
            | Body::Earth
            | Body::Mars
            | Body::Jupiter
            | Body::Saturn
            | Body::Uranus
            | Body::Neptune => Validity::around_j2000(PLANET_HALF_SPAN_DAYS),
        }
    }

    /// `OutOfRange` unless `time` lies inside the body's window
    pub fn check_validity(&self, time: &Time) -> Result<()> {
        self.check_window(time, 0.0)
    }

    fn check_window(&self, time: &Time, lower_margin_days: f64) -> Result<()> {
        let v = self.validity();
        let jd = time.tt();
        if jd >= v.min_jd - lower_margin_days && jd <= v.max_jd {
            Ok(())
        } else {
            Err(AlmagestError::OutOfRange {
                body: *self,
                jd_tt: time.tt(),
                min_jd: v.min_jd,
                max_jd: v.max_jd,
            })
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Body::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown body: {s}"))
    }
}

/// Heliocentric state of a body on the J2000 mean equator.
///
/// Pure: no caching, and two calls with the same arguments return
/// bit-identical results.
pub fn body_state(body: Body, time: Time) -> Result<StateVector> {
    body.check_validity(&time)?;
    evaluate_state(body, time)
}

/// Heliocentric state at a light-time emission instant.
///
/// Accepts times up to [`LIGHT_TIME_MARGIN_DAYS`] before the body's window,
/// so that an observation received at the lower edge can be back-dated. The
/// reception time itself must be checked with [`Body::check_validity`].
pub fn emission_state(body: Body, time: Time) -> Result<StateVector> {
    body.check_window(&time, LIGHT_TIME_MARGIN_DAYS)?;
    evaluate_state(body, time)
}

fn evaluate_state(body: Body, time: Time) -> Result<StateVector> {
    let state = match body {
        Body::Sun => StateVector::zero(time, Frame::EquatorialJ2000, Origin::Heliocentric),
        Body::Mercury => vsop87_data::MERCURY.heliocentric_state(time),
        Body::Venus => vsop87_data::VENUS.heliocentric_state(time),
        Body::Earth => vsop87_data::EARTH.heliocentric_state(time),
        Body::Mars => vsop87_data::MARS.heliocentric_state(time),
        Body::Jupiter => vsop87_data::JUPITER.heliocentric_state(time),
        Body::Saturn => vsop87_data::SATURN.heliocentric_state(time),
        Body::Uranus => vsop87_data::URANUS.heliocentric_state(time),
        Body::Neptune => vsop87_data::NEPTUNE.heliocentric_state(time),
        Body::Moon => {
            let earth = vsop87_data::EARTH.heliocentric_state(time);
            earth.plus(&lunarlib::moon_state(time), Origin::Heliocentric)?
        }
        Body::Pluto => plutolib::state_at(time),
    };
    Ok(state)
}

/// Heliocentric ecliptic longitude, latitude (degrees) and distance (AU)
/// referred to the mean ecliptic and equinox of date.
///
/// Straight from the series for Mercury to Neptune; other bodies go through
/// [`body_state`] and a frame rotation.
pub fn heliocentric_ecliptic(body: Body, time: Time) -> Result<(f64, f64, f64)> {
    body.check_validity(&time)?;
    let model = match body {
        Body::Mercury => Some(vsop87_data::MERCURY),
        Body::Venus => Some(vsop87_data::VENUS),
        Body::Earth => Some(vsop87_data::EARTH),
        Body::Mars => Some(vsop87_data::MARS),
        Body::Jupiter => Some(vsop87_data::JUPITER),
        Body::Saturn => Some(vsop87_data::SATURN),
        Body::Uranus => Some(vsop87_data::URANUS),
        Body::Neptune => Some(vsop87_data::NEPTUNE),
        Body::Sun | Body::Moon | Body::Pluto => None,
    };
    if let Some(model) = model {
        let [l, b, r] = model.spherical(&time).lbr;
        return Ok((l.to_degrees(), b.to_degrees(), r));
    }
    let state = body_state(body, time)?;
    let to_ecliptic = crate::framelib::mean_ecliptic_of_date_to_j2000(&time).transpose();
    let (r, lat, lon) = crate::framelib::to_spherical(&(to_ecliptic * state.position));
    Ok((lon.to_degrees(), lat.to_degrees(), r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timescale;
    use approx::assert_relative_eq;

    #[test]
    fn test_body_names_round_trip() {
        for body in Body::ALL {
            assert_eq!(body.name().parse::<Body>().unwrap(), body);
        }
        assert_eq!(" jupiter ".parse::<Body>().unwrap(), Body::Jupiter);
        assert!("vulcan".parse::<Body>().is_err());
    }

    #[test]
    fn test_sun_is_origin() {
        let t = Timescale::default().j2000();
        let s = body_state(Body::Sun, t).unwrap();
        assert_eq!(s.distance(), 0.0);
        assert_eq!(s.origin, Origin::Heliocentric);
    }

    #[test]
    fn test_planet_distances_at_j2000() {
        let t = Timescale::default().j2000();
        let expected = [
            (Body::Mercury, 0.30, 0.48),
            (Body::Venus, 0.71, 0.73),
            (Body::Earth, 0.98, 1.02),
            (Body::Mars, 1.38, 1.67),
            (Body::Jupiter, 4.95, 5.46),
            (Body::Saturn, 9.0, 10.1),
            (Body::Uranus, 18.2, 20.1),
            (Body::Neptune, 29.8, 30.4),
            (Body::Pluto, 29.6, 49.3),
        ];
        for (body, lo, hi) in expected {
            let d = body_state(body, t).unwrap().distance();
            assert!(d > lo && d < hi, "{body} at {d} AU");
        }
    }

    #[test]
    fn test_moon_near_earth() {
        let t = Timescale::default().tt_jd(2_460_000.0);
        let earth = body_state(Body::Earth, t).unwrap();
        let moon = body_state(Body::Moon, t).unwrap();
        let km = (moon.position - earth.position).norm() * crate::constants::AU_KM;
        assert!(km > 356_000.0 && km < 407_000.0, "Earth-Moon = {km} km");
    }

    #[test]
    fn test_validity_edges() {
        let ts = Timescale::default();
        for body in Body::ALL {
            let v = body.validity();
            if !v.max_jd.is_finite() {
                continue;
            }
            assert!(body_state(body, ts.tt_jd(v.max_jd)).is_ok(), "{body} upper edge");
            assert!(body_state(body, ts.tt_jd(v.min_jd)).is_ok(), "{body} lower edge");
            let err = body_state(body, ts.tt_jd(v.max_jd + 1.0)).unwrap_err();
            assert!(matches!(err, AlmagestError::OutOfRange { .. }), "{body}");
            let err = body_state(body, ts.tt_jd(v.min_jd - 1.0)).unwrap_err();
            assert!(matches!(err, AlmagestError::OutOfRange { .. }), "{body}");
        }
    }

    #[test]
    fn test_emission_state_reaches_below_lower_edge() {
        let ts = Timescale::default();
        for body in Body::ALL {
            let v = body.validity();
            if !v.min_jd.is_finite() {
                continue;
            }
            let below = ts.tt_jd(v.min_jd - 0.5);
            assert!(body_state(body, below).is_err(), "{body}");
            assert!(emission_state(body, below).is_ok(), "{body}");
            let err = emission_state(body, ts.tt_jd(v.min_jd - 2.0 * LIGHT_TIME_MARGIN_DAYS))
                .unwrap_err();
            assert!(matches!(err, AlmagestError::OutOfRange { .. }), "{body}");
            // The upper edge gets no slack
            assert!(emission_state(body, ts.tt_jd(v.max_jd + 0.5)).is_err(), "{body}");
        }
    }

    #[test]
    fn test_emission_state_matches_body_state_inside() {
        let t = Timescale::default().tt_jd(2_458_000.25);
        for body in Body::ALL {
            let a = body_state(body, t).unwrap();
            let b = emission_state(body, t).unwrap();
            assert_eq!(a.position, b.position, "{body}");
            assert_eq!(a.velocity, b.velocity, "{body}");
        }
    }

    #[test]
    fn test_heliocentric_ecliptic_matches_state() {
        let t = Timescale::default().tt_jd(2_455_000.5);
        let (lon, lat, r) = heliocentric_ecliptic(Body::Mars, t).unwrap();
        let state = body_state(Body::Mars, t).unwrap();
        assert_relative_eq!(r, state.distance(), epsilon = 1e-12);
        let to_ecliptic = crate::framelib::mean_ecliptic_of_date_to_j2000(&t).transpose();
        let (_, lat2, lon2) = crate::framelib::to_spherical(&(to_ecliptic * state.position));
        assert_relative_eq!(lon, lon2.to_degrees(), epsilon = 1e-9);
        assert_relative_eq!(lat, lat2.to_degrees(), epsilon = 1e-9);
    }
}
