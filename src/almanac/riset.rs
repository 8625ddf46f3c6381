//! Rising, transit and setting
//!
//! A body rises or sets when its upper limb touches the horizon as lifted
//! by standard refraction: geometric altitude of the centre plus the
//! angular semidiameter plus 34' crosses zero. Transit is the highest
//! geometric altitude between a rise and the following set.
//!
//! Fixed directions (stars, or any RA/Dec) have a closed form through the
//! hour angle and need no search; see [`radec_riset`].

use crate::config::{Atmosphere, SearchConfig};
use crate::constants::{AU_KM, SIDEREAL_DAY_HOURS};
use crate::errors::{AlmagestError, Result};
use crate::planetlib::Body;
use crate::searchlib::{
    search, search_all, search_direction, Condition, Direction, Extremum, SearchWindow,
};
use crate::time::Time;
use crate::toposlib::{Horizontal, Observer};
use crate::units::{normalize_hours, normalize_signed_degrees};

use super::{body_horizontal, REFRACTION_DEGREES};

/// How far ahead of (or behind) a time to look for the next rise or set.
///
/// A little longer than a lunar day.
pub const RISE_SET_WINDOW_DAYS: f64 = 1.1;

/// Length of one hour of sidereal time in days
const SIDEREAL_HOUR_DAYS: f64 = SIDEREAL_DAY_HOURS / 24.0 / 24.0;

/// Angular radius of a body at `distance_au`, degrees
pub fn semidiameter_degrees(body: Body, distance_au: f64) -> f64 {
    (body.radius_km() / (distance_au * AU_KM)).min(1.0).asin().to_degrees()
}

/// Altitude of the upper limb above the refracted horizon, degrees.
///
/// Zero at rise and set.
pub fn rise_set_altitude(body: Body, time: Time, observer: &Observer) -> Result<f64> {
    let h = body_horizontal(body, time, observer, &Atmosphere::none())?;
    Ok(h.altitude_degrees + semidiameter_degrees(body, h.distance_au) - REFRACTION_DEGREES)
}

fn check_observable(body: Body) -> Result<()> {
    if body == Body::Earth {
        return Err(AlmagestError::UnsupportedBody {
            body,
            what: "rise and set",
        });
    }
    Ok(())
}

/// `Ok(None)` for `NotFound`, anything else unchanged
fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// First rise (`Rising`) or set (`Falling`) of a body in the window
pub fn search_rise_set(
    body: Body,
    observer: &Observer,
    direction: Direction,
    window: &SearchWindow,
    config: &SearchConfig,
) -> Result<Time> {
    check_observable(body)?;
    let result = search_direction(
        |t| rise_set_altitude(body, t, observer),
        window,
        Condition::ZeroCrossing,
        direction,
        config,
    )?;
    Ok(result.time)
}

/// Highest point of a body's path across the sky.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Culmination {
    pub time: Time,
    /// Geometric altitude of the centre, degrees
    pub altitude_degrees: f64,
    pub azimuth_degrees: f64,
}

/// First transit (maximum altitude) of a body in the window
pub fn search_transit(
    body: Body,
    observer: &Observer,
    window: &SearchWindow,
    config: &SearchConfig,
) -> Result<Culmination> {
    check_observable(body)?;
    let result = search(
        |t| Ok(body_horizontal(body, t, observer, &Atmosphere::none())?.altitude_degrees),
        window,
        Condition::Extremum(Extremum::Maximum),
        config,
    )?;
    let h = body_horizontal(body, result.time, observer, &Atmosphere::none())?;
    Ok(Culmination {
        time: result.time,
        altitude_degrees: h.altitude_degrees,
        azimuth_degrees: h.azimuth_degrees,
    })
}

/// Rise, transit and set around a moment, with where the body is now.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Riset {
    pub body: Body,
    pub time: Time,
    /// Refracted position at `time`
    pub current: Horizontal,
    pub rise: Option<Time>,
    pub transit: Option<Culmination>,
    pub set: Option<Time>,
}

impl Riset {
    /// Whether the upper limb was above the horizon at `time`
    pub fn is_up(&self) -> bool {
        match (self.rise, self.set) {
            (Some(rise), Some(set)) => rise.tt() <= self.time.tt() && self.time.tt() < set.tt(),
            _ => self.current.altitude_degrees > 0.0,
        }
    }
}

/// The passage of a body across the sky that is under way, or next to come.
///
/// If the body is up at `time` this is the rise before it and the set after
/// it; otherwise the next rise and the set that follows. Missing events
/// (polar day or night, a Moon that skips a day) are `None`. The transit is
/// searched between rise and set, or over [`RISE_SET_WINDOW_DAYS`] from
/// whichever end is known when one is missing.
pub fn riset_summary(body: Body, time: Time, observer: &Observer, config: &SearchConfig) -> Result<Riset> {
    check_observable(body)?;
    let current = body_horizontal(body, time, observer, &Atmosphere::default())?;
    let f = |t: Time| -> Result<f64> { rise_set_altitude(body, t, observer) };
    let ahead = SearchWindow::from_start(time, RISE_SET_WINDOW_DAYS)?;

    let (rise, set) = if f(time)? > 0.0 {
        let behind = SearchWindow::new(time.add_days(-RISE_SET_WINDOW_DAYS), time)?;
        let rise = search_all(f, &behind, Condition::ZeroCrossing, config)?
            .into_iter()
            .filter(|r| r.direction == Direction::Rising)
            .last()
            .map(|r| r.time);
        let set = optional(search_direction(f, &ahead, Condition::ZeroCrossing, Direction::Falling, config))?
            .map(|r| r.time);
        (rise, set)
    } else {
        let rise = optional(search_direction(f, &ahead, Condition::ZeroCrossing, Direction::Rising, config))?
            .map(|r| r.time);
        let set = match rise {
            Some(rise) => {
                let after_rise = SearchWindow::from_start(rise, RISE_SET_WINDOW_DAYS)?;
                optional(search_direction(f, &after_rise, Condition::ZeroCrossing, Direction::Falling, config))?
                    .map(|r| r.time)
            }
            None => None,
        };
        (rise, set)
    };

    let transit_window = match (rise, set) {
        (Some(rise), Some(set)) => SearchWindow::new(rise, set)?,
        (Some(rise), None) => SearchWindow::from_start(rise, RISE_SET_WINDOW_DAYS)?,
        (None, Some(set)) => SearchWindow::new(time, set)?,
        (None, None) => ahead,
    };
    let transit = optional(search_transit(body, observer, &transit_window, config))?;

    Ok(Riset {
        body,
        time,
        current,
        rise,
        transit,
        set,
    })
}

/// Whether a fixed direction crosses the horizon at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RisetStatus {
    RisesAndSets,
    /// Always above the horizon
    Circumpolar,
    /// Always below the horizon
    NeverRises,
}

/// Rise, transit and set of a fixed RA/Dec.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarRiset {
    pub status: RisetStatus,
    /// Unrefracted position at the query time
    pub current: Horizontal,
    pub rise: Option<Time>,
    /// Upper culmination: the current one while the star is up, else the next
    pub transit: Time,
    pub transit_altitude_degrees: f64,
    pub set: Option<Time>,
}

/// Rise, transit and set of a direction fixed on the sky.
///
/// `ra_hours` and `dec_degrees` are on the true equator of date; the
/// direction crosses `horizon_degrees` (0 for the geometric horizon,
/// [`REFRACTION_DEGREES`] for the refracted one). While the direction is up
/// the rise is in the past; otherwise both rise and set are ahead.
pub fn radec_riset(
    time: &Time,
    observer: &Observer,
    ra_hours: f64,
    dec_degrees: f64,
    horizon_degrees: f64,
) -> StarRiset {
    let none = Atmosphere::none();
    let (current, _) = observer.horizon(time, ra_hours, dec_degrees, &none);
    let lst = observer.lst_hours(time);
    let hour_angle = normalize_signed_degrees((lst - ra_hours) * 15.0) / 15.0;

    let (sin_lat, cos_lat) = observer.latitude.sin_cos();
    let (sin_dec, cos_dec) = dec_degrees.to_radians().sin_cos();
    let cos_h0 = (horizon_degrees.to_radians().sin() - sin_lat * sin_dec) / (cos_lat * cos_dec);

    let status = if cos_h0 < -1.0 {
        RisetStatus::Circumpolar
    } else if cos_h0 > 1.0 {
        RisetStatus::NeverRises
    } else {
        RisetStatus::RisesAndSets
    };
    let semi_arc_hours = match status {
        RisetStatus::RisesAndSets => Some(cos_h0.acos().to_degrees() / 15.0),
        _ => None,
    };

    let up_now = semi_arc_hours.map_or(false, |h0| hour_angle.abs() < h0);
    let transit = if up_now {
        time.add_days(-hour_angle * SIDEREAL_HOUR_DAYS)
    } else {
        time.add_days(normalize_hours(ra_hours - lst) * SIDEREAL_HOUR_DAYS)
    };
    let (transit_horizontal, _) = observer.horizon(&transit, ra_hours, dec_degrees, &none);

    StarRiset {
        status,
        current,
        rise: semi_arc_hours.map(|h0| transit.add_days(-h0 * SIDEREAL_HOUR_DAYS)),
        transit,
        transit_altitude_degrees: transit_horizontal.altitude_degrees,
        set: semi_arc_hours.map(|h0| transit.add_days(h0 * SIDEREAL_HOUR_DAYS)),
    }
}
