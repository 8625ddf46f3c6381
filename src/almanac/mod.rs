//! Almanac: when does something happen?
//!
//! Every event here is a scalar function of time handed to
//! [`crate::searchlib`]. [`EventKind`] names the events, and a single table
//! behind [`search_event`] maps each of them to its function and condition;
//! [`EventKind::default_window_days`] and [`EventKind::default_step_days`]
//! give the window and step [`search_next`] uses. The submodules hold the
//! families with more structure:
//!
//! - [`sun`]: altitude thresholds, twilight, the named states of the Sun
//!   through a day
//! - [`moon`]: quarters, phase names, the current lunation
//! - [`riset`]: rise, transit and set of bodies and of fixed RA/Dec
//!
//! # Example
//!
//! ```ignore
//! let ts = Timescale::default();
//! let s = seasons(&ts, 2024)?;
//! println!("{}", s.march_equinox);
//!
//! let greenwich = Observer::new(51.4769, -0.0005, 0.0)?;
//! let start = ts.utc((2024, 3, 20))?;
//! let rise = search_next(EventKind::Rise, Body::Sun, Some(&greenwich), start, &SearchConfig::default())?;
//! ```

pub mod moon;
pub mod riset;
pub mod sun;

use std::fmt;

use log::debug;

use crate::config::{Atmosphere, LightTimeConfig, SearchConfig};
use crate::constants::{ANOMALISTIC_MONTH, SYNODIC_MONTH, TROPICAL_YEAR};
use crate::errors::{AlmagestError, Result};
use crate::framelib::StateVector;
use crate::keplerlib::mean_elements;
use crate::planetlib::{body_state, Body};
use crate::positions::{
    ecliptic_longitude, elongation, geo_moon_state, moon_phase, pair_longitude, topocentric_state,
    Aberration, Elongation,
};
use crate::searchlib::{
    search, search_direction, Condition, Direction, Extremum, SearchResult, SearchWindow,
};
use crate::time::{Time, Timescale};
use crate::toposlib::{Horizontal, Observer};
use crate::units::normalize_degrees;

pub use moon::LunarQuarter;

/// Standard atmospheric refraction at the horizon (34 arcminutes)
pub const REFRACTION_DEGREES: f64 = -34.0 / 60.0;

/// Human-readable season names indexed by season number 0..3
pub const SEASON_NAMES: [&str; 4] = [
    "March Equinox",
    "June Solstice",
    "September Equinox",
    "December Solstice",
];

/// The four turning points of the Sun's year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Season {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::MarchEquinox,
        Season::JuneSolstice,
        Season::SeptemberEquinox,
        Season::DecemberSolstice,
    ];

    /// Apparent ecliptic longitude of the Sun at this point, degrees
    pub fn longitude_degrees(self) -> f64 {
        self as usize as f64 * 90.0
    }

    pub fn name(self) -> &'static str {
        SEASON_NAMES[self as usize]
    }

    /// Month in which the event falls every year
    fn month(self) -> u32 {
        3 + 3 * self as u32
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equinoxes and solstices of one calendar year.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seasons {
    pub march_equinox: Time,
    pub june_solstice: Time,
    pub september_equinox: Time,
    pub december_solstice: Time,
}

impl Seasons {
    pub fn get(&self, season: Season) -> Time {
        match season {
            Season::MarchEquinox => self.march_equinox,
            Season::JuneSolstice => self.june_solstice,
            Season::SeptemberEquinox => self.september_equinox,
            Season::DecemberSolstice => self.december_solstice,
        }
    }
}

/// Season index 0..3 from the Sun's apparent longitude.
///
/// A step function of time for
/// [`find_discrete`](crate::searchlib::find_discrete): 0 from the March
/// equinox, 1 from the June solstice and so on.
pub fn season_index(time: Time) -> Result<i64> {
    let lon = ecliptic_longitude(Body::Sun, time)?;
    Ok((lon / 90.0).floor() as i64 % 4)
}

/// First time in the window at which the Sun reaches `season`
pub fn search_season(season: Season, window: &SearchWindow, config: &SearchConfig) -> Result<SearchResult> {
    search(
        |t| ecliptic_longitude(Body::Sun, t),
        window,
        Condition::Circular(season.longitude_degrees()),
        config,
    )
}

/// Equinoxes and solstices of a calendar year.
pub fn seasons(ts: &Timescale, year: i32) -> Result<Seasons> {
    let config = SearchConfig::default().with_step(1.0);
    let find = |season: Season| -> Result<Time> {
        // Each falls between the 19th and the 23rd of its month
        let start = ts.utc((year, season.month(), 1))?;
        let window = SearchWindow::from_start(start, 40.0)?;
        Ok(search_season(season, &window, &config)?.time)
    };
    Ok(Seasons {
        march_equinox: find(Season::MarchEquinox)?,
        june_solstice: find(Season::JuneSolstice)?,
        september_equinox: find(Season::SeptemberEquinox)?,
        december_solstice: find(Season::DecemberSolstice)?,
    })
}

/// Named events the almanac can search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// Upper limb crosses the refracted horizon going up
    Rise,
    /// Upper limb crosses the refracted horizon going down
    Set,
    /// Highest altitude of the day
    Transit,
    /// Same apparent ecliptic longitude as the Sun
    Conjunction,
    /// Apparent ecliptic longitude 180° from the Sun
    Opposition,
    Season(Season),
    LunarPhase(LunarQuarter),
    Perihelion,
    Aphelion,
    Perigee,
    Apogee,
    /// Greatest angle from the Sun, Mercury and Venus only
    MaxElongation,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Rise => "rise",
            EventKind::Set => "set",
            EventKind::Transit => "transit",
            EventKind::Conjunction => "conjunction",
            EventKind::Opposition => "opposition",
            EventKind::Season(season) => season.name(),
            EventKind::LunarPhase(quarter) => quarter.name(),
            EventKind::Perihelion => "perihelion",
            EventKind::Aphelion => "aphelion",
            EventKind::Perigee => "perigee",
            EventKind::Apogee => "apogee",
            EventKind::MaxElongation => "maximum elongation",
        }
    }

    /// A window long enough to hold at least one event for `body`, in days.
    pub fn default_window_days(self, body: Body) -> f64 {
        match self {
            EventKind::Rise | EventKind::Set | EventKind::Transit => riset::RISE_SET_WINDOW_DAYS,
            EventKind::Conjunction | EventKind::Opposition | EventKind::MaxElongation => {
                synodic_period_days(body) + 1.0
            }
            EventKind::Season(_) => TROPICAL_YEAR + 1.0,
            EventKind::LunarPhase(_) => SYNODIC_MONTH + 1.5,
            EventKind::Perihelion | EventKind::Aphelion => sidereal_period_days(body) + 1.0,
            EventKind::Perigee | EventKind::Apogee => ANOMALISTIC_MONTH + 2.0,
        }
    }

    /// Coarse sampling step short enough not to straddle two events, in days.
    pub fn default_step_days(self, body: Body) -> f64 {
        match self {
            EventKind::Rise | EventKind::Set | EventKind::Transit => SearchConfig::default().step_days,
            EventKind::Conjunction | EventKind::Opposition if body == Body::Moon => 0.25,
            EventKind::Conjunction | EventKind::Opposition | EventKind::MaxElongation => 1.0,
            EventKind::Season(_) => 1.0,
            EventKind::LunarPhase(_) => 0.25,
            EventKind::Perihelion | EventKind::Aphelion => sidereal_period_days(body) / 100.0,
            EventKind::Perigee | EventKind::Apogee => 0.5,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A located almanac event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub kind: EventKind,
    pub body: Body,
    pub time: Time,
    /// The searched quantity at `time`: altitude, longitude difference,
    /// radial speed or elongation depending on the kind
    pub value: f64,
    pub direction: Direction,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.body, self.kind, self.time)
    }
}

type EventFunction<'a> = Box<dyn FnMut(Time) -> Result<f64> + 'a>;

/// What [`search_event`] hands to the search engine for one event.
struct EventSpec<'a> {
    function: EventFunction<'a>,
    condition: Condition,
    direction: Option<Direction>,
}

impl<'a> EventSpec<'a> {
    fn new(function: EventFunction<'a>, condition: Condition, direction: Option<Direction>) -> Self {
        EventSpec {
            function,
            condition,
            direction,
        }
    }
}

fn unsupported(body: Body, kind: EventKind) -> AlmagestError {
    AlmagestError::UnsupportedBody {
        body,
        what: kind.name(),
    }
}

fn event_spec<'a>(kind: EventKind, body: Body, observer: Option<&'a Observer>) -> Result<EventSpec<'a>> {
    let needs_observer = || {
        observer.ok_or_else(|| AlmagestError::InvalidObserver(format!("{kind} needs an observer on the ground")))
    };

    let entry = match kind {
        EventKind::Rise | EventKind::Set => {
            if body == Body::Earth {
                return Err(unsupported(body, kind));
            }
            let observer = needs_observer()?;
            let direction = if kind == EventKind::Rise {
                Direction::Rising
            } else {
                Direction::Falling
            };
            EventSpec::new(
                Box::new(move |t: Time| -> Result<f64> { riset::rise_set_altitude(body, t, observer) }),
                Condition::ZeroCrossing,
                Some(direction),
            )
        }
        EventKind::Transit => {
            if body == Body::Earth {
                return Err(unsupported(body, kind));
            }
            let observer = needs_observer()?;
            EventSpec::new(
                Box::new(move |t: Time| -> Result<f64> {
                    Ok(body_horizontal(body, t, observer, &Atmosphere::none())?.altitude_degrees)
                }),
                Condition::Extremum(Extremum::Maximum),
                None,
            )
        }
        EventKind::Conjunction | EventKind::Opposition => {
            if matches!(body, Body::Sun | Body::Earth) || (kind == EventKind::Opposition && body.is_inferior()) {
                return Err(unsupported(body, kind));
            }
            let target = if kind == EventKind::Conjunction { 0.0 } else { 180.0 };
            EventSpec::new(
                Box::new(move |t: Time| -> Result<f64> { longitude_from_sun(body, t) }),
                Condition::Circular(target),
                None,
            )
        }
        EventKind::Season(season) => {
            if body != Body::Sun {
                return Err(unsupported(body, kind));
            }
            EventSpec::new(
                Box::new(|t: Time| -> Result<f64> { ecliptic_longitude(Body::Sun, t) }),
                Condition::Circular(season.longitude_degrees()),
                None,
            )
        }
        EventKind::LunarPhase(quarter) => {
            if body != Body::Moon {
                return Err(unsupported(body, kind));
            }
            EventSpec::new(
                Box::new(|t: Time| -> Result<f64> { moon_phase(t) }),
                Condition::Circular(quarter.target_degrees()),
                None,
            )
        }
        EventKind::Perihelion | EventKind::Aphelion => {
            if !body.is_planet() {
                return Err(unsupported(body, kind));
            }
            EventSpec::new(
                Box::new(move |t: Time| -> Result<f64> { Ok(radial_speed(&body_state(body, t)?)) }),
                Condition::ZeroCrossing,
                Some(apsis_direction(kind == EventKind::Perihelion)),
            )
        }
        EventKind::Perigee | EventKind::Apogee => {
            if body != Body::Moon {
                return Err(unsupported(body, kind));
            }
            EventSpec::new(
                Box::new(|t: Time| -> Result<f64> { Ok(radial_speed(&geo_moon_state(t)?)) }),
                Condition::ZeroCrossing,
                Some(apsis_direction(kind == EventKind::Perigee)),
            )
        }
        EventKind::MaxElongation => {
            if !body.is_inferior() {
                return Err(unsupported(body, kind));
            }
            EventSpec::new(
                Box::new(move |t: Time| -> Result<f64> { Ok(elongation(body, t)?.elongation) }),
                Condition::Extremum(Extremum::Maximum),
                None,
            )
        }
    };
    Ok(entry)
}

/// First `kind` event for `body` in the window.
///
/// Rise, set and transit need an `observer`; everything else is geocentric
/// or heliocentric and ignores it. `NotFound` names the event kind.
pub fn search_event(
    kind: EventKind,
    body: Body,
    observer: Option<&Observer>,
    window: &SearchWindow,
    config: &SearchConfig,
) -> Result<Event> {
    let EventSpec {
        function,
        condition,
        direction,
    } = event_spec(kind, body, observer)?;

    let found = match direction {
        Some(direction) => search_direction(function, window, condition, direction, config),
        None => search(function, window, condition, config),
    };
    let result = found.map_err(|err| match err {
        AlmagestError::NotFound { start, end, .. } => AlmagestError::NotFound {
            what: kind.name(),
            start,
            end,
        },
        other => other,
    })?;

    debug!("{body} {kind} at JD {:.6} TT", result.time.tt());
    Ok(Event {
        kind,
        body,
        time: result.time,
        value: result.value,
        direction: result.direction,
    })
}

/// Next `kind` event for `body` after `start`, over the event's default window.
///
/// The coarse step also comes from the event; tolerance and caps come from
/// `config`.
pub fn search_next(
    kind: EventKind,
    body: Body,
    observer: Option<&Observer>,
    start: Time,
    config: &SearchConfig,
) -> Result<Event> {
    let window = SearchWindow::from_start(start, kind.default_window_days(body))?;
    let config = config.with_step(kind.default_step_days(body));
    search_event(kind, body, observer, &window, &config)
}

/// Apparent horizontal position of a body seen from the ground, refracted
/// by `atmosphere`
pub fn body_horizontal(body: Body, time: Time, observer: &Observer, atmosphere: &Atmosphere) -> Result<Horizontal> {
    let obs = topocentric_state(body, time, observer, Aberration::Apply, &LightTimeConfig::default())?;
    Ok(observer.horizontal(&obs.state, atmosphere))
}

/// Apparent ecliptic longitude of `body` minus that of the Sun, [0, 360)
pub fn longitude_from_sun(body: Body, time: Time) -> Result<f64> {
    Ok(normalize_degrees(
        ecliptic_longitude(body, time)? - ecliptic_longitude(Body::Sun, time)?,
    ))
}

/// First time the heliocentric longitude of `body` leads the Earth's by
/// `target_degrees`.
///
/// 0° is an opposition for an outer planet and an inferior conjunction for
/// an inner one.
pub fn search_relative_longitude(
    body: Body,
    target_degrees: f64,
    window: &SearchWindow,
    config: &SearchConfig,
) -> Result<SearchResult> {
    if body == Body::Earth {
        return Err(AlmagestError::UnsupportedBody {
            body,
            what: "longitude relative to the Earth",
        });
    }
    search(
        |t| pair_longitude(body, Body::Earth, t),
        window,
        Condition::Circular(target_degrees),
        config,
    )
}

/// Closest or farthest point of an orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApsisKind {
    /// Perihelion or perigee
    Pericenter,
    /// Aphelion or apogee
    Apocenter,
}

/// A located apsis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Apsis {
    pub kind: ApsisKind,
    pub time: Time,
    /// Distance from the central body in AU
    pub distance_au: f64,
}

fn radial_speed(state: &StateVector) -> f64 {
    state.position.dot(&state.velocity) / state.position.norm()
}

/// Radial speed goes from negative to positive at the pericenter.
fn apsis_direction(pericenter: bool) -> Direction {
    if pericenter {
        Direction::Rising
    } else {
        Direction::Falling
    }
}

fn apsis_from(result: &SearchResult, distance_au: f64) -> Apsis {
    let kind = match result.direction {
        Direction::Rising => ApsisKind::Pericenter,
        Direction::Falling => ApsisKind::Apocenter,
    };
    Apsis {
        kind,
        time: result.time,
        distance_au,
    }
}

/// First perihelion or aphelion of a planet in the window
pub fn search_planet_apsis(body: Body, window: &SearchWindow, config: &SearchConfig) -> Result<Apsis> {
    if !body.is_planet() {
        return Err(unsupported(body, EventKind::Perihelion));
    }
    let result = search(
        |t| Ok(radial_speed(&body_state(body, t)?)),
        window,
        Condition::ZeroCrossing,
        config,
    )?;
    Ok(apsis_from(&result, body_state(body, result.time)?.distance()))
}

/// First perigee or apogee of the Moon in the window
pub fn search_lunar_apsis(window: &SearchWindow, config: &SearchConfig) -> Result<Apsis> {
    let result = search(
        |t| Ok(radial_speed(&geo_moon_state(t)?)),
        window,
        Condition::ZeroCrossing,
        config,
    )?;
    Ok(apsis_from(&result, geo_moon_state(result.time)?.distance()))
}

/// First greatest elongation of Mercury or Venus in the window
pub fn search_max_elongation(body: Body, window: &SearchWindow, config: &SearchConfig) -> Result<Elongation> {
    let event = search_event(EventKind::MaxElongation, body, None, window, config)?;
    elongation(body, event.time)
}

/// Local apparent sidereal time in hours
pub fn local_sidereal_time(time: &Time, observer: &Observer) -> f64 {
    observer.lst_hours(time)
}

fn sidereal_period_days(body: Body) -> f64 {
    mean_elements(body).map_or(TROPICAL_YEAR, |el| el.sidereal_period_days())
}

/// Mean interval between conjunctions with the Sun as seen from the Earth
fn synodic_period_days(body: Body) -> f64 {
    match body {
        Body::Moon => SYNODIC_MONTH,
        Body::Sun | Body::Earth => TROPICAL_YEAR,
        _ => {
            let period = sidereal_period_days(body);
            let year = sidereal_period_days(Body::Earth);
            1.0 / (1.0 / period - 1.0 / year).abs()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AU_KM;
    use crate::searchlib::find_discrete;
    use approx::assert_relative_eq;

    fn ts() -> Timescale {
        Timescale::default()
    }

    fn minutes_between(a: &Time, b: &Time) -> f64 {
        a.days_since(b).abs() * 1440.0
    }

    #[test]
    fn test_seasons_2024() {
        let ts = ts();
        let s = seasons(&ts, 2024).unwrap();
        let published = [
            ts.utc((2024, 3, 20, 3, 6, 0.0)).unwrap(),
            ts.utc((2024, 6, 20, 20, 51, 0.0)).unwrap(),
            ts.utc((2024, 9, 22, 12, 44, 0.0)).unwrap(),
            ts.utc((2024, 12, 21, 9, 20, 0.0)).unwrap(),
        ];
        for (season, expected) in Season::ALL.iter().zip(published.iter()) {
            let found = s.get(*season);
            assert!(
                minutes_between(&found, expected) < 10.0,
                "{season} found at {found}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_season_index_steps() {
        let ts = ts();
        let window = SearchWindow::new(ts.utc((2024, 1, 1)).unwrap(), ts.utc((2025, 1, 1)).unwrap()).unwrap();
        let config = SearchConfig::default().with_step(5.0);
        let changes = find_discrete(&window, &mut season_index, &config).unwrap();
        let values: Vec<i64> = changes.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
        let march = ts.utc((2024, 3, 20, 3, 6, 0.0)).unwrap();
        assert!(minutes_between(&changes[0].0, &march) < 10.0);
    }

    #[test]
    fn test_season_event_needs_the_sun() {
        let ts = ts();
        let window = SearchWindow::from_start(ts.utc((2024, 3, 1)).unwrap(), 40.0).unwrap();
        let err = search_event(
            EventKind::Season(Season::MarchEquinox),
            Body::Moon,
            None,
            &window,
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AlmagestError::UnsupportedBody { body: Body::Moon, .. }));
    }

    #[test]
    fn test_rise_needs_observer() {
        let t = ts().utc((2024, 3, 20)).unwrap();
        let err = search_next(EventKind::Rise, Body::Sun, None, t, &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, AlmagestError::InvalidObserver(_)));
    }

    #[test]
    fn test_mars_opposition_2025() {
        // 2025 January 16, about 02:35 UTC
        let ts = ts();
        let start = ts.utc((2024, 12, 1)).unwrap();
        let event = search_next(EventKind::Opposition, Body::Mars, None, start, &SearchConfig::default()).unwrap();
        let expected = ts.utc((2025, 1, 16, 2, 35, 0.0)).unwrap();
        assert!(minutes_between(&event.time, &expected) < 30.0, "found {}", event.time);
        assert_relative_eq!(event.value, 180.0, epsilon = 1e-3);
    }

    #[test]
    fn test_inner_planets_have_no_opposition() {
        let t = ts().utc((2024, 1, 1)).unwrap();
        let err = search_next(EventKind::Opposition, Body::Venus, None, t, &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, AlmagestError::UnsupportedBody { .. }));
    }

    #[test]
    fn test_heliocentric_and_geocentric_opposition_agree() {
        let ts = ts();
        let window = SearchWindow::from_start(ts.utc((2024, 12, 1)).unwrap(), 90.0).unwrap();
        let config = SearchConfig::default().with_step(1.0);
        let helio = search_relative_longitude(Body::Mars, 0.0, &window, &config).unwrap();
        let geo = search_event(EventKind::Opposition, Body::Mars, None, &window, &config).unwrap();
        assert!(helio.time.days_since(&geo.time).abs() < 2.0);
    }

    #[test]
    fn test_earth_perihelion_2024() {
        // 2024 January 3, 00:39 UTC
        let ts = ts();
        let start = ts.utc((2023, 12, 1)).unwrap();
        let event = search_next(EventKind::Perihelion, Body::Earth, None, start, &SearchConfig::default()).unwrap();
        let expected = ts.utc((2024, 1, 3, 0, 39, 0.0)).unwrap();
        assert!(event.time.days_since(&expected).abs() < 0.25, "found {}", event.time);
        assert_eq!(event.direction, Direction::Rising);

        let window = SearchWindow::from_start(start, 60.0).unwrap();
        let apsis = search_planet_apsis(Body::Earth, &window, &SearchConfig::default().with_step(2.0)).unwrap();
        assert_eq!(apsis.kind, ApsisKind::Pericenter);
        assert_relative_eq!(apsis.distance_au, 0.98330, epsilon = 1e-4);
    }

    #[test]
    fn test_lunar_apsides() {
        let ts = ts();
        let start = ts.utc((2024, 1, 1)).unwrap();
        let config = SearchConfig::default();
        let perigee = search_next(EventKind::Perigee, Body::Moon, None, start, &config).unwrap();
        let apogee = search_next(EventKind::Apogee, Body::Moon, None, start, &config).unwrap();

        let window = SearchWindow::from_start(start, 30.0).unwrap();
        let apsis = search_lunar_apsis(&window, &config.with_step(0.5)).unwrap();
        let km = apsis.distance_au * AU_KM;
        assert!(km > 356_000.0 && km < 406_800.0);

        let perigee_km = geo_moon_state(perigee.time).unwrap().distance() * AU_KM;
        let apogee_km = geo_moon_state(apogee.time).unwrap().distance() * AU_KM;
        assert!(perigee_km > 356_000.0 && perigee_km < 370_500.0, "{perigee_km}");
        assert!(apogee_km > 404_000.0 && apogee_km < 406_800.0, "{apogee_km}");
    }

    #[test]
    fn test_venus_greatest_western_elongation_2023() {
        // 2023 October 23, 46.4°
        let ts = ts();
        let window = SearchWindow::from_start(ts.utc((2023, 9, 15)).unwrap(), 80.0).unwrap();
        let config = SearchConfig::default().with_step(1.0);
        let e = search_max_elongation(Body::Venus, &window, &config).unwrap();
        let expected = ts.utc((2023, 10, 23, 8, 0, 0.0)).unwrap();
        assert!(e.time.days_since(&expected).abs() < 1.0, "found {}", e.time);
        assert_relative_eq!(e.elongation, 46.4, epsilon = 0.2);
        assert!(search_max_elongation(Body::Mars, &window, &config).is_err());
    }

    #[test]
    fn test_default_windows() {
        assert_relative_eq!(
            EventKind::Conjunction.default_window_days(Body::Mars),
            781.0,
            epsilon = 2.0
        );
        assert_relative_eq!(
            EventKind::MaxElongation.default_window_days(Body::Venus),
            585.0,
            epsilon = 2.0
        );
        assert!(EventKind::Perihelion.default_window_days(Body::Mercury) < 90.0);
        assert!(EventKind::Rise.default_window_days(Body::Moon) > 1.0);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EventKind::Season(Season::JuneSolstice).to_string(), "June Solstice");
        assert_eq!(EventKind::LunarPhase(LunarQuarter::FullMoon).to_string(), "Full Moon");
        assert_eq!(EventKind::Perigee.to_string(), "perigee");
    }

    #[test]
    fn test_local_sidereal_time_in_range() {
        let t = ts().utc((2024, 3, 20)).unwrap();
        let obs = Observer::new(51.4769, -0.0005, 0.0).unwrap();
        let lst = local_sidereal_time(&t, &obs);
        assert!((0.0..24.0).contains(&lst));
        assert_relative_eq!(lst, t.gast(), epsilon = 1e-4);
    }
}
