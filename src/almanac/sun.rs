//! The Sun through a day: altitude thresholds, twilight and named states
//!
//! Twilight bands are defined on the geometric altitude of the Sun's centre,
//! without refraction. Each band is split into a morning and an evening
//! state by the sign of the altitude's rate of change. When the Sun turns
//! around inside a band, as it does under the midnight sun or polar night,
//! neither applies and [`sun_details`] reports the band's `*Unknown` state.

use std::fmt;

use crate::config::{Atmosphere, SearchConfig};
use crate::errors::Result;
use crate::planetlib::Body;
use crate::searchlib::{
    find_discrete, search, search_direction, Condition, Direction, SearchResult, SearchWindow,
    MIN_DERIVATIVE_STEP_DAYS,
};
use crate::time::Time;
use crate::toposlib::Observer;

use super::body_horizontal;

/// Upper altitude limits of the bands from night up to golden hour, degrees
pub const SUN_STATE_ALTITUDES: [f64; 6] = [-18.0, -12.0, -6.0, -4.0, 0.0, 6.0];

/// The three conventional twilights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Twilight {
    Civil,
    Nautical,
    Astronomical,
}

impl Twilight {
    /// Altitude of the Sun's centre that bounds this twilight, degrees
    pub fn altitude_degrees(self) -> f64 {
        match self {
            Twilight::Civil => -6.0,
            Twilight::Nautical => -12.0,
            Twilight::Astronomical => -18.0,
        }
    }
}

/// Named state of the Sun as seen from one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SunState {
    /// Below -18°
    Night,
    AstronomicalTwilight,
    NauticalTwilight,
    /// -6° to -4° in the morning
    BlueHourTwilight,
    /// -4° to 0° in the morning
    CivilTwilight,
    /// 0° to 6° in the morning
    GoldenHourTwilight,
    /// Above 6°
    Day,
    GoldenHourDusk,
    CivilDusk,
    BlueHourDusk,
    NauticalDusk,
    AstronomicalDusk,
    /// 0° to 6°, with the Sun turning around inside the band
    GoldenHourUnknown,
    CivilUnknown,
    BlueHourUnknown,
    NauticalUnknown,
    AstronomicalUnknown,
}

impl SunState {
    /// State for an altitude in degrees and whether the Sun is climbing
    pub fn classify(altitude_degrees: f64, rising: bool) -> SunState {
        let band = SUN_STATE_ALTITUDES
            .iter()
            .position(|&limit| altitude_degrees <= limit)
            .unwrap_or(SUN_STATE_ALTITUDES.len());
        match (band, rising) {
            (0, _) => SunState::Night,
            (1, true) => SunState::AstronomicalTwilight,
            (2, true) => SunState::NauticalTwilight,
            (3, true) => SunState::BlueHourTwilight,
            (4, true) => SunState::CivilTwilight,
            (5, true) => SunState::GoldenHourTwilight,
            (1, false) => SunState::AstronomicalDusk,
            (2, false) => SunState::NauticalDusk,
            (3, false) => SunState::BlueHourDusk,
            (4, false) => SunState::CivilDusk,
            (5, false) => SunState::GoldenHourDusk,
            _ => SunState::Day,
        }
    }

    /// The band's `*Unknown` state, for the twilight and dusk states
    pub fn turning(self) -> Option<SunState> {
        match self {
            SunState::AstronomicalTwilight
            | SunState::AstronomicalDusk
            | SunState::AstronomicalUnknown => Some(SunState::AstronomicalUnknown),
            SunState::NauticalTwilight | SunState::NauticalDusk | SunState::NauticalUnknown => {
                Some(SunState::NauticalUnknown)
            }
            SunState::BlueHourTwilight | SunState::BlueHourDusk | SunState::BlueHourUnknown => {
                Some(SunState::BlueHourUnknown)
            }
            SunState::CivilTwilight | SunState::CivilDusk | SunState::CivilUnknown => {
                Some(SunState::CivilUnknown)
            }
            SunState::GoldenHourTwilight
            | SunState::GoldenHourDusk
            | SunState::GoldenHourUnknown => Some(SunState::GoldenHourUnknown),
            SunState::Night | SunState::Day => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SunState::Night => "Night",
            SunState::AstronomicalTwilight => "Astronomical Twilight",
            SunState::NauticalTwilight => "Nautical Twilight",
            SunState::BlueHourTwilight => "Blue Hour",
            SunState::CivilTwilight => "Civil Twilight",
            SunState::GoldenHourTwilight => "Golden Hour",
            SunState::Day => "Day",
            SunState::GoldenHourDusk => "Golden Hour Dusk",
            SunState::CivilDusk => "Civil Dusk",
            SunState::BlueHourDusk => "Blue Hour Dusk",
            SunState::NauticalDusk => "Nautical Dusk",
            SunState::AstronomicalDusk => "Astronomical Dusk",
            SunState::GoldenHourUnknown => "Golden Hour Unknown",
            SunState::CivilUnknown => "Civil Unknown",
            SunState::BlueHourUnknown => "Blue Hour Unknown",
            SunState::NauticalUnknown => "Nautical Unknown",
            SunState::AstronomicalUnknown => "Astronomical Unknown",
        }
    }
}

impl fmt::Display for SunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One stretch of a [`SunState`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SunPeriod {
    pub state: SunState,
    pub start: Time,
    pub end: Time,
}

fn sun_altitude(time: Time, observer: &Observer) -> Result<f64> {
    Ok(body_horizontal(Body::Sun, time, observer, &Atmosphere::none())?.altitude_degrees)
}

/// State of the Sun at `time` for `observer`.
///
/// Always one of the directional states; the `*Unknown` states only arise
/// over a period, in [`sun_details`].
pub fn sun_state(time: Time, observer: &Observer) -> Result<SunState> {
    let altitude = sun_altitude(time, observer)?;
    let ahead = sun_altitude(time.add_days(MIN_DERIVATIVE_STEP_DAYS), observer)?;
    let behind = sun_altitude(time.add_days(-MIN_DERIVATIVE_STEP_DAYS), observer)?;
    Ok(SunState::classify(altitude, ahead > behind))
}

/// The states the Sun passes through in the 24 hours from `time`.
///
/// The first period starts at `time` and the last ends 24 hours later, so
/// both are usually cut short. A twilight band entered and left on the same
/// side, with the Sun turning around inside it, is one period in the band's
/// `*Unknown` state.
pub fn sun_details(time: Time, observer: &Observer, config: &SearchConfig) -> Result<Vec<SunPeriod>> {
    let window = SearchWindow::from_start(time, 1.0)?;
    let mut state_code = |t: Time| -> Result<i64> { Ok(sun_state(t, observer)? as i64) };
    let changes = find_discrete(&window, &mut state_code, config)?;

    let mut periods: Vec<SunPeriod> = Vec::with_capacity(changes.len() + 1);
    let mut start = time;
    let mut state = sun_state(time, observer)?;
    let ends = changes.iter().map(|&(at, _)| at).chain(std::iter::once(window.end));
    for (i, end) in ends.enumerate() {
        push_merging_turns(&mut periods, SunPeriod { state, start, end });
        if let Some(&(at, _)) = changes.get(i) {
            start = at;
            state = sun_state(at, observer)?;
        }
    }
    Ok(periods)
}

/// Append a period, folding it into the previous one when both lie in the
/// same twilight band.
fn push_merging_turns(periods: &mut Vec<SunPeriod>, period: SunPeriod) {
    if let Some(last) = periods.last_mut() {
        if let (Some(a), Some(b)) = (last.state.turning(), period.state.turning()) {
            if a == b {
                last.state = a;
                last.end = period.end;
                return;
            }
        }
    }
    periods.push(period);
}

/// First time in the window a body's apparent altitude crosses
/// `altitude_degrees`, in either sense unless `direction` is given.
pub fn search_altitude(
    body: Body,
    observer: &Observer,
    altitude_degrees: f64,
    direction: Option<Direction>,
    atmosphere: &Atmosphere,
    window: &SearchWindow,
    config: &SearchConfig,
) -> Result<SearchResult> {
    let f = |t: Time| -> Result<f64> { Ok(body_horizontal(body, t, observer, atmosphere)?.altitude_degrees) };
    let condition = Condition::Threshold(altitude_degrees);
    match direction {
        Some(direction) => search_direction(f, window, condition, direction, config),
        None => search(f, window, condition, config),
    }
}

/// Start of morning twilight (`Rising`) or end of evening twilight (`Falling`)
pub fn search_twilight(
    observer: &Observer,
    twilight: Twilight,
    direction: Direction,
    window: &SearchWindow,
    config: &SearchConfig,
) -> Result<SearchResult> {
    search_altitude(
        Body::Sun,
        observer,
        twilight.altitude_degrees(),
        Some(direction),
        &Atmosphere::none(),
        window,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timescale;
    use approx::assert_relative_eq;

    fn greenwich() -> Observer {
        Observer::new(51.4769, -0.0005, 0.0).unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(SunState::classify(-30.0, true), SunState::Night);
        assert_eq!(SunState::classify(-18.0, false), SunState::Night);
        assert_eq!(SunState::classify(-15.0, true), SunState::AstronomicalTwilight);
        assert_eq!(SunState::classify(-15.0, false), SunState::AstronomicalDusk);
        assert_eq!(SunState::classify(-5.0, true), SunState::BlueHourTwilight);
        assert_eq!(SunState::classify(-2.0, false), SunState::CivilDusk);
        assert_eq!(SunState::classify(3.0, false), SunState::GoldenHourDusk);
        assert_eq!(SunState::classify(40.0, false), SunState::Day);
    }

    #[test]
    fn test_equinox_day_at_greenwich() {
        let ts = Timescale::default();
        let t = ts.utc((2024, 3, 20)).unwrap();
        let config = SearchConfig::default();
        let periods = sun_details(t, &greenwich(), &config).unwrap();
        let states: Vec<SunState> = periods.iter().map(|p| p.state).collect();
        assert_eq!(
            states,
            vec![
                SunState::Night,
                SunState::AstronomicalTwilight,
                SunState::NauticalTwilight,
                SunState::BlueHourTwilight,
                SunState::CivilTwilight,
                SunState::GoldenHourTwilight,
                SunState::Day,
                SunState::GoldenHourDusk,
                SunState::CivilDusk,
                SunState::BlueHourDusk,
                SunState::NauticalDusk,
                SunState::AstronomicalDusk,
                SunState::Night,
            ]
        );
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        // Day covers most of the 12 hours between sunrise and sunset
        let day = &periods[6];
        let hours = day.end.days_since(&day.start) * 24.0;
        assert!(hours > 10.0 && hours < 11.5, "day lasted {hours} h");
    }

    #[test]
    fn test_twilight_bounds_are_on_threshold() {
        let ts = Timescale::default();
        let obs = greenwich();
        let window = SearchWindow::from_start(ts.utc((2024, 3, 20)).unwrap(), 1.0).unwrap();
        let config = SearchConfig::default();
        let dawn = search_twilight(&obs, Twilight::Civil, Direction::Rising, &window, &config).unwrap();
        let dusk = search_twilight(&obs, Twilight::Civil, Direction::Falling, &window, &config).unwrap();
        assert_relative_eq!(dawn.value, -6.0, epsilon = 1e-3);
        assert_relative_eq!(dusk.value, -6.0, epsilon = 1e-3);
        assert!(dusk.time.tt() > dawn.time.tt());
        // Civil dawn in London at the equinox is a little before 05:30 UTC
        let hour = dawn.time.days_since(&window.start) * 24.0;
        assert!(hour > 5.0 && hour < 5.75, "civil dawn at {hour} h");
    }

    #[test]
    fn test_turning_states() {
        assert_eq!(SunState::CivilDusk.turning(), Some(SunState::CivilUnknown));
        assert_eq!(SunState::CivilTwilight.turning(), Some(SunState::CivilUnknown));
        assert_eq!(SunState::Day.turning(), None);
        assert_eq!(SunState::Night.turning(), None);
        // Neighbouring bands never merge
        assert_ne!(
            SunState::CivilDusk.turning(),
            SunState::BlueHourDusk.turning()
        );
    }

    #[test]
    fn test_polar_twilight_is_unknown() {
        // Longyearbyen in late November: the Sun stays between -6° and
        // -18° all day, climbing towards noon then sinking again
        let ts = Timescale::default();
        let svalbard = Observer::new(78.22, 15.65, 0.0).unwrap();
        let t = ts.utc((2024, 11, 25)).unwrap();
        let periods = sun_details(t, &svalbard, &SearchConfig::default()).unwrap();
        for p in &periods {
            assert!(
                !matches!(p.state, SunState::Day | SunState::GoldenHourTwilight | SunState::GoldenHourDusk),
                "{:?}",
                p.state
            );
        }
        assert!(periods.iter().any(|p| p.state.name().ends_with("Unknown")), "{periods:?}");
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_ne!(pair[0].state, pair[1].state);
        }
    }

    #[test]
    fn test_midnight_sun_turns_in_golden_hour() {
        // At Tromsø the Sun bottoms out near +3° around 22:45 UTC
        let ts = Timescale::default();
        let tromso = Observer::new(69.65, 18.96, 0.0).unwrap();
        let t = ts.utc((2024, 6, 21)).unwrap();
        let periods = sun_details(t, &tromso, &SearchConfig::default()).unwrap();
        let states: Vec<SunState> = periods.iter().map(|p| p.state).collect();
        assert_eq!(
            states,
            vec![
                SunState::GoldenHourTwilight,
                SunState::Day,
                SunState::GoldenHourUnknown,
            ]
        );
        let turn = &periods[2];
        assert_eq!(turn.end, t.add_days(1.0));
        // From the 6° crossing in the evening to the end of the day
        assert!(turn.end.days_since(&turn.start) > 0.1);
    }
}
