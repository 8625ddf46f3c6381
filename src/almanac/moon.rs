//! Lunar phases
//!
//! The phase angle is the Moon's apparent ecliptic longitude minus the
//! Sun's ([`crate::positions::moon_phase`]); quarters are the times it
//! passes a multiple of 90°. A lunation is measured from one new moon to
//! the next, and its fraction elapsed gives the phase names.

use std::fmt;

use crate::config::SearchConfig;
use crate::constants::SYNODIC_MONTH;
use crate::errors::{AlmagestError, Result};
use crate::planetlib::Body;
use crate::positions::{illumination, moon_phase};
use crate::searchlib::{search_all, Condition, SearchWindow};
use crate::time::Time;

use super::{search_next, EventKind};

/// Human-readable moon phase names indexed by quarter number 0..3
pub const MOON_PHASE_NAMES: [&str; 4] = ["New Moon", "First Quarter", "Full Moon", "Last Quarter"];

/// The four principal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LunarQuarter {
    NewMoon,
    FirstQuarter,
    FullMoon,
    LastQuarter,
}

impl LunarQuarter {
    pub const ALL: [LunarQuarter; 4] = [
        LunarQuarter::NewMoon,
        LunarQuarter::FirstQuarter,
        LunarQuarter::FullMoon,
        LunarQuarter::LastQuarter,
    ];

    /// Phase angle at this quarter, degrees
    pub fn target_degrees(self) -> f64 {
        self as usize as f64 * 90.0
    }

    pub fn name(self) -> &'static str {
        MOON_PHASE_NAMES[self as usize]
    }

    /// Quarter for an index, wrapping modulo 4
    pub fn from_index(index: i64) -> LunarQuarter {
        LunarQuarter::ALL[index.rem_euclid(4) as usize]
    }
}

impl fmt::Display for LunarQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight conventional names of the Moon's appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoonPhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhaseName {
    /// Name for the fraction of the lunation elapsed since new moon.
    ///
    /// The principal phases get a window of ±1% of the lunation.
    pub fn from_lunation_fraction(fraction: f64) -> MoonPhaseName {
        match fraction {
            f if f <= 0.01 || f >= 0.99 => MoonPhaseName::NewMoon,
            f if f < 0.24 => MoonPhaseName::WaxingCrescent,
            f if f <= 0.26 => MoonPhaseName::FirstQuarter,
            f if f < 0.49 => MoonPhaseName::WaxingGibbous,
            f if f <= 0.51 => MoonPhaseName::FullMoon,
            f if f < 0.74 => MoonPhaseName::WaningGibbous,
            f if f <= 0.76 => MoonPhaseName::LastQuarter,
            _ => MoonPhaseName::WaningCrescent,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MoonPhaseName::NewMoon => "New Moon",
            MoonPhaseName::WaxingCrescent => "Waxing Crescent",
            MoonPhaseName::FirstQuarter => "First Quarter",
            MoonPhaseName::WaxingGibbous => "Waxing Gibbous",
            MoonPhaseName::FullMoon => "Full Moon",
            MoonPhaseName::WaningGibbous => "Waning Gibbous",
            MoonPhaseName::LastQuarter => "Last Quarter",
            MoonPhaseName::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quarter index 0..3 from the phase angle.
///
/// A step function of time for
/// [`find_discrete`](crate::searchlib::find_discrete), changing at every
/// quarter.
pub fn moon_quarter_index(time: Time) -> Result<i64> {
    Ok((moon_phase(time)? / 90.0).floor() as i64 % 4)
}

/// A located quarter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoonQuarter {
    pub quarter: LunarQuarter,
    pub time: Time,
}

/// Next time the Moon reaches `quarter` after `time`
pub fn search_moon_quarter(quarter: LunarQuarter, time: Time, config: &SearchConfig) -> Result<Time> {
    Ok(search_next(EventKind::LunarPhase(quarter), Body::Moon, None, time, config)?.time)
}

/// Whichever quarter comes next after `time`
pub fn next_moon_quarter(time: Time, config: &SearchConfig) -> Result<MoonQuarter> {
    let quarter = LunarQuarter::from_index(moon_quarter_index(time)? + 1);
    Ok(MoonQuarter {
        quarter,
        time: search_moon_quarter(quarter, time, config)?,
    })
}

pub fn next_new_moon(time: Time, config: &SearchConfig) -> Result<Time> {
    search_moon_quarter(LunarQuarter::NewMoon, time, config)
}

pub fn next_full_moon(time: Time, config: &SearchConfig) -> Result<Time> {
    search_moon_quarter(LunarQuarter::FullMoon, time, config)
}

/// Most recent new moon at or before `time`
pub fn previous_new_moon(time: Time, config: &SearchConfig) -> Result<Time> {
    let kind = EventKind::LunarPhase(LunarQuarter::NewMoon);
    let days = kind.default_window_days(Body::Moon);
    let window = SearchWindow::new(time.add_days(-days), time)?;
    let config = config.with_step(kind.default_step_days(Body::Moon));
    search_all(moon_phase, &window, Condition::Circular(0.0), &config)?
        .last()
        .map(|r| r.time)
        .ok_or(AlmagestError::NotFound {
            what: "new moon",
            start: window.start.tt(),
            end: window.end.tt(),
        })
}

/// Where the Moon stands in its current lunation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LunarPhase {
    pub time: Time,
    pub name: MoonPhaseName,
    /// Moon minus Sun apparent ecliptic longitude, [0, 360)
    pub phase_angle: f64,
    /// Fraction of the lunation elapsed since the last new moon, [0, 1)
    pub lunation_fraction: f64,
    /// Lit fraction of the disc
    pub illuminated_fraction: f64,
    pub previous_new_moon: Time,
    pub next_new_moon: Time,
    pub next_full_moon: Time,
}

impl LunarPhase {
    /// Waxing, between new and full moon
    pub fn is_first_half(&self) -> bool {
        self.lunation_fraction < 0.5
    }
}

/// Phase, name and bracketing new and full moons at `time`.
pub fn lunar_phase(time: Time, config: &SearchConfig) -> Result<LunarPhase> {
    let previous = previous_new_moon(time, config)?;
    let next_new = next_new_moon(time, config)?;
    let next_full = next_full_moon(time, config)?;
    let lunation = next_new.days_since(&previous);
    let fraction = if lunation > 0.0 {
        time.days_since(&previous) / lunation
    } else {
        time.days_since(&previous) / SYNODIC_MONTH
    };
    Ok(LunarPhase {
        time,
        name: MoonPhaseName::from_lunation_fraction(fraction),
        phase_angle: moon_phase(time)?,
        lunation_fraction: fraction,
        illuminated_fraction: illumination(Body::Moon, time)?.phase_fraction,
        previous_new_moon: previous,
        next_new_moon: next_new,
        next_full_moon: next_full,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchlib::find_discrete;
    use crate::time::Timescale;

    fn ts() -> Timescale {
        Timescale::default()
    }

    fn minutes_between(a: &Time, b: &Time) -> f64 {
        a.days_since(b).abs() * 1440.0
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.0), MoonPhaseName::NewMoon);
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.995), MoonPhaseName::NewMoon);
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.1), MoonPhaseName::WaxingCrescent);
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.25), MoonPhaseName::FirstQuarter);
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.4), MoonPhaseName::WaxingGibbous);
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.5), MoonPhaseName::FullMoon);
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.6), MoonPhaseName::WaningGibbous);
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.75), MoonPhaseName::LastQuarter);
        assert_eq!(MoonPhaseName::from_lunation_fraction(0.9), MoonPhaseName::WaningCrescent);
        assert_eq!(MoonPhaseName::WaningGibbous.to_string(), "Waning Gibbous");
    }

    #[test]
    fn test_quarter_indexing() {
        assert_eq!(LunarQuarter::from_index(4), LunarQuarter::NewMoon);
        assert_eq!(LunarQuarter::from_index(-1), LunarQuarter::LastQuarter);
        assert_eq!(LunarQuarter::FullMoon.target_degrees(), 180.0);
    }

    #[test]
    fn test_january_2024_new_and_full_moon() {
        // New moon 2024-01-11 11:57 UTC, full moon 2024-01-25 17:54 UTC
        let ts = ts();
        let config = SearchConfig::default();
        let start = ts.utc((2024, 1, 1)).unwrap();
        let new = next_new_moon(start, &config).unwrap();
        let full = next_full_moon(start, &config).unwrap();
        assert!(minutes_between(&new, &ts.utc((2024, 1, 11, 11, 57, 0.0)).unwrap()) < 5.0);
        assert!(minutes_between(&full, &ts.utc((2024, 1, 25, 17, 54, 0.0)).unwrap()) < 5.0);
    }

    #[test]
    fn test_quarters_in_january_2024() {
        let ts = ts();
        let window = SearchWindow::new(ts.utc((2024, 1, 1)).unwrap(), ts.utc((2024, 2, 1)).unwrap()).unwrap();
        let config = SearchConfig::default().with_step(1.0);
        let changes = find_discrete(&window, &mut moon_quarter_index, &config).unwrap();
        let quarters: Vec<LunarQuarter> = changes.iter().map(|(_, i)| LunarQuarter::from_index(*i)).collect();
        assert_eq!(
            quarters,
            vec![
                LunarQuarter::LastQuarter,
                LunarQuarter::NewMoon,
                LunarQuarter::FirstQuarter,
                LunarQuarter::FullMoon,
            ]
        );
        // First quarter 2024-01-18 03:53 UTC
        assert!(minutes_between(&changes[2].0, &ts.utc((2024, 1, 18, 3, 53, 0.0)).unwrap()) < 5.0);
    }

    #[test]
    fn test_next_quarter_follows_current_index() {
        let t = ts().utc((2024, 1, 15)).unwrap();
        let q = next_moon_quarter(t, &SearchConfig::default()).unwrap();
        assert_eq!(q.quarter, LunarQuarter::FirstQuarter);
        assert!(q.time.days_since(&t) > 0.0 && q.time.days_since(&t) < 4.0);
    }

    #[test]
    fn test_lunar_phase_mid_january_2024() {
        let ts = ts();
        let t = ts.utc((2024, 1, 15)).unwrap();
        let phase = lunar_phase(t, &SearchConfig::default()).unwrap();
        assert_eq!(phase.name, MoonPhaseName::WaxingCrescent);
        assert!(phase.is_first_half());
        assert!(phase.phase_angle > 30.0 && phase.phase_angle < 60.0);
        assert!(phase.illuminated_fraction > 0.1 && phase.illuminated_fraction < 0.3);
        assert!(minutes_between(&phase.previous_new_moon, &ts.utc((2024, 1, 11, 11, 57, 0.0)).unwrap()) < 5.0);
        assert!(minutes_between(&phase.next_new_moon, &ts.utc((2024, 2, 9, 22, 59, 0.0)).unwrap()) < 5.0);
        assert!(minutes_between(&phase.next_full_moon, &ts.utc((2024, 1, 25, 17, 54, 0.0)).unwrap()) < 5.0);
    }
}
