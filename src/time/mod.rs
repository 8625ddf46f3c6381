//! Time scales and instants
//!
//! A [`Time`] is an immutable instant stored as two Julian dates: Terrestrial
//! Time, which drives every ephemeris, and UT1, which drives Earth rotation.
//! The gap between them comes from the [`DeltaT`] model of the [`Timescale`]
//! that built the instant. Leap seconds are not modelled: calendar input
//! labelled UTC is treated as UT1.
//!
//! ```
//! use almagest::time::Timescale;
//!
//! let ts = Timescale::default();
//! let t = ts.utc((2024, 3, 20, 3, 6, 0.0)).unwrap();
//! assert!(t.tt() > t.ut1());
//! ```

pub mod calendar;
pub mod delta_t;

pub use delta_t::DeltaT;

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use nalgebra::Matrix3;

use crate::constants::{DAYS_PER_CENTURY, DAYS_PER_MILLENNIUM, DAY_S, J2000};
use crate::errors::{AlmagestError, Result};
use crate::{earthlib, nutationlib, precessionlib};

/// Julian date of the Unix epoch, 1970-01-01T00:00:00
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Calendar fields of an instant in the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarTuple {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl CalendarTuple {
    /// Julian date of these calendar fields, validating every field.
    pub fn julian_date(&self) -> Result<f64> {
        calendar::compute_julian_date(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }

    fn from_jd(jd: f64) -> Self {
        let (year, month, day, hour, minute, second) = calendar::calendar_tuple_from_jd(jd);
        CalendarTuple {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

impl From<(i32, u32, u32)> for CalendarTuple {
    fn from((year, month, day): (i32, u32, u32)) -> Self {
        CalendarTuple {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0.0,
        }
    }
}

impl From<(i32, u32, u32, u32, u32, f64)> for CalendarTuple {
    fn from((year, month, day, hour, minute, second): (i32, u32, u32, u32, u32, f64)) -> Self {
        CalendarTuple {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

impl fmt::Display for CalendarTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:06.3}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Factory for [`Time`] values sharing one delta-T model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timescale {
    delta_t: DeltaT,
}

impl Timescale {
    /// Timescale with an explicit delta-T model
    pub fn new(delta_t: DeltaT) -> Self {
        Timescale { delta_t }
    }

    /// Timescale where TT - UT1 is the same constant for every date
    pub fn fixed(delta_t_seconds: f64) -> Self {
        Timescale {
            delta_t: DeltaT::Fixed(delta_t_seconds),
        }
    }

    /// The delta-T model in use
    pub fn delta_t(&self) -> DeltaT {
        self.delta_t
    }

    /// Instant from a Terrestrial Time Julian date
    pub fn tt_jd(&self, jd: f64) -> Time {
        Time::from_tt(jd, self.delta_t)
    }

    /// Instant from a UT1 Julian date
    pub fn ut1_jd(&self, jd: f64) -> Time {
        let tt = jd + self.delta_t.compute(jd) / DAY_S;
        Time {
            tt,
            ut1: jd,
            delta_t: self.delta_t,
        }
    }

    /// Instant from calendar fields on the TT scale
    pub fn tt(&self, calendar: impl Into<CalendarTuple>) -> Result<Time> {
        Ok(self.tt_jd(calendar.into().julian_date()?))
    }

    /// Instant from civil calendar fields (UTC, treated as UT1)
    pub fn utc(&self, calendar: impl Into<CalendarTuple>) -> Result<Time> {
        Ok(self.ut1_jd(calendar.into().julian_date()?))
    }

    /// Instant from seconds since the Unix epoch
    pub fn from_unix_seconds(&self, seconds: f64) -> Time {
        self.ut1_jd(UNIX_EPOCH_JD + seconds / DAY_S)
    }

    /// Instant from a chrono timestamp in any zone
    pub fn from_datetime<Tz: TimeZone>(&self, datetime: &DateTime<Tz>) -> Time {
        let utc = datetime.with_timezone(&Utc);
        let seconds =
            utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1_000_000_000.0;
        self.from_unix_seconds(seconds)
    }

    /// The J2000.0 epoch
    pub fn j2000(&self) -> Time {
        self.tt_jd(J2000)
    }
}

/// An immutable instant.
///
/// Copy it freely: every engine function takes it by value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    tt: f64,
    ut1: f64,
    delta_t: DeltaT,
}

impl Time {
    fn from_tt(tt: f64, delta_t: DeltaT) -> Self {
        Time {
            tt,
            ut1: tt - delta_t.compute(tt) / DAY_S,
            delta_t,
        }
    }

    /// Terrestrial Time Julian date
    pub fn tt(&self) -> f64 {
        self.tt
    }

    /// UT1 Julian date
    pub fn ut1(&self) -> f64 {
        self.ut1
    }

    /// TT - UT1 in seconds at this instant
    pub fn delta_t_seconds(&self) -> f64 {
        (self.tt - self.ut1) * DAY_S
    }

    /// The delta-T model this instant was built with
    pub fn delta_t_model(&self) -> DeltaT {
        self.delta_t
    }

    /// Julian centuries of TT since J2000.0
    pub fn tt_centuries(&self) -> f64 {
        (self.tt - J2000) / DAYS_PER_CENTURY
    }

    /// Julian millennia of TT since J2000.0
    pub fn tt_millennia(&self) -> f64 {
        (self.tt - J2000) / DAYS_PER_MILLENNIUM
    }

    /// Another instant on the same timescale at the given TT Julian date
    pub fn with_tt(&self, tt: f64) -> Time {
        Time::from_tt(tt, self.delta_t)
    }

    /// This instant shifted by a number of days (TT)
    pub fn add_days(&self, days: f64) -> Time {
        self.with_tt(self.tt + days)
    }

    /// Days elapsed from `earlier` to this instant (TT)
    pub fn days_since(&self, earlier: &Time) -> f64 {
        self.tt - earlier.tt
    }

    /// Civil calendar fields (UT1 standing in for UTC)
    pub fn utc_calendar(&self) -> CalendarTuple {
        CalendarTuple::from_jd(self.ut1)
    }

    /// Calendar fields on the TT scale
    pub fn tt_calendar(&self) -> CalendarTuple {
        CalendarTuple::from_jd(self.tt)
    }

    /// Seconds since the Unix epoch
    pub fn unix_seconds(&self) -> f64 {
        (self.ut1 - UNIX_EPOCH_JD) * DAY_S
    }

    /// This instant as a chrono UTC timestamp
    ///
    /// Fails with `InvalidDate` for instants chrono cannot represent.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let micros = (self.unix_seconds() * 1e6).round() as i64;
        DateTime::from_timestamp_micros(micros).ok_or_else(|| {
            AlmagestError::InvalidDate(format!("JD {} is outside the chrono range", self.ut1))
        })
    }

    /// Greenwich Mean Sidereal Time in hours
    pub fn gmst(&self) -> f64 {
        let whole = self.ut1.floor();
        earthlib::sidereal_time(whole, self.ut1 - whole, self.tt_centuries())
    }

    /// Greenwich Apparent Sidereal Time in hours
    pub fn gast(&self) -> f64 {
        let eqeq = nutationlib::equation_of_the_equinoxes(self.tt);
        (self.gmst() + eqeq.to_degrees() / 15.0).rem_euclid(24.0)
    }

    /// Mean obliquity of the ecliptic in radians
    pub fn mean_obliquity(&self) -> f64 {
        nutationlib::mean_obliquity(self.tt)
    }

    /// True obliquity of the ecliptic in radians
    pub fn true_obliquity(&self) -> f64 {
        let (_, d_eps) = nutationlib::nutation(self.tt);
        self.mean_obliquity() + d_eps
    }

    /// Precession matrix: J2000 mean equator -> mean equator of date
    pub fn precession_matrix(&self) -> Matrix3<f64> {
        precessionlib::compute_precession(self.tt)
    }

    /// Nutation matrix: mean equator of date -> true equator of date
    pub fn nutation_matrix(&self) -> Matrix3<f64> {
        let (d_psi, d_eps) = nutationlib::nutation(self.tt);
        nutationlib::build_nutation_matrix(self.mean_obliquity(), d_psi, d_eps)
    }

    /// Combined matrix: J2000 mean equator -> true equator of date
    pub fn m_matrix(&self) -> Matrix3<f64> {
        self.nutation_matrix() * self.precession_matrix()
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.tt.partial_cmp(&other.tt)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} UTC", self.utc_calendar())
    }
}
