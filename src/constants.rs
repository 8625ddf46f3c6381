//! Physical and astronomical constants shared across the crate.

use std::f64::consts::PI;

/// Full turn in radians
pub const TAU: f64 = 2.0 * PI;

/// Degrees to radians
pub const DEG2RAD: f64 = PI / 180.0;

/// Radians to degrees
pub const RAD2DEG: f64 = 180.0 / PI;

/// Arcseconds to radians
pub const ASEC2RAD: f64 = PI / 648_000.0;

/// Julian date of the J2000.0 epoch (2000 January 1.5 TT)
pub const J2000: f64 = 2_451_545.0;

/// Seconds per day
pub const DAY_S: f64 = 86_400.0;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Days per Julian millennium, the time unit of the planetary series
pub const DAYS_PER_MILLENNIUM: f64 = 365_250.0;

/// Astronomical unit in meters (IAU 2012)
pub const AU_M: f64 = 149_597_870_700.0;

/// Astronomical unit in kilometers
pub const AU_KM: f64 = AU_M / 1000.0;

/// Speed of light in meters per second
pub const C: f64 = 299_792_458.0;

/// Speed of light in AU/day
pub const C_AUDAY: f64 = C * DAY_S / AU_M;

/// Gaussian gravitational constant squared: GM of the Sun in AU^3/day^2
pub const GM_SUN: f64 = 2.959_122_082_855_911e-4;

/// Earth equatorial radius in meters (WGS84)
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Inverse flattening of the WGS84 ellipsoid
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;

/// Mean equatorial radius of the Moon in kilometers
pub const MOON_RADIUS_KM: f64 = 1737.4;

/// Mean solar radius in kilometers
pub const SUN_RADIUS_KM: f64 = 695_700.0;

/// Earth/Moon mass ratio
pub const EARTH_MOON_MASS_RATIO: f64 = 81.300_568;

/// Length of the mean sidereal day in solar hours
pub const SIDEREAL_DAY_HOURS: f64 = 23.934_469_591_89;

/// Mean synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588;

/// Mean anomalistic month in days
pub const ANOMALISTIC_MONTH: f64 = 27.554_550;

/// Mean tropical year in days
pub const TROPICAL_YEAR: f64 = 365.242_19;
