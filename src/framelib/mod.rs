//! Reference frames, tagged state vectors and frame rotations
//!
//! Every vector the engine produces is a [`StateVector`] carrying the
//! [`Frame`] its axes belong to and the [`Origin`] it is measured from.
//! Combining two states checks both tags, so a heliocentric ecliptic vector
//! can never be silently subtracted from a geocentric equatorial one.
//!
//! The canonical frame is the J2000 mean equator and equinox; every other
//! frame is defined by its rotation from it.

use std::fmt;

use nalgebra::{Matrix3, Vector3};
use once_cell::sync::Lazy;

use crate::constants::{ASEC2RAD, C_AUDAY, RAD2DEG};
use crate::errors::{AlmagestError, Result};
use crate::time::Time;
use crate::units::{normalize_degrees, normalize_hours};

/// Mean obliquity of the ecliptic at J2000.0 in radians
pub const OBLIQUITY_J2000: f64 = 84381.406 * ASEC2RAD;

/// Rotation of the coordinate frame about the x axis by `angle` radians.
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Rotation of the coordinate frame about the z axis by `angle` radians.
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// J2000 ecliptic -> J2000 mean equator
pub static ECLIPTIC_J2000_TO_EQUATORIAL: Lazy<Matrix3<f64>> =
    Lazy::new(|| rot_x(-OBLIQUITY_J2000));

/// The reference frame a vector's axes belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frame {
    /// Mean equator and equinox of J2000.0
    EquatorialJ2000,
    /// True equator and equinox of date
    EquatorialOfDate,
    /// Mean ecliptic and equinox of J2000.0
    EclipticJ2000,
    /// True ecliptic and equinox of date
    EclipticOfDate,
}

impl Frame {
    /// Matrix taking vectors in this frame to the J2000 mean equator at `time`
    pub fn to_equatorial_j2000(self, time: &Time) -> Matrix3<f64> {
        match self {
            Frame::EquatorialJ2000 => Matrix3::identity(),
            Frame::EquatorialOfDate => time.m_matrix().transpose(),
            Frame::EclipticJ2000 => *ECLIPTIC_J2000_TO_EQUATORIAL,
            Frame::EclipticOfDate => {
                (rot_x(time.true_obliquity()) * time.m_matrix()).transpose()
            }
        }
    }

    /// Matrix taking vectors in this frame to `target` at `time`
    pub fn rotation_to(self, target: Frame, time: &Time) -> Matrix3<f64> {
        if self == target {
            return Matrix3::identity();
        }
        target.to_equatorial_j2000(time).transpose() * self.to_equatorial_j2000(time)
    }

    /// Whether the frame is referred to the ecliptic plane
    pub fn is_ecliptic(self) -> bool {
        matches!(self, Frame::EclipticJ2000 | Frame::EclipticOfDate)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frame::EquatorialJ2000 => "J2000 equator",
            Frame::EquatorialOfDate => "true equator of date",
            Frame::EclipticJ2000 => "J2000 ecliptic",
            Frame::EclipticOfDate => "true ecliptic of date",
        };
        f.write_str(name)
    }
}

/// Where a vector is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    /// Centre of the Sun
    Heliocentric,
    /// Centre of the Earth
    Geocentric,
    /// An observer on the Earth's surface
    Topocentric,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Origin::Heliocentric => "heliocentric",
            Origin::Geocentric => "geocentric",
            Origin::Topocentric => "topocentric",
        };
        f.write_str(name)
    }
}

/// Position (AU) and velocity (AU/day) valid at one instant, tagged with
/// the frame and origin they are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub time: Time,
    pub frame: Frame,
    pub origin: Origin,
}

impl StateVector {
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        time: Time,
        frame: Frame,
        origin: Origin,
    ) -> Self {
        StateVector {
            position,
            velocity,
            time,
            frame,
            origin,
        }
    }

    /// The zero state at an origin (the Sun seen from itself, say)
    pub fn zero(time: Time, frame: Frame, origin: Origin) -> Self {
        StateVector::new(Vector3::zeros(), Vector3::zeros(), time, frame, origin)
    }

    /// Distance from the origin in AU
    pub fn distance(&self) -> f64 {
        self.position.norm()
    }

    /// Light travel time from the origin in days
    pub fn light_time(&self) -> f64 {
        self.distance() / C_AUDAY
    }

    /// The same state expressed in another frame
    ///
    /// Rotates position and velocity with the matrix at this state's time;
    /// the slow rotation of date frames is not added to the velocity.
    pub fn to_frame(&self, frame: Frame) -> StateVector {
        let r = self.frame.rotation_to(frame, &self.time);
        StateVector {
            position: r * self.position,
            velocity: r * self.velocity,
            frame,
            ..*self
        }
    }

    /// Vector difference `self - other`, re-tagged with `origin`.
    ///
    /// Both states must share frame and origin, otherwise `FrameMismatch`.
    pub fn minus(&self, other: &StateVector, origin: Origin) -> Result<StateVector> {
        self.check_compatible(other)?;
        Ok(StateVector {
            position: self.position - other.position,
            velocity: self.velocity - other.velocity,
            origin,
            ..*self
        })
    }

    /// Vector sum of a state and an offset expressed in the same frame.
    ///
    /// Used to move an origin: the offset's origin must be the point this
    /// state is measured to, so only frames are checked.
    pub fn plus(&self, offset: &StateVector, origin: Origin) -> Result<StateVector> {
        if self.frame != offset.frame {
            return Err(AlmagestError::FrameMismatch {
                expected: self.frame.to_string(),
                found: offset.frame.to_string(),
            });
        }
        Ok(StateVector {
            position: self.position + offset.position,
            velocity: self.velocity + offset.velocity,
            origin,
            ..*self
        })
    }

    /// The reversed vector, re-tagged with `origin`
    pub fn negated(&self, origin: Origin) -> StateVector {
        StateVector {
            position: -self.position,
            velocity: -self.velocity,
            origin,
            ..*self
        }
    }

    fn check_compatible(&self, other: &StateVector) -> Result<()> {
        if self.frame != other.frame {
            return Err(AlmagestError::FrameMismatch {
                expected: self.frame.to_string(),
                found: other.frame.to_string(),
            });
        }
        if self.origin != other.origin {
            return Err(AlmagestError::FrameMismatch {
                expected: self.origin.to_string(),
                found: other.origin.to_string(),
            });
        }
        Ok(())
    }
}

/// Right ascension, declination and distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equatorial {
    /// Right ascension in hours, [0, 24)
    pub ra_hours: f64,
    /// Declination in degrees
    pub dec_degrees: f64,
    /// Distance in AU
    pub distance_au: f64,
}

/// Ecliptic longitude, latitude and distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ecliptic {
    /// Longitude in degrees, [0, 360)
    pub longitude_degrees: f64,
    /// Latitude in degrees
    pub latitude_degrees: f64,
    /// Distance in AU
    pub distance_au: f64,
}

/// Convert a Cartesian vector to (r, lat, lon) in radians, lon in [0, 2π)
pub fn to_spherical(v: &Vector3<f64>) -> (f64, f64, f64) {
    let r = v.norm();
    let xy = (v.x * v.x + v.y * v.y).sqrt();
    let lat = v.z.atan2(xy);
    let lon = v.y.atan2(v.x).rem_euclid(std::f64::consts::TAU);
    (r, lat, lon)
}

/// Convert (r, lat, lon) in radians to a Cartesian vector
pub fn from_spherical(r: f64, lat: f64, lon: f64) -> Vector3<f64> {
    let (slat, clat) = lat.sin_cos();
    let (slon, clon) = lon.sin_cos();
    Vector3::new(r * clat * clon, r * clat * slon, r * slat)
}

impl Equatorial {
    /// Spherical coordinates of an equatorial vector
    pub fn from_vector(v: &Vector3<f64>) -> Self {
        let (r, lat, lon) = to_spherical(v);
        Equatorial {
            ra_hours: normalize_hours(lon * RAD2DEG / 15.0),
            dec_degrees: lat * RAD2DEG,
            distance_au: r,
        }
    }

    /// Cartesian vector of these coordinates
    pub fn to_vector(&self) -> Vector3<f64> {
        from_spherical(
            self.distance_au,
            self.dec_degrees.to_radians(),
            (self.ra_hours * 15.0).to_radians(),
        )
    }
}

impl Ecliptic {
    /// Spherical coordinates of an ecliptic vector
    pub fn from_vector(v: &Vector3<f64>) -> Self {
        let (r, lat, lon) = to_spherical(v);
        Ecliptic {
            longitude_degrees: normalize_degrees(lon * RAD2DEG),
            latitude_degrees: lat * RAD2DEG,
            distance_au: r,
        }
    }

    /// Cartesian vector of these coordinates
    pub fn to_vector(&self) -> Vector3<f64> {
        from_spherical(
            self.distance_au,
            self.latitude_degrees.to_radians(),
            self.longitude_degrees.to_radians(),
        )
    }
}

/// Split a non-negative value into whole units, minutes and seconds
fn sexagesimal(value: f64) -> (u32, u32, f64) {
    let whole = value.trunc();
    let minutes = ((value - whole) * 60.0).trunc();
    let seconds = ((value - whole) * 60.0 - minutes) * 60.0;
    (whole as u32, minutes as u32, seconds)
}

impl fmt::Display for Equatorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = sexagesimal(self.ra_hours);
        let sign = if self.dec_degrees < 0.0 { '-' } else { '+' };
        let (d, am, asec) = sexagesimal(self.dec_degrees.abs());
        write!(
            f,
            "RA {h:02}h{m:02}m{s:05.2}s Dec {sign}{d:02}°{am:02}'{asec:04.1}\" {:.6} AU",
            self.distance_au
        )
    }
}

impl fmt::Display for Ecliptic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lon {:.5}° lat {:+.5}° {:.6} AU",
            self.longitude_degrees, self.latitude_degrees, self.distance_au
        )
    }
}

/// Rotate an equatorial vector onto the ecliptic of the given obliquity
pub fn equatorial_to_ecliptic(v: &Vector3<f64>, obliquity: f64) -> Vector3<f64> {
    rot_x(obliquity) * v
}

/// Rotate an ecliptic vector onto the equator of the given obliquity
pub fn ecliptic_to_equatorial(v: &Vector3<f64>, obliquity: f64) -> Vector3<f64> {
    rot_x(-obliquity) * v
}

/// Mean ecliptic and equinox of date -> J2000 mean equator
///
/// The frame of the planetary series: rotate by the mean obliquity of date
/// onto the mean equator of date, then undo precession.
pub fn mean_ecliptic_of_date_to_j2000(time: &Time) -> Matrix3<f64> {
    time.precession_matrix().transpose() * rot_x(-time.mean_obliquity())
}
