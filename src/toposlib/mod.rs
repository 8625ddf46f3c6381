//! Geographic observers on the Earth
//!
//! An [`Observer`] is a geodetic latitude, longitude and elevation on an
//! Earth ellipsoid. The chain from the ground to the canonical frame is
//!
//! ```text
//! geodetic (lat/lon/elev) -> terrestrial xyz -> rotate by GAST -> true equator of date -> J2000 mean equator
//! ```
//!
//! Polar motion is neglected, so the terrestrial frame differs from the true
//! equator of date only by the Earth's rotation angle about the pole.
//!
//! ```ignore
//! use almagest::toposlib::Observer;
//! use almagest::config::Atmosphere;
//!
//! let boston = Observer::new(42.3583, -71.0603, 43.0)?;
//! let mars = almagest::positions::topocentric_state(Body::Mars, t, &boston, Aberration::Apply, &Default::default())?;
//! let h = boston.horizontal(&mars.state, &Atmosphere::default());
//! ```

use std::f64::consts::PI;
use std::fmt;

use nalgebra::Vector3;

use crate::config::Atmosphere;
use crate::constants::{AU_M, EARTH_RADIUS, SIDEREAL_DAY_HOURS, TAU, WGS84_INVERSE_FLATTENING};
use crate::earthlib::refract;
use crate::errors::{AlmagestError, Result};
use crate::framelib::{rot_z, Equatorial, Frame, Origin, StateVector};
use crate::time::Time;
use crate::units::normalize_hours;

/// Earth rotation rate relative to the equinox, radians per day
const EARTH_ANGULAR_VELOCITY: f64 = TAU * 24.0 / SIDEREAL_DAY_HOURS;

/// An Earth ellipsoid model used for geodetic-to-geocentric conversion.
#[derive(Debug, Clone)]
pub struct Geoid {
    /// Name of the geoid model
    pub name: &'static str,
    /// Equatorial radius in meters
    pub radius: f64,
    /// Inverse flattening (a / (a - b))
    pub inverse_flattening: f64,
    /// (1 - f)^2, precomputed
    one_minus_flattening_squared: f64,
}

impl Geoid {
    pub const fn new(name: &'static str, radius: f64, inverse_flattening: f64) -> Self {
        let f = 1.0 / inverse_flattening;
        let omf = 1.0 - f;
        Geoid {
            name,
            radius,
            inverse_flattening,
            one_minus_flattening_squared: omf * omf,
        }
    }

    /// An observer on this ellipsoid.
    ///
    /// Latitude must lie in [-90, 90] degrees (positive north), longitude in
    /// [-180, 360] degrees (positive east), elevation above the ellipsoid in
    /// meters between -12 km and 100 km. Anything else is `InvalidObserver`.
    pub fn latlon(
        &self,
        latitude_degrees: f64,
        longitude_degrees: f64,
        elevation_m: f64,
    ) -> Result<Observer> {
        if !latitude_degrees.is_finite() || latitude_degrees.abs() > 90.0 {
            return Err(AlmagestError::InvalidObserver(format!(
                "latitude {latitude_degrees} outside [-90, 90]"
            )));
        }
        if !longitude_degrees.is_finite() || !(-180.0..=360.0).contains(&longitude_degrees) {
            return Err(AlmagestError::InvalidObserver(format!(
                "longitude {longitude_degrees} outside [-180, 360]"
            )));
        }
        if !elevation_m.is_finite() || !(-12_000.0..=100_000.0).contains(&elevation_m) {
            return Err(AlmagestError::InvalidObserver(format!(
                "elevation {elevation_m} m outside [-12 km, 100 km]"
            )));
        }

        let lat = latitude_degrees.to_radians();
        let lon = longitude_degrees.to_radians();
        let (sinphi, cosphi) = lat.sin_cos();

        // Radius of curvature in the prime vertical
        let c =
            1.0 / (cosphi * cosphi + sinphi * sinphi * self.one_minus_flattening_squared).sqrt();
        let s = self.one_minus_flattening_squared * c;

        let radius_au = self.radius / AU_M;
        let elevation_au = elevation_m / AU_M;

        let xy = (radius_au * c + elevation_au) * cosphi;
        let terrestrial = Vector3::new(
            xy * lon.cos(),
            xy * lon.sin(),
            (radius_au * s + elevation_au) * sinphi,
        );

        Ok(Observer {
            latitude: lat,
            longitude: lon,
            elevation_m,
            terrestrial,
        })
    }
}

/// WGS84 ellipsoid (GPS standard)
pub const WGS84: Geoid = Geoid::new("WGS84", EARTH_RADIUS, WGS84_INVERSE_FLATTENING);

/// A fixed location on the Earth's surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observer {
    /// Geodetic latitude in radians
    pub latitude: f64,
    /// Geodetic longitude in radians, positive east
    pub longitude: f64,
    /// Elevation above the ellipsoid in meters
    pub elevation_m: f64,
    /// Earth-fixed position in AU
    terrestrial: Vector3<f64>,
}

/// Azimuth, altitude and distance as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horizontal {
    /// Degrees clockwise from north, [0, 360)
    pub azimuth_degrees: f64,
    /// Degrees above the horizon, refracted when an atmosphere was given
    pub altitude_degrees: f64,
    /// Distance in AU
    pub distance_au: f64,
}

impl Observer {
    /// An observer on the WGS84 ellipsoid
    pub fn new(latitude_degrees: f64, longitude_degrees: f64, elevation_m: f64) -> Result<Self> {
        WGS84.latlon(latitude_degrees, longitude_degrees, elevation_m)
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }

    /// Earth-fixed position in AU
    pub fn terrestrial_position(&self) -> Vector3<f64> {
        self.terrestrial
    }

    /// Position and velocity relative to the Earth's centre on the J2000 mean equator.
    ///
    /// The velocity is the rotation of the ground, about 0.46 km/s at the equator.
    pub fn geocentric_state(&self, time: &Time) -> StateVector {
        let to_true_equator = rot_z(-gast_radians(time));
        let position = to_true_equator * self.terrestrial;
        let velocity = Vector3::new(
            -EARTH_ANGULAR_VELOCITY * position.y,
            EARTH_ANGULAR_VELOCITY * position.x,
            0.0,
        );
        let to_j2000 = time.m_matrix().transpose();
        StateVector::new(
            to_j2000 * position,
            to_j2000 * velocity,
            *time,
            Frame::EquatorialJ2000,
            Origin::Geocentric,
        )
    }

    /// Horizontal coordinates of a state vector measured from this observer.
    ///
    /// A geocentric state is accepted too, but then lacks the parallax the
    /// topocentric one carries. Refraction follows `atmosphere`.
    pub fn horizontal(&self, state: &StateVector, atmosphere: &Atmosphere) -> Horizontal {
        let of_date = state.to_frame(Frame::EquatorialOfDate).position;
        let terrestrial = rot_z(gast_radians(&state.time)) * of_date;
        let (alt, az) = self.itrs_to_horizon(&terrestrial);
        Horizontal {
            azimuth_degrees: az.to_degrees(),
            altitude_degrees: refract(alt.to_degrees(), atmosphere),
            distance_au: of_date.norm(),
        }
    }

    /// Horizontal coordinates of a direction given as RA (hours) and Dec
    /// (degrees) on the true equator of date.
    ///
    /// Also returns the RA/Dec at which the refracted object appears.
    pub fn horizon(
        &self,
        time: &Time,
        ra_hours: f64,
        dec_degrees: f64,
        atmosphere: &Atmosphere,
    ) -> (Horizontal, Equatorial) {
        let direction = Equatorial {
            ra_hours,
            dec_degrees,
            distance_au: 1.0,
        }
        .to_vector();
        let gast = gast_radians(time);
        let (alt, az) = self.itrs_to_horizon(&(rot_z(gast) * direction));
        let altitude = refract(alt.to_degrees(), atmosphere);

        let apparent = rot_z(-gast) * self.horizon_to_itrs(altitude.to_radians(), az);
        (
            Horizontal {
                azimuth_degrees: az.to_degrees(),
                altitude_degrees: altitude,
                distance_au: 1.0,
            },
            Equatorial::from_vector(&apparent),
        )
    }

    /// Rotate an Earth-fixed direction into (altitude, azimuth) in radians.
    pub(crate) fn itrs_to_horizon(&self, itrs_direction: &Vector3<f64>) -> (f64, f64) {
        let (slat, clat) = self.latitude.sin_cos();
        let (slon, clon) = self.longitude.sin_cos();

        // (south, east, up)
        let south = slat * clon * itrs_direction.x + slat * slon * itrs_direction.y
            - clat * itrs_direction.z;
        let east = -slon * itrs_direction.x + clon * itrs_direction.y;
        let up = clat * clon * itrs_direction.x
            + clat * slon * itrs_direction.y
            + slat * itrs_direction.z;

        let r_horiz = (south * south + east * east).sqrt();
        let alt = up.atan2(r_horiz);

        let mut az = east.atan2(-south);
        if az < 0.0 {
            az += 2.0 * PI;
        }

        (alt, az)
    }

    /// Unit Earth-fixed vector for an altitude and azimuth in radians
    fn horizon_to_itrs(&self, alt: f64, az: f64) -> Vector3<f64> {
        let (slat, clat) = self.latitude.sin_cos();
        let (slon, clon) = self.longitude.sin_cos();
        let (salt, calt) = alt.sin_cos();
        let (saz, caz) = az.sin_cos();
        let south = -calt * caz;
        let east = calt * saz;
        let up = salt;
        Vector3::new(
            slat * clon * south - slon * east + clat * clon * up,
            slat * slon * south + clon * east + clat * slon * up,
            -clat * south + slat * up,
        )
    }

    /// Local apparent sidereal time in hours.
    pub fn lst_hours(&self, time: &Time) -> f64 {
        normalize_hours(time.gast() + self.longitude * 12.0 / PI)
    }
}

fn gast_radians(time: &Time) -> f64 {
    time.gast() * PI / 12.0
}

impl fmt::Display for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_d = self.latitude_degrees();
        let lon_d = self.longitude_degrees();
        let ns = if lat_d >= 0.0 { "N" } else { "S" };
        let ew = if lon_d >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}° {}, {:.4}° {}, {:.1} m",
            lat_d.abs(),
            ns,
            lon_d.abs(),
            ew,
            self.elevation_m
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timescale;
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_prime_meridian() {
        let obs = Observer::new(0.0, 0.0, 0.0).unwrap();
        let p = obs.terrestrial_position();
        assert_relative_eq!(p.x, EARTH_RADIUS / AU_M, epsilon = 1e-15);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-15);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_polar_radius() {
        let pole = Observer::new(90.0, 0.0, 0.0).unwrap();
        let expected_polar_m = EARTH_RADIUS * (1.0 - 1.0 / WGS84_INVERSE_FLATTENING);
        assert_relative_eq!(pole.terrestrial_position().z * AU_M, expected_polar_m, epsilon = 1e-3);
    }

    #[test]
    fn test_elevation_adds_along_normal() {
        let ground = Observer::new(0.0, 0.0, 0.0).unwrap();
        let high = Observer::new(0.0, 0.0, 1000.0).unwrap();
        let diff_m = (high.terrestrial_position().x - ground.terrestrial_position().x) * AU_M;
        assert_relative_eq!(diff_m, 1000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_observers() {
        assert!(matches!(
            Observer::new(91.0, 0.0, 0.0),
            Err(AlmagestError::InvalidObserver(_))
        ));
        assert!(matches!(
            Observer::new(10.0, f64::NAN, 0.0),
            Err(AlmagestError::InvalidObserver(_))
        ));
        assert!(matches!(
            Observer::new(10.0, 20.0, 1e7),
            Err(AlmagestError::InvalidObserver(_))
        ));
    }

    #[test]
    fn test_horizon_rotation_up_and_north() {
        let obs = Observer::new(0.0, 0.0, 0.0).unwrap();
        let (alt, _) = obs.itrs_to_horizon(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(alt, PI / 2.0, epsilon = 1e-12);
        let (alt, az) = obs.itrs_to_horizon(&Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(alt, 0.0, epsilon = 1e-12);
        assert_relative_eq!(az, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_horizon_inverse() {
        let obs = Observer::new(51.5, -0.12, 0.0).unwrap();
        let v = obs.horizon_to_itrs(0.3, 2.0);
        let (alt, az) = obs.itrs_to_horizon(&v);
        assert_relative_eq!(alt, 0.3, epsilon = 1e-12);
        assert_relative_eq!(az, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_geocentric_state_magnitudes() {
        let t = Timescale::default().tt_jd(2_460_000.5);
        let obs = Observer::new(42.3583, -71.0603, 43.0).unwrap();
        let s = obs.geocentric_state(&t);
        let r_km = s.position.norm() * AU_M / 1000.0;
        assert!(r_km > 6360.0 && r_km < 6380.0, "r = {r_km}");
        // Ground speed at 42° latitude is about 0.34 km/s
        let v_kms = s.velocity.norm() * AU_M / 1000.0 / 86_400.0;
        assert_relative_eq!(v_kms, 0.4651 * 42.3583_f64.to_radians().cos(), epsilon = 0.01);
        assert_eq!(s.origin, Origin::Geocentric);
    }

    #[test]
    fn test_meridian_transit_altitude() {
        // A star on the local meridian culminates at 90 - |lat - dec|
        let t = Timescale::default().tt_jd(2_460_000.5);
        let obs = Observer::new(40.0, 10.0, 0.0).unwrap();
        let lst = obs.lst_hours(&t);
        let (h, _) = obs.horizon(&t, lst, 20.0, &Atmosphere::none());
        assert_relative_eq!(h.altitude_degrees, 70.0, epsilon = 1e-6);
        assert_relative_eq!(h.azimuth_degrees, 180.0, epsilon = 1e-6);
    }

    #[test]
    fn test_refracted_radec_moves_toward_zenith() {
        let t = Timescale::default().tt_jd(2_460_000.5);
        let obs = Observer::new(40.0, 10.0, 0.0).unwrap();
        let lst = obs.lst_hours(&t);
        // Low in the south
        let (h, eq) = obs.horizon(&t, lst, -45.0, &Atmosphere::default());
        assert!(h.altitude_degrees > 5.0 && h.altitude_degrees < 5.3);
        assert!(eq.dec_degrees > -45.0);
    }

    #[test]
    fn test_lst_is_gast_at_greenwich() {
        let t = Timescale::default().tt_jd(2_460_000.5);
        let greenwich = Observer::new(51.48, 0.0, 0.0).unwrap();
        assert_relative_eq!(greenwich.lst_hours(&t), t.gast(), epsilon = 1e-12);
        let east = Observer::new(51.48, 90.0, 0.0).unwrap();
        assert_relative_eq!(
            east.lst_hours(&t),
            normalize_hours(t.gast() + 6.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_display() {
        let obs = Observer::new(42.3583, -71.0603, 43.0).unwrap();
        let s = format!("{obs}");
        assert!(s.contains('N'));
        assert!(s.contains('W'));
    }
}
