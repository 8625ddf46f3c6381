//! Keplerian mean orbital elements
//!
//! Approximate heliocentric positions of the major planets from the mean
//! elements and secular rates of Standish, *Keplerian Elements for
//! Approximate Positions of the Major Planets* (JPL, table 1, valid
//! 1800–2050 AD). Elements are referred to the J2000 ecliptic and equinox.
//!
//! These are cheap and smooth, and serve as the outer-planet perturbers of
//! the Pluto integration. They are not a substitute for the VSOP87 series.
//!
//! ```ignore
//! use almagest::keplerlib::mean_elements_state;
//! use almagest::planetlib::Body;
//! use almagest::time::Timescale;
//!
//! let t = Timescale::default().tt_jd(2_460_000.5);
//! let jupiter = mean_elements_state(Body::Jupiter, t).unwrap();
//! ```

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::constants::{DAYS_PER_CENTURY, DEG2RAD, GM_SUN};
use crate::framelib::{Frame, Origin, StateVector};
use crate::planetlib::Body;
use crate::time::Time;

/// Elements at J2000 and their rates per Julian century.
///
/// Order: a (AU), e, I (deg), L (deg), ϖ (deg), Ω (deg).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    pub at_epoch: [f64; 6],
    pub per_century: [f64; 6],
}

const MERCURY: MeanElements = MeanElements {
    at_epoch: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
    per_century: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
};
const VENUS: MeanElements = MeanElements {
    at_epoch: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
    per_century: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};
// Earth-Moon barycentre
const EARTH: MeanElements = MeanElements {
    at_epoch: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
    per_century: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
};
const MARS: MeanElements = MeanElements {
    at_epoch: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
    per_century: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};
const JUPITER: MeanElements = MeanElements {
    at_epoch: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
    per_century: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};
const SATURN: MeanElements = MeanElements {
    at_epoch: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
    per_century: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};
const URANUS: MeanElements = MeanElements {
    at_epoch: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    per_century: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};
const NEPTUNE: MeanElements = MeanElements {
    at_epoch: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    per_century: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};
const PLUTO: MeanElements = MeanElements {
    at_epoch: [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
    per_century: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
};

/// Mean elements for a planet; `None` for the Sun and the Moon.
pub fn mean_elements(body: Body) -> Option<&'static MeanElements> {
    match body {
        Body::Mercury => Some(&MERCURY),
        Body::Venus => Some(&VENUS),
        Body::Earth => Some(&EARTH),
        Body::Mars => Some(&MARS),
        Body::Jupiter => Some(&JUPITER),
        Body::Saturn => Some(&SATURN),
        Body::Uranus => Some(&URANUS),
        Body::Neptune => Some(&NEPTUNE),
        Body::Pluto => Some(&PLUTO),
        Body::Sun | Body::Moon => None,
    }
}

/// Classical elements at one instant, angles in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub longitude_of_node: f64,
    pub argument_of_perihelion: f64,
    pub mean_anomaly: f64,
}

impl MeanElements {
    /// Sidereal period in days from the mean motion in longitude
    pub fn sidereal_period_days(&self) -> f64 {
        360.0 * DAYS_PER_CENTURY / self.per_century[3]
    }

    /// Elements at `t` Julian centuries TT from J2000
    pub fn at(&self, t: f64) -> OrbitalElements {
        let el: [f64; 6] = std::array::from_fn(|k| self.at_epoch[k] + self.per_century[k] * t);
        let [a, e, i, l, peri, node] = el;
        OrbitalElements {
            semi_major_axis: a,
            eccentricity: e,
            inclination: i * DEG2RAD,
            longitude_of_node: node * DEG2RAD,
            argument_of_perihelion: (peri - node) * DEG2RAD,
            mean_anomaly: normpi((l - peri) * DEG2RAD),
        }
    }
}

impl OrbitalElements {
    pub fn semilatus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    pub fn true_anomaly(&self) -> f64 {
        let ea = eccentric_anomaly(self.eccentricity, self.mean_anomaly);
        true_anomaly_closed(self.eccentricity, ea)
    }

    /// Two-body position (AU) and velocity (AU/day) for gravitational parameter `mu`
    pub fn state(&self, mu: f64) -> (Vector3<f64>, Vector3<f64>) {
        ele_to_vec(
            self.semilatus_rectum(),
            self.eccentricity,
            self.inclination,
            self.longitude_of_node,
            self.argument_of_perihelion,
            self.true_anomaly(),
            mu,
        )
    }
}

/// Heliocentric position on the J2000 ecliptic, AU
pub(crate) fn ecliptic_position(elements: &MeanElements, jd_tt: f64) -> Vector3<f64> {
    let t = (jd_tt - crate::constants::J2000) / crate::constants::DAYS_PER_CENTURY;
    elements.at(t).state(GM_SUN).0
}

/// Approximate heliocentric state from mean elements, in the J2000 ecliptic frame
pub fn mean_elements_state(body: Body, time: Time) -> Option<StateVector> {
    let elements = mean_elements(body)?;
    let (position, velocity) = elements.at(time.tt_centuries()).state(GM_SUN);
    Some(StateVector::new(
        position,
        velocity,
        time,
        Frame::EclipticJ2000,
        Origin::Heliocentric,
    ))
}

/// Normalize angle to [-π, π]
fn normpi(m: f64) -> f64 {
    let mut x = m % (2.0 * PI);
    if x > PI {
        x -= 2.0 * PI;
    }
    if x < -PI {
        x += 2.0 * PI;
    }
    x
}

/// Solve Kepler's equation for the eccentric anomaly of an elliptic orbit
///
/// Iterative solver following arXiv:2108.03215.
pub(crate) fn eccentric_anomaly(e: f64, m: f64) -> f64 {
    let m = normpi(m);
    let sign_m = m.signum();
    let m = m * sign_m;
    if e == 0.0 {
        return m * sign_m;
    }

    let ebar = 0.25 * PI / e - 1.0;
    let mut ea = 0.5 * PI * ebar * (ebar.signum() * (1.0 + m / (e * ebar * ebar)).sqrt() - 1.0);

    for _ in 0..10 {
        let f1 = 1.0 - e * ea.cos();
        let f2 = e * ea.sin();
        let f = ea - f2 - m;
        let d_ea = f * f1 / (f1 * f1 - 0.5 * f * f2);
        ea -= d_ea;
        if d_ea.abs() < 1e-14 {
            break;
        }
    }

    ea * sign_m
}

fn true_anomaly_closed(e: f64, ea: f64) -> f64 {
    2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (ea / 2.0).tan()).atan()
}

/// Position and velocity from conic elements
///
/// `p` semi-latus rectum, `i` inclination, `om` node, `w` argument of
/// periapsis, `v` true anomaly (radians), `mu` in AU³/day².
pub(crate) fn ele_to_vec(
    p: f64,
    e: f64,
    i: f64,
    om: f64,
    w: f64,
    v: f64,
    mu: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let r = p / (1.0 + e * v.cos());
    let h = (p * mu).sqrt();
    let u = v + w;

    let (sin_om, cos_om) = om.sin_cos();
    let (sin_u, cos_u) = u.sin_cos();
    let (sin_i, cos_i) = i.sin_cos();

    let x = r * (cos_om * cos_u - sin_om * sin_u * cos_i);
    let y = r * (sin_om * cos_u + cos_om * sin_u * cos_i);
    let z = r * (sin_i * sin_u);

    let he_rp = h * e / (r * p) * v.sin();
    let h_r = h / r;

    let x_dot = x * he_rp - h_r * (cos_om * sin_u + sin_om * cos_u * cos_i);
    let y_dot = y * he_rp - h_r * (sin_om * sin_u - cos_om * cos_u * cos_i);
    let z_dot = z * he_rp + h_r * sin_i * cos_u;

    (Vector3::new(x, y, z), Vector3::new(x_dot, y_dot, z_dot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framelib::to_spherical;
    use crate::planetlib::heliocentric_ecliptic;
    use crate::time::Timescale;
    use crate::units::normalize_signed_degrees;
    use approx::assert_relative_eq;

    #[test]
    fn test_eccentric_anomaly_circular() {
        assert_relative_eq!(eccentric_anomaly(0.0, 1.0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(eccentric_anomaly(0.001, 1.0), 1.0, epsilon = 0.01);
    }

    #[test]
    fn test_eccentric_anomaly_residual() {
        for &(e, m) in &[(0.5, 1.0), (0.2488, -2.5), (0.99, 0.5)] {
            let ea = eccentric_anomaly(e, m);
            let residual = ea - e * ea.sin() - m;
            assert!(residual.abs() < 1e-12, "Kepler residual = {residual}");
        }
    }

    #[test]
    fn test_ele_to_vec_circular() {
        let (pos, vel) = ele_to_vec(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, GM_SUN);
        assert_relative_eq!(pos.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(vel.norm(), GM_SUN.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_normpi() {
        assert_relative_eq!(normpi(0.0), 0.0, epsilon = 1e-14);
        assert_relative_eq!(normpi(3.0 * PI), PI, epsilon = 1e-10);
        assert_relative_eq!(normpi(-3.0 * PI), -PI, epsilon = 1e-10);
    }

    #[test]
    fn test_no_elements_for_sun_and_moon() {
        assert!(mean_elements(Body::Sun).is_none());
        assert!(mean_elements(Body::Moon).is_none());
        let t = Timescale::default().j2000();
        assert!(mean_elements_state(Body::Moon, t).is_none());
    }

    #[test]
    fn test_sidereal_periods() {
        assert_relative_eq!(EARTH.sidereal_period_days(), 365.25, epsilon = 0.1);
        assert_relative_eq!(MERCURY.sidereal_period_days(), 87.97, epsilon = 0.01);
        assert_relative_eq!(JUPITER.sidereal_period_days(), 4332.6, epsilon = 1.0);
    }

    #[test]
    fn test_close_to_series_positions() {
        // Mean elements should agree with VSOP87 to a fraction of a degree
        let ts = Timescale::default();
        let t = ts.tt_jd(2_460_310.5);
        for (body, tolerance) in [
            (Body::Mercury, 0.1),
            (Body::Venus, 0.1),
            (Body::Earth, 0.1),
            (Body::Mars, 0.1),
            (Body::Jupiter, 0.5),
            (Body::Saturn, 0.5),
            (Body::Uranus, 0.5),
            (Body::Neptune, 0.5),
        ] {
            let state = mean_elements_state(body, t).unwrap();
            let (_, _, lon) = to_spherical(&state.position);
            let (vsop_lon, _, _) = heliocentric_ecliptic(body, t).unwrap();
            // heliocentric_ecliptic is of date; remove ~0.34 deg of precession since J2000
            let diff = normalize_signed_degrees(lon.to_degrees() - vsop_lon + 0.336);
            assert!(diff.abs() < tolerance, "{body}: {diff} deg");
        }
    }

    #[test]
    fn test_earth_distance() {
        let t = Timescale::default().tt_jd(2_451_545.0);
        let state = mean_elements_state(Body::Earth, t).unwrap();
        let r = state.position.norm();
        assert!(r > 0.983 && r < 1.017, "r = {r}");
        assert_eq!(state.frame, Frame::EclipticJ2000);
    }
}
