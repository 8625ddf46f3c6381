//! Pluto by numerical integration
//!
//! Pluto has no compact analytic theory covering millennia, so its
//! heliocentric orbit is integrated from a fixed J2000 state with a
//! fourth-order symplectic integrator (Yoshida 1990). The Sun is the central
//! mass and Jupiter, Saturn, Uranus and Neptune perturb it, their positions
//! taken from Keplerian mean elements. The indirect term accounts for the
//! Sun's reflex motion.
//!
//! Integration runs in the J2000 ecliptic and starts from scratch on every
//! call, so results are a pure function of the requested time.

use log::trace;
use nalgebra::Vector3;
use once_cell::sync::Lazy;

use crate::constants::{GM_SUN, J2000};
use crate::errors::Result;
use crate::framelib::{Frame, Origin, StateVector, ECLIPTIC_J2000_TO_EQUATORIAL};
use crate::keplerlib::{ecliptic_position, mean_elements, MeanElements};
use crate::planetlib::Body;
use crate::time::Time;

/// Largest step the integrator takes, in days
pub const MAX_STEP_DAYS: f64 = 20.0;

/// Heliocentric position at J2000 TT, AU, J2000 ecliptic
const INITIAL_POSITION: [f64; 3] = [-9.883_030_192_253_406, -27.963_595_420_162_303, 5.851_153_745_541_14];

/// Heliocentric velocity at J2000 TT, AU/day, J2000 ecliptic
const INITIAL_VELOCITY: [f64; 3] = [
    0.003_026_225_455_288_207,
    -0.001_541_106_051_130_955_4,
    -0.000_710_387_957_485_697_3,
];

const PERTURBING_BODIES: [Body; 4] = [Body::Jupiter, Body::Saturn, Body::Uranus, Body::Neptune];

/// Mean elements and GM (AU³/day²) of each perturber
static PERTURBERS: Lazy<Vec<(&'static MeanElements, f64)>> = Lazy::new(|| {
    PERTURBING_BODIES
        .iter()
        .filter_map(|body| mean_elements(*body).map(|el| (el, GM_SUN / body.reciprocal_mass())))
        .collect()
});

// Yoshida's fourth-order coefficients
static YOSHIDA: Lazy<([f64; 4], [f64; 3])> = Lazy::new(|| {
    let cbrt2 = 2f64.cbrt();
    let w1 = 1.0 / (2.0 - cbrt2);
    let w0 = -cbrt2 * w1;
    (
        [w1 / 2.0, (w0 + w1) / 2.0, (w0 + w1) / 2.0, w1 / 2.0],
        [w1, w0, w1],
    )
});

/// Heliocentric acceleration of Pluto at `r` (AU) and TT Julian date `jd`
fn acceleration(r: &Vector3<f64>, jd: f64) -> Vector3<f64> {
    let d = r.norm();
    let mut a = *r * (-GM_SUN / (d * d * d));
    for (elements, gm) in PERTURBERS.iter() {
        let rj = ecliptic_position(elements, jd);
        let delta = rj - *r;
        let dd = delta.norm();
        let dj = rj.norm();
        a += *gm * (delta / (dd * dd * dd) - rj / (dj * dj * dj));
    }
    a
}

/// Integrate from the J2000 state to `jd_tt`; returns position and velocity
/// in the J2000 ecliptic.
pub fn integrate(jd_tt: f64) -> (Vector3<f64>, Vector3<f64>) {
    let mut r = Vector3::from(INITIAL_POSITION);
    let mut v = Vector3::from(INITIAL_VELOCITY);
    let span = jd_tt - J2000;
    let steps = (span.abs() / MAX_STEP_DAYS).ceil() as usize;
    if steps == 0 {
        return (r, v);
    }
    let h = span / steps as f64;
    let (c, d) = &*YOSHIDA;

    let mut t = J2000;
    for step in 0..steps {
        for k in 0..3 {
            r += c[k] * h * v;
            t += c[k] * h;
            v += d[k] * h * acceleration(&r, t);
        }
        r += c[3] * h * v;
        t += c[3] * h;
        if step % 1000 == 0 {
            trace!("pluto step {step}/{steps}: t = {t:.3}, r = {:.6} AU", r.norm());
        }
    }
    trace!("pluto integrated {steps} steps of {h:.4} d to {jd_tt}");
    (r, v)
}

/// Heliocentric state of Pluto on the J2000 mean equator
pub fn heliocentric_state(time: Time) -> Result<StateVector> {
    Body::Pluto.check_validity(&time)?;
    Ok(state_at(time))
}

/// Heliocentric state of Pluto without the validity check.
pub(crate) fn state_at(time: Time) -> StateVector {
    let (r, v) = integrate(time.tt());
    let m = *ECLIPTIC_J2000_TO_EQUATORIAL;
    StateVector::new(m * r, m * v, time, Frame::EquatorialJ2000, Origin::Heliocentric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AlmagestError;
    use crate::keplerlib::mean_elements_state;
    use crate::time::Timescale;
    use crate::units::normalize_signed_degrees;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_state_at_epoch() {
        let (r, v) = integrate(J2000);
        assert_eq!(r, Vector3::from(INITIAL_POSITION));
        assert_eq!(v, Vector3::from(INITIAL_VELOCITY));
    }

    #[test]
    fn test_deterministic() {
        let t = Timescale::default().tt_jd(2_460_310.5);
        let a = heliocentric_state(t).unwrap();
        let b = heliocentric_state(t).unwrap();
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
    }

    #[test]
    fn test_follows_mean_elements() {
        let ts = Timescale::default();
        for jd in [2_433_282.5, 2_460_310.5, 2_561_120.0] {
            let (r, _) = integrate(jd);
            let kepler = mean_elements_state(Body::Pluto, ts.tt_jd(jd)).unwrap();
            let dl = normalize_signed_degrees(
                r.y.atan2(r.x).to_degrees() - kepler.position.y.atan2(kepler.position.x).to_degrees(),
            );
            assert!(dl.abs() < 0.5, "jd {jd}: longitude off by {dl} deg");
            assert!((r.norm() - kepler.position.norm()).abs() < 0.2);
        }
    }

    #[test]
    fn test_backward_and_forward_agree_on_distance_range() {
        // Pluto stays between roughly 29 and 50 AU
        for jd in [J2000 - 60_000.0, J2000 + 60_000.0] {
            let (r, _) = integrate(jd);
            assert!(r.norm() > 29.0 && r.norm() < 50.0, "r = {}", r.norm());
        }
    }

    #[test]
    fn test_velocity_consistent_with_positions() {
        let h = 5.0;
        let jd = 2_455_000.0;
        let (r1, _) = integrate(jd - h);
        let (r2, _) = integrate(jd + h);
        let (_, v) = integrate(jd);
        assert_relative_eq!(v, (r2 - r1) / (2.0 * h), epsilon = 1e-8);
    }

    #[test]
    fn test_out_of_range() {
        let t = Timescale::default().tt_jd(J2000 + 5000.0 * 365.25 + 1.0);
        assert!(matches!(
            heliocentric_state(t),
            Err(AlmagestError::OutOfRange { body: Body::Pluto, .. })
        ));
    }
}
