//! Property tests for the frame rotations.

use almagest::framelib::{Ecliptic, Equatorial, Frame, Origin, StateVector};
use almagest::Timescale;
use nalgebra::Vector3;
use proptest::prelude::*;

const FRAMES: [Frame; 4] = [
    Frame::EquatorialJ2000,
    Frame::EquatorialOfDate,
    Frame::EclipticJ2000,
    Frame::EclipticOfDate,
];

fn state(x: f64, y: f64, z: f64, jd: f64) -> StateVector {
    let ts = Timescale::default();
    StateVector::new(
        Vector3::new(x, y, z),
        Vector3::new(-y, x, 0.1 * z) * 0.01,
        ts.tt_jd(jd),
        Frame::EquatorialJ2000,
        Origin::Geocentric,
    )
}

proptest! {
    #[test]
    fn test_frame_round_trip(
        x in -50.0f64..50.0,
        y in -50.0f64..50.0,
        z in -50.0f64..50.0,
        jd in 2_305_447.5f64..2_597_641.5,
        index in 0usize..4,
    ) {
        let original = state(x, y, z, jd);
        let back = original.to_frame(FRAMES[index]).to_frame(Frame::EquatorialJ2000);
        let scale = original.position.norm().max(1.0);
        prop_assert!((back.position - original.position).norm() < 1e-9 * scale);
        prop_assert!((back.velocity - original.velocity).norm() < 1e-9 * scale);
        prop_assert_eq!(back.frame, Frame::EquatorialJ2000);
    }

    #[test]
    fn test_rotation_preserves_length(
        x in -50.0f64..50.0,
        y in -50.0f64..50.0,
        z in -50.0f64..50.0,
        jd in 2_305_447.5f64..2_597_641.5,
    ) {
        let original = state(x, y, z, jd);
        for frame in FRAMES {
            let rotated = original.to_frame(frame);
            prop_assert!((rotated.distance() - original.distance()).abs() < 1e-9 * original.distance().max(1.0));
        }
    }

    #[test]
    fn test_spherical_round_trip(
        ra in 0.0f64..24.0,
        dec in -89.9f64..89.9,
        distance in 0.001f64..100.0,
    ) {
        let eq = Equatorial { ra_hours: ra, dec_degrees: dec, distance_au: distance };
        let back = Equatorial::from_vector(&eq.to_vector());
        let dra = (back.ra_hours - ra + 12.0).rem_euclid(24.0) - 12.0;
        prop_assert!(dra.abs() < 1e-9);
        prop_assert!((back.dec_degrees - dec).abs() < 1e-9);
        prop_assert!((back.distance_au - distance).abs() < 1e-9 * distance);

        let ecl = Ecliptic { longitude_degrees: ra * 15.0, latitude_degrees: dec, distance_au: distance };
        let back = Ecliptic::from_vector(&ecl.to_vector());
        prop_assert!((back.latitude_degrees - dec).abs() < 1e-9);
    }
}

#[test]
fn test_equinox_direction_lies_on_both_planes() {
    let ts = Timescale::default();
    let t = ts.tt_jd(2_451_545.0);
    let x = StateVector::new(
        Vector3::x(),
        Vector3::zeros(),
        t,
        Frame::EquatorialJ2000,
        Origin::Heliocentric,
    );
    let ecl = x.to_frame(Frame::EclipticJ2000);
    assert!((ecl.position - Vector3::x()).norm() < 1e-12);
}
