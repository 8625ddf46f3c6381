//! Whole-pipeline position checks against the validity windows and the
//! light-time iteration bound.

use almagest::constants::C_AUDAY;
use almagest::planetlib::LIGHT_TIME_MARGIN_DAYS;
use almagest::positions::{
    corrected_geocentric_state, geocentric_state, geocentric_validity, topocentric_state, Aberration,
};
use almagest::{body_state, AlmagestError, Body, LightTimeConfig, Observer, Timescale};
use approx::assert_relative_eq;

#[test]
fn test_positions_are_deterministic() {
    let ts = Timescale::default();
    let t = ts.utc((2024, 3, 20, 3, 6, 0.0)).unwrap();
    for body in Body::ALL {
        let first = body_state(body, t).unwrap();
        let second = body_state(body, t).unwrap();
        assert_eq!(first, second, "{body} differs between calls");
    }
}

#[test]
fn test_positions_agree_across_threads() {
    let ts = Timescale::default();
    let t = ts.utc((2031, 7, 4)).unwrap();
    let expected = body_state(Body::Jupiter, t).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || body_state(Body::Jupiter, t).unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_window_edges_are_inclusive() {
    let ts = Timescale::default();
    let validity = Body::Mars.validity();
    let at_edge = ts.tt_jd(validity.max_jd);
    assert!(body_state(Body::Mars, at_edge).is_ok());

    let beyond = ts.tt_jd(validity.max_jd + 1.0);
    match body_state(Body::Mars, beyond) {
        Err(AlmagestError::OutOfRange { body, .. }) => assert_eq!(body, Body::Mars),
        other => panic!("expected OutOfRange, got {other:?}"),
    }

    let before = ts.tt_jd(Body::Moon.validity().min_jd - 1.0);
    assert!(matches!(
        geocentric_state(Body::Moon, before),
        Err(AlmagestError::OutOfRange { .. })
    ));
}

#[test]
fn test_sun_is_never_out_of_range() {
    let ts = Timescale::default();
    let far = ts.tt_jd(-1.0e9);
    let sun = body_state(Body::Sun, far).unwrap();
    assert_eq!(sun.distance(), 0.0);
}

#[test]
fn test_light_time_iteration_bound() {
    let ts = Timescale::default();
    let t = ts.utc((2024, 1, 1)).unwrap();
    let tight = LightTimeConfig {
        max_iterations: 1,
        ..LightTimeConfig::default()
    };
    let err = corrected_geocentric_state(Body::Saturn, t, Aberration::Skip, &tight).unwrap_err();
    assert!(matches!(
        err,
        AlmagestError::ConvergenceFailure {
            what: "light-time",
            iterations: 1
        }
    ));

    let saturn = corrected_geocentric_state(Body::Saturn, t, Aberration::Skip, &LightTimeConfig::default())
        .unwrap();
    // Light from Saturn takes a little over an hour
    assert_relative_eq!(saturn.light_time, saturn.distance() / C_AUDAY, epsilon = 1e-9);
    assert!(saturn.light_time > 0.05 && saturn.light_time < 0.065);
}

#[test]
fn test_observation_at_both_window_edges() {
    let ts = Timescale::default();
    let config = LightTimeConfig::default();
    let observer = Observer::new(52.0, 4.4, 0.0).unwrap();
    for body in Body::ALL {
        let v = geocentric_validity(body);
        for jd in [v.min_jd, v.max_jd] {
            let t = ts.tt_jd(jd);
            for aberration in [Aberration::Apply, Aberration::Skip] {
                let geo = corrected_geocentric_state(body, t, aberration, &config);
                assert!(geo.is_ok(), "{body} from the geocentre at {jd}: {geo:?}");
            }
            let topo = topocentric_state(body, t, &observer, Aberration::Apply, &config);
            assert!(topo.is_ok(), "{body} from the ground at {jd}: {topo:?}");
        }
    }
}

#[test]
fn test_light_time_converges_for_every_body() {
    let ts = Timescale::default();
    let config = LightTimeConfig::default();
    for body in Body::ALL {
        let v = geocentric_validity(body);
        let samples = 6;
        for i in 0..=samples {
            let jd = v.min_jd + (v.max_jd - v.min_jd) * f64::from(i) / f64::from(samples);
            let obs = corrected_geocentric_state(body, ts.tt_jd(jd), Aberration::Skip, &config)
                .unwrap_or_else(|e| panic!("{body} at {jd}: {e}"));
            assert!(obs.light_time >= 0.0 && obs.light_time < LIGHT_TIME_MARGIN_DAYS, "{body}");
            assert_relative_eq!(obs.light_time, obs.distance() / C_AUDAY, epsilon = 1e-9);
        }
    }
}
