//! The search engine driven through the public API.

use almagest::positions::geo_moon_state;
use almagest::searchlib::{search, search_all, search_direction, Condition, Direction, Extremum, SearchWindow};
use almagest::{AlmagestError, SearchConfig, Time, Timescale};
use approx::assert_relative_eq;
use std::f64::consts::{FRAC_PI_2, PI};

fn start() -> Time {
    Timescale::default().tt_jd(2_460_000.5)
}

fn x(t: Time) -> f64 {
    t.days_since(&start())
}

#[test]
fn test_sin_roots_in_both_senses() {
    let window = SearchWindow::from_start(start(), 10.0).unwrap();
    let config = SearchConfig::default().with_step(0.1).with_tolerance(1e-7);
    let f = |t: Time| Ok(x(t).sin());

    let falling = search(f, &window, Condition::ZeroCrossing, &config).unwrap();
    assert_relative_eq!(x(falling.time), PI, epsilon = 1e-6);

    let rising = search_direction(f, &window, Condition::ZeroCrossing, Direction::Rising, &config).unwrap();
    assert_relative_eq!(x(rising.time), 2.0 * PI, epsilon = 1e-6);
    assert_eq!(rising.direction, Direction::Rising);

    let peaks = search_all(f, &window, Condition::Extremum(Extremum::Maximum), &config).unwrap();
    assert_eq!(peaks.len(), 2);
    assert_relative_eq!(x(peaks[0].time), FRAC_PI_2, epsilon = 1e-4);
    assert_relative_eq!(peaks[1].value, 1.0, epsilon = 1e-6);
}

#[test]
fn test_nothing_to_find() {
    let window = SearchWindow::from_start(start(), 5.0).unwrap();
    let config = SearchConfig::default();
    let err = search(|_| Ok(1.0), &window, Condition::ZeroCrossing, &config).unwrap_err();
    assert!(err.is_not_found());
    assert!(search_all(|_| Ok(1.0), &window, Condition::ZeroCrossing, &config)
        .unwrap()
        .is_empty());
}

#[test]
fn test_errors_from_the_function_pass_through() {
    let window = SearchWindow::from_start(start(), 5.0).unwrap();
    let failing = |_: Time| -> almagest::Result<f64> { Err(AlmagestError::InvalidDate("bad".into())) };
    let err = search(failing, &window, Condition::ZeroCrossing, &SearchConfig::default()).unwrap_err();
    assert_eq!(err, AlmagestError::InvalidDate("bad".into()));
}

#[test]
fn test_bounds_are_enforced() {
    let window = SearchWindow::from_start(start(), 10.0).unwrap();
    let f = |t: Time| Ok(x(t) - 3.3);

    let too_fine = SearchConfig::default().with_step(1e-5);
    assert!(matches!(
        search(f, &window, Condition::ZeroCrossing, &too_fine),
        Err(AlmagestError::InvalidWindow(_))
    ));

    let capped = SearchConfig::default().with_step(1.0).with_tolerance(1e-9).with_max_iterations(3);
    assert!(matches!(
        search(f, &window, Condition::ZeroCrossing, &capped),
        Err(AlmagestError::ConvergenceFailure { iterations: 3, .. })
    ));
}

#[test]
fn test_lunar_distance_minimum() {
    // Perigee of 2024-01-13 10:35 UTC
    let ts = Timescale::default();
    let window = SearchWindow::from_start(ts.utc((2024, 1, 8)).unwrap(), 10.0).unwrap();
    let config = SearchConfig::default().with_step(0.5);
    let perigee = search(
        |t| Ok(geo_moon_state(t)?.distance()),
        &window,
        Condition::Extremum(Extremum::Minimum),
        &config,
    )
    .unwrap();
    let expected = ts.utc((2024, 1, 13, 10, 35, 0.0)).unwrap();
    assert!(perigee.time.days_since(&expected).abs() < 0.1);
    assert!(perigee.value * 149_597_870.7 < 363_000.0);
}
