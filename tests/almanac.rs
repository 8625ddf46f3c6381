//! Almanac events checked against published times.

use almagest::almanac::moon::{lunar_phase, next_full_moon, MoonPhaseName};
use almagest::almanac::riset::{riset_summary, search_rise_set};
use almagest::almanac::{search_next, seasons, EventKind, Season};
use almagest::searchlib::{Direction, SearchWindow};
use almagest::{Body, Observer, SearchConfig, Time, Timescale};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn minutes_between(a: &Time, b: &Time) -> f64 {
    a.days_since(b).abs() * 1440.0
}

fn greenwich() -> Observer {
    Observer::new(51.4769, -0.0005, 0.0).unwrap()
}

#[test]
fn test_march_equinox_2024() {
    init_logging();
    let ts = Timescale::default();
    let year = seasons(&ts, 2024).unwrap();
    let expected = ts.utc((2024, 3, 20, 3, 6, 0.0)).unwrap();
    let error = minutes_between(&year.get(Season::MarchEquinox), &expected);
    assert!(error < 10.0, "equinox off by {error:.1} min");
}

#[test]
fn test_season_events_follow_each_other() {
    let ts = Timescale::default();
    let config = SearchConfig::default();
    let mut t = ts.utc((2025, 1, 1)).unwrap();
    let mut found = Vec::new();
    for _ in 0..4 {
        let event = search_next(EventKind::Season(Season::MarchEquinox), Body::Sun, None, t, &config).unwrap();
        found.push(event.time);
        t = event.time.add_days(1.0);
    }
    for pair in found.windows(2) {
        let gap = pair[1].days_since(&pair[0]);
        assert!((gap - 365.2422).abs() < 0.1, "gap of {gap} d");
    }
}

#[test]
fn test_consecutive_sunrises_are_a_day_apart() {
    init_logging();
    let ts = Timescale::default();
    let obs = greenwich();
    let config = SearchConfig::default();
    let window = SearchWindow::from_start(ts.utc((2024, 3, 20)).unwrap(), 1.0).unwrap();
    let first = search_rise_set(Body::Sun, &obs, Direction::Rising, &window, &config).unwrap();
    let window = SearchWindow::from_start(first.add_days(0.5), 1.0).unwrap();
    let second = search_rise_set(Body::Sun, &obs, Direction::Rising, &window, &config).unwrap();
    let gap_hours = second.days_since(&first) * 24.0;
    // Near the equinox sunrise moves earlier by about two minutes a day
    assert!(gap_hours > 23.9 && gap_hours < 24.0, "gap of {gap_hours} h");
}

#[test]
fn test_moonrise_summary() {
    let ts = Timescale::default();
    let t = ts.utc((2024, 1, 25, 12, 0, 0.0)).unwrap();
    let riset = riset_summary(Body::Moon, t, &greenwich(), &SearchConfig::default()).unwrap();
    // The full Moon rises around sunset
    let rise = riset.rise.unwrap();
    assert!(rise.days_since(&t) > 0.0 && rise.days_since(&t) < 0.3);
    let set = riset.set.unwrap();
    assert!(set.days_since(&rise) > 0.5);
    let transit = riset.transit.unwrap();
    assert!(transit.time.tt() > rise.tt() && transit.time.tt() < set.tt());
}

#[test]
fn test_full_moon_and_phase() {
    let ts = Timescale::default();
    let config = SearchConfig::default();
    let full = next_full_moon(ts.utc((2024, 2, 1)).unwrap(), &config).unwrap();
    let expected = ts.utc((2024, 2, 24, 12, 30, 0.0)).unwrap();
    assert!(minutes_between(&full, &expected) < 10.0);

    let phase = lunar_phase(full.add_days(-3.0), &config).unwrap();
    assert_eq!(phase.name, MoonPhaseName::WaxingGibbous);
    assert!(phase.illuminated_fraction > 0.85 && phase.illuminated_fraction < 0.99);
    assert!(minutes_between(&phase.next_full_moon, &full) < 1.0);
}
