//! Event search over time-dependent functions
//!
//! - [`search`] / [`search_all`]: bracket sign changes of a scalar
//!   function by coarse sampling, then refine each bracket by bisection with
//!   a final linear interpolation. Zero crossings, threshold crossings,
//!   extrema (through a finite-difference derivative) and crossings of a
//!   circular quantity are all reduced to a sign change.
//! - [`find_discrete`]: times at which an integer-valued function of time
//!   changes value, by repeated subdivision of the brackets.
//!
//! Both loops are bounded by [`SearchConfig`]: a cap on coarse samples per
//! window and a cap on refinement iterations. Errors from the searched
//! function are returned as they are.

use log::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::errors::{AlmagestError, Result};
use crate::time::Time;
use crate::units::normalize_signed_degrees;

/// Number of subdivisions per bracket refinement in [`find_discrete`]
pub const DEFAULT_NUM: usize = 12;

/// Smallest half-step of the central difference for extrema, in days.
///
/// Julian dates near the present resolve about 40 µs, so a shorter step
/// would be dominated by time quantization.
pub const MIN_DERIVATIVE_STEP_DAYS: f64 = 1e-3;

/// A closed interval of time to search, start before end.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchWindow {
    pub start: Time,
    pub end: Time,
}

impl SearchWindow {
    /// `InvalidWindow` unless `end` is strictly after `start`
    pub fn new(start: Time, end: Time) -> Result<Self> {
        let span = end.days_since(&start);
        if !span.is_finite() || span <= 0.0 {
            return Err(AlmagestError::InvalidWindow(format!(
                "window end {} is not after start {}",
                end.tt(),
                start.tt()
            )));
        }
        Ok(SearchWindow { start, end })
    }

    /// Window of `days` days beginning at `start`
    pub fn from_start(start: Time, days: f64) -> Result<Self> {
        SearchWindow::new(start, start.add_days(days))
    }

    /// Window of `days` days on either side of `center`
    pub fn around(center: Time, days: f64) -> Result<Self> {
        SearchWindow::new(center.add_days(-days), center.add_days(days))
    }

    /// Length in days
    pub fn days(&self) -> f64 {
        self.end.days_since(&self.start)
    }

    pub fn contains(&self, time: &Time) -> bool {
        time.tt() >= self.start.tt() && time.tt() <= self.end.tt()
    }
}

/// Which kind of extremum to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extremum {
    Maximum,
    Minimum,
}

/// What counts as an event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// f(t) changes sign
    ZeroCrossing,
    /// f(t) crosses the given value
    Threshold(f64),
    /// f'(t) changes sign in the given sense
    Extremum(Extremum),
    /// An angle in degrees passes the given target, with wraparound
    Circular(f64),
}

/// Sense in which the searched quantity crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Rising,
    Falling,
}

/// A located event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub time: Time,
    /// The searched function at `time`
    pub value: f64,
    pub direction: Direction,
}

impl Condition {
    /// The quantity whose sign change marks the event
    fn evaluate<F>(&self, f: &mut F, t: Time, half_step: f64) -> Result<f64>
    where
        F: FnMut(Time) -> Result<f64>,
    {
        match *self {
            Condition::ZeroCrossing => f(t),
            Condition::Threshold(value) => Ok(f(t)? - value),
            Condition::Circular(target) => Ok(normalize_signed_degrees(f(t)? - target)),
            Condition::Extremum(_) => {
                let ahead = f(t.add_days(half_step))?;
                let behind = f(t.add_days(-half_step))?;
                Ok((ahead - behind) / (2.0 * half_step))
            }
        }
    }

    /// Whether consecutive samples `a`, `b` bracket an event of this kind
    fn crossing(&self, a: f64, b: f64) -> Option<Direction> {
        let direction = if a < 0.0 && b >= 0.0 {
            Direction::Rising
        } else if a > 0.0 && b <= 0.0 {
            Direction::Falling
        } else {
            return None;
        };
        match (*self, direction) {
            // A jump across the ±180° seam is not a crossing of the target
            (Condition::Circular(_), _) if (b - a).abs() > 180.0 => None,
            (Condition::Extremum(Extremum::Maximum), Direction::Rising) => None,
            (Condition::Extremum(Extremum::Minimum), Direction::Falling) => None,
            _ => Some(direction),
        }
    }
}

/// First event in the window, scanning forward from its start.
///
/// `NotFound` if the window holds none.
pub fn search<F>(
    mut f: F,
    window: &SearchWindow,
    condition: Condition,
    config: &SearchConfig,
) -> Result<SearchResult>
where
    F: FnMut(Time) -> Result<f64>,
{
    scan(&mut f, window, condition, None, config, true)?
        .into_iter()
        .next()
        .ok_or(AlmagestError::NotFound {
            what: "event",
            start: window.start.tt(),
            end: window.end.tt(),
        })
}

/// Every event in the window in time order; empty if there are none.
pub fn search_all<F>(
    mut f: F,
    window: &SearchWindow,
    condition: Condition,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>>
where
    F: FnMut(Time) -> Result<f64>,
{
    scan(&mut f, window, condition, None, config, false)
}

/// First event in the window that crosses in the given sense.
///
/// Crossings the other way are skipped without being refined.
pub fn search_direction<F>(
    mut f: F,
    window: &SearchWindow,
    condition: Condition,
    direction: Direction,
    config: &SearchConfig,
) -> Result<SearchResult>
where
    F: FnMut(Time) -> Result<f64>,
{
    scan(&mut f, window, condition, Some(direction), config, true)?
        .into_iter()
        .next()
        .ok_or(AlmagestError::NotFound {
            what: "event",
            start: window.start.tt(),
            end: window.end.tt(),
        })
}

fn check_config(window: &SearchWindow, config: &SearchConfig) -> Result<usize> {
    if !(config.step_days > 0.0) || !(config.tolerance_days > 0.0) {
        return Err(AlmagestError::InvalidWindow(format!(
            "step {} d and tolerance {} d must be positive",
            config.step_days, config.tolerance_days
        )));
    }
    let intervals = (window.days() / config.step_days).ceil().max(1.0);
    if intervals + 1.0 > config.max_samples as f64 {
        return Err(AlmagestError::InvalidWindow(format!(
            "{} days at a {} d step needs more than {} samples",
            window.days(),
            config.step_days,
            config.max_samples
        )));
    }
    Ok(intervals as usize)
}

fn scan<F>(
    f: &mut F,
    window: &SearchWindow,
    condition: Condition,
    wanted: Option<Direction>,
    config: &SearchConfig,
    first_only: bool,
) -> Result<Vec<SearchResult>>
where
    F: FnMut(Time) -> Result<f64>,
{
    let intervals = check_config(window, config)?;
    let h = window.days() / intervals as f64;
    let half_step = config.tolerance_days.max(MIN_DERIVATIVE_STEP_DAYS);

    let mut results = Vec::new();
    let mut prev_t = window.start;
    let mut prev = condition.evaluate(f, prev_t, half_step)?;
    for i in 1..=intervals {
        let t = if i == intervals {
            window.end
        } else {
            window.start.add_days(i as f64 * h)
        };
        let cur = condition.evaluate(f, t, half_step)?;
        let crossing = condition
            .crossing(prev, cur)
            .filter(|d| wanted.map_or(true, |w| w == *d));
        if let Some(direction) = crossing {
            results.push(refine(f, condition, (prev_t, prev), (t, cur), direction, config)?);
            if first_only {
                break;
            }
        }
        prev_t = t;
        prev = cur;
    }
    debug!(
        "search {:?} over {:.3} d in {intervals} steps: {} event(s)",
        condition,
        window.days(),
        results.len()
    );
    Ok(results)
}

/// Narrow a bracket until it is shorter than the tolerance.
fn refine<F>(
    f: &mut F,
    condition: Condition,
    (mut lo, mut g_lo): (Time, f64),
    (mut hi, mut g_hi): (Time, f64),
    direction: Direction,
    config: &SearchConfig,
) -> Result<SearchResult>
where
    F: FnMut(Time) -> Result<f64>,
{
    let half_step = config.tolerance_days.max(MIN_DERIVATIVE_STEP_DAYS);
    let below = |g: f64| match direction {
        Direction::Rising => g < 0.0,
        Direction::Falling => g > 0.0,
    };

    let mut iterations = 0;
    while hi.days_since(&lo) > config.tolerance_days {
        if iterations == config.max_iterations {
            warn!(
                "search refinement hit its cap of {} iterations with a {:.3e} d bracket",
                config.max_iterations,
                hi.days_since(&lo)
            );
            return Err(AlmagestError::ConvergenceFailure {
                what: "event search",
                iterations,
            });
        }
        let mid = lo.add_days(hi.days_since(&lo) / 2.0);
        if mid.tt() == lo.tt() || mid.tt() == hi.tt() {
            // Adjacent Julian dates: the bracket cannot shrink further
            trace!(
                "bracket of {:.3e} d is at Julian date resolution, below tolerance {:.3e} d",
                hi.days_since(&lo),
                config.tolerance_days
            );
            break;
        }
        iterations += 1;
        let g_mid = condition.evaluate(f, mid, half_step)?;
        if below(g_mid) {
            lo = mid;
            g_lo = g_mid;
        } else {
            hi = mid;
            g_hi = g_mid;
        }
    }

    let fraction = if g_lo != g_hi {
        (g_lo / (g_lo - g_hi)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let time = lo.add_days(hi.days_since(&lo) * fraction);
    debug!("refined {direction:?} crossing to {} after {iterations} iterations", time.tt());
    Ok(SearchResult {
        time,
        value: f(time)?,
        direction,
    })
}

/// Find times at which a discrete function of time changes value.
///
/// Samples `f` every `config.step_days` across the window, then subdivides
/// each bracket where the value changes into [`DEFAULT_NUM`] points until
/// every bracket is shorter than `config.tolerance_days`. Returns the time
/// just after each change with the new value.
pub fn find_discrete<F>(
    window: &SearchWindow,
    f: &mut F,
    config: &SearchConfig,
) -> Result<Vec<(Time, i64)>>
where
    F: FnMut(Time) -> Result<i64>,
{
    let intervals = check_config(window, config)?;
    let offsets = linspace(0.0, window.days(), intervals + 1);
    find_discrete_core(window.start, offsets, f, config)
}

fn find_discrete_core<F>(
    start: Time,
    initial_offsets: Vec<f64>,
    f: &mut F,
    config: &SearchConfig,
) -> Result<Vec<(Time, i64)>>
where
    F: FnMut(Time) -> Result<i64>,
{
    let end_mask = linspace(0.0, 1.0, DEFAULT_NUM);
    let start_mask: Vec<f64> = end_mask.iter().copied().rev().collect();

    let mut offsets = initial_offsets;

    for _ in 0..=config.max_iterations {
        let y = offsets
            .iter()
            .map(|&d| f(start.add_days(d)))
            .collect::<Result<Vec<i64>>>()?;

        let transitions: Vec<usize> = y
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] != w[1])
            .map(|(i, _)| i)
            .collect();

        if transitions.is_empty() {
            return Ok(Vec::new());
        }

        let starts: Vec<f64> = transitions.iter().map(|&i| offsets[i]).collect();
        let ends: Vec<f64> = transitions.iter().map(|&i| offsets[i + 1]).collect();

        let max_width = starts
            .iter()
            .zip(ends.iter())
            .map(|(s, e)| e - s)
            .fold(0.0_f64, f64::max);

        if max_width <= config.tolerance_days {
            return Ok(transitions
                .iter()
                .zip(ends)
                .map(|(&i, end)| (start.add_days(end), y[i + 1]))
                .collect());
        }

        offsets = outer_interp(&starts, &start_mask, &ends, &end_mask);
    }

    warn!("find_discrete did not converge in {} rounds", config.max_iterations);
    Err(AlmagestError::ConvergenceFailure {
        what: "discrete search",
        iterations: config.max_iterations,
    })
}

/// Generate `n` evenly spaced values from `start` to `end` (inclusive).
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// `num` points spanning each bracket (starts[i], ends[i]).
fn outer_interp(starts: &[f64], start_mask: &[f64], ends: &[f64], end_mask: &[f64]) -> Vec<f64> {
    starts
        .iter()
        .zip(ends)
        .flat_map(|(s, e)| {
            start_mask
                .iter()
                .zip(end_mask)
                .map(move |(sm, em)| s * sm + e * em)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::J2000;
    use crate::time::Timescale;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn window(days: f64) -> SearchWindow {
        let start = Timescale::default().tt_jd(J2000);
        SearchWindow::from_start(start, days).unwrap()
    }

    fn x(t: Time) -> f64 {
        t.tt() - J2000
    }

    #[test]
    fn test_linspace() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert_relative_eq!(v[1], 0.25);
        assert_relative_eq!(v[4], 1.0);
        assert_eq!(linspace(5.0, 10.0, 1), vec![5.0]);
    }

    #[test]
    fn test_window_must_be_ordered() {
        let t = Timescale::default().tt_jd(J2000);
        assert!(matches!(
            SearchWindow::new(t, t),
            Err(AlmagestError::InvalidWindow(_))
        ));
        assert!(SearchWindow::from_start(t, -1.0).is_err());
    }

    #[test]
    fn test_first_root_of_sin() {
        let config = SearchConfig::default().with_step(0.1).with_tolerance(1e-8);
        let r = search(|t| Ok(x(t).sin()), &window(10.0), Condition::ZeroCrossing, &config).unwrap();
        assert_relative_eq!(x(r.time), PI, epsilon = 1e-8);
        assert_eq!(r.direction, Direction::Falling);
        assert!(r.value.abs() < 1e-8);
    }

    #[test]
    fn test_all_roots_of_sin() {
        let config = SearchConfig::default().with_step(0.25).with_tolerance(1e-8);
        let roots = search_all(|t| Ok(x(t).sin()), &window(20.0), Condition::ZeroCrossing, &config)
            .unwrap();
        assert_eq!(roots.len(), 6);
        for (k, r) in roots.iter().enumerate() {
            assert_relative_eq!(x(r.time), (k + 1) as f64 * PI, epsilon = 1e-8);
        }
        assert_eq!(roots[1].direction, Direction::Rising);
    }

    #[test]
    fn test_direction_filter_skips_falling_roots() {
        let config = SearchConfig::default().with_step(0.1).with_tolerance(1e-8);
        let r = search_direction(
            |t| Ok(x(t).sin()),
            &window(10.0),
            Condition::ZeroCrossing,
            Direction::Rising,
            &config,
        )
        .unwrap();
        assert_relative_eq!(x(r.time), 2.0 * PI, epsilon = 1e-8);
        assert_eq!(r.direction, Direction::Rising);
    }

    #[test]
    fn test_no_sign_change_is_not_found() {
        let err = search(
            |t| Ok(2.0 + x(t).sin()),
            &window(20.0),
            Condition::ZeroCrossing,
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_threshold() {
        let config = SearchConfig::default().with_step(0.1).with_tolerance(1e-8);
        let r = search(|t| Ok(x(t).sin()), &window(3.0), Condition::Threshold(0.5), &config).unwrap();
        assert_relative_eq!(x(r.time), PI / 6.0, epsilon = 1e-8);
        assert_relative_eq!(r.value, 0.5, epsilon = 1e-8);
    }

    #[test]
    fn test_extrema() {
        let config = SearchConfig::default().with_step(0.1).with_tolerance(1e-7);
        let max = search(
            |t| Ok(x(t).sin()),
            &window(7.0),
            Condition::Extremum(Extremum::Maximum),
            &config,
        )
        .unwrap();
        assert_relative_eq!(x(max.time), PI / 2.0, epsilon = 1e-5);
        assert_relative_eq!(max.value, 1.0, epsilon = 1e-9);

        let min = search(
            |t| Ok(x(t).sin()),
            &window(7.0),
            Condition::Extremum(Extremum::Minimum),
            &config,
        )
        .unwrap();
        assert_relative_eq!(x(min.time), 1.5 * PI, epsilon = 1e-5);
    }

    #[test]
    fn test_circular_ignores_wraparound() {
        // An angle growing 30°/day, wrapped to [0, 360)
        let angle = |t: Time| -> Result<f64> { Ok((x(t) * 30.0).rem_euclid(360.0)) };
        let config = SearchConfig::default().with_step(0.5).with_tolerance(1e-9);
        let hits = search_all(angle, &window(25.0), Condition::Circular(90.0), &config).unwrap();
        // 90° is reached at day 3, 15 and never falls back
        assert_eq!(hits.len(), 2);
        assert_relative_eq!(x(hits[0].time), 3.0, epsilon = 1e-8);
        assert_relative_eq!(x(hits[1].time), 15.0, epsilon = 1e-8);
        assert!(hits.iter().all(|h| h.direction == Direction::Rising));
    }

    #[test]
    fn test_errors_propagate() {
        let err = search(
            |_| Err(AlmagestError::InvalidDate("bad".into())),
            &window(1.0),
            Condition::ZeroCrossing,
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, AlmagestError::InvalidDate("bad".into()));
    }

    #[test]
    fn test_sample_cap() {
        let config = SearchConfig {
            max_samples: 10,
            ..SearchConfig::default()
        };
        let err = search(|t| Ok(x(t)), &window(100.0), Condition::ZeroCrossing, &config).unwrap_err();
        assert!(matches!(err, AlmagestError::InvalidWindow(_)));
    }

    #[test]
    fn test_iteration_cap() {
        let config = SearchConfig::default()
            .with_step(1.0)
            .with_tolerance(1e-9)
            .with_max_iterations(3);
        let err = search(|t| Ok(x(t) - 0.3), &window(2.0), Condition::ZeroCrossing, &config)
            .unwrap_err();
        assert!(matches!(
            err,
            AlmagestError::ConvergenceFailure { iterations: 3, .. }
        ));
    }

    #[test]
    fn test_tolerance_finer_than_date_resolution() {
        let config = SearchConfig::default().with_step(0.1).with_tolerance(1e-10);
        let results =
            search_all(|t| Ok(x(t).sin()), &window(10.0), Condition::ZeroCrossing, &config)
                .unwrap();
        assert_eq!(results.len(), 3);
        for (k, r) in results.iter().enumerate() {
            assert_relative_eq!(x(r.time), (k + 1) as f64 * PI, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_find_discrete_step_function() {
        let mut f = |t: Time| -> Result<i64> { Ok(if x(t).sin() >= 0.0 { 1 } else { 0 }) };
        let config = SearchConfig::default().with_step(0.1).with_tolerance(1e-8);
        let results = find_discrete(&window(4.0 * PI - 0.1), &mut f, &config).unwrap();
        assert_eq!(results.len(), 3);
        for (k, (t, value)) in results.iter().enumerate() {
            assert_relative_eq!(x(*t), (k + 1) as f64 * PI, epsilon = 1e-6);
            assert_eq!(*value, if k % 2 == 0 { 0 } else { 1 });
        }
    }

    #[test]
    fn test_find_discrete_no_transitions() {
        let mut f = |_: Time| -> Result<i64> { Ok(1) };
        let results = find_discrete(&window(10.0), &mut f, &SearchConfig::default()).unwrap();
        assert!(results.is_empty());
    }
}
