//! Light propagation corrections
//!
//! - [`solve_light_time`]: fixed-point iteration for the light travel time
//!   from a moving target to an observer
//! - [`add_aberration`]: stellar aberration from the observer's velocity
//!   (Klioner 2003)
//!
//! Gravitational light deflection is below the accuracy of the analytic
//! series and is not applied.

use log::debug;
use nalgebra::Vector3;

use crate::config::LightTimeConfig;
use crate::constants::C_AUDAY;
use crate::errors::{AlmagestError, Result};

/// Smallest positive normal f64, used to avoid division by zero.
const AVOID_DIVIDE_BY_ZERO: f64 = f64::MIN_POSITIVE;

/// Converged light-time iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTimeSolution {
    /// Target position at emission time minus observer position at reception, AU
    pub relative: Vector3<f64>,
    /// Light travel time in days
    pub light_time: f64,
    /// Number of target evaluations
    pub iterations: usize,
}

/// Solve for the light travel time τ from target to observer.
///
/// `target_at(tau)` returns the target position at the reception time minus
/// `tau` days, in the same frame and origin as `observer`. Iteration starts
/// from τ = 0 and stops once successive values agree within
/// `config.tolerance_days`; more than `config.max_iterations` evaluations is
/// a `ConvergenceFailure`.
pub fn solve_light_time<F>(
    observer: &Vector3<f64>,
    mut target_at: F,
    config: &LightTimeConfig,
) -> Result<LightTimeSolution>
where
    F: FnMut(f64) -> Result<Vector3<f64>>,
{
    let mut tau = 0.0;
    for iteration in 1..=config.max_iterations {
        let relative = target_at(tau)? - observer;
        let next = relative.norm() / C_AUDAY;
        if (next - tau).abs() < config.tolerance_days {
            debug!("light-time converged after {iteration} iterations: {next:.12} d");
            return Ok(LightTimeSolution {
                relative,
                light_time: next,
                iterations: iteration,
            });
        }
        tau = next;
    }
    Err(AlmagestError::ConvergenceFailure {
        what: "light-time",
        iterations: config.max_iterations,
    })
}

/// Projection of the observer offset on the direction to a target, in days of light travel.
pub fn light_time_difference(position: &Vector3<f64>, observer_pos: &Vector3<f64>) -> f64 {
    let dis = position.norm();
    let u1 = position / (dis + AVOID_DIVIDE_BY_ZERO);
    u1.dot(observer_pos) / C_AUDAY
}

/// Apply stellar aberration.
///
/// `position` is the target relative to the observer (AU), shifted in place.
/// `velocity` is the observer's velocity (AU/day), `light_time` in days.
pub fn add_aberration(position: &mut Vector3<f64>, velocity: &Vector3<f64>, light_time: f64) {
    let p1mag = light_time * C_AUDAY;
    let vemag = velocity.norm();

    let beta = vemag / C_AUDAY;
    let dot = position.dot(velocity);

    let cosd = dot / (p1mag * vemag + AVOID_DIVIDE_BY_ZERO);
    let gammai = (1.0 - beta * beta).sqrt();
    let p = beta * cosd;
    let q = (1.0 + p / (1.0 + gammai)) * light_time;
    let r = 1.0 + p;

    *position *= gammai;
    *position += q * velocity;
    *position /= r;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ASEC2RAD, AU_M};
    use approx::assert_relative_eq;

    fn earth_speed() -> f64 {
        29.78e3 / AU_M * 86_400.0
    }

    #[test]
    fn test_light_time_static_target() {
        let observer = Vector3::zeros();
        let target = Vector3::new(5.0, 0.0, 0.0);
        let sol = solve_light_time(&observer, |_| Ok(target), &LightTimeConfig::default()).unwrap();
        assert_relative_eq!(sol.light_time, 5.0 / C_AUDAY, epsilon = 1e-15);
        assert_eq!(sol.iterations, 2);
    }

    #[test]
    fn test_light_time_moving_target() {
        // Receding at 0.01 AU/day from 1 AU: tau = 1 / (c - 0.01)
        let observer = Vector3::zeros();
        let v = 0.01;
        let sol = solve_light_time(
            &observer,
            |tau| Ok(Vector3::new(1.0 - v * tau, 0.0, 0.0)),
            &LightTimeConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(sol.light_time, 1.0 / (C_AUDAY + v), epsilon = 1e-12);
        assert!(sol.iterations <= 10);
    }

    #[test]
    fn test_light_time_iteration_cap() {
        let observer = Vector3::zeros();
        let config = LightTimeConfig {
            max_iterations: 1,
            ..LightTimeConfig::default()
        };
        let err = solve_light_time(&observer, |_| Ok(Vector3::new(1.0, 0.0, 0.0)), &config)
            .unwrap_err();
        assert_eq!(
            err,
            AlmagestError::ConvergenceFailure {
                what: "light-time",
                iterations: 1
            }
        );
    }

    #[test]
    fn test_light_time_propagates_target_error() {
        let err = solve_light_time(
            &Vector3::zeros(),
            |_| Err(AlmagestError::InvalidWindow("boom".into())),
            &LightTimeConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AlmagestError::InvalidWindow(_)));
    }

    #[test]
    fn test_light_time_difference_along_axis() {
        let position = Vector3::new(10.0, 0.0, 0.0);
        let observer = Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(
            light_time_difference(&position, &observer),
            1.0 / C_AUDAY,
            epsilon = 1e-15
        );
        let side = Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(light_time_difference(&position, &side), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_add_aberration_zero_velocity() {
        let mut position = Vector3::new(1.0, 0.0, 0.0);
        add_aberration(&mut position, &Vector3::zeros(), 0.01);
        assert_relative_eq!(position, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_aberration_constant() {
        // Perpendicular motion at the Earth's orbital speed shifts by about 20.5″
        let mut position = Vector3::new(1.0, 0.0, 0.0);
        let velocity = Vector3::new(0.0, earth_speed(), 0.0);
        add_aberration(&mut position, &velocity, 1.0 / C_AUDAY);
        let shift = position.y.atan2(position.x) / ASEC2RAD;
        assert_relative_eq!(shift, 20.49, epsilon = 0.05);
        assert_relative_eq!(position.norm(), 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_aberration_vanishes_along_motion() {
        let mut position = Vector3::new(1.0, 0.0, 0.0);
        let velocity = Vector3::new(earth_speed(), 0.0, 0.0);
        add_aberration(&mut position, &velocity, 1.0 / C_AUDAY);
        assert!(position.y.abs() < 1e-15 && position.z.abs() < 1e-15);
    }
}
