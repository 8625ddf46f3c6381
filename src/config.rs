//! Explicit bounds and tunables for the iterative parts of the engine.
//!
//! Nothing here is read from files or the environment. Every struct has a
//! `Default` matching the values used throughout the crate, and callers that
//! need a tighter or looser bound pass their own value.

use crate::constants::DAY_S;

/// Bounds for the light-time iteration in the geometry layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightTimeConfig {
    /// Stop once successive light-time estimates differ by less than this (days)
    pub tolerance_days: f64,
    /// Give up with `ConvergenceFailure` after this many iterations
    pub max_iterations: usize,
}

impl Default for LightTimeConfig {
    fn default() -> Self {
        LightTimeConfig {
            tolerance_days: 1e-12,
            max_iterations: 10,
        }
    }
}

/// Bounds for the event search engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Spacing of the coarse samples used to bracket a crossing (days)
    pub step_days: f64,
    /// Refinement stops once the bracket is narrower than this (days)
    pub tolerance_days: f64,
    /// Hard cap on refinement iterations per bracket
    pub max_iterations: usize,
    /// Hard cap on coarse samples per window
    pub max_samples: usize,
}

impl SearchConfig {
    /// Same bounds with a different coarse step.
    pub fn with_step(self, step_days: f64) -> Self {
        SearchConfig { step_days, ..self }
    }

    /// Same bounds with a different refinement tolerance.
    pub fn with_tolerance(self, tolerance_days: f64) -> Self {
        SearchConfig {
            tolerance_days,
            ..self
        }
    }

    /// Same bounds with a different iteration cap.
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        SearchConfig {
            max_iterations,
            ..self
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            step_days: 1.0 / 24.0,
            tolerance_days: 1.0 / DAY_S,
            max_iterations: 100,
            max_samples: 200_000,
        }
    }
}

/// Atmospheric conditions for refraction near the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atmosphere {
    /// Air temperature in degrees Celsius
    pub temperature_c: f64,
    /// Air pressure in millibars; zero disables refraction
    pub pressure_mbar: f64,
}

impl Atmosphere {
    /// No atmosphere: refraction is never applied.
    pub const fn none() -> Self {
        Atmosphere {
            temperature_c: 10.0,
            pressure_mbar: 0.0,
        }
    }

    /// Whether this atmosphere bends light at all.
    pub fn refracts(&self) -> bool {
        self.pressure_mbar > 0.0
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Atmosphere {
            temperature_c: 10.0,
            pressure_mbar: 1010.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let lt = LightTimeConfig::default();
        assert_eq!(lt.max_iterations, 10);
        let sc = SearchConfig::default();
        assert!(sc.tolerance_days < sc.step_days);
        assert!(Atmosphere::default().refracts());
        assert!(!Atmosphere::none().refracts());
    }

    #[test]
    fn test_builders_keep_other_fields() {
        let sc = SearchConfig::default().with_step(0.5).with_max_iterations(3);
        assert_eq!(sc.step_days, 0.5);
        assert_eq!(sc.max_iterations, 3);
        assert_eq!(sc.tolerance_days, SearchConfig::default().tolerance_days);
    }
}
