//! Error types for almagest

use crate::planetlib::Body;
use thiserror::Error;

/// Main error type for ephemeris, geometry and search operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlmagestError {
    /// Requested time lies outside a model's validated span
    #[error("{body} is only valid for JD {min_jd}..={max_jd} TT, got JD {jd_tt}")]
    OutOfRange {
        body: Body,
        jd_tt: f64,
        min_jd: f64,
        max_jd: f64,
    },

    /// An iterative correction exceeded its iteration bound
    #[error("{what} did not converge after {iterations} iterations")]
    ConvergenceFailure { what: &'static str, iterations: usize },

    /// A search exhausted its window without a qualifying crossing
    #[error("no {what} found between JD {start} and JD {end}")]
    NotFound {
        what: &'static str,
        start: f64,
        end: f64,
    },

    /// Two vectors with different frame or origin were combined
    #[error("frame mismatch: expected {expected}, found {found}")]
    FrameMismatch { expected: String, found: String },

    /// Observer coordinates are not a valid geographic location
    #[error("invalid observer: {0}")]
    InvalidObserver(String),

    /// The operation has no meaning for this body
    #[error("{what} is not defined for {body}")]
    UnsupportedBody { body: Body, what: &'static str },

    /// A search window or tolerance is unusable
    #[error("invalid search window: {0}")]
    InvalidWindow(String),

    /// Calendar fields out of range
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

impl AlmagestError {
    /// True for the expected "nothing happened in this window" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AlmagestError::NotFound { .. })
    }
}

/// Result type for almagest operations
pub type Result<T> = std::result::Result<T, AlmagestError>;
