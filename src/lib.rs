//! # almagest
//!
//! Analytical Solar System ephemeris: positions of the Sun, Moon and planets
//! from closed-form series, the coordinate transforms between the frames
//! astronomers use, and a search engine for the times of events such as
//! sunrise, equinoxes and lunar phases.
//!
//! Nothing is read from disk. The planets come from truncated VSOP87D
//! series, the Moon from the lunar theory in Meeus' *Astronomical
//! Algorithms*, and Pluto from a fresh numerical integration on every call.
//! Every model has a validity window and fails with
//! [`AlmagestError::OutOfRange`] outside it.
//!
//! ```ignore
//! use almagest::{body_state, Body, Timescale};
//! use almagest::positions::{corrected_geocentric_state, Aberration};
//!
//! let ts = Timescale::default();
//! let t = ts.utc((2024, 3, 20, 3, 6, 0.0))?;
//! let mars = body_state(Body::Mars, t)?;
//! let sun = corrected_geocentric_state(Body::Sun, t, Aberration::Apply, &Default::default())?;
//! println!("{}", sun.radec(true));
//! ```
//!
//! All functions are pure: no caches, no global mutable state, and the
//! compiled-in tables are immutable statics, so everything is safe to call
//! from several threads at once.

pub mod almanac;
pub mod config;
pub mod constants;
pub mod earthlib;
pub mod errors;
pub mod framelib;
pub mod keplerlib;
pub mod lunarlib;
pub mod nutationlib;
pub mod planetlib;
pub mod plutolib;
pub mod positions;
pub mod precessionlib;
pub mod relativity;
pub mod searchlib;
pub mod serieslib;
pub mod time;
pub mod toposlib;
pub mod units;

pub use config::{Atmosphere, LightTimeConfig, SearchConfig};
pub use errors::{AlmagestError, Result};
pub use framelib::{Frame, Origin, StateVector};
pub use planetlib::{body_state, Body};
pub use time::{Time, Timescale};
pub use toposlib::Observer;
