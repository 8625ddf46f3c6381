//! Compiled-in VSOP87D coefficient tables, one module per planet.

mod earth;
mod jupiter;
mod mars;
mod mercury;
mod neptune;
mod saturn;
mod uranus;
mod venus;

pub(crate) use earth::EARTH;
pub(crate) use jupiter::JUPITER;
pub(crate) use mars::MARS;
pub(crate) use mercury::MERCURY;
pub(crate) use neptune::NEPTUNE;
pub(crate) use saturn::SATURN;
pub(crate) use uranus::URANUS;
pub(crate) use venus::VENUS;
