//! Planetary positions from the analytical series
//!
//! Prints heliocentric and apparent geocentric coordinates for every body
//! at the 2024 March equinox, then the Earth-Mars distance across 2024.
//!
//! Usage: cargo run --example planetary_positions

use almagest::positions::{corrected_geocentric_state, ecliptic_j2000, illumination, Aberration};
use almagest::units::kilometer;
use almagest::{body_state, Body, LightTimeConfig, Timescale};

fn main() -> almagest::Result<()> {
    env_logger::init();
    let ts = Timescale::default();
    let config = LightTimeConfig::default();

    let t = ts.utc((2024, 3, 20, 3, 6, 0.0))?;
    println!("Heliocentric positions at {t} (J2000 ecliptic):");
    for body in Body::ALL {
        if body == Body::Sun || body == Body::Moon {
            continue;
        }
        let state = body_state(body, t)?;
        println!("  {:<10} {}", body.name(), ecliptic_j2000(&state));
    }

    println!("\nApparent geocentric positions (true equator of date):");
    for body in Body::ALL {
        if body == Body::Earth {
            continue;
        }
        let obs = corrected_geocentric_state(body, t, Aberration::Apply, &config)?;
        let lit = illumination(body, t)?;
        println!(
            "  {:<10} {}  light time {:>8.3} min  lit {:>5.1}%",
            body.name(),
            obs.radec(true),
            obs.light_time * 1440.0,
            lit.phase_fraction * 100.0
        );
    }

    println!("\nEarth-Mars distance over 2024:");
    for month in 1..=12 {
        let t = ts.utc((2024, month, 1))?;
        let mars = corrected_geocentric_state(Body::Mars, t, Aberration::Skip, &config)?;
        println!(
            "  2024-{:02}-01: {:.4} AU ({:.0} million km)",
            month,
            mars.distance(),
            mars.distance_length().get::<kilometer>() / 1e6
        );
    }

    Ok(())
}
