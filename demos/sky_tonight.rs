//! Almanac for one evening at Greenwich
//!
//! Sun states through the day, rise and set of the Sun, Moon and bright
//! planets, the Moon's phase, and the next few notable events.
//!
//! Usage: cargo run --example sky_tonight

use almagest::almanac::moon::lunar_phase;
use almagest::almanac::riset::riset_summary;
use almagest::almanac::sun::sun_details;
use almagest::almanac::{search_next, seasons, EventKind, Season};
use almagest::{Body, Observer, SearchConfig, Time, Timescale};

fn show(time: Option<Time>) -> String {
    match time {
        Some(t) => t.utc_calendar().to_string(),
        None => "-".to_string(),
    }
}

fn main() -> almagest::Result<()> {
    env_logger::init();
    let ts = Timescale::default();
    let config = SearchConfig::default();
    let greenwich = Observer::new(51.4769, -0.0005, 46.0)?;
    let t = ts.utc((2024, 3, 20))?;

    println!("The Sun over Greenwich from {t}:");
    for period in sun_details(t, &greenwich, &config)? {
        println!(
            "  {} .. {}  {}",
            period.start.utc_calendar(),
            period.end.utc_calendar(),
            period.state
        );
    }

    println!("\nRise, transit and set:");
    for body in [Body::Sun, Body::Moon, Body::Venus, Body::Mars, Body::Jupiter, Body::Saturn] {
        let riset = riset_summary(body, t.add_days(0.5), &greenwich, &config)?;
        let transit = match riset.transit {
            Some(c) => format!("{} at {:.1}°", c.time.utc_calendar(), c.altitude_degrees),
            None => "-".to_string(),
        };
        println!(
            "  {:<8} rise {}  transit {}  set {}",
            body.name(),
            show(riset.rise),
            transit,
            show(riset.set)
        );
    }

    let phase = lunar_phase(t, &config)?;
    println!(
        "\nMoon: {} ({:.0}% lit), next full moon {}",
        phase.name,
        phase.illuminated_fraction * 100.0,
        phase.next_full_moon.utc_calendar()
    );

    println!("\nComing up:");
    for (kind, body) in [
        (EventKind::Opposition, Body::Mars),
        (EventKind::Conjunction, Body::Jupiter),
        (EventKind::MaxElongation, Body::Mercury),
        (EventKind::Perigee, Body::Moon),
        (EventKind::Aphelion, Body::Earth),
    ] {
        let event = search_next(kind, body, None, t, &config)?;
        println!("  {event}");
    }

    let year = seasons(&ts, 2024)?;
    println!("\nSeasons of 2024:");
    for season in Season::ALL {
        println!("  {:<18} {}", season.name(), year.get(season).utc_calendar());
    }

    Ok(())
}
