//! Proleptic Gregorian calendar <-> Julian date conversion

use crate::errors::{AlmagestError, Result};

/// Convert a Julian day number to a calendar date (year, month, day)
///
/// Always proleptic Gregorian. Explanatory Supplement to the Astronomical
/// Almanac, 15.11, in floor-division form so negative years work.
pub fn compute_calendar_date(jd_integer: i64) -> (i32, u32, u32) {
    let f = jd_integer + 1401 + ((4 * jd_integer + 274_277).div_euclid(146_097) * 3).div_euclid(4)
        - 38;
    let e = 4 * f + 3;
    let g = e.rem_euclid(1461).div_euclid(4);
    let h = 5 * g + 2;
    let day = h.rem_euclid(153).div_euclid(5) + 1;
    let month = (h.div_euclid(153) + 2).rem_euclid(12) + 1;
    let year = e.div_euclid(1461) - 4716 + (12 + 2 - month).div_euclid(12);

    (year as i32, month as u32, day as u32)
}

/// Convert (year, month, day) to the Julian day number of that date's noon
pub fn compute_julian_day(year: i32, month: u32, day: u32) -> i64 {
    let (y, m, d) = (year as i64, month as i64, day as i64);
    let janfeb = if m < 3 { 1 } else { 0 };
    (1461 * (y + 4800 - janfeb)).div_euclid(4) + (367 * (m - 2 + 12 * janfeb)).div_euclid(12)
        - (3 * (y + 4900 - janfeb).div_euclid(100)).div_euclid(4)
        - 32075
        + d
}

/// Convert a calendar instant to a Julian date.
///
/// Seconds may be fractional. Fields are validated, and a day that does not
/// exist in the month is an `InvalidDate`.
pub fn compute_julian_date(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
) -> Result<f64> {
    if !(1..=12).contains(&month) {
        return Err(AlmagestError::InvalidDate(format!("month {month}")));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(AlmagestError::InvalidDate(format!(
            "day {day} of {year}-{month:02}"
        )));
    }
    if hour > 24 || minute > 59 || !(0.0..61.0).contains(&second) {
        return Err(AlmagestError::InvalidDate(format!(
            "time {hour:02}:{minute:02}:{second}"
        )));
    }
    let jd_noon = compute_julian_day(year, month, day) as f64;
    let day_fraction = (hour as f64 + (minute as f64 + second / 60.0) / 60.0) / 24.0;
    Ok(jd_noon - 0.5 + day_fraction)
}

/// Split a Julian date into calendar fields (year, month, day, hour, minute, second)
pub fn calendar_tuple_from_jd(jd: f64) -> (i32, u32, u32, u32, u32, f64) {
    let shifted = jd + 0.5;
    let whole = shifted.floor();
    let mut seconds = (shifted - whole) * 86_400.0;
    let mut jd_integer = whole as i64;
    // A fraction within rounding of a full day belongs to the next date
    if seconds >= 86_400.0 - 1e-6 {
        seconds = 0.0;
        jd_integer += 1;
    }
    let (year, month, day) = compute_calendar_date(jd_integer);
    let hour = (seconds / 3600.0).floor();
    let minute = ((seconds - hour * 3600.0) / 60.0).floor();
    let second = seconds - hour * 3600.0 - minute * 60.0;
    (year, month, day, hour as u32, minute as u32, second)
}

/// Whether a proleptic Gregorian year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a month of a proleptic Gregorian year
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_julian_day_conversion() {
        assert_eq!(compute_julian_day(2000, 1, 1), 2451545);
        assert_eq!(compute_julian_day(2020, 1, 1), 2458850);
        assert_eq!(compute_julian_day(1969, 7, 20), 2440423);
        assert_eq!(compute_julian_day(1900, 1, 1), 2415021);
    }

    #[test]
    fn test_calendar_date_conversion() {
        assert_eq!(compute_calendar_date(2451545), (2000, 1, 1));
        assert_eq!(compute_calendar_date(2458850), (2020, 1, 1));
        assert_eq!(compute_calendar_date(2440423), (1969, 7, 20));
        assert_eq!(compute_calendar_date(2415021), (1900, 1, 1));
    }

    #[test]
    fn test_negative_years_round_trip() {
        for &(y, m, d) in &[(-1000, 3, 1), (-4712, 1, 1), (0, 2, 29), (-1, 12, 31)] {
            let jd = compute_julian_day(y, m, d);
            assert_eq!(compute_calendar_date(jd), (y, m, d));
        }
    }

    #[test]
    fn test_julian_date_conversion() {
        assert_eq!(compute_julian_date(2000, 1, 1, 0, 0, 0.0).unwrap(), 2451544.5);
        assert_eq!(compute_julian_date(2000, 1, 1, 12, 0, 0.0).unwrap(), 2451545.0);
        assert_eq!(compute_julian_date(1969, 7, 20, 0, 0, 0.0).unwrap(), 2440422.5);
    }

    #[test]
    fn test_invalid_dates_rejected() {
        assert!(compute_julian_date(2023, 2, 29, 0, 0, 0.0).is_err());
        assert!(compute_julian_date(2024, 13, 1, 0, 0, 0.0).is_err());
        assert!(compute_julian_date(2024, 4, 31, 0, 0, 0.0).is_err());
        assert!(compute_julian_date(2024, 2, 29, 0, 0, 0.0).is_ok());
    }

    #[test]
    fn test_calendar_tuple_from_jd() {
        let (y, mo, d, h, mi, s) = calendar_tuple_from_jd(2451545.25);
        assert_eq!((y, mo, d, h, mi), (2000, 1, 1, 18, 0));
        assert_relative_eq!(s, 0.0, epsilon = 1e-4);
    }
}
