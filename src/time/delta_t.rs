//! Delta-T (TT - UT1) models
//!
//! The default model is the piecewise polynomial fit of Espenak and Meeus
//! (NASA eclipse predictions, 2006), which covers every year: the historical
//! segments from -500 to 2050, a blend into the Morrison-Stephenson long-term
//! parabola up to 2150, and the bare parabola outside. A fixed offset model is
//! available for callers that want "UTC = TT + constant" semantics.

/// Julian date of the reference used to turn a JD into a decimal year
const YEAR_REFERENCE_JD: f64 = 2_451_545.0;

/// Mean length of the year used for the decimal-year conversion
const DAYS_PER_YEAR: f64 = 365.25;

/// Long-term parabola centred on 1820 (Morrison & Stephenson 2004)
fn long_term_parabola(year: f64) -> f64 {
    let u = (year - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// Evaluate a polynomial with coefficients in ascending powers
fn poly(t: f64, coeffs: &[f64]) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}

/// Espenak-Meeus delta-T in seconds for a decimal year
fn espenak_meeus(year: f64) -> f64 {
    if year < -500.0 {
        return long_term_parabola(year);
    }
    if year < 500.0 {
        return poly(
            year / 100.0,
            &[
                10583.6,
                -1014.41,
                33.78311,
                -5.952053,
                -0.1798452,
                0.022174192,
                0.0090316521,
            ],
        );
    }
    if year < 1600.0 {
        return poly(
            (year - 1000.0) / 100.0,
            &[
                1574.2,
                -556.01,
                71.23472,
                0.319781,
                -0.8503463,
                -0.005050998,
                0.0083572073,
            ],
        );
    }
    if year < 1700.0 {
        return poly(year - 1600.0, &[120.0, -0.9808, -0.01532, 1.0 / 7129.0]);
    }
    if year < 1800.0 {
        return poly(
            year - 1700.0,
            &[8.83, 0.1603, -0.0059285, 0.00013336, -1.0 / 1_174_000.0],
        );
    }
    if year < 1860.0 {
        return poly(
            year - 1800.0,
            &[
                13.72,
                -0.332447,
                0.0068612,
                0.0041116,
                -0.00037436,
                0.0000121272,
                -0.0000001699,
                0.000000000875,
            ],
        );
    }
    if year < 1900.0 {
        return poly(
            year - 1860.0,
            &[
                7.62,
                0.5737,
                -0.251754,
                0.01680668,
                -0.0004473624,
                1.0 / 233_174.0,
            ],
        );
    }
    if year < 1920.0 {
        return poly(
            year - 1900.0,
            &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197],
        );
    }
    if year < 1941.0 {
        return poly(year - 1920.0, &[21.20, 0.84493, -0.076100, 0.0020936]);
    }
    if year < 1961.0 {
        return poly(year - 1950.0, &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0]);
    }
    if year < 1986.0 {
        return poly(year - 1975.0, &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0]);
    }
    if year < 2005.0 {
        return poly(
            year - 2000.0,
            &[
                63.86,
                0.3345,
                -0.060374,
                0.0017275,
                0.000651814,
                0.00002373599,
            ],
        );
    }
    if year < 2050.0 {
        return poly(year - 2000.0, &[62.92, 0.32217, 0.005589]);
    }
    if year < 2150.0 {
        return long_term_parabola(year) - 0.5628 * (2150.0 - year);
    }
    long_term_parabola(year)
}

/// Model for the difference TT - UT1
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeltaT {
    /// Espenak-Meeus piecewise polynomials
    #[default]
    EspenakMeeus,
    /// A constant offset in seconds, for all dates
    Fixed(f64),
}

impl DeltaT {
    /// Build the default model
    pub fn new() -> Self {
        DeltaT::EspenakMeeus
    }

    /// Compute delta-T in seconds for a given Julian date
    ///
    /// Either TT or UT1 may be passed; the two differ by well under a day,
    /// far below the resolution of the model.
    pub fn compute(&self, jd: f64) -> f64 {
        let year = 2000.0 + (jd - YEAR_REFERENCE_JD) / DAYS_PER_YEAR;
        self.compute_for_year(year)
    }

    /// Compute delta-T in seconds for a decimal year
    pub fn compute_for_year(&self, year: f64) -> f64 {
        match *self {
            DeltaT::EspenakMeeus => espenak_meeus(year),
            DeltaT::Fixed(seconds) => seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parabola_at_known_points() {
        assert_relative_eq!(long_term_parabola(1820.0), -20.0, epsilon = 1e-10);
        assert_relative_eq!(long_term_parabola(1920.0), 12.0, epsilon = 1e-10);
    }

    #[test]
    fn test_delta_t_j2000() {
        let dt = DeltaT::new();
        assert_relative_eq!(dt.compute_for_year(2000.0), 63.86, epsilon = 1e-9);
        assert_relative_eq!(dt.compute(2_451_545.0), 63.86, epsilon = 1e-9);
    }

    #[test]
    fn test_delta_t_recent() {
        let val = DeltaT::new().compute_for_year(2015.0);
        assert!((66.0..=70.0).contains(&val), "delta_t(2015) = {val}");
        let val = DeltaT::new().compute_for_year(2024.2);
        assert!((68.0..=76.0).contains(&val), "delta_t(2024) = {val}");
    }

    #[test]
    fn test_delta_t_historical() {
        let val = DeltaT::new().compute_for_year(1900.0);
        assert!((-6.0..=0.0).contains(&val), "delta_t(1900) = {val}");
        let val = DeltaT::new().compute_for_year(1700.0);
        assert!((5.0..=12.0).contains(&val), "delta_t(1700) = {val}");
    }

    #[test]
    fn test_segments_nearly_continuous() {
        let dt = DeltaT::new();
        for &boundary in &[
            1600.0, 1700.0, 1800.0, 1860.0, 1900.0, 1920.0, 1941.0, 1961.0, 1986.0, 2005.0, 2050.0,
            2150.0,
        ] {
            let left = dt.compute_for_year(boundary - 1e-6);
            let right = dt.compute_for_year(boundary + 1e-6);
            assert!(
                (left - right).abs() < 2.0,
                "jump of {} s at {boundary}",
                left - right
            );
        }
    }

    #[test]
    fn test_delta_t_far_past_and_future() {
        let dt = DeltaT::new();
        assert!(dt.compute_for_year(-2000.0) > 10000.0);
        assert!(dt.compute_for_year(5000.0) > 1000.0);
    }

    #[test]
    fn test_fixed_model() {
        let dt = DeltaT::Fixed(69.184);
        assert_eq!(dt.compute(2_000_000.0), 69.184);
        assert_eq!(dt.compute_for_year(3000.0), 69.184);
    }
}
