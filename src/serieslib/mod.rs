//! Periodic series evaluation
//!
//! A series is a list of [`Term`]s, each contributing `A cos(B + C·τ)`.
//! Analytic theories group several series into power blocks,
//! `S(τ) = Σₖ τᵏ Sₖ(τ)`, which [`PowerSeries`] evaluates together with its
//! exact time derivative.
//!
//! Summation always runs in table order, block by block, so two evaluations
//! at the same argument are bit-identical.

/// One periodic term: amplitude, phase (radians) and frequency (radians per
/// unit of the series time argument).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub amplitude: f64,
    pub phase: f64,
    pub frequency: f64,
}

impl Term {
    pub const fn new(amplitude: f64, phase: f64, frequency: f64) -> Self {
        Term {
            amplitude,
            phase,
            frequency,
        }
    }
}

/// Sum `A cos(B + C·τ)` over `terms` in table order.
pub fn evaluate(terms: &[Term], tau: f64) -> f64 {
    terms
        .iter()
        .fold(0.0, |sum, t| sum + t.amplitude * (t.phase + t.frequency * tau).cos())
}

/// Sum `d/dτ [A cos(B + C·τ)] = -A C sin(B + C·τ)` over `terms` in table order.
pub fn evaluate_rate(terms: &[Term], tau: f64) -> f64 {
    terms.iter().fold(0.0, |sum, t| {
        sum - t.amplitude * t.frequency * (t.phase + t.frequency * tau).sin()
    })
}

/// A term whose amplitude and angle were evaluated elsewhere, each with its
/// time derivative.
///
/// Theories whose arguments are polynomials in time, or whose amplitudes
/// depend on time, do not fit the `A cos(B + C·τ)` shape of [`Term`]; they
/// evaluate each argument first and sum the results here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    pub amplitude: f64,
    pub amplitude_rate: f64,
    /// Radians
    pub angle: f64,
    /// Radians per unit time
    pub angle_rate: f64,
}

/// `Σ A sin θ` and its derivative, summed in iteration order.
pub fn sum_sines<I>(terms: I) -> (f64, f64)
where
    I: IntoIterator<Item = Harmonic>,
{
    terms.into_iter().fold((0.0, 0.0), |(value, rate), h| {
        let (s, c) = h.angle.sin_cos();
        (
            value + h.amplitude * s,
            rate + h.amplitude_rate * s + h.amplitude * c * h.angle_rate,
        )
    })
}

/// `Σ A cos θ` and its derivative, summed in iteration order.
pub fn sum_cosines<I>(terms: I) -> (f64, f64)
where
    I: IntoIterator<Item = Harmonic>,
{
    terms.into_iter().fold((0.0, 0.0), |(value, rate), h| {
        let (s, c) = h.angle.sin_cos();
        (
            value + h.amplitude * c,
            rate + h.amplitude_rate * c - h.amplitude * s * h.angle_rate,
        )
    })
}

/// A polynomial in τ whose coefficients are periodic series.
#[derive(Debug, Clone, Copy)]
pub struct PowerSeries<'a> {
    blocks: &'a [&'a [Term]],
}

impl<'a> PowerSeries<'a> {
    pub const fn new(blocks: &'a [&'a [Term]]) -> Self {
        PowerSeries { blocks }
    }

    /// Number of terms across all blocks
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of the series at `tau`
    pub fn value(&self, tau: f64) -> f64 {
        self.value_and_rate(tau).0
    }

    /// Value and derivative with respect to `tau`, both analytic.
    ///
    /// d/dτ Σ τᵏ Sₖ = Σ (k τᵏ⁻¹ Sₖ + τᵏ Sₖ')
    pub fn value_and_rate(&self, tau: f64) -> (f64, f64) {
        let mut value = 0.0;
        let mut rate = 0.0;
        let mut power = 1.0;
        let mut previous_power = 0.0;
        for (k, block) in self.blocks.iter().enumerate() {
            let s = evaluate(block, tau);
            let ds = evaluate_rate(block, tau);
            value += power * s;
            rate += k as f64 * previous_power * s + power * ds;
            previous_power = power;
            power *= tau;
        }
        (value, rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CONSTANT: &[Term] = &[Term::new(2.0, 0.0, 0.0)];
    const WAVE: &[Term] = &[Term::new(1.0, 0.5, 3.0), Term::new(0.25, 1.0, 7.0)];

    #[test]
    fn test_constant_term() {
        assert_eq!(evaluate(CONSTANT, 123.0), 2.0);
        assert_eq!(evaluate_rate(CONSTANT, 123.0), 0.0);
    }

    #[test]
    fn test_single_term_value() {
        let tau: f64 = 0.2;
        let expected = (0.5 + 3.0 * tau).cos() + 0.25 * (1.0 + 7.0 * tau).cos();
        assert_relative_eq!(evaluate(WAVE, tau), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_power_series_polynomial() {
        // 2 + 2τ + 2τ²
        let blocks: &[&[Term]] = &[CONSTANT, CONSTANT, CONSTANT];
        let series = PowerSeries::new(blocks);
        let (v, r) = series.value_and_rate(0.5);
        assert_relative_eq!(v, 2.0 + 1.0 + 0.5, epsilon = 1e-15);
        assert_relative_eq!(r, 2.0 + 4.0 * 0.5, epsilon = 1e-15);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_rate_matches_central_difference() {
        let blocks: &[&[Term]] = &[WAVE, WAVE, CONSTANT];
        let series = PowerSeries::new(blocks);
        let tau = 0.37;
        let h = 1e-6;
        let numeric = (series.value(tau + h) - series.value(tau - h)) / (2.0 * h);
        let (_, analytic) = series.value_and_rate(tau);
        assert_relative_eq!(analytic, numeric, epsilon = 1e-7);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let blocks: &[&[Term]] = &[WAVE, WAVE];
        let series = PowerSeries::new(blocks);
        let a = series.value_and_rate(-1.234_567);
        let b = series.value_and_rate(-1.234_567);
        assert_eq!(a.0.to_bits(), b.0.to_bits());
        assert_eq!(a.1.to_bits(), b.1.to_bits());
    }

    #[test]
    fn test_harmonic_sums_match_terms() {
        // A cos(B + Cτ) written as a harmonic at a fixed τ
        let tau = 0.3;
        let harmonics = WAVE.iter().map(|t| Harmonic {
            amplitude: t.amplitude,
            amplitude_rate: 0.0,
            angle: t.phase + t.frequency * tau,
            angle_rate: t.frequency,
        });
        let (value, rate) = sum_cosines(harmonics.clone());
        assert_relative_eq!(value, evaluate(WAVE, tau), epsilon = 1e-15);
        assert_relative_eq!(rate, evaluate_rate(WAVE, tau), epsilon = 1e-14);

        let (sines, _) = sum_sines(harmonics.map(|h| Harmonic {
            angle: h.angle + std::f64::consts::FRAC_PI_2,
            ..h
        }));
        assert_relative_eq!(sines, value, epsilon = 1e-14);
    }

    #[test]
    fn test_harmonic_amplitude_rate() {
        // d/dt (t sin t) = sin t + t cos t
        let t = 0.7_f64;
        let (value, rate) = sum_sines([Harmonic {
            amplitude: t,
            amplitude_rate: 1.0,
            angle: t,
            angle_rate: 1.0,
        }]);
        assert_relative_eq!(value, t * t.sin(), epsilon = 1e-15);
        assert_relative_eq!(rate, t.sin() + t * t.cos(), epsilon = 1e-15);
    }
}
