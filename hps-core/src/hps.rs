//! # Harmonic Product Spectrum Module
//!
//! Estimates the fundamental frequency of a cleaned magnitude spectrum.
//! The harmonics of a true fundamental coincide when the spectrum is
//! downsampled by integer factors, while spurious peaks do not, so
//! multiplying the decimated copies together reinforces the fundamental
//! and suppresses the rest.
//!
//! All work buffers are sized once at construction to the interpolated
//! spectrum length, so an estimation cycle performs no allocation.

use crate::config::TunerConfig;

/// A fundamental-frequency estimate for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    /// Estimated fundamental frequency in Hz.
    pub frequency: f32,
    /// Index of the winning bin in the interpolated product spectrum.
    pub bin: usize,
}

/// Harmonic product spectrum estimator over a fixed spectrum length.
pub struct HpsEstimator {
    num_harmonics: usize,
    bin_width: f32,
    interpolated: Vec<f32>,
    product: Vec<f32>,
    scratch: Vec<f32>,
}

impl HpsEstimator {
    pub fn new(config: &TunerConfig) -> Self {
        let len = config.spectrum_len() * config.num_harmonics;
        HpsEstimator {
            num_harmonics: config.num_harmonics,
            bin_width: config.bin_width(),
            interpolated: vec![0.0; len],
            product: vec![0.0; len],
            scratch: vec![0.0; len],
        }
    }

    /// Estimates the fundamental frequency of `spectrum`.
    ///
    /// Returns `None` when the spectrum carries no signal at all (zero
    /// norm after noise suppression, or no resolvable peak). Under a
    /// normal configuration the silence gate fires long before that, so
    /// callers treat `None` as silence rather than an error.
    pub fn estimate(&mut self, spectrum: &[f32]) -> Option<PitchEstimate> {
        let n = self.num_harmonics;
        let len = spectrum.len() * n;
        assert_eq!(
            len,
            self.interpolated.len(),
            "spectrum length must match the configured spectrum length"
        );

        // Resample onto an n-times finer grid so the decimations below
        // always land on a grid point. Past the last source bin the
        // value is clamped.
        for (k, slot) in self.interpolated.iter_mut().enumerate() {
            let x = k as f32 / n as f32;
            let i = x as usize;
            *slot = if i + 1 < spectrum.len() {
                let frac = x - i as f32;
                spectrum[i] + frac * (spectrum[i + 1] - spectrum[i])
            } else {
                spectrum[spectrum.len() - 1]
            };
        }

        let norm = self
            .interpolated
            .iter()
            .map(|&v| v * v)
            .sum::<f32>()
            .sqrt();
        if norm == 0.0 {
            return None;
        }
        for value in &mut self.interpolated {
            *value /= norm;
        }

        // Multiply in one decimated copy per harmonic, truncating the
        // running product to the decimated length. An identically zero
        // candidate means that harmonic carries no signal; folding it in
        // would wipe out the whole product, so the loop stops with the
        // product accumulated so far.
        self.product.copy_from_slice(&self.interpolated);
        let mut product_len = len;
        for harmonic in 1..=n {
            let decimated_len = len.div_ceil(harmonic);
            let mut all_zero = true;
            for j in 0..decimated_len {
                let value = self.product[j] * self.interpolated[j * harmonic];
                self.scratch[j] = value;
                if value != 0.0 {
                    all_zero = false;
                }
            }
            if all_zero {
                break;
            }
            self.product[..decimated_len].copy_from_slice(&self.scratch[..decimated_len]);
            product_len = decimated_len;
        }

        let (bin, &peak) = self.product[..product_len]
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))?;
        if bin == 0 || peak <= 0.0 {
            return None;
        }

        Some(PitchEstimate {
            frequency: bin as f32 * self.bin_width / n as f32,
            bin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TunerConfig {
        // 1 Hz per bin, 512-bin spectrum, three harmonics.
        TunerConfig {
            sample_rate: 1024,
            window_size: 1024,
            step_size: 256,
            num_harmonics: 3,
            ..TunerConfig::default()
        }
    }

    #[test]
    fn harmonic_stack_reinforces_the_fundamental() {
        let mut estimator = HpsEstimator::new(&test_config());
        let mut spectrum = vec![0.0; 512];
        // Fundamental at 80 Hz with harmonics at 160 and 240 Hz; the
        // second harmonic is the loudest single peak.
        spectrum[80] = 0.8;
        spectrum[160] = 1.0;
        spectrum[240] = 0.6;

        let estimate = estimator.estimate(&spectrum).unwrap();
        assert!((estimate.frequency - 80.0).abs() < 1.0);
    }

    #[test]
    fn empty_spectrum_yields_no_estimate() {
        let mut estimator = HpsEstimator::new(&test_config());
        let spectrum = vec![0.0; 512];
        assert_eq!(estimator.estimate(&spectrum), None);
    }

    #[test]
    fn single_peak_survives_the_zero_product_abort() {
        let mut estimator = HpsEstimator::new(&test_config());
        let mut spectrum = vec![0.0; 512];
        // A lone 400 Hz peak has no energy at 800 or 1200 Hz, so the
        // higher-harmonic products are identically zero and the loop
        // must keep the squared spectrum instead of erasing it.
        spectrum[400] = 1.0;

        let estimate = estimator.estimate(&spectrum).unwrap();
        assert!((estimate.frequency - 400.0).abs() < 1.0);
    }
}
