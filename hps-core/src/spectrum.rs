//! # Spectral Estimation Module
//!
//! This module computes the magnitude spectrum of one analysis window.
//! It applies a Hann window to reduce spectral leakage and runs a single
//! forward FFT per cycle using RustFFT.
//!
//! The FFT plan, the complex work buffer and the magnitude buffer are
//! all allocated once at construction; an estimation cycle performs no
//! heap allocation and must fit comfortably inside one step period.

use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// Computes magnitude spectra over a fixed window length.
pub struct SpectralEstimator {
    fft: Arc<dyn Fft<f32>>,
    hann: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectralEstimator {
    pub fn new(window_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(window_size);
        let scratch_len = fft.get_inplace_scratch_len();
        SpectralEstimator {
            hann: hann_window(window_size),
            fft_buffer: vec![Complex::new(0.0, 0.0); window_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            magnitudes: vec![0.0; window_size / 2],
            fft,
        }
    }

    /// Computes the magnitude spectrum of `window`.
    ///
    /// Returns the first half of the FFT, one non-negative magnitude per
    /// frequency bin; bin `i` corresponds to `i * sample_rate / window_size`
    /// Hz. The returned slice is mutable so the noise suppression stage can
    /// clean it in place.
    ///
    /// # Panics
    /// If `window.len()` does not match the configured window size.
    pub fn magnitudes(&mut self, window: &[f32]) -> &mut [f32] {
        assert_eq!(
            window.len(),
            self.fft_buffer.len(),
            "analysis window length must equal the configured window size"
        );

        for (slot, (&sample, &weight)) in self
            .fft_buffer
            .iter_mut()
            .zip(window.iter().zip(self.hann.iter()))
        {
            *slot = Complex::new(sample * weight, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.fft_buffer, &mut self.scratch);

        for (magnitude, bin) in self.magnitudes.iter_mut().zip(self.fft_buffer.iter()) {
            *magnitude = bin.norm(); // .norm() is sqrt(re^2 + im^2)
        }
        &mut self.magnitudes
    }
}

/// Precomputes a raised-cosine (Hann) window of length `n`.
fn hann_window(n: usize) -> Vec<f32> {
    let n_minus_1 = (n - 1) as f32;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n_minus_1).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn spectrum_length_is_half_the_window() {
        let mut estimator = SpectralEstimator::new(1024);
        let window = vec![0.0; 1024];
        assert_eq!(estimator.magnitudes(&window).len(), 512);
    }

    #[test]
    fn magnitudes_are_non_negative() {
        let mut estimator = SpectralEstimator::new(256);
        let window: Vec<f32> = (0..256).map(|i| (i as f32 * 0.37).sin() - 0.2).collect();
        assert!(estimator.magnitudes(&window).iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn pure_sine_peaks_at_its_bin() {
        const WINDOW: usize = 1024;
        let mut estimator = SpectralEstimator::new(WINDOW);
        // 100 cycles per window lands exactly on bin 100.
        let window: Vec<f32> = (0..WINDOW)
            .map(|i| (2.0 * PI * 100.0 * i as f32 / WINDOW as f32).sin())
            .collect();

        let spectrum = estimator.magnitudes(&window);
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 100);
    }

    #[test]
    fn hann_window_tapers_to_zero_at_the_edges() {
        let hann = hann_window(512);
        assert!(hann[0].abs() < 1e-6);
        assert!(hann[511].abs() < 1e-6);
        assert!((hann[256] - 1.0).abs() < 1e-3);
    }
}
