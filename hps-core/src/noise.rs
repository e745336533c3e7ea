//! # Noise Suppression Module
//!
//! Cleans a magnitude spectrum before pitch estimation. Two rules apply:
//! a fixed cutoff that zeroes every sub-audible bin (mains hum, DC), and
//! a per-octave-band threshold that zeroes bins falling below a fraction
//! of the band's RMS energy. The broadband noise floor differs between
//! frequency regions, so each band gets its own threshold.

use crate::config::TunerConfig;

/// Everything below this frequency is zeroed outright.
const HUM_CUTOFF_HZ: f32 = 62.0;

/// In-place spectrum cleaner with bin ranges precomputed from the config.
pub struct NoiseSuppressor {
    hum_bins: usize,
    /// Half-open bin ranges of the octave bands, clamped to the spectrum.
    bands: Vec<(usize, usize)>,
    threshold: f32,
}

impl NoiseSuppressor {
    pub fn new(config: &TunerConfig) -> Self {
        let bin_width = config.bin_width();
        let spectrum_len = config.spectrum_len();

        let hum_bins = ((HUM_CUTOFF_HZ / bin_width) as usize).min(spectrum_len);

        // A band whose upper edge runs past the spectrum is truncated; a
        // band starting past the spectrum contributes nothing.
        let bands = config
            .octave_bands
            .windows(2)
            .filter_map(|edges| {
                let start = (edges[0] / bin_width) as usize;
                let end = ((edges[1] / bin_width) as usize).min(spectrum_len);
                (start < end).then_some((start, end))
            })
            .collect();

        NoiseSuppressor {
            hum_bins,
            bands,
            threshold: config.white_noise_threshold,
        }
    }

    /// Zeroes hum bins and every bin below its octave band's noise floor.
    /// A bin survives only if its magnitude is strictly greater than
    /// `white_noise_threshold` times the band RMS.
    pub fn suppress(&self, spectrum: &mut [f32]) {
        for magnitude in &mut spectrum[..self.hum_bins] {
            *magnitude = 0.0;
        }

        for &(start, end) in &self.bands {
            let band = &mut spectrum[start..end];
            let energy: f32 = band.iter().map(|&m| m * m).sum();
            let rms = (energy / band.len() as f32).sqrt();
            let cutoff = self.threshold * rms;
            for magnitude in band.iter_mut() {
                if *magnitude <= cutoff {
                    *magnitude = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TunerConfig {
        // 1 Hz per bin, 512-bin spectrum.
        TunerConfig {
            sample_rate: 1024,
            window_size: 1024,
            step_size: 256,
            ..TunerConfig::default()
        }
    }

    #[test]
    fn hum_bins_are_zeroed() {
        let suppressor = NoiseSuppressor::new(&test_config());
        let mut spectrum = vec![1.0; 512];
        suppressor.suppress(&mut spectrum);
        assert!(spectrum[..62].iter().all(|&m| m == 0.0));
        assert!(spectrum[100] > 0.0);
    }

    #[test]
    fn quiet_bins_fall_below_their_band_floor() {
        let suppressor = NoiseSuppressor::new(&test_config());
        let mut spectrum = vec![0.0; 512];
        // One dominant bin in the 100..200 band surrounded by a low floor.
        for magnitude in &mut spectrum[100..200] {
            *magnitude = 0.1;
        }
        spectrum[150] = 10.0;
        suppressor.suppress(&mut spectrum);
        assert_eq!(spectrum[120], 0.0);
        assert_eq!(spectrum[150], 10.0);
    }

    #[test]
    fn final_band_is_clamped_to_the_spectrum() {
        // Default octave bands reach 25600 Hz, far past the 512-bin
        // spectrum of the test config. Suppression must not index past
        // the end.
        let suppressor = NoiseSuppressor::new(&test_config());
        let mut spectrum = vec![1.0; 512];
        suppressor.suppress(&mut spectrum);
        assert_eq!(spectrum.len(), 512);
    }

    #[test]
    fn uniform_band_survives_the_threshold() {
        // RMS of a flat band equals the bin magnitude, so with the
        // default 0.2 threshold every bin stays.
        let suppressor = NoiseSuppressor::new(&test_config());
        let mut spectrum = vec![2.0; 512];
        suppressor.suppress(&mut spectrum);
        assert!(spectrum[62..].iter().all(|&m| m == 2.0));
    }
}
