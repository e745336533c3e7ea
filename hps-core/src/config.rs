//! # Tuner Configuration Module
//!
//! All tunable constants of the analysis pipeline, fixed at startup.
//! The defaults match the reference behavior of the tuner; a config
//! can also be deserialized from a JSON file, with missing fields
//! falling back to the defaults.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Immutable set of tunables for the whole pipeline.
///
/// A config must pass [`TunerConfig::validate`] before any pipeline
/// component is built from it; the derived bin math assumes a valid
/// window/step relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    /// Sample frequency in Hz.
    pub sample_rate: u32,
    /// Window size of the DFT in samples.
    pub window_size: usize,
    /// Step size of the window in samples; one analysis cycle runs per step.
    pub step_size: usize,
    /// Max number of harmonic product spectrums.
    pub num_harmonics: usize,
    /// Tuning is activated once the signal power exceeds this threshold.
    pub power_threshold: f32,
    /// Frequency of the reference pitch (octave 4 keynote) in Hz.
    pub concert_pitch: f32,
    /// Spectrum bins below this fraction of their octave band's RMS
    /// energy are cut off.
    pub white_noise_threshold: f32,
    /// Edge frequencies of the octave bands used for local noise-floor
    /// estimation, strictly increasing.
    pub octave_bands: Vec<f32>,
    /// The twelve chromatic note names, starting at the concert pitch.
    pub note_names: Vec<String>,
    /// Number of consecutive agreeing detections required before a note
    /// is emitted.
    pub stability_depth: usize,
}

impl Default for TunerConfig {
    fn default() -> Self {
        TunerConfig {
            sample_rate: 48000,
            window_size: 48000,
            step_size: 12000,
            num_harmonics: 5,
            power_threshold: 1e-6,
            concert_pitch: 440.0,
            white_noise_threshold: 0.2,
            octave_bands: vec![
                50.0, 100.0, 200.0, 400.0, 800.0, 1600.0, 3200.0, 6400.0, 12800.0, 25600.0,
            ],
            note_names: [
                "LA", "LA#", "Si", "Do", "Do#", "Re", "Re#", "Mi", "Fa", "Fa#", "Sol", "Sol#",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            stability_depth: 2,
        }
    }
}

impl TunerConfig {
    /// Checks the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.sample_rate > 0, "sample rate must be positive");
        ensure!(
            self.window_size > 0 && self.window_size % 2 == 0,
            "window size must be positive and even"
        );
        ensure!(
            self.step_size > 0 && self.step_size <= self.window_size,
            "step size must be positive and no larger than the window size"
        );
        ensure!(self.num_harmonics >= 1, "at least one harmonic is required");
        ensure!(self.power_threshold > 0.0, "power threshold must be positive");
        ensure!(self.concert_pitch > 0.0, "concert pitch must be positive");
        ensure!(
            self.white_noise_threshold >= 0.0,
            "white noise threshold must not be negative"
        );
        ensure!(
            self.octave_bands.len() >= 2,
            "at least one octave band (two edges) is required"
        );
        ensure!(
            self.octave_bands.windows(2).all(|pair| pair[0] < pair[1]),
            "octave band edges must be strictly increasing"
        );
        ensure!(
            self.note_names.len() == 12,
            "exactly twelve chromatic note names are required"
        );
        ensure!(self.stability_depth >= 1, "stability depth must be at least 1");
        Ok(())
    }

    /// Frequency step width between two spectrum bins in Hz.
    pub fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.window_size as f32
    }

    /// Number of bins in the magnitude spectrum (up to Nyquist).
    pub fn spectrum_len(&self) -> usize {
        self.window_size / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        TunerConfig::default().validate().unwrap();
    }

    #[test]
    fn default_bin_width_is_one_hz() {
        let config = TunerConfig::default();
        assert_eq!(config.bin_width(), 1.0);
        assert_eq!(config.spectrum_len(), 24000);
    }

    #[test]
    fn rejects_step_larger_than_window() {
        let config = TunerConfig {
            window_size: 1024,
            step_size: 2048,
            ..TunerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unsorted_octave_bands() {
        let config = TunerConfig {
            octave_bands: vec![50.0, 200.0, 100.0],
            ..TunerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_wrong_note_name_count() {
        let config = TunerConfig {
            note_names: vec!["LA".to_string()],
            ..TunerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
