//! # Analysis Pipeline Module
//!
//! The cycle controller. One `Pipeline` owns every piece of per-stream
//! state (sample window, FFT buffers, detection history) and turns each
//! incoming audio block into exactly one [`Output`]. Everything here is
//! synchronous bounded-time arithmetic; the per-cycle cost is dominated
//! by the single FFT and must stay well under one step period.

use anyhow::Result;

use crate::config::TunerConfig;
use crate::hps::HpsEstimator;
use crate::noise::NoiseSuppressor;
use crate::note::Note;
use crate::spectrum::SpectralEstimator;
use crate::stabilizer::Stabilizer;
use crate::window::SlidingWindow;
use crate::{AudioEvent, NoteReading, Output};

/// Streaming pitch-detection pipeline.
pub struct Pipeline {
    config: TunerConfig,
    window: SlidingWindow,
    estimator: SpectralEstimator,
    suppressor: NoiseSuppressor,
    hps: HpsEstimator,
    stabilizer: Stabilizer,
}

impl Pipeline {
    /// Builds a pipeline after validating the configuration. All work
    /// buffers are allocated here, none per cycle.
    pub fn new(config: TunerConfig) -> Result<Pipeline> {
        config.validate()?;
        Ok(Pipeline {
            window: SlidingWindow::new(config.window_size, config.step_size),
            estimator: SpectralEstimator::new(config.window_size),
            suppressor: NoiseSuppressor::new(&config),
            hps: HpsEstimator::new(&config),
            stabilizer: Stabilizer::new(config.stability_depth),
            config,
        })
    }

    /// Turns one audio-layer event into this cycle's output. A device
    /// error skips the cycle and is surfaced as [`Output::Error`]; the
    /// stream then simply continues with the next block.
    pub fn handle_event(&mut self, event: AudioEvent) -> Output {
        match event {
            AudioEvent::Block(block) => self.process_block(&block),
            AudioEvent::DeviceError(message) => Output::Error(message),
        }
    }

    /// Runs one full analysis cycle over a block of `step_size` samples.
    ///
    /// # Panics
    /// If the block length does not match the configured step size; see
    /// [`SlidingWindow::ingest`].
    pub fn process_block(&mut self, block: &[f32]) -> Output {
        self.window.ingest(block);

        // Too quiet to tune. Short-circuit the whole cycle and leave the
        // detection history alone: silence is the absence of a note, not
        // a disagreeing one.
        if self.window.power() < self.config.power_threshold {
            return Output::Silence;
        }

        let spectrum = self.estimator.magnitudes(self.window.samples());
        self.suppressor.suppress(spectrum);

        let Some(estimate) = self.hps.estimate(spectrum) else {
            return Output::Silence;
        };

        let note = Note::from_frequency(estimate.frequency, self.config.concert_pitch);
        if !self.stabilizer.update(note) {
            return Output::Unstable;
        }

        Output::Note(NoteReading {
            name: self.config.note_names[note.name_index()].clone(),
            octave: note.octave(),
            measured_hz: round_tenth(estimate.frequency),
            reference_hz: round_tenth(note.reference_pitch(self.config.concert_pitch)),
        })
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &TunerConfig {
        &self.config
    }
}

/// Display rounding, 0.1 Hz.
fn round_tenth(hz: f32) -> f32 {
    (hz * 10.0).round() / 10.0
}
