// hps-core/src/lib.rs

//! The core logic for the harmonic product spectrum note tuner.
//! This crate is responsible for audio capture, spectral analysis,
//! pitch estimation and note mapping. It is completely headless
//! and contains no display code.

pub mod audio;
pub mod config;
pub mod hps;
pub mod noise;
pub mod note;
pub mod pipeline;
pub mod spectrum;
pub mod stabilizer;
pub mod window;

/// One event delivered by the audio capture layer, once per step period.
#[derive(Debug, Clone)]
pub enum AudioEvent {
    /// A block of exactly `step_size` mono samples, roughly in [-1, 1].
    Block(Vec<f32>),
    /// The audio layer reported a stream error instead of data.
    DeviceError(String),
}

/// A stabilized note detection, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteReading {
    /// Note name, e.g. "LA" or "Fa#".
    pub name: String,
    /// Octave number; the concert pitch sits in octave 4.
    pub octave: i32,
    /// The measured fundamental frequency in Hz, rounded to 0.1 Hz.
    pub measured_hz: f32,
    /// The equal-tempered reference frequency of the note in Hz,
    /// rounded to 0.1 Hz.
    pub reference_hz: f32,
}

/// The result of a single analysis cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The recent detections agree on this note.
    Note(NoteReading),
    /// Signal power was below the tuning threshold.
    Silence,
    /// A note was detected but the recent detections disagree. Rendered
    /// as a blank label, not as silence.
    Unstable,
    /// The audio layer reported an error; this cycle was skipped.
    Error(String),
}
