//! # Note Mapping Module
//!
//! Equal-tempered note calculations relative to a configurable concert
//! pitch. A note is identified by its signed semitone offset from the
//! concert pitch; name and octave fall out of that offset.

/// The nearest equal-tempered note to a measured frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// Signed semitone offset from the concert pitch (0 is the concert
    /// pitch itself).
    pub semitone: i32,
}

impl Note {
    /// Maps a frequency onto the nearest equal-tempered note.
    ///
    /// `frequency` must be positive; the pitch estimator never reports a
    /// zero or negative frequency.
    pub fn from_frequency(frequency: f32, concert_pitch: f32) -> Note {
        let semitone = (12.0 * (frequency / concert_pitch).log2()).round() as i32;
        Note { semitone }
    }

    /// Index of this note's name in the twelve-entry chromatic table.
    /// Euclidean remainder keeps the index non-negative below the
    /// concert pitch.
    pub fn name_index(&self) -> usize {
        self.semitone.rem_euclid(12) as usize
    }

    /// Octave number; the concert pitch sits in octave 4 and the octave
    /// increments three semitones above it.
    pub fn octave(&self) -> i32 {
        4 + (self.semitone + 9).div_euclid(12)
    }

    /// The equal-tempered reference frequency of this note in Hz.
    pub fn reference_pitch(&self, concert_pitch: f32) -> f32 {
        concert_pitch * 2.0_f32.powf(self.semitone as f32 / 12.0)
    }
}
