//! # Sliding Window Module
//!
//! Maintains the most recent `window_size` samples of the input stream.
//! Each incoming block of `step_size` samples displaces the oldest
//! `step_size` samples in place, so no allocation happens per cycle.

/// FIFO buffer over the most recent `window_size` samples.
pub struct SlidingWindow {
    samples: Vec<f32>,
    step: usize,
}

impl SlidingWindow {
    /// Creates a window of `window_size` zeros that advances by
    /// `step_size` samples per ingested block.
    pub fn new(window_size: usize, step_size: usize) -> Self {
        debug_assert!(step_size > 0 && step_size <= window_size);
        SlidingWindow {
            samples: vec![0.0; window_size],
            step: step_size,
        }
    }

    /// Shifts the window forward by one block.
    ///
    /// # Panics
    /// If `block.len()` does not equal the configured step size. A wrong
    /// block length means the audio layer is misconfigured, which is not
    /// recoverable at this level.
    pub fn ingest(&mut self, block: &[f32]) {
        assert_eq!(
            block.len(),
            self.step,
            "input block length must equal the configured step size"
        );
        self.samples.rotate_left(self.step);
        let tail = self.samples.len() - self.step;
        self.samples[tail..].copy_from_slice(block);
    }

    /// The current window contents, oldest sample first.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Mean signal power of the window, the squared L2 norm divided by
    /// the window length.
    pub fn power(&self) -> f32 {
        self.samples.iter().map(|&s| s * s).sum::<f32>() / self.samples.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_displaces_oldest_samples() {
        let mut window = SlidingWindow::new(6, 2);
        window.ingest(&[1.0, 2.0]);
        window.ingest(&[3.0, 4.0]);
        assert_eq!(window.samples(), &[0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
        window.ingest(&[5.0, 6.0]);
        assert_eq!(window.samples(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "step size")]
    fn ingest_rejects_wrong_block_length() {
        let mut window = SlidingWindow::new(6, 2);
        window.ingest(&[1.0, 2.0, 3.0]);
    }

    #[test]
    fn power_of_silence_is_zero() {
        let window = SlidingWindow::new(8, 4);
        assert_eq!(window.power(), 0.0);
    }

    #[test]
    fn power_is_mean_of_squares() {
        let mut window = SlidingWindow::new(4, 4);
        window.ingest(&[1.0, -1.0, 2.0, 0.0]);
        assert!((window.power() - 1.5).abs() < 1e-6);
    }
}
