//! Frame-rate accounting.

use std::time::Instant;

/// Rolling frame-rate estimate over the last `WINDOW` presents.
///
/// The ring starts filled with the construction instant, so early readings
/// overshoot until `WINDOW` real frames have passed; the estimate is for a
/// window title, not a benchmark.
pub struct FpsCounter {
    samples: Vec<Instant>,
    next: usize,
}

const WINDOW: usize = 60;

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            samples: vec![Instant::now(); WINDOW],
            next: 0,
        }
    }

    /// Record one presented frame and return frames per second averaged
    /// over the window.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = now
            .duration_since(self.samples[self.next])
            .as_secs_f64()
            .max(1e-6);
        self.samples[self.next] = now;
        self.next = (self.next + 1) % self.samples.len();
        self.samples.len() as f64 / elapsed
    }
}
