// Coverage evaluation: how much of the overlay has been scratched away,
// and the one-way switch that flips once more than the threshold is gone.
use image::RgbaImage;

use crate::config::CoverageStrategy;

/// Count pixels whose alpha is exactly zero.
pub fn cleared_pixels(surface: &RgbaImage) -> u64 {
    surface.pixels().filter(|p| p.0[3] == 0).count() as u64
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Completion {
    #[default]
    NotDone,
    Done,
}

#[derive(Clone, Debug)]
pub struct CoverageEvaluator {
    strategy: CoverageStrategy,
    threshold: f64,
    total: u64,
    cleared: u64,
    completion: Completion,
}

impl CoverageEvaluator {
    /// Start tracking `surface`; the running count is seeded from a full scan.
    pub fn new(strategy: CoverageStrategy, threshold: f32, surface: &RgbaImage) -> Self {
        Self {
            strategy,
            threshold: threshold as f64,
            total: surface.width() as u64 * surface.height() as u64,
            cleared: cleared_pixels(surface),
            completion: Completion::NotDone,
        }
    }

    /// Re-evaluate after a stamp that cleared `newly_cleared` pixels.
    /// Returns `true` only on the call that crosses the threshold.
    pub fn evaluate(&mut self, surface: &RgbaImage, newly_cleared: u64) -> bool {
        if self.completion == Completion::Done {
            return false;
        }
        self.cleared = match self.strategy {
            CoverageStrategy::FullScan => cleared_pixels(surface),
            CoverageStrategy::Incremental => (self.cleared + newly_cleared).min(self.total),
        };
        if self.fraction() > self.threshold {
            self.completion = Completion::Done;
            return true;
        }
        false
    }

    pub fn cleared(&self) -> u64 {
        self.cleared
    }

    pub fn fraction(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.cleared as f64 / self.total as f64 }
    }
}
