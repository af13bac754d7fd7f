// Knobs for one scratch card. Defaults reproduce the reference card:
// 400x250 surface, 40 px brush, done after more than half is cleared.
use crate::error::{Error, Result};

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 250;
pub const DEFAULT_BRUSH_RADIUS: f32 = 40.0;
pub const DEFAULT_THRESHOLD: f32 = 0.5;
pub const DEFAULT_SPECKS: usize = 1000;
pub const DEFAULT_SEED: u64 = 0x5C4A_7C4E_D00D_F00D;
pub const DEFAULT_CAPTION: &str = "SCRATCH TO REVEAL THE MAGIC";

/// How the coverage evaluator counts cleared pixels after each stamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CoverageStrategy {
    /// Read back the whole alpha channel every time.
    #[default]
    FullScan,
    /// Keep a running total of pixels each stamp newly cleared.
    Incremental,
}

#[derive(Clone, Debug)]
pub struct ScratchConfig {
    pub width: u32,            // logical raster width (pixels)
    pub height: u32,           // logical raster height (pixels)
    pub brush_radius: f32,     // erase circle radius in raster pixels
    pub threshold: f32,        // cleared fraction that must be exceeded
    pub specks: usize,         // texture highlights on the overlay
    pub seed: u64,             // speck placement
    pub caption: String,       // instruction text centered on the overlay
    pub strategy: CoverageStrategy,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            brush_radius: DEFAULT_BRUSH_RADIUS,
            threshold: DEFAULT_THRESHOLD,
            specks: DEFAULT_SPECKS,
            seed: DEFAULT_SEED,
            caption: DEFAULT_CAPTION.to_string(),
            strategy: CoverageStrategy::default(),
        }
    }
}

impl ScratchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_config(format!(
                "surface must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.brush_radius.is_finite() || self.brush_radius <= 0.0 {
            return Err(Error::invalid_config(format!(
                "brush radius must be positive, got {}",
                self.brush_radius
            )));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(Error::invalid_config(format!(
                "threshold must lie strictly between 0 and 1, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_card() {
        let cfg = ScratchConfig::default();
        assert_eq!((cfg.width, cfg.height), (400, 250));
        assert_eq!(cfg.pixel_count(), 100_000);
        assert_eq!(cfg.brush_radius, 40.0);
        assert_eq!(cfg.threshold, 0.5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_values() {
        let zero = ScratchConfig { width: 0, ..ScratchConfig::default() };
        assert!(zero.validate().is_err());

        let brush = ScratchConfig { brush_radius: f32::NAN, ..ScratchConfig::default() };
        assert!(brush.validate().is_err());

        for threshold in [0.0, 1.0, -0.2, 1.5] {
            let cfg = ScratchConfig { threshold, ..ScratchConfig::default() };
            assert!(cfg.validate().is_err(), "threshold {threshold} accepted");
        }
    }
}
