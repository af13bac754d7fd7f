// Erase engine: punches a hard-edged transparent disc into the overlay.
// Destination-out with an opaque brush, so only alpha matters; colour is left alone.
use image::RgbaImage;

use crate::pointer::LocalPoint;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brush {
    pub radius: f32, // pixels from center to edge
}

impl Brush {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Clear every pixel whose center lies within the disc at `at`.
    /// Returns how many pixels went from visible to fully transparent.
    /// Discs partly outside are clipped; fully outside or non-finite is a no-op.
    pub fn erase(&self, surface: &mut RgbaImage, at: LocalPoint) -> u64 {
        let r = self.radius;
        if !at.x.is_finite() || !at.y.is_finite() || !(r > 0.0) {
            return 0;
        }
        let (w, h) = (surface.width() as f32, surface.height() as f32);

        // Bounding box of the disc, clipped to the raster.
        let x0 = (at.x - r).floor().max(0.0);
        let y0 = (at.y - r).floor().max(0.0);
        let x1 = (at.x + r).ceil().min(w);
        let y1 = (at.y + r).ceil().min(h);
        if x0 >= x1 || y0 >= y1 {
            return 0;
        }

        let r2 = r * r;
        let mut cleared = 0u64;
        for y in (y0 as u32)..(y1 as u32) {
            let dy = y as f32 + 0.5 - at.y;
            for x in (x0 as u32)..(x1 as u32) {
                let dx = x as f32 + 0.5 - at.x;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let px = surface.get_pixel_mut(x, y);
                if px.0[3] != 0 {
                    px.0[3] = 0;
                    cleared += 1;
                }
            }
        }
        cleared
    }
}
