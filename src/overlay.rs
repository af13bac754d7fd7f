// Paints the opaque scratch layer: a metallic gold gradient, a dusting of
// faint white specks for texture and the centered instruction text.
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::ScratchConfig;
use crate::font;

/// Gradient stops along the (0,0) -> (w,h) diagonal.
pub const GRADIENT_STOPS: [(f32, [u8; 3]); 3] = [
    (0.0, [0xD4, 0xAF, 0x37]),
    (0.5, [0xF9, 0xE2, 0x9C]),
    (1.0, [0xB8, 0x86, 0x0B]),
];

pub const SPECK_RGB: [u8; 3] = [0xFF, 0xFF, 0xFF];
pub const SPECK_ALPHA: f32 = 0.1;
pub const CAPTION_COLOR: Rgba<u8> = Rgba([0x44, 0x44, 0x44, 0xFF]);
pub const CAPTION_SCALE: i32 = 2;
/// Baseline sits this far below the vertical center.
pub const CAPTION_DROP: i32 = 6;

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

/// Colour of the gradient at parameter `t` in [0,1].
pub fn gradient_at(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    for pair in GRADIENT_STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let local = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            return [
                lerp_u8(c0[0], c1[0], local),
                lerp_u8(c0[1], c1[1], local),
                lerp_u8(c0[2], c1[2], local),
            ];
        }
    }
    GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1
}

fn fill_gradient(surface: &mut RgbaImage) {
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let len2 = w * w + h * h;
    for (x, y, px) in surface.enumerate_pixels_mut() {
        // Project the pixel center onto the diagonal.
        let t = ((x as f32 + 0.5) * w + (y as f32 + 0.5) * h) / len2;
        let [r, g, b] = gradient_at(t);
        *px = Rgba([r, g, b, 0xFF]);
    }
}

fn sprinkle_specks(surface: &mut RgbaImage, count: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (w, h) = (surface.width(), surface.height());
    for _ in 0..count {
        let x = rng.random_range(0..w);
        let y = rng.random_range(0..h);
        let px = surface.get_pixel_mut(x, y);
        // Source-over onto an opaque pixel keeps alpha at 255.
        for c in 0..3 {
            let under = px.0[c] as f32;
            px.0[c] = (SPECK_RGB[c] as f32 * SPECK_ALPHA + under * (1.0 - SPECK_ALPHA)).round() as u8;
        }
    }
}

/// Overwrite the whole surface with a fresh occlusion layer.
pub fn paint_overlay(surface: &mut RgbaImage, config: &ScratchConfig) {
    fill_gradient(surface);
    sprinkle_specks(surface, config.specks, config.seed);

    let cx = surface.width() as i32 / 2;
    let baseline = surface.height() as i32 / 2 + CAPTION_DROP;
    font::draw_text_centered(surface, cx, baseline, &config.caption, CAPTION_SCALE, CAPTION_COLOR);
}

/// Allocate a surface of the configured size and paint it.
pub fn new_overlay(config: &ScratchConfig) -> RgbaImage {
    let mut surface = RgbaImage::new(config.width, config.height);
    paint_overlay(&mut surface, config);
    surface
}
