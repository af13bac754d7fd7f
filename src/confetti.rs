// Confetti: little coloured squares streamed in from both sides when the page celebrates.
// Visual outcomes:
// - For a few seconds, two fans of confetti shoot up and inward from the left and right edges.
// - Each piece drifts, falls under gravity and fades out.
use image::RgbaImage;
use rand::{Rng, SeedableRng, rngs::StdRng};

pub const CONFETTI_COLORS: [[u8; 3]; 4] = [
    [0xD4, 0xAF, 0x37],
    [0xFF, 0xFF, 0xFF],
    [0xF4, 0x72, 0xB6],
    [0xEC, 0x48, 0x99],
];

const GRAVITY: f32 = 220.0; // px/sec^2
const DRAG: f32 = 0.985;
/// Pieces fired from each edge per frame while streaming.
const PER_FRAME: usize = 5;
const ANGLE_LEFT: f32 = 60.0;
const ANGLE_RIGHT: f32 = 120.0;
const SPREAD: f32 = 55.0;

/// Source-over one colour at (x,y) with opacity `a` in [0,1].
#[inline]
fn blend_rgb(img: &mut RgbaImage, x: i32, y: i32, rgb: [u8; 3], a: f32) {
    if x < 0 || y < 0 { return; }
    let (x, y) = (x as u32, y as u32);
    if x >= img.width() || y >= img.height() { return; }

    let px = img.get_pixel_mut(x, y);
    for c in 0..3 {
        let under = px.0[c] as f32;
        px.0[c] = (rgb[c] as f32 * a + under * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
    }
    px.0[3] = 0xFF;
}

/// One piece of confetti. Visual: a small square that flies, falls and fades.
pub struct Piece {
    pub x: f32, pub y: f32,     // position in pixels
    pub vx: f32, pub vy: f32,   // velocity in px/sec
    pub life: f32,              // remaining lifetime in seconds
    pub max_life: f32,          // initial lifetime (for fade)
    pub size: i32,              // square edge in pixels
    pub color: [u8; 3],
}

impl Piece {
    #[inline] fn alive(&self) -> bool { self.life > 0.0 }
}

pub struct Confetti {
    rng: StdRng,
    pieces: Vec<Piece>,
    max_pieces: usize,
    stream_left: f32, // seconds of streaming still to go
}

impl Confetti {
    pub fn new(max_pieces: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            pieces: Vec::with_capacity(max_pieces),
            max_pieces,
            stream_left: 0.0,
        }
    }

    /// Fire `count` pieces from (x,y) toward `angle_deg` (0 = right, 90 = up)
    /// within a cone of `spread_deg`.
    pub fn fire(&mut self, x: f32, y: f32, angle_deg: f32, spread_deg: f32, count: usize) {
        for _ in 0..count {
            if self.pieces.len() >= self.max_pieces { break; }
            let half = spread_deg.abs() * 0.5;
            let angle = (angle_deg + self.rng.random_range(-half..=half)).to_radians();
            let speed = self.rng.random_range(260.0..520.0);
            let max_life = self.rng.random_range(1.2..2.4);
            let color = CONFETTI_COLORS[self.rng.random_range(0..CONFETTI_COLORS.len())];
            self.pieces.push(Piece {
                x, y,
                vx: speed * angle.cos(),
                vy: -speed * angle.sin(), // screen y grows downward
                life: max_life,
                max_life,
                size: self.rng.random_range(2..=4),
                color,
            });
        }
    }

    /// Start (or extend) the celebration: every frame for `seconds`, a handful of
    /// pieces leave each side edge at mid height, aimed up and inward.
    pub fn celebrate(&mut self, seconds: f32) {
        self.stream_left = self.stream_left.max(seconds);
    }

    /// True while streaming or while any piece is still on screen.
    pub fn is_active(&self) -> bool {
        self.stream_left > 0.0 || !self.pieces.is_empty()
    }

    /// Step the simulation and draw every live piece on top of `frame`.
    /// Visual: new pieces enter from the sides, old ones arc down and fade.
    pub fn update_and_render(&mut self, frame: &mut RgbaImage, dt: f32) {
        if self.stream_left > 0.0 {
            let (w, mid) = (frame.width() as f32, frame.height() as f32 * 0.5);
            self.fire(0.0, mid, ANGLE_LEFT, SPREAD, PER_FRAME);
            self.fire(w, mid, ANGLE_RIGHT, SPREAD, PER_FRAME);
            self.stream_left -= dt;
        }

        let mut i = 0;
        while i < self.pieces.len() {
            let p = &mut self.pieces[i];

            // Simple Euler with drag and gravity
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vx *= DRAG;
            p.vy = p.vy * DRAG + GRAVITY * dt;
            p.life -= dt;

            if p.alive() {
                let a = (p.life / p.max_life).clamp(0.0, 1.0);
                let (px, py) = (p.x as i32, p.y as i32);
                for dy in 0..p.size {
                    for dx in 0..p.size {
                        blend_rgb(frame, px + dx, py + dy, p.color, a);
                    }
                }
                i += 1;
            } else {
                // Remove dead piece (swap-remove, O(1))
                self.pieces.swap_remove(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn stream_runs_for_its_duration_then_burns_out() {
        let mut c = Confetti::new(5000, 1);
        let mut frame = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 255]));
        assert!(!c.is_active());

        c.celebrate(3.0);
        c.update_and_render(&mut frame, 1.0 / 60.0);
        assert_eq!(c.pieces.len(), 2 * PER_FRAME);
        assert!(frame.pixels().any(|p| p.0 != [0, 0, 0, 255]));

        // Still firing just before the 3 s mark, done right after.
        for _ in 0..170 {
            c.update_and_render(&mut frame, 1.0 / 60.0);
        }
        assert!(c.stream_left > 0.0);
        for _ in 0..10 {
            c.update_and_render(&mut frame, 1.0 / 60.0);
        }
        assert!(c.stream_left <= 0.0);

        for _ in 0..200 {
            c.update_and_render(&mut frame, 1.0 / 60.0);
        }
        assert!(!c.is_active());
    }

    #[test]
    fn capacity_is_respected() {
        let mut c = Confetti::new(10, 2);
        let mut frame = RgbaImage::new(100, 100);
        c.celebrate(1.0);
        for _ in 0..5 {
            c.update_and_render(&mut frame, 1.0 / 60.0);
            assert!(c.pieces.len() <= 10);
        }
    }
}
