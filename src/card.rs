// A scratch card as the page shows it: header text, the picture underneath
// and the scratch surface on top.
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::config::ScratchConfig;
use crate::error::{Error, Result};
use crate::font;
use crate::scratch::{CompletionCallback, ScratchSurface};

/// Background behind a placeholder reveal (zinc-900).
pub const REVEAL_BACKGROUND: Rgba<u8> = Rgba([0x18, 0x18, 0x1B, 0xFF]);
pub const REVEAL_INK: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
/// The "done" badge in the top-right corner (yellow-500).
pub const BADGE_COLOR: Rgba<u8> = Rgba([0xEA, 0xB3, 0x08, 0xFF]);
pub const BADGE_INSET: i32 = 16;
pub const BADGE_RADIUS: i32 = 14;

/// What sits underneath the overlay.
pub enum Reveal {
    Image(RgbaImage),
    /// Centered text on a dark background.
    Message(String),
}

/// Everything a host hands over when it places a card.
pub struct CardProps {
    pub title: String,
    pub subtitle: String,
    pub reveal: Reveal,
    pub on_complete: Option<CompletionCallback>,
    /// Completing this card starts the host's celebration.
    pub celebrate: bool,
}

/// Decode a picture from disk for use as reveal content.
pub fn load_reveal(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| Error::RevealLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

fn render_reveal(reveal: Reveal, w: u32, h: u32) -> RgbaImage {
    match reveal {
        // Cover the card like `object-fit: cover`.
        Reveal::Image(img) => image::DynamicImage::ImageRgba8(img)
            .resize_to_fill(w, h, FilterType::Triangle)
            .to_rgba8(),
        Reveal::Message(text) => {
            let mut canvas = RgbaImage::from_pixel(w, h, REVEAL_BACKGROUND);
            let scale = if font::text_width(&text, 3) <= w as i32 - 16 { 3 } else { 2 };
            font::draw_text_centered(
                &mut canvas,
                w as i32 / 2,
                h as i32 / 2 + font::GLYPH_H * scale / 2,
                &text,
                scale,
                REVEAL_INK,
            );
            canvas
        }
    }
}

fn draw_badge(frame: &mut RgbaImage) {
    let cx = frame.width() as i32 - BADGE_INSET - BADGE_RADIUS;
    let cy = BADGE_INSET + BADGE_RADIUS;
    let r2 = BADGE_RADIUS * BADGE_RADIUS;
    for y in (cy - BADGE_RADIUS)..=(cy + BADGE_RADIUS) {
        for x in (cx - BADGE_RADIUS)..=(cx + BADGE_RADIUS) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r2 {
                font::put_pixel(frame, x, y, BADGE_COLOR);
            }
        }
    }
    // Four-point sparkle in the middle.
    let ink = Rgba([0, 0, 0, 0xFF]);
    for d in -6..=6 {
        font::put_pixel(frame, cx + d, cy, ink);
        font::put_pixel(frame, cx, cy + d, ink);
    }
    for d in -2..=2 {
        font::put_pixel(frame, cx + d, cy + d, ink);
        font::put_pixel(frame, cx + d, cy - d, ink);
    }
}

pub struct ScratchCard {
    title: String,
    subtitle: String,
    reveal: RgbaImage,
    surface: ScratchSurface,
}

impl ScratchCard {
    pub fn new(props: CardProps, config: ScratchConfig) -> Result<Self> {
        let (w, h) = (config.width, config.height);
        let surface = ScratchSurface::new(config, props.on_complete)?;
        Ok(Self {
            title: props.title,
            subtitle: props.subtitle,
            reveal: render_reveal(props.reveal, w, h),
            surface,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn surface(&self) -> &ScratchSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut ScratchSurface {
        &mut self.surface
    }

    /// The card as seen on screen, at surface resolution; `None` while unmounted.
    /// Visual: gold covers the picture until done, then it vanishes and the badge shows.
    pub fn compose(&self) -> Option<RgbaImage> {
        let overlay = self.surface.surface()?;
        let mut frame = self.reveal.clone();
        if self.surface.is_done() {
            draw_badge(&mut frame);
        } else {
            imageops::overlay(&mut frame, overlay, 0, 0);
        }
        Some(frame)
    }
}
