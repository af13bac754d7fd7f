// Window-side pixel buffer. Everything is drawn in RGBA and packed here right before presenting.
use image::RgbaImage;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Pack an RGBA raster into 0x00RRGGBB, dropping alpha.
    /// Reallocates if the size changed.
    pub fn copy_from_rgba(&mut self, img: &RgbaImage) {
        let (w, h) = (img.width() as usize, img.height() as usize);
        if w != self.width || h != self.height {
            *self = Self::new(w, h);
        }
        for (dst, px) in self.pixels.iter_mut().zip(img.pixels()) {
            let [r, g, b, _] = px.0;
            *dst = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
        }
    }
}
