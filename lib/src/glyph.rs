//! Glyph rasterization and ink coverage
//!
//! Coverage is measured by drawing a symbol in black onto a white square
//! canvas and counting the pixels that end up exactly black. Anti-aliased
//! edge pixels are blended and therefore never counted.

use crate::error::{Error, Result};
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Side length of the square coverage canvas, in pixels
pub const CANVAS_SIZE: u32 = 100;

/// Pixel height the glyphs are drawn at
pub const GLYPH_SCALE: f32 = 100.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Anything that can score how much of a fixed canvas a symbol covers
pub trait GlyphRasterizer: Send + Sync {
    /// Number of foreground pixels for `symbol`
    fn coverage(&self, symbol: &str) -> Result<u32>;
}

/// Count pixels of `img` that exactly match `color`
pub fn count_foreground_pixels(img: &RgbImage, color: Rgb<u8>) -> u32 {
    img.pixels().filter(|&&p| p == color).count() as u32
}

/// Rasterizes symbols with a TrueType/OpenType font file.
///
/// The font is read on first use, so constructing a rasterizer for a missing
/// file only fails once a glyph actually has to be drawn.
#[derive(Debug)]
pub struct FontRasterizer {
    path: PathBuf,
    font: OnceLock<FontVec>,
}

impl FontRasterizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            font: OnceLock::new(),
        }
    }

    /// Load the font immediately instead of on first use
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let rasterizer = Self::new(path);
        rasterizer.font()?;
        Ok(rasterizer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn font(&self) -> Result<&FontVec> {
        if let Some(font) = self.font.get() {
            return Ok(font);
        }

        let bytes = std::fs::read(&self.path).map_err(|source| Error::FontUnavailable {
            path: self.path.clone(),
            source,
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| Error::InvalidFont {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        log::debug!("loaded font {}", self.path.display());

        Ok(self.font.get_or_init(|| font))
    }

    /// Draw `symbol` onto a fresh canvas
    pub fn render_glyph(&self, symbol: &str) -> Result<RgbImage> {
        let font = self.font()?;
        let mut canvas = RgbImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, BACKGROUND);
        draw_text_mut(&mut canvas, INK, 0, 0, PxScale::from(GLYPH_SCALE), font, symbol);
        Ok(canvas)
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn coverage(&self, symbol: &str) -> Result<u32> {
        let canvas = self.render_glyph(symbol)?;
        Ok(count_foreground_pixels(&canvas, INK))
    }
}
