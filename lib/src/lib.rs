//! glyphmap - image to text converter
//!
//! Turns raster images into text: either a grayscale rendering where each
//! cell's luminance selects a symbol by how much ink its glyph uses, or a
//! colour rendering where every cell draws the same symbol in the pixel's
//! colour (optionally after k-means palette reduction).
//!
//! # Example
//! ```no_run
//! use glyphmap::{
//!     FileStore, FontRasterizer, RankCache, RenderConfig, SymbolRanker, load_image,
//!     process_image, to_text,
//! };
//!
//! let ranker = SymbolRanker::new(
//!     RankCache::new(FileStore::new("data/rank_cache.json")),
//!     FontRasterizer::new("fonts/Arial.ttf"),
//! );
//! let input = load_image("photo.jpg").unwrap();
//! let grid = process_image(&input, &RenderConfig::default(), &ranker).unwrap();
//! std::fs::write("photo.txt", to_text(&grid)).unwrap();
//! ```

pub mod alphabet;
pub mod ascii;
pub mod config;
pub mod error;
pub mod filters;
pub mod glyph;
pub mod lut;
pub mod output;
pub mod processor;
pub mod quantize;
pub mod rank;
pub mod resample;

// Re-export main types for convenience
pub use alphabet::Alphabet;
pub use ascii::{Cell, ImageGrid, OutputGrid, Renderer};
pub use config::{ColorMode, MaxSize, RenderConfig};
pub use error::{Error, Result};
pub use glyph::{FontRasterizer, GlyphRasterizer};
pub use lut::BucketTable;
pub use output::{HtmlStyle, to_html, to_text};
pub use processor::{
    load_image, process_image, process_image_preserve_colors, process_image_with_table,
    renderer_for,
};
pub use rank::{CacheStore, FileStore, MemoryStore, RankCache, RankedAlphabet, SymbolRanker};
