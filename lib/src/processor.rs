use crate::ascii::{ImageGrid, OutputGrid, Renderer};
use crate::config::{ColorMode, RenderConfig};
use crate::error::{Error, Result};
use crate::filters::{luminance_of, normalized_rgb};
use crate::glyph::GlyphRasterizer;
use crate::lut::BucketTable;
use crate::quantize::quantize;
use crate::rank::{CacheStore, SymbolRanker};
use crate::resample::resize;
use image::DynamicImage;
use std::path::Path;

/// Open and decode an image file
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|source| Error::ImageUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the renderer for `config`.
///
/// On the luminance path this ranks the configured alphabet (through the
/// ranker's cache) and builds the bucket table.
pub fn renderer_for<S, G>(config: &RenderConfig, ranker: &SymbolRanker<S, G>) -> Result<Renderer>
where
    S: CacheStore,
    G: GlyphRasterizer,
{
    match &config.mode {
        ColorMode::Luminance {
            num_buckets,
            reverse,
            ..
        } => {
            let alphabet = config.mode.alphabet()?.unwrap_or_default();
            let ranked = ranker.rank(&alphabet, *reverse)?;
            Ok(Renderer::Luminance(BucketTable::build(&ranked, *num_buckets)?))
        }
        ColorMode::Colour { symbol, .. } => Ok(Renderer::Colour {
            symbol: symbol.clone(),
        }),
    }
}

/// Resample `input` into the grid described by `config`
///
/// Luminance mode converts to grayscale first; colour mode works on
/// normalised RGB and, if configured, quantizes the palette after resizing.
pub fn prepare(input: &DynamicImage, config: &RenderConfig) -> Result<ImageGrid> {
    match &config.mode {
        ColorMode::Luminance { .. } => {
            let lum = luminance_of(input);
            Ok(ImageGrid::Luminance(resize(
                &lum,
                config.max_size,
                config.h_stretch,
            )?))
        }
        ColorMode::Colour { num_clusters, .. } => {
            let rgb = normalized_rgb(input);
            let mut resized = resize(&rgb, config.max_size, config.h_stretch)?;
            if let Some(k) = num_clusters {
                resized = quantize(&resized, *k)?;
            }
            Ok(ImageGrid::Colour(resized))
        }
    }
}

/// Converts an image into a grid of symbols according to `config`
///
/// Pipeline:
/// 1. Validate the configuration
/// 2. Build the renderer (rank the alphabet and bucket it, luminance mode only)
/// 3. Resample the image into the output bound, stretched horizontally
/// 4. Quantize colours (colour mode with clustering only)
/// 5. Render every cell, row-major
///
/// Nothing is produced unless every step succeeds.
///
/// # Arguments
/// * `input` - The decoded source image
/// * `config` - Grid bound, stretch and colour mode
/// * `ranker` - Ranks the alphabet, through its cache when possible
///
/// # Returns
/// One cell per resampled pixel, or the first error of any stage
pub fn process_image<S, G>(
    input: &DynamicImage,
    config: &RenderConfig,
    ranker: &SymbolRanker<S, G>,
) -> Result<OutputGrid>
where
    S: CacheStore,
    G: GlyphRasterizer,
{
    config.validate()?;
    let renderer = renderer_for(config, ranker)?;
    let grid = prepare(input, config)?;
    renderer.render(&grid)
}

/// Luminance conversion with a prebuilt bucket table
///
/// Lets batch drivers rank once and reuse the table for every image.
pub fn process_image_with_table(
    input: &DynamicImage,
    config: &RenderConfig,
    table: &BucketTable,
) -> Result<OutputGrid> {
    config.validate()?;
    let lum = luminance_of(input);
    let resized = resize(&lum, config.max_size, config.h_stretch)?;
    Renderer::Luminance(table.clone()).render(&ImageGrid::Luminance(resized))
}

/// Colour conversion; needs no glyph ranking
pub fn process_image_preserve_colors(
    input: &DynamicImage,
    config: &RenderConfig,
) -> Result<OutputGrid> {
    config.validate()?;
    let ColorMode::Colour { symbol, .. } = &config.mode else {
        return Err(Error::config("colour conversion needs a colour mode config"));
    };
    let grid = prepare(input, config)?;
    Renderer::Colour {
        symbol: symbol.clone(),
    }
    .render(&grid)
}
