//! Fitting images into the output grid
//!
//! Text cells are taller than they are wide, so the width is stretched by
//! `h_stretch` after the aspect-preserving fit; otherwise the rendering would
//! look vertically squashed.

use crate::config::MaxSize;
use crate::error::{Error, Result};
use image::{GenericImageView, ImageBuffer, Pixel, imageops};

/// Filter used for every resize; bicubic, deterministic
pub const RESIZE_FILTER: imageops::FilterType = imageops::FilterType::CatmullRom;

/// Compute the (width, height) of the output grid.
///
/// `ratio = min(max_h / h, max_w / w)`, `height = floor(ratio * h)`,
/// `width = floor(ratio * w * h_stretch)`. A zero dimension is an error.
pub fn target_dimensions(
    (width, height): (u32, u32),
    max_size: MaxSize,
    h_stretch: f32,
) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(Error::config(format!(
            "source image is empty ({}x{})",
            width, height
        )));
    }
    if !h_stretch.is_finite() || h_stretch <= 0.0 {
        return Err(Error::config(format!(
            "h_stretch must be a positive number, got {}",
            h_stretch
        )));
    }

    let ratio = f64::min(
        max_size.height as f64 / height as f64,
        max_size.width as f64 / width as f64,
    );
    if ratio <= 0.0 {
        return Err(Error::config("resize ratio must be strictly positive"));
    }

    let new_height = (ratio * height as f64).floor();
    let new_width = (ratio * width as f64 * h_stretch as f64).floor();

    if new_height < 1.0 || new_width < 1.0 {
        return Err(Error::config(format!(
            "a {}x{} image resized into {}x{} with stretch {} leaves no pixels",
            width, height, max_size.width, max_size.height, h_stretch
        )));
    }
    if new_width > u32::MAX as f64 {
        return Err(Error::config("stretched width does not fit the output grid"));
    }

    Ok((new_width as u32, new_height as u32))
}

/// Resize `image` into the output grid
///
/// # Arguments
/// * `image` - Grey or RGB pixels to resample
/// * `max_size` - Bounding box the unstretched image must fit in
/// * `h_stretch` - Factor applied to the width after fitting
///
/// # Returns
/// The resampled image, sized by [`target_dimensions`]
pub fn resize<I>(
    image: &I,
    max_size: MaxSize,
    h_stretch: f32,
) -> Result<ImageBuffer<I::Pixel, Vec<<I::Pixel as Pixel>::Subpixel>>>
where
    I: GenericImageView,
    I::Pixel: 'static,
    <I::Pixel as Pixel>::Subpixel: 'static,
{
    let (width, height) = target_dimensions(image.dimensions(), max_size, h_stretch)?;
    log::debug!(
        "resizing {}x{} -> {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    Ok(imageops::resize(image, width, height, RESIZE_FILTER))
}
