use image::{DynamicImage, GrayImage, Luma, Rgb32FImage, RgbImage};

/// Convert an RGB image to single-channel luminance
///
/// Formula: L = R * 299/1000 + G * 587/1000 + B * 114/1000 (ITU-R 601-2),
/// rounded to the nearest integer
pub fn to_luminance(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let r = pixel[0] as u32;
        let g = pixel[1] as u32;
        let b = pixel[2] as u32;

        let luminance = (r * 299 + g * 587 + b * 114 + 500) / 1000;
        output.put_pixel(x, y, Luma([luminance.min(255) as u8]));
    }

    output
}

/// Luminance grid of any decoded image
pub fn luminance_of(img: &DynamicImage) -> GrayImage {
    to_luminance(&img.to_rgb8())
}

/// Colour grid of any decoded image with channels normalised to [0, 1]
pub fn normalized_rgb(img: &DynamicImage) -> Rgb32FImage {
    img.to_rgb32f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_luminance_black() {
        let img = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let lum = to_luminance(&img);
        assert_eq!(lum.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_luminance_white() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let lum = to_luminance(&img);
        assert_eq!(lum.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_luminance_weights() {
        let img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        let lum = to_luminance(&img);
        assert_eq!(lum.get_pixel(0, 0)[0], 76);
        assert_eq!(lum.get_pixel(1, 0)[0], 150);
        assert_eq!(lum.get_pixel(2, 0)[0], 29);
    }

    #[test]
    fn test_luminance_preserves_dimensions() {
        let img = DynamicImage::new_rgb8(17, 5);
        assert_eq!(luminance_of(&img).dimensions(), (17, 5));
    }

    #[test]
    fn test_normalized_rgb_range() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 0, 51])));
        let rgb = normalized_rgb(&img);
        let p = rgb.get_pixel(1, 1);
        assert_eq!(p[0], 1.0);
        assert_eq!(p[1], 0.0);
        assert!((p[2] - 0.2).abs() < 1e-6);
    }
}
