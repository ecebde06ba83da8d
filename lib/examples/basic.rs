/// Basic example: render a synthetic image both ways
///
/// Builds a radial gradient, renders it with a small hand-ranked alphabet
/// (no font needed) and again in colour with a 4-colour palette.
use glyphmap::{
    BucketTable, ColorMode, HtmlStyle, MaxSize, RankedAlphabet, RenderConfig,
    process_image_preserve_colors, process_image_with_table, to_html, to_text,
};
use image::{DynamicImage, Rgb, RgbImage};

fn main() -> glyphmap::Result<()> {
    println!("glyphmap - Basic Example");
    println!("========================\n");

    let (width, height) = (160, 120);
    let mut img = RgbImage::new(width, height);
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let max_dist = (cx * cx + cy * cy).sqrt();
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let t = 1.0 - (dx * dx + dy * dy).sqrt() / max_dist;
        *pixel = Rgb([
            (255.0 * t) as u8,
            (x * 255 / width) as u8,
            (y * 255 / height) as u8,
        ]);
    }
    let input = DynamicImage::ImageRgb8(img);
    println!("Created test image: {}x{}", width, height);

    // Coverage scores as a font would report them
    let ranked = RankedAlphabet::from_scores(
        [
            (" ", 0),
            (".", 310),
            (":", 620),
            ("-", 700),
            ("=", 1400),
            ("+", 1500),
            ("*", 1900),
            ("#", 3100),
            ("%", 3300),
            ("@", 4200),
        ],
        false,
    );
    let table = BucketTable::build(&ranked, 10)?;
    println!("Thresholds: {:?}", table.thresholds());
    println!("Symbols:    {:?}\n", table.symbols());

    let config = RenderConfig {
        max_size: MaxSize {
            height: 24,
            width: 48,
        },
        h_stretch: 1.5,
        mode: ColorMode::Luminance {
            symbols: None,
            num_buckets: 10,
            reverse: false,
        },
    };
    let grid = process_image_with_table(&input, &config, &table)?;
    println!("Grayscale rendering ({}x{}):", grid.width(), grid.height());
    print!("{}", to_text(&grid));

    let colour = RenderConfig {
        max_size: MaxSize {
            height: 40,
            width: 40,
        },
        mode: ColorMode::Colour {
            symbol: "#".to_string(),
            num_clusters: Some(4),
        },
        ..RenderConfig::default()
    };
    let grid = process_image_preserve_colors(&input, &colour)?;
    let html = to_html(&grid, &HtmlStyle::colour());
    std::fs::write("basic_colour.html", &html)?;
    println!(
        "\nColour rendering ({}x{}) saved to basic_colour.html",
        grid.width(),
        grid.height()
    );

    Ok(())
}
