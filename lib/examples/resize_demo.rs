/// Resize demo: how source images fit the output grid
///
/// The fit keeps the aspect ratio inside the bounding box, then stretches the
/// width so text cells do not look squashed.
use glyphmap::MaxSize;
use glyphmap::resample::target_dimensions;

fn main() {
    println!("glyphmap - Resize Demo");
    println!("======================\n");

    let max_size = MaxSize::default();
    let test_cases = [
        (100, 400, "100x400 (portrait)"),
        (400, 100, "400x100 (landscape)"),
        (1920, 1080, "1920x1080 (Full HD)"),
        (300, 300, "300x300 (fits exactly)"),
        (2000, 1, "2000x1 (degenerate strip)"),
    ];

    println!(
        "Bounding box: {}x{} (width x height), stretch 1.5\n",
        max_size.width, max_size.height
    );

    for (width, height, description) in test_cases {
        match target_dimensions((width, height), max_size, 1.5) {
            Ok((w, h)) => println!("  {:<28} -> {}x{}", description, w, h),
            Err(e) => println!("  {:<28} -> error: {}", description, e),
        }
    }

    println!("\nStretch factors for a 640x480 source:");
    for stretch in [1.0, 1.5, 2.0] {
        if let Ok((w, h)) = target_dimensions((640, 480), max_size, stretch) {
            println!("  h_stretch {:.1} -> {}x{}", stretch, w, h);
        }
    }
}
