//! Colour quantization by k-means clustering
//!
//! Pixels are clustered in RGB space and every pixel is replaced by the
//! centroid of its cluster, reducing the image to at most `k` colours.

use crate::error::{Error, Result};
use image::{Rgb, Rgb32FImage};
use rayon::prelude::*;
use std::collections::HashSet;

/// Upper bound on Lloyd iterations
pub const MAX_ITERATIONS: usize = 300;

type Point = [f32; 3];

fn dist_sq(a: &Point, b: &Point) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

fn nearest(p: &Point, centroids: &[Point]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = dist_sq(p, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Result of clustering a set of points
#[derive(Debug, Clone)]
pub struct Clustering {
    pub centroids: Vec<Point>,
    /// Cluster index of each input point
    pub labels: Vec<usize>,
    pub iterations: usize,
}

/// Number of distinct colours among `points`
pub fn distinct_colors(points: &[Point]) -> usize {
    points
        .iter()
        .map(|p| p.map(f32::to_bits))
        .collect::<HashSet<_>>()
        .len()
}

/// Farthest-point seeding: start from the middle point, then repeatedly pick
/// the point farthest from every centroid chosen so far
fn seed(points: &[Point], k: usize) -> Vec<Point> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[points.len() / 2]);

    let mut min_dist: Vec<f32> = points.iter().map(|p| dist_sq(p, &centroids[0])).collect();
    while centroids.len() < k {
        let (best, _) = min_dist
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |acc, (i, &d)| if d > acc.1 { (i, d) } else { acc });
        let chosen = points[best];
        centroids.push(chosen);
        for (d, p) in min_dist.iter_mut().zip(points) {
            *d = d.min(dist_sq(p, &chosen));
        }
    }

    centroids
}

/// Cluster `points` into `k` groups.
///
/// Fails if `k` is zero or larger than the number of distinct points.
pub fn kmeans(points: &[Point], k: usize) -> Result<Clustering> {
    if k == 0 {
        return Err(Error::config("cluster count must be at least 1"));
    }
    let distinct = distinct_colors(points);
    if k > distinct {
        return Err(Error::config(format!(
            "cluster count {} exceeds the {} distinct colours available",
            k, distinct
        )));
    }

    let mut centroids = seed(points, k);
    let mut labels = vec![usize::MAX; points.len()];
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        let assigned: Vec<usize> = points.par_iter().map(|p| nearest(p, &centroids)).collect();
        let changed = assigned != labels;
        labels = assigned;
        if !changed {
            break;
        }

        let mut sums = vec![[0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (p, &label) in points.iter().zip(&labels) {
            counts[label] += 1;
            for c in 0..3 {
                sums[label][c] += p[c] as f64;
            }
        }
        // Empty clusters keep their previous centroid
        for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            if count > 0 {
                *centroid = sum.map(|s| (s / count as f64) as f32);
            }
        }
    }

    log::debug!("k-means with k={} settled after {} iterations", k, iterations);
    Ok(Clustering {
        centroids,
        labels,
        iterations,
    })
}

/// Replace every pixel of `image` with its cluster centroid.
///
/// # Arguments
/// * `image` - Float RGB pixels in [0, 1]
/// * `k` - Number of colours to keep
///
/// # Returns
/// An image of the same size using at most `k` colours, channels clamped
/// to [0, 1]. Fails if `k` is zero or exceeds the distinct colours present.
pub fn quantize(image: &Rgb32FImage, k: usize) -> Result<Rgb32FImage> {
    let points: Vec<Point> = image.pixels().map(|p| p.0).collect();
    let clustering = kmeans(&points, k)?;

    let palette: Vec<Point> = clustering
        .centroids
        .iter()
        .map(|c| c.map(|v| v.clamp(0.0, 1.0)))
        .collect();

    let (width, height) = image.dimensions();
    let mut output = Rgb32FImage::new(width, height);
    for (pixel, &label) in output.pixels_mut().zip(&clustering.labels) {
        *pixel = Rgb(palette[label]);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone(width: u32, height: u32) -> Rgb32FImage {
        Rgb32FImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([0.9, 0.1, 0.1])
            } else {
                Rgb([0.1, 0.1, 0.9])
            }
        })
    }

    #[test]
    fn test_quantize_preserves_dimensions() {
        let img = Rgb32FImage::from_fn(13, 7, |x, y| Rgb([x as f32 / 13.0, y as f32 / 7.0, 0.5]));
        let out = quantize(&img, 4).unwrap();
        assert_eq!(out.dimensions(), (13, 7));
    }

    #[test]
    fn test_quantize_limits_palette() {
        let img = Rgb32FImage::from_fn(16, 16, |x, y| {
            Rgb([x as f32 / 15.0, y as f32 / 15.0, ((x + y) % 3) as f32 / 2.0])
        });
        let out = quantize(&img, 5).unwrap();
        let points: Vec<Point> = out.pixels().map(|p| p.0).collect();
        assert!(distinct_colors(&points) <= 5);
        for p in &points {
            assert!(p.iter().all(|&c| (0.0..=1.0).contains(&c)));
        }
    }

    #[test]
    fn test_two_tone_separates() {
        let img = two_tone(10, 4);
        let out = quantize(&img, 2).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_single_cluster_is_mean() {
        let img = two_tone(10, 4);
        let out = quantize(&img, 1).unwrap();
        let p = out.get_pixel(0, 0);
        assert!((p[0] - 0.5).abs() < 1e-5);
        assert!((p[1] - 0.1).abs() < 1e-5);
        assert!((p[2] - 0.5).abs() < 1e-5);
        assert_eq!(out.get_pixel(9, 3), p);
    }

    #[test]
    fn test_too_many_clusters() {
        let img = two_tone(10, 4);
        let err = quantize(&img, 3).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_zero_clusters() {
        assert!(quantize(&two_tone(4, 4), 0).is_err());
    }

    #[test]
    fn test_out_of_range_centroids_are_clamped() {
        let img = Rgb32FImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([1.2, -0.1, 0.5]) } else { Rgb([0.0, 0.0, 0.0]) }
        });
        let out = quantize(&img, 2).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_kmeans_converges() {
        let points: Vec<Point> = (0..100)
            .map(|i| if i % 2 == 0 { [0.0, 0.0, 0.0] } else { [1.0, 1.0, 1.0] })
            .collect();
        let clustering = kmeans(&points, 2).unwrap();
        assert!(clustering.iterations < MAX_ITERATIONS);
        assert_ne!(clustering.labels[0], clustering.labels[1]);
        assert_eq!(clustering.labels[0], clustering.labels[2]);
    }
}
