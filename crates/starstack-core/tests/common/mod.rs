#![allow(dead_code)]

use std::path::Path;

use ndarray::Array2;

use starstack_core::align::AffineTransform;
use starstack_core::catalog::StarCatalog;
use starstack_core::frame::Point;
use starstack_core::io::{save_gray8, to_gray8};

/// Five well separated stars `(x, y, magnitude)`; the first is the brightest.
pub const REFERENCE_STARS: [(f64, f64, f64); 5] = [
    (100.0, 100.0, 1000.0),
    (160.0, 110.0, 900.0),
    (90.0, 170.0, 800.0),
    (40.0, 60.0, 700.0),
    (150.0, 30.0, 600.0),
];

/// Dim stars that only appear in additional frames.
pub const DISTRACTOR_STARS: [(f64, f64, f64); 3] = [
    (30.0, 150.0, 100.0),
    (180.0, 180.0, 90.0),
    (120.0, 20.0, 80.0),
];

/// Build a catalog over a blank 200x200 frame.
pub fn catalog_from(stars: &[(f64, f64, f64)]) -> StarCatalog {
    let centroids = stars.iter().map(|&(x, y, _)| Point::new(x, y)).collect();
    let magnitudes = stars.iter().map(|&(_, _, m)| m).collect();
    StarCatalog::new(centroids, magnitudes, Array2::zeros((200, 200))).unwrap()
}

/// Apply `transform` to every star position, keeping magnitudes.
pub fn transform_stars(
    stars: &[(f64, f64, f64)],
    transform: &AffineTransform,
) -> Vec<(f64, f64, f64)> {
    stars
        .iter()
        .map(|&(x, y, m)| {
            let p = transform.apply(Point::new(x, y));
            (p.x, p.y, m)
        })
        .collect()
}

/// Star at `radius` pixels and `degrees` bearing from `(cx, cy)`.
pub fn star_at(cx: f64, cy: f64, degrees: f64, radius: f64, magnitude: f64) -> (f64, f64, f64) {
    let a = degrees.to_radians();
    (cx + radius * a.cos(), cy + radius * a.sin(), magnitude)
}

/// Render Gaussian stars `(x, y, peak)` on a black frame of shape `(h, w)`.
///
/// Each star is cut off at 4 sigma so distant stars never overlap.
pub fn render_starfield(h: usize, w: usize, stars: &[(f64, f64, f32)], sigma: f64) -> Array2<f32> {
    let mut data = Array2::<f32>::zeros((h, w));
    let reach = (4.0 * sigma).ceil() as i64;
    for &(x, y, peak) in stars {
        let (cx, cy) = (x.round() as i64, y.round() as i64);
        for row in (cy - reach)..=(cy + reach) {
            for col in (cx - reach)..=(cx + reach) {
                if row < 0 || col < 0 || row >= h as i64 || col >= w as i64 {
                    continue;
                }
                let d2 = (col as f64 - x).powi(2) + (row as f64 - y).powi(2);
                let v = peak as f64 * (-d2 / (2.0 * sigma * sigma)).exp();
                data[[row as usize, col as usize]] += v as f32;
            }
        }
    }
    data
}

/// Render and save a starfield as an 8-bit PNG.
pub fn write_starfield(path: &Path, h: usize, w: usize, stars: &[(f64, f64, f32)]) {
    let data = render_starfield(h, w, stars, 1.5);
    save_gray8(&to_gray8(&data), path).unwrap();
}
