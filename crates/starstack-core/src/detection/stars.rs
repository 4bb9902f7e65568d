use ndarray::Array2;
use tracing::debug;

use crate::catalog::StarCatalog;
use crate::error::{Result, StarStackError};
use crate::frame::Point;

use super::components::label_components;
use super::config::DetectionConfig;

/// Number of star-sized components at `threshold`.
pub fn count_stars(data: &Array2<f32>, threshold: f32, config: &DetectionConfig) -> usize {
    label_components(data, threshold)
        .iter()
        .filter(|c| config.accepts_area(c.area))
        .count()
}

/// Detect stars at a fixed threshold.
///
/// Every 4-connected component of pixels `>= threshold` whose area is within
/// the configured bounds becomes a star: its centroid is intensity weighted
/// and its magnitude is its summed intensity. Stars are ordered brightest
/// first and at most `max_stars` are kept.
pub fn detect_stars(
    data: &Array2<f32>,
    threshold: f32,
    max_stars: Option<usize>,
    config: &DetectionConfig,
) -> Result<StarCatalog> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return Err(StarStackError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    let mut stars: Vec<(Point, f64)> = label_components(data, threshold)
        .into_iter()
        .filter(|c| config.accepts_area(c.area))
        .map(|c| {
            let (row, col) = c.centroid();
            (Point::new(col, row), c.flux)
        })
        .collect();

    if stars.is_empty() {
        return Err(StarStackError::NoStarsDetected { threshold });
    }

    stars.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(max) = max_stars {
        stars.truncate(max.max(1));
    }
    debug!(threshold, stars = stars.len(), "Detected stars");

    let (centroids, magnitudes): (Vec<Point>, Vec<f64>) = stars.into_iter().unzip();
    StarCatalog::new(centroids, magnitudes, data.clone())
}
