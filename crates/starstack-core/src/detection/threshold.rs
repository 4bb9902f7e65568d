use ndarray::Array2;
use tracing::debug;

use crate::consts::MAX_INTENSITY;
use crate::error::{Result, StarStackError};

use super::config::DetectionConfig;
use super::stars::count_stars;

/// Highest integer threshold at which at least `desired` stars are detected.
///
/// Component count is not monotone in the threshold (lowering it can merge
/// neighbours), so thresholds are scanned downwards from the brightest pixel.
/// When no threshold reaches `desired`, the one with the most stars wins.
pub fn solve_threshold(data: &Array2<f32>, desired: usize, config: &DetectionConfig) -> Result<f32> {
    let max_val = data
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0f32, f32::max)
        .min(MAX_INTENSITY);
    let start = max_val.floor() as i32;
    if start < 1 {
        return Err(StarStackError::NoStarsDetected { threshold: 1.0 });
    }

    let mut best: Option<(f32, usize)> = None;
    for t in (1..=start).rev() {
        let threshold = t as f32;
        let count = count_stars(data, threshold, config);
        if count >= desired.max(1) {
            debug!(threshold, count, desired, "Star detection threshold solved");
            return Ok(threshold);
        }
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((threshold, count));
        }
    }

    match best {
        Some((threshold, count)) if count > 0 => {
            debug!(threshold, count, desired, "Fewer stars than desired at any threshold");
            Ok(threshold)
        }
        _ => Err(StarStackError::NoStarsDetected { threshold: 1.0 }),
    }
}
