//! Detected stars of one photograph.

use ndarray::Array2;

use crate::error::{Result, StarStackError};
use crate::frame::Point;

/// Star centroids, their brightness and the pixels they were detected in.
///
/// Immutable once built: the matcher only ever reads it. Index `i` of
/// `centroids` and `magnitudes` refer to the same star.
#[derive(Clone, Debug)]
pub struct StarCatalog {
    centroids: Vec<Point>,
    magnitudes: Vec<f64>,
    pixels: Array2<f32>,
}

impl StarCatalog {
    pub fn new(centroids: Vec<Point>, magnitudes: Vec<f64>, pixels: Array2<f32>) -> Result<Self> {
        if centroids.is_empty() {
            return Err(StarStackError::InvalidCatalog(
                "catalog contains no stars".into(),
            ));
        }
        if centroids.len() != magnitudes.len() {
            return Err(StarStackError::InvalidCatalog(format!(
                "{} centroids but {} magnitudes",
                centroids.len(),
                magnitudes.len()
            )));
        }
        if let Some(i) = magnitudes.iter().position(|m| !m.is_finite()) {
            return Err(StarStackError::InvalidCatalog(format!(
                "magnitude of star {i} is not finite"
            )));
        }
        if let Some(i) = centroids
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(StarStackError::InvalidCatalog(format!(
                "centroid of star {i} is not finite"
            )));
        }
        Ok(Self {
            centroids,
            magnitudes,
            pixels,
        })
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    /// Always false for a constructed catalog; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn pixels(&self) -> &Array2<f32> {
        &self.pixels
    }

    pub fn centroid(&self, index: usize) -> Result<Point> {
        self.centroids
            .get(index)
            .copied()
            .ok_or(StarStackError::AnchorOutOfRange {
                index,
                total: self.len(),
            })
    }

    /// Star indices ordered brightest first. Equal magnitudes keep detection order.
    pub fn brightness_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.magnitudes[b].total_cmp(&self.magnitudes[a]));
        order
    }

    pub fn brightest(&self) -> usize {
        self.brightness_order()[0]
    }

    /// Index of the star sitting exactly at `point`, if any.
    pub fn index_of(&self, point: &Point) -> Option<usize> {
        self.centroids.iter().position(|c| c == point)
    }
}
