use ndarray::{Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_INTENSITY, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{Result, StarStackError};
use crate::frame::Point;

use super::transform::AffineTransform;

/// Sampling used when a source coordinate falls between pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "Nearest"),
            Self::Bilinear => write!(f, "Bilinear"),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WarpConfig {
    #[serde(default)]
    pub interpolation: Interpolation,
}

/// Resample `source` onto a grid of `output_shape` = (height, width).
///
/// `transform` maps source coordinates onto output coordinates; every output
/// pixel is fetched from the source through its inverse. Pixels that map
/// outside the source are 0. Values are clamped to [0, 255] and rounded to u8.
pub fn warp_to_reference(
    source: &Array2<f32>,
    transform: &AffineTransform,
    output_shape: (usize, usize),
    interpolation: Interpolation,
) -> Result<Array2<u8>> {
    let (h, w) = output_shape;
    if h == 0 || w == 0 {
        return Err(StarStackError::InvalidDimensions {
            width: w,
            height: h,
        });
    }
    let inverse = transform.inverse()?;
    let mut result = Array2::<u8>::zeros((h, w));

    let fill_row = |row: usize, out: ndarray::ArrayViewMut1<u8>| {
        for (col, pixel) in out.into_iter().enumerate() {
            let src = inverse.apply(Point::new(col as f64, row as f64));
            let value = match interpolation {
                Interpolation::Bilinear => bilinear_sample(source, src.y, src.x),
                Interpolation::Nearest => nearest_sample(source, src.y, src.x),
            };
            *pixel = to_u8(value);
        }
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, out)| fill_row(row, out));
    } else {
        for (row, out) in result.axis_iter_mut(Axis(0)).enumerate() {
            fill_row(row, out);
        }
    }

    Ok(result)
}

fn to_u8(value: f32) -> u8 {
    value.clamp(0.0, MAX_INTENSITY).round() as u8
}

/// Pixel value at integer (row, col), or 0 outside the image.
fn pixel_or_zero(data: &Array2<f32>, row: i64, col: i64) -> f32 {
    match (usize::try_from(row), usize::try_from(col)) {
        (Ok(r), Ok(c)) => data.get([r, c]).copied().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Bilinear sample at fractional (row, col). Neighbours outside the image count as 0.
pub fn bilinear_sample(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();
    // Rejects NaN too. Beyond this band every neighbour is outside.
    if !(-1.0..h as f64).contains(&y) || !(-1.0..w as f64).contains(&x) {
        return 0.0;
    }
    let (top, left) = (y.floor(), x.floor());
    let (ty, tx) = ((y - top) as f32, (x - left) as f32);
    let (r, c) = (top as i64, left as i64);

    let upper = pixel_or_zero(data, r, c) * (1.0 - tx) + pixel_or_zero(data, r, c + 1) * tx;
    let lower = pixel_or_zero(data, r + 1, c) * (1.0 - tx) + pixel_or_zero(data, r + 1, c + 1) * tx;
    upper * (1.0 - ty) + lower * ty
}

fn nearest_sample(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    if !(y.is_finite() && x.is_finite()) {
        return 0.0;
    }
    pixel_or_zero(data, y.round() as i64, x.round() as i64)
}
