//! 2D affine transform and its least-squares estimation.

use nalgebra::DMatrix;

use crate::consts::{COLLINEARITY_EPSILON, SINGULAR_DETERMINANT};
use crate::error::{Result, StarStackError};
use crate::frame::Point;

/// `x' = a·x + b·y + tx`, `y' = c·x + d·y + ty`.
///
/// Parameters are stored row-major as `[a, b, tx, c, d, ty]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    params: [f64; 6],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        params: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    pub fn new(params: [f64; 6]) -> Self {
        Self { params }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    /// Rotation by `angle` radians and uniform `scale` about the origin, then
    /// translation by `(tx, ty)`.
    pub fn similarity(angle: f64, scale: f64, tx: f64, ty: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        Self::new([
            scale * cos_a,
            -scale * sin_a,
            tx,
            scale * sin_a,
            scale * cos_a,
            ty,
        ])
    }

    pub fn params(&self) -> [f64; 6] {
        self.params
    }

    pub fn apply(&self, p: Point) -> Point {
        let [a, b, tx, c, d, ty] = self.params;
        Point::new(a * p.x + b * p.y + tx, c * p.x + d * p.y + ty)
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, _, c, d, _] = self.params;
        a * d - b * c
    }

    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
            return Err(StarStackError::DegenerateTransform(format!(
                "transform is not invertible (determinant {det:e})"
            )));
        }
        let [a, b, tx, c, d, ty] = self.params;
        let inv_det = 1.0 / det;
        let ia = d * inv_det;
        let ib = -b * inv_det;
        let ic = -c * inv_det;
        let id = a * inv_det;
        Ok(Self::new([
            ia,
            ib,
            -(ia * tx + ib * ty),
            ic,
            id,
            -(ic * tx + id * ty),
        ]))
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &AffineTransform) -> Self {
        let [a1, b1, tx1, c1, d1, ty1] = self.params;
        let [a2, b2, tx2, c2, d2, ty2] = next.params;
        Self::new([
            a2 * a1 + b2 * c1,
            a2 * b1 + b2 * d1,
            a2 * tx1 + b2 * ty1 + tx2,
            c2 * a1 + d2 * c1,
            c2 * b1 + d2 * d1,
            c2 * tx1 + d2 * ty1 + ty2,
        ])
    }

    pub fn translation_components(&self) -> (f64, f64) {
        (self.params[2], self.params[5])
    }

    /// Rotation of the x axis, in radians.
    pub fn rotation_angle(&self) -> f64 {
        self.params[3].atan2(self.params[0])
    }

    /// Geometric mean scale, `sqrt(|det|)`.
    pub fn scale_factor(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    pub fn abs_diff_eq(&self, other: &AffineTransform, epsilon: f64) -> bool {
        self.params
            .iter()
            .zip(other.params.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl std::fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (dx, dy) = self.translation_components();
        write!(
            f,
            "Affine(dx={:.2}, dy={:.2}, rot={:.3}°, scale={:.4})",
            dx,
            dy,
            self.rotation_angle().to_degrees(),
            self.scale_factor()
        )
    }
}

/// Least-squares affine transform mapping `source[i]` onto `target[i]`.
///
/// Exact for three pairs. Needs at least three pairs that are not collinear;
/// anything less leaves the transform underdetermined and fails with
/// [`StarStackError::DegenerateTransform`].
pub fn estimate_affine(source: &[Point], target: &[Point]) -> Result<AffineTransform> {
    if source.len() != target.len() {
        return Err(StarStackError::DegenerateTransform(format!(
            "{} source points but {} target points",
            source.len(),
            target.len()
        )));
    }
    let n = source.len();
    if n < 3 {
        return Err(StarStackError::DegenerateTransform(format!(
            "{n} matched pairs, at least 3 required"
        )));
    }

    // Center the source points so the design matrix is well conditioned for
    // large pixel coordinates.
    let cx = source.iter().map(|p| p.x).sum::<f64>() / n as f64;
    let cy = source.iter().map(|p| p.y).sum::<f64>() / n as f64;

    let design = DMatrix::from_fn(n, 3, |row, col| match col {
        0 => source[row].x - cx,
        1 => source[row].y - cy,
        _ => 1.0,
    });
    let rhs = DMatrix::from_fn(n, 2, |row, col| match col {
        0 => target[row].x,
        _ => target[row].y,
    });

    let svd = design.svd(true, true);
    let max_sv = svd.singular_values.max();
    let min_sv = svd.singular_values.min();
    if !max_sv.is_finite() || max_sv <= 0.0 || min_sv / max_sv < COLLINEARITY_EPSILON {
        return Err(StarStackError::DegenerateTransform(
            "matched points are collinear".into(),
        ));
    }

    let solution = svd
        .solve(&rhs, COLLINEARITY_EPSILON * max_sv)
        .map_err(|e| StarStackError::DegenerateTransform(e.to_string()))?;

    let (a, b, t_x) = (solution[(0, 0)], solution[(1, 0)], solution[(2, 0)]);
    let (c, d, t_y) = (solution[(0, 1)], solution[(1, 1)], solution[(2, 1)]);
    let transform = AffineTransform::new([a, b, t_x - a * cx - b * cy, c, d, t_y - c * cx - d * cy]);

    if transform.determinant().abs() < SINGULAR_DETERMINANT {
        return Err(StarStackError::DegenerateTransform(
            "fitted transform is singular".into(),
        ));
    }
    Ok(transform)
}

/// Root-mean-square distance between `transform(source[i])` and `target[i]`.
pub fn rms_residual(transform: &AffineTransform, source: &[Point], target: &[Point]) -> f64 {
    let n = source.len().min(target.len());
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = source
        .iter()
        .zip(target.iter())
        .map(|(s, t)| {
            let p = transform.apply(*s);
            (p.x - t.x).powi(2) + (p.y - t.y).powi(2)
        })
        .sum();
    (sum_sq / n as f64).sqrt()
}
