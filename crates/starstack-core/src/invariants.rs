//! Anchor-relative geometric invariants.
//!
//! Every star other than the anchor is described by its bearing and distance
//! from the anchor. These values depend on the anchor, so they are rebuilt for
//! every anchor hypothesis. [`InvariantComputer::compute_into`] refills an
//! existing [`AnchorInvariants`] so repeated trials reuse one allocation.

use std::f64::consts::{PI, TAU};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::StarCatalog;
use crate::error::Result;
use crate::frame::Point;

/// Bearings and distances of all non-anchor stars, measured from the anchor.
///
/// `angles[k]`, `radii[k]` and `non_anchor_coords[k]` describe the same star.
#[derive(Clone, Debug, Default)]
pub struct AnchorInvariants {
    pub anchor_index: usize,
    /// Radians.
    pub angles: Vec<f64>,
    /// Pixels.
    pub radii: Vec<f64>,
    pub non_anchor_coords: Vec<Point>,
}

impl AnchorInvariants {
    pub fn with_capacity(stars: usize) -> Self {
        Self {
            anchor_index: 0,
            angles: Vec::with_capacity(stars),
            radii: Vec::with_capacity(stars),
            non_anchor_coords: Vec::with_capacity(stars),
        }
    }

    /// Number of non-anchor stars.
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    fn reset(&mut self, anchor_index: usize, stars: usize) {
        self.anchor_index = anchor_index;
        self.angles.clear();
        self.radii.clear();
        self.non_anchor_coords.clear();
        self.angles.reserve(stars);
        self.radii.reserve(stars);
        self.non_anchor_coords.reserve(stars);
    }

    fn push(&mut self, angle: f64, radius: f64, coord: Point) {
        self.angles.push(angle);
        self.radii.push(radius);
        self.non_anchor_coords.push(coord);
    }
}

/// Produces anchor-relative invariants for a catalog.
///
/// Implementations must be pure functions of `(catalog, anchor_index)`.
pub trait InvariantComputer: Send + Sync {
    /// Overwrite `out` with the invariants of `catalog` around `anchor_index`.
    fn compute_into(
        &self,
        catalog: &StarCatalog,
        anchor_index: usize,
        out: &mut AnchorInvariants,
    ) -> Result<()>;

    fn compute(&self, catalog: &StarCatalog, anchor_index: usize) -> Result<AnchorInvariants> {
        let mut out = AnchorInvariants::with_capacity(catalog.len().saturating_sub(1));
        self.compute_into(catalog, anchor_index, &mut out)?;
        Ok(out)
    }
}

/// Image-frame bearing from the anchor, in `(0, 2π]`.
///
/// Invariant to translation only. Rotations smaller than the angle tolerance
/// are absorbed by the matcher. A star level with the anchor on its right
/// gets `2π`, so `0` stays reserved for the anchor pairing.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolarInvariants;

impl InvariantComputer for PolarInvariants {
    fn compute_into(
        &self,
        catalog: &StarCatalog,
        anchor_index: usize,
        out: &mut AnchorInvariants,
    ) -> Result<()> {
        let anchor = catalog.centroid(anchor_index)?;
        out.reset(anchor_index, catalog.len() - 1);

        for (i, star) in catalog.centroids().iter().enumerate() {
            if i == anchor_index {
                continue;
            }
            let dx = star.x - anchor.x;
            let dy = star.y - anchor.y;
            out.push(bearing(dx, dy, 0.0), dx.hypot(dy), *star);
        }
        Ok(())
    }
}

/// Bearing measured from the direction towards the brightest non-anchor star,
/// in `(0, 2π]`.
///
/// Invariant to rotation and translation as long as both frames agree on
/// which star is the brightest neighbour of the anchor. That star itself gets
/// `2π`, so `0` stays reserved for the anchor pairing.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelativeBearingInvariants;

impl InvariantComputer for RelativeBearingInvariants {
    fn compute_into(
        &self,
        catalog: &StarCatalog,
        anchor_index: usize,
        out: &mut AnchorInvariants,
    ) -> Result<()> {
        let anchor = catalog.centroid(anchor_index)?;
        out.reset(anchor_index, catalog.len() - 1);

        // Brightest non-anchor star; the earliest wins a tie.
        let magnitudes = catalog.magnitudes();
        let mut direction_index: Option<usize> = None;
        for (i, magnitude) in magnitudes.iter().enumerate() {
            if i == anchor_index {
                continue;
            }
            match direction_index {
                Some(best) if magnitudes[best].total_cmp(magnitude).is_ge() => {}
                _ => direction_index = Some(i),
            }
        }
        let Some(direction_index) = direction_index else {
            return Ok(());
        };
        let direction = catalog.centroid(direction_index)?;
        let base = (direction.y - anchor.y).atan2(direction.x - anchor.x);

        for (i, star) in catalog.centroids().iter().enumerate() {
            if i == anchor_index {
                continue;
            }
            let dx = star.x - anchor.x;
            let dy = star.y - anchor.y;
            let angle = if i == direction_index {
                TAU
            } else {
                bearing(dx, dy, base)
            };
            out.push(angle, dx.hypot(dy), *star);
        }
        Ok(())
    }
}

/// Bearing of `(dx, dy)` measured from `base`, folded into `(0, 2π]`.
fn bearing(dx: f64, dy: f64, base: f64) -> f64 {
    match (dy.atan2(dx) - base).rem_euclid(TAU) {
        a if a == 0.0 => TAU,
        a => a,
    }
}

/// Selects the invariant producer used by the matcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantMethod {
    #[default]
    Polar,
    RelativeBearing,
}

impl InvariantMethod {
    pub fn computer(&self) -> &'static dyn InvariantComputer {
        match self {
            InvariantMethod::Polar => &PolarInvariants,
            InvariantMethod::RelativeBearing => &RelativeBearingInvariants,
        }
    }
}

impl fmt::Display for InvariantMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polar => write!(f, "Polar"),
            Self::RelativeBearing => write!(f, "Relative Bearing"),
        }
    }
}

/// `a - b` wrapped into `[-π, π)`.
pub fn signed_angle_difference(a: f64, b: f64) -> f64 {
    (a - b + PI).rem_euclid(TAU) - PI
}

/// Smallest difference between two bearings, accounting for wrap-around.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    signed_angle_difference(a, b).abs()
}
