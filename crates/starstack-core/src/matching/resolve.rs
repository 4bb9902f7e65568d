use tracing::debug;

use crate::catalog::StarCatalog;
use crate::error::{Result, StarStackError};
use crate::frame::Point;
use crate::invariants::{angle_difference, signed_angle_difference, AnchorInvariants};

use super::config::MatchConfig;

/// The additional-frame star found for one reference star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStar {
    /// Position of the star in the additional invariants.
    pub invariant_index: usize,
    /// Position of the star in the additional catalog.
    pub catalog_index: usize,
    pub coord: Point,
    /// Bearing of the star in the additional frame, unwrapped onto the
    /// reference star's branch and kept above the anchor's 0.
    pub angle: f64,
}

/// Find the unique additional-frame star matching non-anchor reference star
/// `star` (an index into `reference`'s invariants).
///
/// Candidates within the angle tolerance are accepted when unique; otherwise
/// they are narrowed by radius. Fails with [`StarStackError::NoMatch`] when no
/// bearing fits and [`StarStackError::AmbiguousMatch`] when the radius filter
/// does not leave exactly one star.
pub fn resolve_one(
    reference: &AnchorInvariants,
    star: usize,
    additional: &AnchorInvariants,
    catalog: &StarCatalog,
    config: &MatchConfig,
) -> Result<ResolvedStar> {
    let (Some(&theta), Some(&radius)) = (reference.angles.get(star), reference.radii.get(star))
    else {
        return Err(StarStackError::InvalidCatalog(format!(
            "reference star {star} out of range ({} non-anchor stars)",
            reference.len()
        )));
    };

    let by_angle: Vec<usize> = additional
        .angles
        .iter()
        .enumerate()
        .filter(|(_, angle)| angle_difference(**angle, theta) < config.angle_tolerance)
        .map(|(k, _)| k)
        .collect();

    let chosen = match by_angle.as_slice() {
        [] => {
            if config.verbosity.detailed() {
                debug!(star, angle = theta, "no candidate within angle tolerance");
            }
            return Err(StarStackError::NoMatch { star, angle: theta });
        }
        [only] => *only,
        _ => {
            let radius_tolerance = config.radius_tolerance();
            let by_radius: Vec<usize> = by_angle
                .iter()
                .copied()
                .filter(|&k| (additional.radii[k] - radius).abs() < radius_tolerance)
                .collect();
            if config.verbosity.detailed() {
                debug!(
                    star,
                    target_radius = radius,
                    angle_candidates = ?by_angle,
                    radius_candidates = ?by_radius,
                    "distance check needed"
                );
            }
            match by_radius.as_slice() {
                [only] => *only,
                _ => {
                    return Err(StarStackError::AmbiguousMatch {
                        star,
                        candidates: by_angle.len(),
                    })
                }
            }
        }
    };

    let coord = additional.non_anchor_coords[chosen];
    let catalog_index = catalog.index_of(&coord).ok_or_else(|| {
        StarStackError::InvalidCatalog(format!("invariant coordinate {coord} is not in the catalog"))
    })?;

    if config.verbosity.detailed() {
        debug!(star, catalog_index, %coord, "identified alignment star");
    }

    let unwrapped = theta + signed_angle_difference(additional.angles[chosen], theta);

    Ok(ResolvedStar {
        invariant_index: chosen,
        catalog_index,
        coord: catalog.centroids()[catalog_index],
        angle: unwrapped.max(f64::MIN_POSITIVE),
    })
}
