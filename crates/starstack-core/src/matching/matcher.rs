use tracing::{debug, info};

use crate::catalog::StarCatalog;
use crate::error::{Result, StarStackError};
use crate::invariants::AnchorInvariants;

use super::config::MatchConfig;
use super::correspondence::{Correspondence, MatchedPair};
use super::resolve::resolve_one;

/// A successful correspondence search.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    pub correspondence: Correspondence,
    /// Anchor star accepted in the additional catalog.
    pub anchor_index: usize,
    /// Number of anchors tried, including the accepted one.
    pub trials: usize,
}

/// Compute the fixed reference invariants and check that every reference
/// star resolves to itself.
///
/// A reference whose own stars are mutually ambiguous can never produce a
/// full correspondence, so this fails early instead of exhausting every
/// anchor of every additional frame.
pub fn prepare_reference(catalog: &StarCatalog, config: &MatchConfig) -> Result<AnchorInvariants> {
    config.validate()?;
    let anchor = config.reference_anchor_for(catalog)?;
    let invariants = config
        .invariant_method
        .computer()
        .compute(catalog, anchor)?;

    for star in 0..invariants.len() {
        let resolved = resolve_one(&invariants, star, &invariants, catalog, config)?;
        if resolved.invariant_index != star {
            return Err(StarStackError::AmbiguousMatch {
                star,
                candidates: 2,
            });
        }
    }

    if config.verbosity.summary() {
        info!(
            anchor,
            stars = catalog.len(),
            method = %config.invariant_method,
            "Reference invariants ready"
        );
    }
    Ok(invariants)
}

/// Searches an additional catalog for the reference constellation.
///
/// Anchors are tried brightest first. Each trial recomputes the additional
/// invariants into one reused buffer and resolves every reference star, so a
/// trial costs `O(n_reference * n_additional)` and the whole search at most
/// `O(n_reference * n_additional^2)`.
pub struct FrameMatcher<'r> {
    reference: &'r StarCatalog,
    reference_invariants: &'r AnchorInvariants,
    config: &'r MatchConfig,
    scratch: AnchorInvariants,
}

impl<'r> FrameMatcher<'r> {
    pub fn new(
        reference: &'r StarCatalog,
        reference_invariants: &'r AnchorInvariants,
        config: &'r MatchConfig,
    ) -> Self {
        Self {
            reference,
            reference_invariants,
            config,
            scratch: AnchorInvariants::default(),
        }
    }

    pub fn find_correspondence(&mut self, additional: &StarCatalog) -> Result<MatchOutcome> {
        let limit = self.config.trial_limit(additional.len());
        self.scratch = AnchorInvariants::with_capacity(additional.len().saturating_sub(1));

        for (trial, anchor) in additional
            .brightness_order()
            .into_iter()
            .take(limit)
            .enumerate()
        {
            match self.try_anchor(additional, anchor) {
                Ok(correspondence) => {
                    if self.config.verbosity.summary() {
                        info!(
                            anchor,
                            trials = trial + 1,
                            stars = correspondence.len(),
                            "Successful star alignment"
                        );
                    }
                    return Ok(MatchOutcome {
                        correspondence,
                        anchor_index: anchor,
                        trials: trial + 1,
                    });
                }
                Err(err) if err.is_retryable() => {
                    if self.config.verbosity.summary() {
                        debug!(anchor, reason = %err, "Alignment failed, retrying");
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(StarStackError::AnchorExhausted { trials: limit })
    }

    /// Test the hypothesis that `anchor` is the reference anchor's counterpart.
    fn try_anchor(&mut self, additional: &StarCatalog, anchor: usize) -> Result<Correspondence> {
        self.config
            .invariant_method
            .computer()
            .compute_into(additional, anchor, &mut self.scratch)?;

        let reference = self.reference_invariants;
        let mut claimed = vec![false; additional.len()];
        let mut pairs = Vec::with_capacity(reference.len() + 1);

        for star in 0..reference.len() {
            let resolved = resolve_one(reference, star, &self.scratch, additional, self.config)?;
            if std::mem::replace(&mut claimed[resolved.catalog_index], true) {
                return Err(StarStackError::AmbiguousMatch {
                    star,
                    candidates: 2,
                });
            }
            pairs.push(MatchedPair {
                reference: reference.non_anchor_coords[star],
                reference_angle: reference.angles[star],
                additional: resolved.coord,
                additional_angle: resolved.angle,
            });
        }

        pairs.push(MatchedPair::anchor(
            self.reference.centroid(reference.anchor_index)?,
            additional.centroid(anchor)?,
        ));

        let correspondence = Correspondence::from_pairs(pairs);
        if let Some(i) = correspondence.order_conflict() {
            let coord = correspondence.reference.coords[i];
            let star = reference
                .non_anchor_coords
                .iter()
                .position(|c| *c == coord)
                .unwrap_or(i);
            return Err(StarStackError::AmbiguousMatch {
                star,
                candidates: 2,
            });
        }
        Ok(correspondence)
    }
}

/// One-shot search: prepare the reference and match `additional` against it.
pub fn find_correspondence(
    reference: &StarCatalog,
    additional: &StarCatalog,
    config: &MatchConfig,
) -> Result<MatchOutcome> {
    let invariants = prepare_reference(reference, config)?;
    FrameMatcher::new(reference, &invariants, config).find_correspondence(additional)
}
