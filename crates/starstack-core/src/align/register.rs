use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::StarCatalog;
use crate::error::Result;
use crate::invariants::AnchorInvariants;
use crate::matching::{prepare_reference, Correspondence, FrameMatcher, MatchConfig, MatchOutcome};

use super::transform::{estimate_affine, rms_residual, AffineTransform};
use super::warp::{warp_to_reference, WarpConfig};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlignConfig {
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub warp: WarpConfig,
}

/// An additional frame resampled onto the reference grid.
#[derive(Clone, Debug)]
pub struct AlignedFrame {
    /// Same shape as the reference pixels.
    pub pixels: Array2<u8>,
    /// Maps additional-frame coordinates onto reference coordinates.
    pub transform: AffineTransform,
    pub correspondence: Correspondence,
    /// Accepted anchor star in the additional catalog.
    pub anchor_index: usize,
    pub trials: usize,
    /// RMS distance (pixels) of the matched stars after transformation.
    pub residual: f64,
}

/// Reference catalog with its invariants computed once.
///
/// Read-only after construction, so one instance can be shared by parallel
/// alignments of many additional frames.
pub struct PreparedReference<'r> {
    catalog: &'r StarCatalog,
    invariants: AnchorInvariants,
    config: AlignConfig,
}

impl<'r> PreparedReference<'r> {
    pub fn new(catalog: &'r StarCatalog, config: &AlignConfig) -> Result<Self> {
        let invariants = prepare_reference(catalog, &config.matching)?;
        Ok(Self {
            catalog,
            invariants,
            config: config.clone(),
        })
    }

    pub fn catalog(&self) -> &StarCatalog {
        self.catalog
    }

    pub fn invariants(&self) -> &AnchorInvariants {
        &self.invariants
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    pub fn find_correspondence(&self, additional: &StarCatalog) -> Result<MatchOutcome> {
        FrameMatcher::new(self.catalog, &self.invariants, &self.config.matching)
            .find_correspondence(additional)
    }

    /// Match, fit and resample `additional` onto the reference grid.
    pub fn align(&self, additional: &StarCatalog) -> Result<AlignedFrame> {
        let outcome = self.find_correspondence(additional)?;
        let transform = estimate_from_correspondence(&outcome.correspondence)?;
        let residual = rms_residual(
            &transform,
            &outcome.correspondence.additional.coords,
            &outcome.correspondence.reference.coords,
        );
        if self.config.matching.verbosity.summary() {
            info!(%transform, residual, "Estimated frame transform");
        }

        let pixels = warp_to_reference(
            additional.pixels(),
            &transform,
            self.catalog.pixels().dim(),
            self.config.warp.interpolation,
        )?;

        Ok(AlignedFrame {
            pixels,
            transform,
            correspondence: outcome.correspondence,
            anchor_index: outcome.anchor_index,
            trials: outcome.trials,
            residual,
        })
    }
}

/// Fit the transform taking the additional matched stars onto the reference ones.
pub fn estimate_from_correspondence(correspondence: &Correspondence) -> Result<AffineTransform> {
    estimate_affine(
        &correspondence.additional.coords,
        &correspondence.reference.coords,
    )
}

/// Align one additional catalog against a reference.
pub fn align(
    reference: &StarCatalog,
    additional: &StarCatalog,
    config: &AlignConfig,
) -> Result<AlignedFrame> {
    PreparedReference::new(reference, config)?.align(additional)
}
