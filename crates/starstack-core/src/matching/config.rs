use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::StarCatalog;
use crate::consts::{DEFAULT_ANGLE_TOLERANCE, DEFAULT_RADIUS_TOLERANCE_SCALE};
use crate::error::{Result, StarStackError};
use crate::invariants::InvariantMethod;

/// How much the matcher reports about its search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verbosity {
    Silent,
    /// One event per anchor trial.
    #[default]
    Summary,
    /// Per-star candidate diagnostics as well.
    Detailed,
}

impl Verbosity {
    pub fn summary(self) -> bool {
        self >= Verbosity::Summary
    }

    pub fn detailed(self) -> bool {
        self >= Verbosity::Detailed
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => write!(f, "Silent"),
            Self::Summary => write!(f, "Summary"),
            Self::Detailed => write!(f, "Detailed"),
        }
    }
}

/// Parameters of the correspondence search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Maximum bearing difference (radians) between matching stars.
    #[serde(default = "default_angle_tolerance")]
    pub angle_tolerance: f64,
    /// Radius tolerance is `angle_tolerance * radius_tolerance_scale` pixels.
    ///
    /// Empirical: it assumes radians for angles and pixels for radii. Retune
    /// it whenever either unit changes.
    #[serde(default = "default_radius_tolerance_scale")]
    pub radius_tolerance_scale: f64,
    #[serde(default)]
    pub invariant_method: InvariantMethod,
    /// Anchor star of the reference catalog. `None` picks the brightest.
    #[serde(default)]
    pub reference_anchor: Option<usize>,
    /// Upper bound on anchor trials. Never exceeds the additional catalog size.
    #[serde(default)]
    pub max_anchor_trials: Option<usize>,
    #[serde(default)]
    pub verbosity: Verbosity,
}

fn default_angle_tolerance() -> f64 {
    DEFAULT_ANGLE_TOLERANCE
}
fn default_radius_tolerance_scale() -> f64 {
    DEFAULT_RADIUS_TOLERANCE_SCALE
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            angle_tolerance: DEFAULT_ANGLE_TOLERANCE,
            radius_tolerance_scale: DEFAULT_RADIUS_TOLERANCE_SCALE,
            invariant_method: InvariantMethod::default(),
            reference_anchor: None,
            max_anchor_trials: None,
            verbosity: Verbosity::default(),
        }
    }
}

impl MatchConfig {
    pub fn radius_tolerance(&self) -> f64 {
        self.angle_tolerance * self.radius_tolerance_scale
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.angle_tolerance.is_finite() && self.angle_tolerance > 0.0) {
            return Err(StarStackError::Config(format!(
                "angle tolerance must be positive, got {}",
                self.angle_tolerance
            )));
        }
        if !(self.radius_tolerance_scale.is_finite() && self.radius_tolerance_scale > 0.0) {
            return Err(StarStackError::Config(format!(
                "radius tolerance scale must be positive, got {}",
                self.radius_tolerance_scale
            )));
        }
        Ok(())
    }

    /// Anchor used for the reference catalog.
    pub fn reference_anchor_for(&self, catalog: &StarCatalog) -> Result<usize> {
        match self.reference_anchor {
            Some(index) if index >= catalog.len() => Err(StarStackError::AnchorOutOfRange {
                index,
                total: catalog.len(),
            }),
            Some(index) => Ok(index),
            None => Ok(catalog.brightest()),
        }
    }

    /// Number of anchor trials allowed against a catalog of `stars` stars.
    pub fn trial_limit(&self, stars: usize) -> usize {
        self.max_anchor_trials.map_or(stars, |max| max.min(stars))
    }
}
