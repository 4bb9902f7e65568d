use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ADDITIONAL_STAR_MULTIPLIER, DEFAULT_ALIGNING_STARS, DEFAULT_MAX_STAR_AREA,
    DEFAULT_MIN_STAR_AREA,
};

/// How the detection threshold is chosen.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// Fixed threshold on the 8-bit intensity scale.
    Fixed(f32),
    /// Highest threshold that still yields the wanted number of stars.
    #[default]
    Solve,
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(t) => write!(f, "Fixed ({t})"),
            Self::Solve => write!(f, "Solve"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub threshold: ThresholdMode,
    /// Stars kept in the reference catalog (brightest first).
    #[serde(default = "default_reference_star_count")]
    pub reference_star_count: usize,
    /// Additional frames keep `reference_star_count * additional_star_multiplier` stars.
    #[serde(default = "default_additional_star_multiplier")]
    pub additional_star_multiplier: usize,
    /// Smallest component area (pixels) accepted as a star.
    #[serde(default = "default_min_area")]
    pub min_area: usize,
    /// Largest component area (pixels) accepted as a star.
    #[serde(default = "default_max_area")]
    pub max_area: usize,
}

fn default_reference_star_count() -> usize {
    DEFAULT_ALIGNING_STARS
}
fn default_additional_star_multiplier() -> usize {
    DEFAULT_ADDITIONAL_STAR_MULTIPLIER
}
fn default_min_area() -> usize {
    DEFAULT_MIN_STAR_AREA
}
fn default_max_area() -> usize {
    DEFAULT_MAX_STAR_AREA
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdMode::default(),
            reference_star_count: DEFAULT_ALIGNING_STARS,
            additional_star_multiplier: DEFAULT_ADDITIONAL_STAR_MULTIPLIER,
            min_area: DEFAULT_MIN_STAR_AREA,
            max_area: DEFAULT_MAX_STAR_AREA,
        }
    }
}

impl DetectionConfig {
    pub fn additional_star_count(&self) -> usize {
        self.reference_star_count
            .saturating_mul(self.additional_star_multiplier.max(1))
    }

    pub fn accepts_area(&self, area: usize) -> bool {
        area >= self.min_area && area <= self.max_area
    }
}
