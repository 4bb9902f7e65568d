use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::align::AlignConfig;
use crate::detection::DetectionConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the frames to align.
    pub input: PathBuf,
    /// Directory receiving `reference_frame.png` and `stacked_frame.png`.
    pub output: PathBuf,
    /// File name of the reference frame. Defaults to the first image.
    #[serde(default)]
    pub reference_frame: Option<String>,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub alignment: AlignConfig,
    #[serde(default)]
    pub stacking: StackingConfig,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            reference_frame: None,
            detection: DetectionConfig::default(),
            alignment: AlignConfig::default(),
            stacking: StackingConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StackingConfig {
    #[serde(default)]
    pub method: StackMethod,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackMethod {
    #[default]
    Mean,
}

impl fmt::Display for StackMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => write!(f, "Mean"),
        }
    }
}
