use ndarray::Array2;

use crate::align::AffineTransform;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    Detection,
    Alignment,
    Stacking,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading frames"),
            Self::Detection => write!(f, "Detecting stars"),
            Self::Alignment => write!(f, "Aligning frames"),
            Self::Stacking => write!(f, "Stacking"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Outcome for one input frame.
#[derive(Clone, Debug)]
pub enum FrameStatus {
    Reference,
    Aligned {
        transform: AffineTransform,
        matched_stars: usize,
        anchor_trials: usize,
        residual: f64,
    },
    /// The frame was skipped; the message says why.
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct FrameReport {
    pub name: String,
    pub status: FrameStatus,
}

impl FrameReport {
    pub fn is_aligned(&self) -> bool {
        matches!(self.status, FrameStatus::Aligned { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FrameStatus::Failed(_))
    }
}

/// Result of a pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Mean of the reference and every aligned frame, on the 8-bit scale.
    pub stacked: Array2<f32>,
    pub reference_name: String,
    /// Detection threshold used for the reference frame.
    pub reference_threshold: f32,
    /// Detection threshold shared by the additional frames.
    pub additional_threshold: Option<f32>,
    /// One report per input frame, in input order.
    pub frames: Vec<FrameReport>,
}

impl PipelineOutput {
    /// Frames that contributed to the stack, including the reference.
    pub fn stacked_count(&self) -> usize {
        1 + self.frames.iter().filter(|f| f.is_aligned()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_failed()).count()
    }
}

/// Receives stage and per-frame progress while a run is in flight.
///
/// Alignment calls `advance` from rayon workers, hence `Send + Sync`.
pub trait ProgressReporter: Send + Sync {
    /// `total_items` is the number of frames the stage will touch, when known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// Cumulative count of finished items in the current stage.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

/// Stand-in for callers of `run_pipeline` that want no progress.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
