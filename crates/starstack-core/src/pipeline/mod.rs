pub mod config;
mod orchestrator;
mod types;

pub use config::{PipelineConfig, StackMethod, StackingConfig};
pub use orchestrator::{run_pipeline, run_pipeline_reported, write_outputs};
pub use types::{FrameReport, FrameStatus, PipelineOutput, PipelineStage, ProgressReporter};
