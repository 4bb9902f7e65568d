use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use starstack_core::pipeline::{
    run_pipeline_reported, PipelineConfig, PipelineOutput, PipelineStage, ProgressReporter,
};

/// Drives an indicatif bar from pipeline stage events.
struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        self.pb.set_length(total_items.unwrap_or(0) as u64);
        self.pb.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }
}

/// Run the pipeline behind a progress bar.
pub fn run_with_progress(config: &PipelineConfig) -> Result<PipelineOutput> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let reporter = Arc::new(BarReporter { pb: pb.clone() });
    let output = run_pipeline_reported(config, reporter);
    match output {
        Ok(output) => {
            pb.finish_with_message("Done");
            Ok(output)
        }
        Err(e) => {
            pb.abandon();
            Err(e.into())
        }
    }
}
