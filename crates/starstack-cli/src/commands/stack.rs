use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use starstack_core::detection::ThresholdMode;
use starstack_core::pipeline::PipelineConfig;

use super::align::MethodArg;
use super::progress::run_with_progress;
use crate::summary::{print_pipeline_report, print_pipeline_summary};

#[derive(Args)]
pub struct StackArgs {
    /// Directory of images to stack
    pub dir: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// File name of the reference frame (default: first image)
    #[arg(long)]
    pub reference: Option<String>,

    /// Number of reference stars used for alignment
    #[arg(long, default_value = "5")]
    pub stars: usize,

    /// Fixed detection threshold (0-255) instead of solving one
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Angle tolerance in radians
    #[arg(long, default_value = "0.01")]
    pub tolerance: f64,

    /// Star invariant used for matching
    #[arg(long, value_enum, default_value = "polar")]
    pub method: MethodArg,
}

pub fn run(args: &StackArgs) -> Result<()> {
    let mut config = PipelineConfig::new(&args.dir, &args.output);
    config.reference_frame = args.reference.clone();
    config.detection.reference_star_count = args.stars;
    if let Some(t) = args.threshold {
        config.detection.threshold = ThresholdMode::Fixed(t);
    }
    config.alignment.matching.angle_tolerance = args.tolerance;
    config.alignment.matching.invariant_method = args.method.into();

    print_pipeline_summary(&config);
    let output = run_with_progress(&config)?;
    print_pipeline_report(&output, &config);
    Ok(())
}
