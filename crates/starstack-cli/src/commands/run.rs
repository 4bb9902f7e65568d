use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use starstack_core::pipeline::PipelineConfig;
use tracing::info;

use super::progress::run_with_progress;
use crate::summary::{print_pipeline_report, print_pipeline_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline config file (TOML)
    pub config: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    let config: PipelineConfig = toml::from_str(&contents).context("Invalid pipeline config")?;
    info!(config = %args.config.display(), "Loaded pipeline config");

    print_pipeline_summary(&config);
    let output = run_with_progress(&config)?;
    print_pipeline_report(&output, &config);
    Ok(())
}
