use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use starstack_core::pipeline::PipelineConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Frame directory to put in the template
    #[arg(long, default_value = "frames")]
    pub frames: PathBuf,

    /// Output directory to put in the template
    #[arg(long, default_value = "output")]
    pub results: PathBuf,

    /// Save the template here instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Emit a pipeline config with every option at its default, for `run`.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let template = PipelineConfig::new(&args.frames, &args.results);
    let text = toml::to_string_pretty(&template).context("Failed to serialize config")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Config template written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
