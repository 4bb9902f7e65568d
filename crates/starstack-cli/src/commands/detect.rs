use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use starstack_core::detection::{detect_stars, solve_threshold, DetectionConfig};
use starstack_core::io::load_image;

#[derive(Args)]
pub struct DetectArgs {
    /// Input image
    pub file: PathBuf,

    /// Fixed detection threshold (0-255)
    #[arg(long, conflicts_with = "stars")]
    pub threshold: Option<f32>,

    /// Number of stars to solve the threshold for
    #[arg(long, default_value = "5")]
    pub stars: usize,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let frame = load_image(&args.file)?;
    let config = DetectionConfig::default();

    let (threshold, limit) = match args.threshold {
        Some(t) => (t, None),
        None => (solve_threshold(&frame.data, args.stars, &config)?, Some(args.stars)),
    };
    let catalog = detect_stars(&frame.data, threshold, limit, &config)?;

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", frame.width(), frame.height());
    println!("Threshold:   {threshold}");
    println!("Stars:       {}", catalog.len());
    println!();
    println!("  {:>4}  {:>10}  {:>10}  {:>12}", "#", "x", "y", "flux");
    for (i, (p, m)) in catalog
        .centroids()
        .iter()
        .zip(catalog.magnitudes())
        .enumerate()
    {
        println!("  {:>4}  {:>10.2}  {:>10.2}  {:>12.1}", i, p.x, p.y, m);
    }

    Ok(())
}
