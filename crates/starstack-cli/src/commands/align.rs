use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use starstack_core::align::{align, AlignConfig};
use starstack_core::detection::{detect_stars, solve_threshold, DetectionConfig};
use starstack_core::invariants::InvariantMethod;
use starstack_core::io::{load_image, save_gray8};

#[derive(Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Bearing from the anchor (translation only, small rotations)
    Polar,
    /// Bearing relative to the brightest companion (rotation invariant)
    Relative,
}

impl From<MethodArg> for InvariantMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Polar => InvariantMethod::Polar,
            MethodArg::Relative => InvariantMethod::RelativeBearing,
        }
    }
}

#[derive(Args)]
pub struct AlignArgs {
    /// Reference image
    pub reference: PathBuf,

    /// Image to align onto the reference
    pub image: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "aligned.png")]
    pub output: PathBuf,

    /// Number of reference stars used for alignment
    #[arg(long, default_value = "5")]
    pub stars: usize,

    /// Angle tolerance in radians
    #[arg(long, default_value = "0.01")]
    pub tolerance: f64,

    /// Star invariant used for matching
    #[arg(long, value_enum, default_value = "polar")]
    pub method: MethodArg,
}

pub fn run(args: &AlignArgs) -> Result<()> {
    let reference = load_image(&args.reference)
        .with_context(|| format!("Failed to load {}", args.reference.display()))?;
    let image = load_image(&args.image)
        .with_context(|| format!("Failed to load {}", args.image.display()))?;

    let detection = DetectionConfig {
        reference_star_count: args.stars,
        ..Default::default()
    };
    let ref_threshold = solve_threshold(&reference.data, args.stars, &detection)?;
    let ref_catalog = detect_stars(&reference.data, ref_threshold, Some(args.stars), &detection)?;
    let wanted = detection.additional_star_count();
    let add_threshold = solve_threshold(&image.data, wanted, &detection)?;
    let add_catalog = detect_stars(&image.data, add_threshold, Some(wanted), &detection)?;
    println!(
        "Detected {} reference stars (threshold {}) and {} image stars (threshold {})",
        ref_catalog.len(),
        ref_threshold,
        add_catalog.len(),
        add_threshold
    );

    let mut config = AlignConfig::default();
    config.matching.angle_tolerance = args.tolerance;
    config.matching.invariant_method = args.method.into();

    let aligned = align(&ref_catalog, &add_catalog, &config)?;
    let (dx, dy) = aligned.transform.translation_components();
    println!("Transform:   {}", aligned.transform);
    println!("Shift:       ({dx:.2}, {dy:.2}) px");
    println!("Rotation:    {:.4} deg", aligned.transform.rotation_angle().to_degrees());
    println!("Matched:     {} stars", aligned.correspondence.len());
    println!("Anchor:      star {} after {} trial(s)", aligned.anchor_index, aligned.trials);
    println!("Residual:    {:.3} px", aligned.residual);

    save_gray8(&aligned.pixels, &args.output)?;
    println!("Saved to {}", args.output.display());
    Ok(())
}
