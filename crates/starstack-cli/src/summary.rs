use std::fmt::Display;

use console::Style;
use starstack_core::consts::{REFERENCE_OUTPUT_NAME, STACKED_OUTPUT_NAME};
use starstack_core::pipeline::{FrameStatus, PipelineConfig, PipelineOutput};

struct Styles {
    heading: Style,
    label: Style,
    value: Style,
    choice: Style,
    failed: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            choice: Style::new().green(),
            failed: Style::new().red(),
            path: Style::new().underlined(),
        }
    }

    fn section(&self, name: &str) {
        println!("  {}", self.heading.apply_to(name));
    }

    /// One `label  value` line; `indent` selects top level or section body.
    fn field(&self, indent: usize, label: &str, value: impl Display) {
        let pad = if indent == 0 { 14 } else { 12 };
        println!(
            "  {:indent$}{:<pad$}{value}",
            "",
            self.label.apply_to(label),
            indent = indent * 2,
        );
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();
    let title = "StarStack Pipeline";

    println!();
    s.section(title);
    s.section(&"\u{2550}".repeat(title.len()));
    println!();

    s.field(0, "Input", s.path.apply_to(config.input.display()));
    s.field(0, "Output", s.path.apply_to(config.output.display()));
    let reference = config.reference_frame.as_deref().unwrap_or("first frame");
    s.field(0, "Reference", s.value.apply_to(reference));
    println!();

    let detection = &config.detection;
    s.section("Detection");
    s.field(1, "Threshold", s.choice.apply_to(&detection.threshold));
    let stars = format!(
        "{} ref / {} per frame",
        detection.reference_star_count,
        detection.additional_star_count()
    );
    s.field(1, "Stars", s.value.apply_to(stars));
    println!();

    let matching = &config.alignment.matching;
    s.section("Alignment");
    s.field(1, "Invariant", s.choice.apply_to(&matching.invariant_method));
    let tolerance = format!(
        "{} rad / {} px",
        matching.angle_tolerance,
        matching.radius_tolerance()
    );
    s.field(1, "Tolerance", s.value.apply_to(tolerance));
    s.field(
        1,
        "Resampling",
        s.choice.apply_to(&config.alignment.warp.interpolation),
    );
    println!();

    s.section("Stacking");
    s.field(1, "Method", s.choice.apply_to(&config.stacking.method));
    println!();
}

fn describe_status(s: &Styles, status: &FrameStatus) -> String {
    match status {
        FrameStatus::Reference => s.choice.apply_to("reference").to_string(),
        FrameStatus::Aligned {
            transform,
            matched_stars,
            anchor_trials,
            residual,
        } => {
            let (dx, dy) = transform.translation_components();
            s.value
                .apply_to(format!(
                    "shift ({dx:.1}, {dy:.1})  {matched_stars} stars  \
                     {anchor_trials} trial(s)  rms {residual:.2} px"
                ))
                .to_string()
        }
        FrameStatus::Failed(reason) => s.failed.apply_to(reason).to_string(),
    }
}

pub fn print_pipeline_report(output: &PipelineOutput, config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    s.section("Frames");
    for report in &output.frames {
        println!("    {:<24}{}", report.name, describe_status(&s, &report.status));
    }
    println!();

    let stacked = format!(
        "{} of {} frames",
        output.stacked_count(),
        output.frames.len()
    );
    s.field(0, "Stacked", s.value.apply_to(stacked));
    for (label, name) in [("Saved", STACKED_OUTPUT_NAME), ("", REFERENCE_OUTPUT_NAME)] {
        s.field(0, label, s.path.apply_to(config.output.join(name).display()));
    }
    println!();
}
