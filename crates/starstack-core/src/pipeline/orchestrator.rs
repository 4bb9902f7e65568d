use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::align::{AlignedFrame, PreparedReference};
use crate::catalog::StarCatalog;
use crate::consts::{PARALLEL_FRAME_THRESHOLD, REFERENCE_OUTPUT_NAME, STACKED_OUTPUT_NAME};
use crate::detection::{detect_stars, solve_threshold, DetectionConfig, ThresholdMode};
use crate::error::{Result, StarStackError};
use crate::frame::Frame;
use crate::io::{list_image_files, load_image, save_gray8, to_gray8};
use crate::stack::mean_stack;

use super::config::{PipelineConfig, StackMethod};
use super::types::{
    FrameReport, FrameStatus, NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter,
};

/// Run the full pipeline without progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}

/// Run the full processing pipeline with a thread-safe progress reporter.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    let files = list_image_files(&config.input)?;
    if files.is_empty() {
        return Err(StarStackError::EmptySequence);
    }
    let reference_pos = reference_position(&files, config.reference_frame.as_deref())?;
    info!(
        frames = files.len(),
        input = %config.input.display(),
        "Reading frame directory"
    );

    reporter.begin_stage(PipelineStage::Reading, Some(files.len()));
    let reference = load_image(&files[reference_pos])?;
    let mut additional: Vec<(usize, std::result::Result<Frame, String>)> =
        Vec::with_capacity(files.len() - 1);
    for (i, path) in files.iter().enumerate() {
        if i == reference_pos {
            continue;
        }
        let loaded = load_image(path).map_err(|e| {
            let e = e.for_frame(i);
            warn!(frame = %path.display(), error = %e, "Skipping unreadable frame");
            e.to_string()
        });
        additional.push((i, loaded));
        reporter.advance(additional.len() + 1);
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Detection, None);
    let detection = &config.detection;
    let reference_threshold = match detection.threshold {
        ThresholdMode::Fixed(t) => t,
        ThresholdMode::Solve => {
            solve_threshold(&reference.data, detection.reference_star_count, detection)?
        }
    };
    let reference_catalog = detect_stars(
        &reference.data,
        reference_threshold,
        Some(detection.reference_star_count),
        detection,
    )?;
    info!(
        frame = reference.label(),
        threshold = reference_threshold,
        stars = reference_catalog.len(),
        "Reference stars detected"
    );
    let additional_threshold = additional_frame_threshold(&additional, detection);
    if let Some(t) = additional_threshold {
        info!(
            threshold = t,
            wanted = detection.additional_star_count(),
            "Additional frame threshold"
        );
    }
    reporter.finish_stage();

    let prepared = PreparedReference::new(&reference_catalog, &config.alignment)?;

    reporter.begin_stage(PipelineStage::Alignment, Some(additional.len()));
    let done = AtomicUsize::new(0);
    let process = |(index, loaded): &(usize, std::result::Result<Frame, String>)| {
        let result = match loaded {
            Ok(frame) => align_frame(frame, &prepared, additional_threshold, detection)
                .map_err(|e| {
                    let e = e.for_frame(*index);
                    warn!(frame = frame.label(), error = %e, "Skipping frame");
                    e.to_string()
                }),
            Err(msg) => Err(msg.clone()),
        };
        reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
        (*index, result)
    };
    let aligned: Vec<(usize, std::result::Result<AlignedFrame, String>)> =
        if additional.len() >= PARALLEL_FRAME_THRESHOLD {
            additional.par_iter().map(process).collect()
        } else {
            additional.iter().map(process).collect()
        };
    reporter.finish_stage();

    let mut reports: Vec<FrameReport> = Vec::with_capacity(files.len());
    let mut stack_inputs: Vec<Array2<f32>> = vec![reference.data.clone()];
    let mut aligned = aligned.into_iter().peekable();
    for (i, path) in files.iter().enumerate() {
        let name = file_label(path);
        if i == reference_pos {
            reports.push(FrameReport {
                name,
                status: FrameStatus::Reference,
            });
            continue;
        }
        let Some((_, result)) = aligned.next_if(|(idx, _)| *idx == i) else {
            continue;
        };
        let status = match result {
            Ok(frame) => {
                stack_inputs.push(frame.pixels.mapv(f32::from));
                FrameStatus::Aligned {
                    transform: frame.transform,
                    matched_stars: frame.correspondence.len(),
                    anchor_trials: frame.trials,
                    residual: frame.residual,
                }
            }
            Err(msg) => FrameStatus::Failed(msg),
        };
        reports.push(FrameReport { name, status });
    }

    reporter.begin_stage(PipelineStage::Stacking, Some(stack_inputs.len()));
    let stacked = match config.stacking.method {
        StackMethod::Mean => mean_stack(&stack_inputs)?,
    };
    info!(
        frames = stack_inputs.len(),
        method = %config.stacking.method,
        "Stacking complete"
    );
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Writing, Some(2));
    write_outputs(&config.output, &reference.data, &stacked)?;
    reporter.finish_stage();

    Ok(PipelineOutput {
        stacked,
        reference_name: reference.label().to_string(),
        reference_threshold,
        additional_threshold,
        frames: reports,
    })
}

fn reference_position(files: &[PathBuf], name: Option<&str>) -> Result<usize> {
    let Some(name) = name else {
        return Ok(0);
    };
    files
        .iter()
        .position(|p| p.file_name().is_some_and(|f| f == name))
        .ok_or_else(|| StarStackError::Config(format!("reference frame {name} not found")))
}

/// Threshold shared by every additional frame: solved on the first readable one.
fn additional_frame_threshold(
    additional: &[(usize, std::result::Result<Frame, String>)],
    config: &DetectionConfig,
) -> Option<f32> {
    match config.threshold {
        ThresholdMode::Fixed(t) => Some(t),
        ThresholdMode::Solve => additional
            .iter()
            .filter_map(|(_, loaded)| loaded.as_ref().ok())
            .find_map(|frame| {
                solve_threshold(&frame.data, config.additional_star_count(), config)
                    .inspect_err(|e| {
                        warn!(frame = frame.label(), error = %e, "Threshold not solved")
                    })
                    .ok()
            }),
    }
}

fn align_frame(
    frame: &Frame,
    prepared: &PreparedReference<'_>,
    threshold: Option<f32>,
    config: &DetectionConfig,
) -> Result<AlignedFrame> {
    let threshold = threshold.ok_or(StarStackError::NoStarsDetected { threshold: 1.0 })?;
    let catalog: StarCatalog = detect_stars(
        &frame.data,
        threshold,
        Some(config.additional_star_count()),
        config,
    )?;
    prepared.align(&catalog)
}

/// Write the reference and stacked frames, replacing previous outputs.
pub fn write_outputs(dir: &Path, reference: &Array2<f32>, stacked: &Array2<f32>) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for (name, data) in [
        (REFERENCE_OUTPUT_NAME, reference),
        (STACKED_OUTPUT_NAME, stacked),
    ] {
        let path = dir.join(name);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        save_gray8(&to_gray8(data), &path)?;
        info!(path = %path.display(), "Saved");
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
