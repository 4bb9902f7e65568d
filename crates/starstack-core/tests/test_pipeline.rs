mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use approx::assert_abs_diff_eq;

use starstack_core::error::StarStackError;
use starstack_core::io::{load_image, save_gray8};
use starstack_core::pipeline::{
    run_pipeline, run_pipeline_reported, FrameStatus, PipelineConfig, PipelineStage,
    ProgressReporter,
};

use common::write_starfield;

const HEIGHT: usize = 128;
const WIDTH: usize = 160;

/// Bright stars first, then dim ones that only the additional frames keep.
const STARS: [(f64, f64, f32); 8] = [
    (80.0, 64.0, 250.0),
    (110.0, 70.0, 230.0),
    (70.0, 100.0, 210.0),
    (40.0, 40.0, 190.0),
    (120.0, 30.0, 170.0),
    (30.0, 100.0, 120.0),
    (135.0, 105.0, 100.0),
    (95.0, 20.0, 80.0),
];

const SHIFTS: [(f64, f64); 3] = [(3.0, -2.0), (-4.0, 5.0), (2.0, 3.0)];

/// frame_00 is unshifted, frame_01..03 are shifted copies, frame_04 is black.
fn write_sequence(dir: &Path) {
    write_starfield(&dir.join("frame_00.png"), HEIGHT, WIDTH, &STARS);
    for (i, (dx, dy)) in SHIFTS.iter().enumerate() {
        let shifted: Vec<_> = STARS.iter().map(|&(x, y, p)| (x + dx, y + dy, p)).collect();
        write_starfield(
            &dir.join(format!("frame_{:02}.png", i + 1)),
            HEIGHT,
            WIDTH,
            &shifted,
        );
    }
    save_gray8(
        &ndarray::Array2::zeros((HEIGHT, WIDTH)),
        &dir.join("frame_04.png"),
    )
    .unwrap();
}

#[test]
fn test_pipeline_aligns_and_stacks() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_sequence(input.path());

    let config = PipelineConfig::new(input.path(), output.path().join("result"));
    let result = run_pipeline(&config).unwrap();

    assert_eq!(result.reference_name, "frame_00.png");
    assert_eq!(result.frames.len(), 5);
    assert_eq!(result.stacked_count(), 4);
    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.stacked.dim(), (HEIGHT, WIDTH));
    assert_eq!(result.reference_threshold, 170.0);
    assert_eq!(result.additional_threshold, Some(80.0));

    assert!(matches!(result.frames[0].status, FrameStatus::Reference));
    for (report, (dx, dy)) in result.frames[1..4].iter().zip(SHIFTS) {
        match &report.status {
            FrameStatus::Aligned {
                transform,
                matched_stars,
                anchor_trials,
                residual,
            } => {
                let (tx, ty) = transform.translation_components();
                assert_abs_diff_eq!(tx, -dx, epsilon = 1e-6);
                assert_abs_diff_eq!(ty, -dy, epsilon = 1e-6);
                assert_eq!(*matched_stars, 5);
                assert_eq!(*anchor_trials, 1);
                assert!(*residual < 1e-6);
            }
            other => panic!("{} not aligned: {other:?}", report.name),
        }
    }
    match &result.frames[4].status {
        FrameStatus::Failed(reason) => assert!(reason.contains("No stars detected")),
        other => panic!("blank frame should fail, got {other:?}"),
    }

    // Aligned stars land on the reference stars, so the brightest peak survives.
    assert_abs_diff_eq!(result.stacked[[64, 80]], 250.0, epsilon = 1e-3);
    assert_abs_diff_eq!(result.stacked[[100, 70]], 210.0, epsilon = 1e-3);

    let stacked = load_image(&output.path().join("result/stacked_frame.png")).unwrap();
    let reference = load_image(&output.path().join("result/reference_frame.png")).unwrap();
    assert_eq!(stacked.data.dim(), (HEIGHT, WIDTH));
    assert_eq!(reference.data[[64, 80]], 250.0);
}

#[test]
fn test_pipeline_with_named_reference() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_sequence(input.path());

    let mut config = PipelineConfig::new(input.path(), output.path());
    config.reference_frame = Some("frame_02.png".into());
    let result = run_pipeline(&config).unwrap();

    assert_eq!(result.reference_name, "frame_02.png");
    assert!(matches!(result.frames[2].status, FrameStatus::Reference));
    match &result.frames[0].status {
        FrameStatus::Aligned { transform, .. } => {
            let (tx, ty) = transform.translation_components();
            assert_abs_diff_eq!(tx, -4.0, epsilon = 1e-6);
            assert_abs_diff_eq!(ty, 5.0, epsilon = 1e-6);
        }
        other => panic!("frame_00 not aligned: {other:?}"),
    }
}

#[test]
fn test_pipeline_replaces_previous_outputs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_sequence(input.path());
    std::fs::write(output.path().join("stacked_frame.png"), "stale").unwrap();

    let config = PipelineConfig::new(input.path(), output.path());
    run_pipeline(&config).unwrap();
    assert!(load_image(&output.path().join("stacked_frame.png")).is_ok());
}

#[test]
fn test_pipeline_empty_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(input.path(), output.path());
    assert!(matches!(
        run_pipeline(&config),
        Err(StarStackError::EmptySequence)
    ));
}

#[test]
fn test_pipeline_unknown_reference() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_sequence(input.path());

    let mut config = PipelineConfig::new(input.path(), output.path());
    config.reference_frame = Some("missing.png".into());
    assert!(matches!(
        run_pipeline(&config),
        Err(StarStackError::Config(_))
    ));
}

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<PipelineStage>>,
    advances: AtomicUsize,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage, _total_items: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }

    fn advance(&self, _items_done: usize) {
        self.advances.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_pipeline_reports_stages() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_sequence(input.path());

    let reporter = Arc::new(RecordingReporter::default());
    let config = PipelineConfig::new(input.path(), output.path());
    run_pipeline_reported(&config, reporter.clone()).unwrap();

    let stages = reporter.stages.lock().unwrap().clone();
    assert_eq!(
        stages,
        [
            PipelineStage::Reading,
            PipelineStage::Detection,
            PipelineStage::Alignment,
            PipelineStage::Stacking,
            PipelineStage::Writing,
        ]
    );
    // Four frames read after the reference, four aligned.
    assert_eq!(reporter.advances.load(Ordering::Relaxed), 8);
}
