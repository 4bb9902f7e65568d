mod common;

use approx::assert_abs_diff_eq;

use starstack_core::align::{align, estimate_from_correspondence, AffineTransform, AlignConfig, PreparedReference};
use starstack_core::error::StarStackError;
use starstack_core::invariants::InvariantMethod;

use common::{catalog_from, transform_stars, DISTRACTOR_STARS, REFERENCE_STARS};

#[test]
fn test_round_trip_recovers_transform() {
    let t = AffineTransform::similarity(0.004, 1.0, 6.0, -3.0);
    let mut additional_stars = REFERENCE_STARS.to_vec();
    additional_stars.extend_from_slice(&DISTRACTOR_STARS);
    let additional = catalog_from(&additional_stars);
    let reference = catalog_from(&transform_stars(&REFERENCE_STARS, &t));

    let aligned = align(&reference, &additional, &AlignConfig::default()).unwrap();
    assert!(aligned.transform.abs_diff_eq(&t, 1e-9), "{}", aligned.transform);
    assert_abs_diff_eq!(aligned.residual, 0.0, epsilon = 1e-9);
    assert_eq!(aligned.correspondence.len(), REFERENCE_STARS.len());
    assert_eq!(aligned.pixels.dim(), reference.pixels().dim());

    for (r, a) in aligned.correspondence.pairs() {
        let mapped = t.apply(a);
        assert_abs_diff_eq!(mapped.x, r.x, epsilon = 1e-9);
        assert_abs_diff_eq!(mapped.y, r.y, epsilon = 1e-9);
    }
}

#[test]
fn test_round_trip_with_rotation() {
    let t = AffineTransform::similarity(-0.6, 1.0, 40.0, 120.0);
    let additional = catalog_from(&REFERENCE_STARS);
    let reference = catalog_from(&transform_stars(&REFERENCE_STARS, &t));

    let mut config = AlignConfig::default();
    config.matching.invariant_method = InvariantMethod::RelativeBearing;
    let aligned = align(&reference, &additional, &config).unwrap();
    assert!(aligned.transform.abs_diff_eq(&t, 1e-9), "{}", aligned.transform);
}

#[test]
fn test_deterministic_transform() {
    let t = AffineTransform::similarity(0.004, 1.0, 6.0, -3.0);
    let additional = catalog_from(&REFERENCE_STARS);
    let reference = catalog_from(&transform_stars(&REFERENCE_STARS, &t));
    let prepared = PreparedReference::new(&reference, &AlignConfig::default()).unwrap();

    let first = prepared.align(&additional).unwrap();
    let second = prepared.align(&additional).unwrap();
    assert_eq!(first.transform.params(), second.transform.params());
    assert_eq!(first.correspondence, second.correspondence);
    assert_eq!(first.pixels, second.pixels);
}

#[test]
fn test_two_star_match_is_degenerate() {
    let reference = catalog_from(&REFERENCE_STARS[..2]);
    let shift = AffineTransform::translation(5.0, 5.0);
    let additional = catalog_from(&transform_stars(&REFERENCE_STARS[..2], &shift));

    let prepared = PreparedReference::new(&reference, &AlignConfig::default()).unwrap();
    let outcome = prepared.find_correspondence(&additional).unwrap();
    assert_eq!(outcome.correspondence.len(), 2);
    assert!(matches!(
        estimate_from_correspondence(&outcome.correspondence),
        Err(StarStackError::DegenerateTransform(_))
    ));
    assert!(matches!(
        prepared.align(&additional),
        Err(StarStackError::DegenerateTransform(_))
    ));
}

#[test]
fn test_failure_identifies_frame() {
    let reference = catalog_from(&REFERENCE_STARS);
    let unrelated = catalog_from(&[
        (20.0, 30.0, 950.0),
        (170.0, 40.0, 850.0),
        (60.0, 140.0, 750.0),
        (130.0, 175.0, 650.0),
        (190.0, 90.0, 550.0),
    ]);

    let err = align(&reference, &unrelated, &AlignConfig::default())
        .unwrap_err()
        .for_frame(3);
    match &err {
        StarStackError::FramePair { index, source } => {
            assert_eq!(*index, 3);
            assert!(matches!(**source, StarStackError::AnchorExhausted { trials: 5 }));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().starts_with("Frame 3 failed to align"));
}
