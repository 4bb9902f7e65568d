/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Angular tolerance (radians) when comparing anchor-relative star bearings.
pub const DEFAULT_ANGLE_TOLERANCE: f64 = 0.01;

/// Radius tolerance as a multiple of the angle tolerance.
///
/// Radii are pixel distances, angles are radians, so the two differ by orders
/// of magnitude. The factor is empirical and only meaningful for those units.
pub const DEFAULT_RADIUS_TOLERANCE_SCALE: f64 = 1000.0;

/// Number of stars detected in the reference frame.
pub const DEFAULT_ALIGNING_STARS: usize = 5;

/// Additional frames detect this many times more stars than the reference,
/// so the reference constellation is likely to be fully contained.
pub const DEFAULT_ADDITIONAL_STAR_MULTIPLIER: usize = 6;

/// Smallest connected component (pixels) accepted as a star.
pub const DEFAULT_MIN_STAR_AREA: usize = 1;

/// Largest connected component (pixels) accepted as a star.
pub const DEFAULT_MAX_STAR_AREA: usize = 2_500;

/// Upper bound of the 8-bit intensity scale.
pub const MAX_INTENSITY: f32 = 255.0;

/// Singular values below this fraction of the largest mark a rank-deficient fit.
pub const COLLINEARITY_EPSILON: f64 = 1e-9;

/// Determinant magnitude below which an affine transform is not invertible.
pub const SINGULAR_DETERMINANT: f64 = 1e-12;

/// File name of the reference frame written by the pipeline.
pub const REFERENCE_OUTPUT_NAME: &str = "reference_frame.png";

/// File name of the stacked result written by the pipeline.
pub const STACKED_OUTPUT_NAME: &str = "stacked_frame.png";

/// Extensions recognised when listing an input directory.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif"];
