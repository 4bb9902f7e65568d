//! Transform estimation and resampling of additional frames.

mod register;
pub mod transform;
pub mod warp;

pub use register::{align, estimate_from_correspondence, AlignConfig, AlignedFrame, PreparedReference};
pub use transform::{estimate_affine, rms_residual, AffineTransform};
pub use warp::{bilinear_sample, warp_to_reference, Interpolation, WarpConfig};
