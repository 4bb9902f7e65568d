use ndarray::{Array2, Axis, Zip};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, StarStackError};

/// Stack frames by computing the mean at each pixel.
///
/// All frames must share the first frame's shape.
pub fn mean_stack(frames: &[Array2<f32>]) -> Result<Array2<f32>> {
    let Some(first) = frames.first() else {
        return Err(StarStackError::EmptySequence);
    };
    let (h, w) = first.dim();
    if let Some(bad) = frames.iter().find(|f| f.dim() != (h, w)) {
        let (bh, bw) = bad.dim();
        return Err(StarStackError::InvalidDimensions {
            width: bw,
            height: bh,
        });
    }

    let n = frames.len() as f64;
    let mut sum = Array2::<f64>::zeros((h, w));

    if h * w >= PARALLEL_PIXEL_THRESHOLD && frames.len() > 1 {
        sum.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, mut out)| {
                for frame in frames {
                    Zip::from(&mut out)
                        .and(frame.row(row))
                        .for_each(|acc, &v| *acc += v as f64);
                }
            });
    } else {
        for frame in frames {
            Zip::from(&mut sum)
                .and(frame)
                .for_each(|acc, &v| *acc += v as f64);
        }
    }

    Ok(sum.mapv(|v| (v / n) as f32))
}

/// Mean of 8-bit frames, e.g. the output of the resampler.
pub fn mean_stack_u8(frames: &[Array2<u8>]) -> Result<Array2<f32>> {
    let converted: Vec<Array2<f32>> = frames.iter().map(|f| f.mapv(f32::from)).collect();
    mean_stack(&converted)
}
