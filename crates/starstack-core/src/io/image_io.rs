use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};
use ndarray::Array2;

use crate::consts::{IMAGE_EXTENSIONS, MAX_INTENSITY};
use crate::error::{Result, StarStackError};
use crate::frame::Frame;

/// Load any supported image as an 8-bit grayscale frame.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let gray = img.to_luma8();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for (col, row, pixel) in gray.enumerate_pixels() {
        data[[row as usize, col as usize]] = pixel.0[0] as f32;
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Frame::with_name(data, name))
}

/// Save 8-bit pixels, choosing the format from the file extension (PNG by default).
pub fn save_gray8(data: &Array2<u8>, path: &Path) -> Result<()> {
    let (h, w) = data.dim();
    let mut img = GrayImage::new(w as u32, h as u32);
    for ((row, col), &val) in data.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Luma([val]));
    }

    match ImageFormat::from_path(path) {
        Ok(format) => img.save_with_format(path, format)?,
        Err(_) => img.save_with_format(path, ImageFormat::Png)?,
    }
    Ok(())
}

/// Save a frame, clamping to [0, 255] and rounding to 8 bits.
pub fn save_image(frame: &Frame, path: &Path) -> Result<()> {
    save_gray8(&to_gray8(&frame.data), path)
}

pub fn to_gray8(data: &Array2<f32>) -> Array2<u8> {
    data.mapv(|v| v.clamp(0.0, MAX_INTENSITY).round() as u8)
}

/// Image files directly inside `dir`, sorted by file name.
pub fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(StarStackError::Config(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
