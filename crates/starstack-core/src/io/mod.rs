pub mod image_io;

pub use image_io::{list_image_files, load_image, save_gray8, save_image, to_gray8};
