pub mod components;
pub mod config;
pub mod stars;
pub mod threshold;

pub use config::{DetectionConfig, ThresholdMode};
pub use stars::{count_stars, detect_stars};
pub use threshold::solve_threshold;
