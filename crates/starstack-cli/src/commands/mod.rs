pub mod align;
pub mod config;
pub mod detect;
pub mod run;
pub mod stack;

mod progress;
