pub mod consts;
pub mod error;
pub mod frame;
pub mod catalog;
pub mod invariants;
pub mod matching;
pub mod detection;
pub mod io;
pub mod align;
pub mod stack;
pub mod pipeline;
