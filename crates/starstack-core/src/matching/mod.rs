//! Star correspondence search between a reference and an additional catalog.

pub mod config;
mod correspondence;
mod matcher;
mod resolve;

pub use config::{MatchConfig, Verbosity};
pub use correspondence::{Correspondence, MatchedPair, MatchedSequence};
pub use matcher::{find_correspondence, prepare_reference, FrameMatcher, MatchOutcome};
pub use resolve::{resolve_one, ResolvedStar};
