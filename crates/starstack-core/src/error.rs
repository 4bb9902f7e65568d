use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarStackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Invalid star catalog: {0}")]
    InvalidCatalog(String),

    #[error("Anchor index {index} out of range (catalog has {total} stars)")]
    AnchorOutOfRange { index: usize, total: usize },

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("No stars detected at threshold {threshold}")]
    NoStarsDetected { threshold: f32 },

    /// The angle filter kept several candidates and the radius filter did not
    /// reduce them to one, or the surviving candidate was already claimed.
    #[error("Ambiguous match for reference star {star}: {candidates} candidates")]
    AmbiguousMatch { star: usize, candidates: usize },

    #[error("No match for reference star {star} (angle {angle:.5})")]
    NoMatch { star: usize, angle: f64 },

    #[error("All {trials} candidate anchors failed to produce a full correspondence")]
    AnchorExhausted { trials: usize },

    #[error("Degenerate transform: {0}")]
    DegenerateTransform(String),

    #[error("Frame {index} failed to align: {source}")]
    FramePair {
        index: usize,
        #[source]
        source: Box<StarStackError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StarStackError {
    /// Failures that only falsify the current anchor hypothesis.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StarStackError::AmbiguousMatch { .. } | StarStackError::NoMatch { .. }
        )
    }

    /// Wrap a terminal error with the index of the additional frame it came from.
    pub fn for_frame(self, index: usize) -> Self {
        StarStackError::FramePair {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StarStackError>;
