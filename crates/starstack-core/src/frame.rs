use ndarray::Array2;

/// A single grayscale photograph.
/// Pixel values are f32 on the 8-bit scale [0.0, 255.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// File name the frame was loaded from, if any.
    pub name: Option<String>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data, name: None }
    }

    pub fn with_name(data: Array2<f32>, name: impl Into<String>) -> Self {
        Self {
            data,
            name: Some(name.into()),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Display name, falling back to a placeholder for in-memory frames.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// A position in pixel coordinates: `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
