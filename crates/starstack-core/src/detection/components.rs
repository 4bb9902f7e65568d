use ndarray::Array2;

/// A connected blob of above-threshold pixels.
#[derive(Clone, Debug)]
pub struct Component {
    /// 1-based label in order of first appearance.
    pub label: u32,
    pub area: usize,
    /// Bounding box: (min_row, max_row, min_col, max_col).
    pub bbox: (usize, usize, usize, usize),
    /// Sum of pixel intensities.
    pub flux: f64,
    pub weighted_row: f64,
    pub weighted_col: f64,
}

impl Component {
    fn seed(label: u32, row: usize, col: usize) -> Self {
        Self {
            label,
            area: 0,
            bbox: (row, row, col, col),
            flux: 0.0,
            weighted_row: 0.0,
            weighted_col: 0.0,
        }
    }

    fn absorb(&mut self, row: usize, col: usize, value: f64) {
        self.area += 1;
        self.flux += value;
        self.weighted_row += row as f64 * value;
        self.weighted_col += col as f64 * value;
        let (r0, r1, c0, c1) = &mut self.bbox;
        *r0 = (*r0).min(row);
        *r1 = (*r1).max(row);
        *c0 = (*c0).min(col);
        *c1 = (*c1).max(col);
    }

    /// Intensity-weighted centroid as (row, col). Falls back to the bbox
    /// centre for a component with zero flux.
    pub fn centroid(&self) -> (f64, f64) {
        if self.flux > 0.0 {
            return (self.weighted_row / self.flux, self.weighted_col / self.flux);
        }
        let (r0, r1, c0, c1) = self.bbox;
        ((r0 + r1) as f64 / 2.0, (c0 + c1) as f64 / 2.0)
    }
}

/// Disjoint sets over flat pixel indices. The smallest index of a set is
/// always its root.
struct PixelForest {
    parent: Vec<usize>,
}

impl PixelForest {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn root(&mut self, mut idx: usize) -> usize {
        while self.parent[idx] != idx {
            // Path halving.
            self.parent[idx] = self.parent[self.parent[idx]];
            idx = self.parent[idx];
        }
        idx
    }

    fn join(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.root(a), self.root(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Label 4-connected regions of `data >= threshold` and accumulate
/// per-component flux and centroid sums.
///
/// Components are returned in order of first appearance (row-major scan).
pub fn label_components(data: &Array2<f32>, threshold: f32) -> Vec<Component> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return Vec::new();
    }

    let lit = |row: usize, col: usize| data[[row, col]] >= threshold;
    let mut forest = PixelForest::new(h * w);

    for (row, col) in (0..h).flat_map(|r| (0..w).map(move |c| (r, c))) {
        if !lit(row, col) {
            continue;
        }
        let idx = row * w + col;
        if col > 0 && lit(row, col - 1) {
            forest.join(idx, idx - 1);
        }
        if row > 0 && lit(row - 1, col) {
            forest.join(idx, idx - w);
        }
    }

    // A root is the first pixel of its set in scan order, so components are
    // created in first-appearance order.
    let mut slot_of_root = vec![usize::MAX; h * w];
    let mut components: Vec<Component> = Vec::new();

    for ((row, col), &value) in data.indexed_iter() {
        if !lit(row, col) {
            continue;
        }
        let root = forest.root(row * w + col);
        if slot_of_root[root] == usize::MAX {
            let slot = components.len();
            slot_of_root[root] = slot;
            components.push(Component::seed(slot as u32 + 1, row, col));
        }
        components[slot_of_root[root]].absorb(row, col, value as f64);
    }

    components
}
