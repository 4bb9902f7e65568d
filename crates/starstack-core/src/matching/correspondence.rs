use crate::frame::Point;

/// Matched stars of one frame, ordered by descending bearing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchedSequence {
    pub coords: Vec<Point>,
    pub angles: Vec<f64>,
}

impl MatchedSequence {
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// One physical star seen in both frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchedPair {
    pub reference: Point,
    pub reference_angle: f64,
    pub additional: Point,
    pub additional_angle: f64,
}

impl MatchedPair {
    /// The anchor pairing. Both bearings are 0 by definition.
    pub fn anchor(reference: Point, additional: Point) -> Self {
        Self {
            reference,
            reference_angle: 0.0,
            additional,
            additional_angle: 0.0,
        }
    }
}

/// Index-aligned matched sequences for the reference and additional frames.
///
/// `reference.coords[i]` and `additional.coords[i]` are the same star.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Correspondence {
    pub reference: MatchedSequence,
    pub additional: MatchedSequence,
}

impl Correspondence {
    /// Sort pairs by descending reference bearing (additional bearing breaks
    /// ties) and split them into the two sequences.
    pub fn from_pairs(mut pairs: Vec<MatchedPair>) -> Self {
        pairs.sort_by(|a, b| {
            b.reference_angle
                .total_cmp(&a.reference_angle)
                .then(b.additional_angle.total_cmp(&a.additional_angle))
        });

        let mut reference = MatchedSequence {
            coords: Vec::with_capacity(pairs.len()),
            angles: Vec::with_capacity(pairs.len()),
        };
        let mut additional = reference.clone();
        for pair in pairs {
            reference.coords.push(pair.reference);
            reference.angles.push(pair.reference_angle);
            additional.coords.push(pair.additional);
            additional.angles.push(pair.additional_angle);
        }

        Self {
            reference,
            additional,
        }
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    /// First index where the additional bearings rise. Two stars there swapped
    /// angular order between the frames.
    pub fn order_conflict(&self) -> Option<usize> {
        self.additional
            .angles
            .windows(2)
            .position(|w| w[0] < w[1])
            .map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.reference
            .coords
            .iter()
            .copied()
            .zip(self.additional.coords.iter().copied())
    }
}
