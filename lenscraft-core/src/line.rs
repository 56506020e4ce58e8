use crate::config::ReadingDirection;
use crate::stats;
use crate::types::Fragment;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;

/// Fragments believed to sit on one visual text line, kept in reading order.
///
/// A line always holds at least one fragment: it is created from its first
/// member and only ever grows through [`Line::add_fragment`], which inserts
/// the fragment at its ordered position. The order is therefore a sort
/// invariant rather than an insertion-order fact.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    fragments: Vec<Fragment>,
    direction: ReadingDirection,
}

/// A paragraph has the same shape as a line: a flattened, reading-ordered
/// sequence built from one or more contiguous lines.
pub type Paragraph = Line;

impl Line {
    pub fn new(first: Fragment, direction: ReadingDirection) -> Self {
        Self {
            fragments: vec![first],
            direction,
        }
    }

    /// Insert keeping `x` ascending (ltr) or descending (rtl). Fragments with
    /// an equal `x` keep their arrival order.
    pub fn add_fragment(&mut self, fragment: Fragment) {
        let x = fragment.x();
        let index = match self.direction {
            ReadingDirection::Ltr => self
                .fragments
                .partition_point(|f| f.x().total_cmp(&x) != Ordering::Greater),
            ReadingDirection::Rtl => self
                .fragments
                .partition_point(|f| f.x().total_cmp(&x) != Ordering::Less),
        };
        self.fragments.insert(index, fragment);
    }

    /// Merge every fragment of `other` into this line, one insert at a time.
    pub fn absorb(&mut self, other: Line) {
        for fragment in other.fragments {
            self.add_fragment(fragment);
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn direction(&self) -> ReadingDirection {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragment texts joined by a single space, in stored order.
    pub fn combined_text(&self) -> String {
        self.fragments
            .iter()
            .map(Fragment::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Mean `center_y` of all members, recomputed on every call.
    pub fn average_y(&self) -> f64 {
        let centers: Vec<f64> = self.fragments.iter().map(Fragment::center_y).collect();
        // never empty, see type docs
        stats::average(&centers).unwrap_or_default()
    }

    /// Height of the union of the member boxes.
    pub fn height(&self) -> f64 {
        let top = self
            .fragments
            .iter()
            .map(|f| f.bounding_box().y)
            .fold(f64::INFINITY, f64::min);
        let bottom = self
            .fragments
            .iter()
            .map(|f| f.bounding_box().y + f.bounding_box().height)
            .fold(f64::NEG_INFINITY, f64::max);
        bottom - top
    }
}

impl Serialize for Line {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Line", 4)?;
        state.serialize_field("combined_text", &self.combined_text())?;
        state.serialize_field("average_y", &self.average_y())?;
        state.serialize_field("direction", &self.direction())?;
        state.serialize_field("fragments", &self.fragments)?;
        state.end()
    }
}
