//! Caret positions and selections
//!
//! A `Point` addresses a character offset inside a Text node. A `Range` is an
//! anchor/focus pair; it is a caret when both points are equal.

use crate::models::Path;
use crate::operations::Operation;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which side a point sticks to when content is inserted or split exactly at
/// its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    Forward,
    Backward,
}

/// A character offset into the Text node reached by `path`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<Path>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    /// Rewrite this point so it keeps addressing the same character position
    /// after `op`. Returns `None` when its text node was removed.
    pub fn transform(&self, op: &Operation, affinity: Affinity) -> Option<Point> {
        crate::operations::transform::transform_point(self, op, affinity)
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then_with(|| self.offset.cmp(&other.offset))
    }
}

/// An anchor/focus pair; `anchor` is where the selection started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed range at `point`
    pub fn caret(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// True when the anchor comes before (or equals) the focus
    pub fn is_forward(&self) -> bool {
        self.anchor <= self.focus
    }

    /// `(start, end)` in document order regardless of typing direction
    pub fn edges(&self) -> (&Point, &Point) {
        if self.is_forward() {
            (&self.anchor, &self.focus)
        } else {
            (&self.focus, &self.anchor)
        }
    }

    /// Transform both points with inward affinity: a caret sticks forward,
    /// an expanded range shrinks rather than grows at its edges.
    ///
    /// Returns `(anchor, focus)` individually so callers can re-anchor the
    /// points that were removed.
    pub fn transform(&self, op: &Operation) -> (Option<Point>, Option<Point>) {
        let (anchor_affinity, focus_affinity) = if self.is_collapsed() {
            (Affinity::Forward, Affinity::Forward)
        } else if self.is_forward() {
            (Affinity::Forward, Affinity::Backward)
        } else {
            (Affinity::Backward, Affinity::Forward)
        };
        (
            self.anchor.transform(op, anchor_affinity),
            self.focus.transform(op, focus_affinity),
        )
    }
}
