//! Path addressing for the document tree
//!
//! A `Path` is the list of child indices leading from the document root to a
//! node. The empty path addresses the root itself. Paths are compared
//! lexicographically, which is exactly document order for nodes that are not
//! ancestors of one another (an ancestor sorts before its descendants).
//!
//! Parent/sibling relationships are always computed from paths on demand;
//! nodes never store back-references to their parents.

use crate::operations::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index sequence addressing a node from the document root
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    /// The path of the document root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the addressed node within its parent (`None` for the root)
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the parent node (the root is its own parent)
    pub fn parent(&self) -> Path {
        let mut indices = self.0.clone();
        indices.pop();
        Self(indices)
    }

    /// Path of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the next sibling (may not exist in the tree)
    pub fn next(&self) -> Path {
        let mut indices = self.0.clone();
        if let Some(last) = indices.last_mut() {
            *last += 1;
        }
        Self(indices)
    }

    /// Path of the previous sibling, `None` for a first child or the root
    pub fn previous(&self) -> Option<Path> {
        match self.0.last() {
            Some(&last) if last > 0 => {
                let mut indices = self.0.clone();
                let n = indices.len() - 1;
                indices[n] = last - 1;
                Some(Self(indices))
            }
            _ => None,
        }
    }

    /// Every ancestor from the root down to (excluding) this path
    pub fn ancestors(&self) -> Vec<Path> {
        (0..self.0.len()).map(|n| Self(self.0[..n].to_vec())).collect()
    }

    /// True when `self` is a strict prefix of `other`
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    pub fn is_descendant_of(&self, other: &Path) -> bool {
        other.is_ancestor_of(self)
    }

    pub fn is_sibling_of(&self, other: &Path) -> bool {
        !self.is_root()
            && self.0.len() == other.0.len()
            && self.0[..self.0.len() - 1] == other.0[..other.0.len() - 1]
            && self != other
    }

    /// True when `self` is an earlier sibling of `other` or of one of
    /// `other`'s ancestors.
    pub fn ends_before(&self, other: &Path) -> bool {
        let Some(i) = self.0.len().checked_sub(1) else {
            return false;
        };
        if other.0.len() <= i {
            return false;
        }
        self.0[..i] == other.0[..i] && self.0[i] < other.0[i]
    }

    /// Longest shared prefix of two paths
    pub fn common_ancestor(&self, other: &Path) -> Path {
        let shared = self
            .0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count();
        Self(self.0[..shared].to_vec())
    }

    /// Rewrite this path so it keeps addressing the same node after `op`.
    ///
    /// Returns `None` when the node was removed by the operation.
    pub fn transform(&self, op: &Operation) -> Option<Path> {
        crate::operations::transform::transform_path(self, op)
    }

    pub(crate) fn indices_mut(&mut self) -> &mut Vec<usize> {
        &mut self.0
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (n, index) in self.0.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}
