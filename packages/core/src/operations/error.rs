//! Error types for tree transform operations
//!
//! Primitives assume callers checked schema preconditions, but they still
//! validate paths and offsets: a bad address is reported here instead of
//! corrupting the tree.

use crate::models::Path;
use thiserror::Error;

/// Errors that can occur while applying a tree operation
///
/// # Examples
///
/// ```rust
/// use nodespace_outline::models::Path;
/// use nodespace_outline::operations::TransformError;
///
/// let err = TransformError::invalid_path(Path::from([3, 1]));
/// assert_eq!(err.to_string(), "No node at path [3, 1]");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Referenced node does not exist
    #[error("No node at path {path}")]
    InvalidPath { path: Path },

    /// Text operation on an element (or a missing node)
    #[error("Node at path {path} is not a text leaf")]
    NotAText { path: Path },

    /// Element operation on a text leaf
    #[error("Node at path {path} is not an element")]
    NotAnElement { path: Path },

    /// Character offset beyond the end of a text leaf
    #[error("Offset {offset} out of range for text at {path} (length {len})")]
    OffsetOutOfRange { path: Path, offset: usize, len: usize },

    /// Merge of a text leaf with an element or vice versa
    #[error("Cannot merge node at {path} into a previous sibling of another kind")]
    IncompatibleMerge { path: Path },

    /// Merge of a first child
    #[error("Node at {path} has no previous sibling")]
    NoPreviousSibling { path: Path },

    /// Move of a node into its own subtree
    #[error("Cannot move node at {from} into its own descendant {to}")]
    MoveIntoSelf { from: Path, to: Path },

    /// Structural operation addressed at the document root
    #[error("Operation cannot target the document root")]
    RootOperation,
}

impl TransformError {
    /// Create an InvalidPath error
    pub fn invalid_path(path: Path) -> Self {
        Self::InvalidPath { path }
    }

    /// Create a NotAText error
    pub fn not_a_text(path: Path) -> Self {
        Self::NotAText { path }
    }

    /// Create a NotAnElement error
    pub fn not_an_element(path: Path) -> Self {
        Self::NotAnElement { path }
    }

    /// Create an OffsetOutOfRange error
    pub fn offset_out_of_range(path: Path, offset: usize, len: usize) -> Self {
        Self::OffsetOutOfRange { path, offset, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_error_message() {
        let err = TransformError::offset_out_of_range(Path::from([1, 0]), 9, 4);
        assert!(matches!(err, TransformError::OffsetOutOfRange { .. }));
        assert_eq!(
            format!("{}", err),
            "Offset 9 out of range for text at [1, 0] (length 4)"
        );
    }

    #[test]
    fn test_move_into_self_message() {
        let err = TransformError::MoveIntoSelf {
            from: Path::from([2]),
            to: Path::from([2, 0, 1]),
        };
        assert_eq!(
            format!("{}", err),
            "Cannot move node at [2] into its own descendant [2, 0, 1]"
        );
    }
}
