//! Tree Operations
//!
//! Every change to an `EditorState` is expressed as one of the low-level
//! `Operation`s below. Higher level primitives (`split_nodes`, `wrap_node`,
//! `unwrap_node`, ...) on `Transaction` are sequences of these operations.
//!
//! Each operation records enough data to rewrite paths and points, so the
//! selection is transformed alongside the tree and never dangles.

mod apply;
pub mod error;
pub(crate) mod transform;
mod transaction;

#[cfg(test)]
mod transaction_test;

pub use apply::apply_operation;
pub use error::TransformError;
pub use transaction::Transaction;

use crate::models::{Node, NodeProperties, Path, Range};
use serde::{Deserialize, Serialize};

/// A single atomic change to the document or the selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Insert `node` so that it ends up at `path`
    InsertNode { path: Path, node: Node },

    /// Remove the node at `path` (the removed subtree is recorded)
    RemoveNode { path: Path, node: Node },

    /// Insert `text` at character `offset` of the Text at `path`
    InsertText {
        path: Path,
        offset: usize,
        text: String,
    },

    /// Remove `text` starting at character `offset` of the Text at `path`
    RemoveText {
        path: Path,
        offset: usize,
        text: String,
    },

    /// Join the node at `path` into its previous sibling
    ///
    /// `position` is the previous sibling's length before the merge (characters
    /// for text, children for elements); `properties` is the identity of the
    /// merged-away element.
    MergeNode {
        path: Path,
        position: usize,
        properties: Option<NodeProperties>,
    },

    /// Split the node at `path` at `position`; the new right-hand sibling gets
    /// `properties` (elements only)
    SplitNode {
        path: Path,
        position: usize,
        properties: Option<NodeProperties>,
    },

    /// Move the node at `path` to `new_path`
    ///
    /// `new_path` is expressed in the tree after the node has been taken out.
    MoveNode { path: Path, new_path: Path },

    /// Replace the tag and props of the element at `path`
    SetNode {
        path: Path,
        properties: NodeProperties,
        new_properties: NodeProperties,
    },

    /// Replace the selection
    SetSelection {
        selection: Option<Range>,
        new_selection: Option<Range>,
    },
}

impl Operation {
    /// Short operation name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::InsertNode { .. } => "insert_node",
            Operation::RemoveNode { .. } => "remove_node",
            Operation::InsertText { .. } => "insert_text",
            Operation::RemoveText { .. } => "remove_text",
            Operation::MergeNode { .. } => "merge_node",
            Operation::SplitNode { .. } => "split_node",
            Operation::MoveNode { .. } => "move_node",
            Operation::SetNode { .. } => "set_node",
            Operation::SetSelection { .. } => "set_selection",
        }
    }

    /// True for operations that change the tree (not only the selection)
    pub fn is_structural(&self) -> bool {
        !matches!(self, Operation::SetSelection { .. })
    }
}
