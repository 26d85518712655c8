//! Service Layer Error Types
//!
//! Errors surfaced by the `Editor` facade. "Not handled" is never an error:
//! a key no handler claims comes back as an unhandled `KeyOutcome`.

use crate::models::{Path, ToolKind};
use crate::normalization::NormalizationError;
use crate::operations::TransformError;
use thiserror::Error;

/// Editor operation errors
///
/// Any error discards the draft of the failing cycle; the caller's
/// `EditorState` is never partially mutated.
#[derive(Error, Debug)]
pub enum EditorError {
    /// A primitive tree operation failed
    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    /// Normalization failed or did not converge
    #[error("Normalization failed: {0}")]
    Normalization(#[from] NormalizationError),

    /// Incoming selection does not address existing text
    #[error("Invalid selection: {context}")]
    InvalidSelection { context: String },

    /// Tool is not enabled in the editor configuration
    #[error("Tool is disabled: {tool}")]
    ToolDisabled { tool: ToolKind },

    /// Metadata operation on a node that is not a leveled item
    #[error("Node at {path} is not a leveled item")]
    NotAnItem { path: Path },

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file is not valid JSON for `EditorConfig`
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl EditorError {
    /// Create an invalid selection error
    pub fn invalid_selection(context: impl Into<String>) -> Self {
        Self::InvalidSelection {
            context: context.into(),
        }
    }

    /// Create a tool disabled error
    pub fn tool_disabled(tool: ToolKind) -> Self {
        Self::ToolDisabled { tool }
    }

    /// Create a not-an-item error
    pub fn not_an_item(path: Path) -> Self {
        Self::NotAnItem { path }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
