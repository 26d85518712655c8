//! Editor Services
//!
//! This module contains the host-facing layer of the engine:
//!
//! - `Editor` - runs key events and host edits through one edit cycle
//! - `EditorConfig` - enabled tools and engine limits, loadable from JSON
//! - `EditorError` - everything a cycle can fail with
//!
//! Services coordinate the behavior engine and the normalization pass; they
//! own no document state themselves.

pub mod config;
pub mod editor;
pub mod error;


pub use config::EditorConfig;
pub use editor::{EditOutcome, Editor, KeyOutcome};
pub use error::EditorError;
