//! NodeSpace Outline Editing Engine
//!
//! This crate provides the structural editing core for NodeSpace outline
//! documents: a tree of tagged elements and text leaves, a set of "tool"
//! subtrees (rankings, agendas, hypotheses, risks, ...), and the rules that
//! keep all of it well-formed while the user presses Enter, Backspace, Tab
//! and Shift+Tab.
//!
//! # Architecture
//!
//! - **Value state**: an `EditorState` (document + selection) goes in, a new
//!   one comes out; drafts are copy-on-write `Transaction`s
//! - **Primitive operations**: every change is an `Operation` that also
//!   rewrites the selection, so the caret always follows the edit
//! - **Normalization fixpoint**: after each change the tree is repaired one
//!   rule at a time until no rule fires
//! - **Schema-driven handlers**: seven tools share two key state machines
//!   parametrized by a `SchemaDescriptor`
//!
//! # Modules
//!
//! - [`models`] - Document tree, paths, selections, tags and tool schemas
//! - [`operations`] - Primitive operations, path transforms and transactions
//! - [`normalization`] - Schema and root layout repair
//! - [`behaviors`] - Key handler chain, indent/outdent with carry-down
//! - [`services`] - `Editor` facade and configuration

pub mod behaviors;
pub mod models;
pub mod normalization;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use behaviors::{KeyEvent, KeyHandler, KeyResponse};
pub use models::{Document, EditorState, Metadata, Node, Path, Point, Range, Tag, ToolKind};
pub use operations::{Operation, Transaction, TransformError};
pub use services::{EditOutcome, Editor, EditorConfig, EditorError, KeyOutcome};
