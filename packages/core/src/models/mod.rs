//! Data Models
//!
//! This module contains the core data structures of the outline editor:
//!
//! - `Node` / `Element` / `Text` - the document tree
//! - `Path`, `Point`, `Range` - tree addressing and selections
//! - `Document`, `EditorState` - the value threaded through every edit cycle
//! - `Tag`, `SchemaDescriptor`, `SchemaRegistry` - node types and tool schemas

pub mod core_schemas;
mod document;
mod node;
mod path;
mod point;
pub mod schema;
mod tag;


pub use core_schemas::{core_schema, SchemaRegistry};
pub use document::{Document, EditorState};
pub use node::{char_len, Element, Node, NodeProperties, Props, Text, ValidationError};
pub(crate) use node::byte_index;
pub use path::Path;
pub use point::{Affinity, Point, Range};
pub use schema::{Metadata, Placeholders, SchemaDescriptor, ToolKind, ToolVariant};
pub use tag::Tag;
