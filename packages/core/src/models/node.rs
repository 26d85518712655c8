//! Node Data Structures
//!
//! The document is a tree of `Node`s: `Text` leaves and tagged `Element`s
//! with ordered children. Element-specific data lives in the `props` JSON
//! object, so new tool schemas never need a new node struct.
//!
//! # Examples
//!
//! ```rust
//! use nodespace_outline::models::{Node, Tag};
//!
//! let paragraph = Node::paragraph("My first note");
//! assert_eq!(paragraph.tag(), Some(Tag::Paragraph));
//! assert_eq!(paragraph.string(), "My first note");
//! ```

use crate::models::Tag;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element properties (tool metadata such as `indent` or `confidence`)
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Validation errors for model parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown node tag: {0}")]
    UnknownTag(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid metadata value: {0}")]
    InvalidMetadata(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// A document tree node
///
/// Serialized untagged: `{"text": "..."}` for leaves,
/// `{"type": "...", "props": {...}, "children": [...]}` for elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(Text),
    Element(Element),
}

/// Text leaf
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Text {
    pub text: String,
}

impl Text {
    /// Length in characters (the unit of `Point::offset`)
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Tagged element with ordered children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub tag: Tag,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub props: Props,

    #[serde(default)]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Tag and props without the children
    pub fn properties(&self) -> NodeProperties {
        NodeProperties {
            tag: self.tag,
            props: self.props.clone(),
        }
    }

    /// Concatenated text of every descendant leaf
    pub fn string(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Index of the last child when it is a bulleted list
    pub fn sublist_index(&self) -> Option<usize> {
        match self.children.last() {
            Some(Node::Element(last)) if last.tag.is_list() => Some(self.children.len() - 1),
            _ => None,
        }
    }
}

/// The identity of an element: its tag and props
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    #[serde(rename = "type")]
    pub tag: Tag,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub props: Props,
}

impl NodeProperties {
    pub fn new(tag: Tag, props: Props) -> Self {
        Self { tag, props }
    }

    pub fn tag(tag: Tag) -> Self {
        Self {
            tag,
            props: Props::new(),
        }
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Text { text: text.into() })
    }

    pub fn element(tag: Tag, children: Vec<Node>) -> Self {
        Node::Element(Element::new(tag).with_children(children))
    }

    pub fn element_with_props(tag: Tag, props: Props, children: Vec<Node>) -> Self {
        Node::Element(Element::new(tag).with_props(props).with_children(children))
    }

    pub fn title(text: &str) -> Self {
        Node::element(Tag::Title, vec![Node::text(text)])
    }

    pub fn paragraph(text: &str) -> Self {
        Node::element(Tag::Paragraph, vec![Node::text(text)])
    }

    pub fn list_item(text: &str) -> Self {
        Node::element(Tag::ListItem, vec![Node::text(text)])
    }

    /// A bulleted list of plain lines
    pub fn bulleted_list(lines: &[&str]) -> Self {
        Node::element(
            Tag::BulletedList,
            lines.iter().map(|line| Node::list_item(line)).collect(),
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn tag(&self) -> Option<Tag> {
        self.as_element().map(|element| element.tag)
    }

    /// Concatenated text content
    pub fn string(&self) -> String {
        match self {
            Node::Text(text) => text.text.clone(),
            Node::Element(element) => element.string(),
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        match self {
            Node::Text(_) => 1,
            Node::Element(element) => 1 + element.children.iter().map(Node::size).sum::<usize>(),
        }
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Length of `s` in characters
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the `offset`-th character, `None` past the end
pub(crate) fn byte_index(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    match s.char_indices().nth(offset) {
        Some((index, _)) => Some(index),
        None if char_len(s) == offset => Some(s.len()),
        None => None,
    }
}
