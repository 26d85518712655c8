//! Document tree and editor state
//!
//! `Document` is the implicit root element; `EditorState` pairs it with the
//! current selection. Both are plain values: every edit cycle produces a new
//! state instead of mutating a shared editor object.

use crate::models::{Element, Node, Path, Point, Range, Tag, Text};
use serde::{Deserialize, Serialize};

/// Root of the node tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Default for Document {
    /// The smallest document satisfying the root layout: an empty title
    /// followed by the trailing empty paragraph.
    fn default() -> Self {
        Self {
            children: vec![Node::title(""), Node::paragraph("")],
        }
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Node at `path` (`None` for the root or a dangling path)
    pub fn get(&self, path: &Path) -> Option<&Node> {
        let (&first, rest) = path.indices().split_first()?;
        let mut node = self.children.get(first)?;
        for &index in rest {
            node = node.as_element()?.children.get(index)?;
        }
        Some(node)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let (&first, rest) = path.indices().split_first()?;
        let mut node = self.children.get_mut(first)?;
        for &index in rest {
            node = node.as_element_mut()?.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Children of the element at `path`; the empty path yields the root's
    pub fn children(&self, path: &Path) -> Option<&[Node]> {
        if path.is_root() {
            return Some(&self.children);
        }
        self.element(path).map(|element| element.children.as_slice())
    }

    pub fn children_mut(&mut self, path: &Path) -> Option<&mut Vec<Node>> {
        if path.is_root() {
            return Some(&mut self.children);
        }
        self.get_mut(path)
            .and_then(Node::as_element_mut)
            .map(|element| &mut element.children)
    }

    pub fn element(&self, path: &Path) -> Option<&Element> {
        self.get(path).and_then(Node::as_element)
    }

    pub fn text(&self, path: &Path) -> Option<&Text> {
        self.get(path).and_then(Node::as_text)
    }

    pub fn tag(&self, path: &Path) -> Option<Tag> {
        self.get(path).and_then(Node::tag)
    }

    /// Number of children of the element (or root) at `path`
    pub fn child_count(&self, path: &Path) -> usize {
        self.children(path).map_or(0, <[Node]>::len)
    }

    /// Concatenated text under `path` (the whole document for the root)
    pub fn string(&self, path: &Path) -> String {
        if path.is_root() {
            return self.children.iter().map(Node::string).collect();
        }
        self.get(path).map(Node::string).unwrap_or_default()
    }

    /// True when the subtree at `path` contains no characters
    pub fn is_empty_at(&self, path: &Path) -> bool {
        self.string(path).is_empty()
    }

    /// Path of the first Text leaf at or below `path`
    pub fn first_text_path(&self, path: &Path) -> Option<Path> {
        let mut current = path.clone();
        loop {
            match self.get(&current)? {
                Node::Text(_) => return Some(current),
                Node::Element(element) if element.children.is_empty() => return None,
                Node::Element(_) => current = current.child(0),
            }
        }
    }

    /// Path of the last Text leaf at or below `path`
    pub fn last_text_path(&self, path: &Path) -> Option<Path> {
        let mut current = path.clone();
        loop {
            match self.get(&current)? {
                Node::Text(_) => return Some(current),
                Node::Element(element) if element.children.is_empty() => return None,
                Node::Element(element) => current = current.child(element.children.len() - 1),
            }
        }
    }

    /// Point at the very start of the node at `path`
    pub fn start(&self, path: &Path) -> Option<Point> {
        self.first_text_path(path).map(|text| Point::new(text, 0))
    }

    /// Point at the very end of the node at `path`
    pub fn end(&self, path: &Path) -> Option<Point> {
        let text_path = self.last_text_path(path)?;
        let len = self.text(&text_path)?.len();
        Some(Point::new(text_path, len))
    }

    /// Every Text leaf in document order
    pub fn texts(&self) -> Vec<(Path, &Text)> {
        let mut out = Vec::new();
        for (index, child) in self.children.iter().enumerate() {
            collect_texts(child, Path::new(vec![index]), &mut out);
        }
        out
    }

    /// True when `point` addresses an existing Text and an offset inside it
    pub fn is_valid_point(&self, point: &Point) -> bool {
        self.text(&point.path)
            .is_some_and(|text| point.offset <= text.len())
    }

    /// Closest element at or above `path` whose tag satisfies `predicate`
    pub fn closest(&self, path: &Path, predicate: impl Fn(&Tag) -> bool) -> Option<(Path, &Element)> {
        let mut current = path.clone();
        loop {
            if let Some(element) = self.element(&current) {
                if predicate(&element.tag) {
                    return Some((current, element));
                }
            }
            if current.is_root() {
                return None;
            }
            current = current.parent();
        }
    }

    /// Total number of nodes below the root
    pub fn node_count(&self) -> usize {
        self.children.iter().map(Node::size).sum()
    }
}

fn collect_texts<'a>(node: &'a Node, path: Path, out: &mut Vec<(Path, &'a Text)>) {
    match node {
        Node::Text(text) => out.push((path, text)),
        Node::Element(element) => {
            for (index, child) in element.children.iter().enumerate() {
                collect_texts(child, path.child(index), out);
            }
        }
    }
}

/// A document together with its selection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorState {
    pub document: Document,
    #[serde(default)]
    pub selection: Option<Range>,
}

impl EditorState {
    pub fn new(document: Document, selection: Option<Range>) -> Self {
        Self {
            document,
            selection,
        }
    }

    /// State with a caret at `point`
    pub fn with_caret(document: Document, point: Point) -> Self {
        Self {
            document,
            selection: Some(Range::caret(point)),
        }
    }

    /// The caret when the selection is collapsed
    pub fn caret(&self) -> Option<&Point> {
        self.selection
            .as_ref()
            .filter(|range| range.is_collapsed())
            .map(|range| &range.anchor)
    }
}
