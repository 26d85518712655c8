//! Draft edits on an `EditorState`
//!
//! A `Transaction` borrows the state it starts from and only clones it on the
//! first mutation. Handlers perform their whole sequence of primitives on the
//! draft; the engine then normalizes and commits it, or drops it untouched.
//! Nothing outside the transaction ever observes an intermediate tree.

use crate::models::{
    char_len, Document, EditorState, Element, Node, NodeProperties, Path, Point, Props, Range, Tag,
};
use crate::operations::transform::after_remove;
use crate::operations::{apply_operation, Operation, TransformError};
use std::borrow::Cow;

type Result<T> = std::result::Result<T, TransformError>;

/// Copy-on-write draft of an editor state plus the operations applied to it
#[derive(Debug, Clone)]
pub struct Transaction<'a> {
    state: Cow<'a, EditorState>,
    operations: Vec<Operation>,
}

impl<'a> Transaction<'a> {
    /// Start a draft on a borrowed state (no copy until the first change)
    pub fn new(state: &'a EditorState) -> Self {
        Self {
            state: Cow::Borrowed(state),
            operations: Vec::new(),
        }
    }

    /// Start a draft that owns its state
    pub fn from_owned(state: EditorState) -> Transaction<'static> {
        Transaction {
            state: Cow::Owned(state),
            operations: Vec::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn selection(&self) -> Option<&Range> {
        self.state.selection.as_ref()
    }

    /// The caret, when the selection is collapsed
    pub fn caret(&self) -> Option<Point> {
        self.state.caret().cloned()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// True once any operation was applied
    pub fn is_dirty(&self) -> bool {
        !self.operations.is_empty()
    }

    pub fn into_parts(self) -> (EditorState, Vec<Operation>) {
        (self.state.into_owned(), self.operations)
    }

    /// Apply a raw operation to the draft
    pub fn apply(&mut self, op: Operation) -> Result<()> {
        apply_operation(self.state.to_mut(), &op)?;
        self.operations.push(op);
        Ok(())
    }

    fn node(&self, path: &Path) -> Result<&Node> {
        self.document()
            .get(path)
            .ok_or_else(|| TransformError::invalid_path(path.clone()))
    }

    fn element(&self, path: &Path) -> Result<&Element> {
        match self.node(path)? {
            Node::Element(element) => Ok(element),
            Node::Text(_) => Err(TransformError::not_an_element(path.clone())),
        }
    }

    // ---------------------------------------------------------------------
    // Node primitives
    // ---------------------------------------------------------------------

    /// Insert `node` so that it ends up at `at`
    pub fn insert_node(&mut self, node: Node, at: &Path) -> Result<()> {
        self.apply(Operation::InsertNode {
            path: at.clone(),
            node,
        })
    }

    /// Remove the node at `at`
    pub fn remove_node(&mut self, at: &Path) -> Result<()> {
        let node = self.node(at)?.clone();
        self.apply(Operation::RemoveNode {
            path: at.clone(),
            node,
        })
    }

    /// Move the node at `from` so it is inserted before whatever currently
    /// sits at `to` (or appended when `to` is one past the last child).
    pub fn move_node(&mut self, from: &Path, to: &Path) -> Result<()> {
        if from == to {
            return Ok(());
        }
        if from.is_ancestor_of(to) || from.is_root() || to.is_root() {
            return Err(TransformError::MoveIntoSelf {
                from: from.clone(),
                to: to.clone(),
            });
        }
        self.node(from)?;
        let new_path = after_remove(to.clone(), from)
            .ok_or_else(|| TransformError::invalid_path(to.clone()))?;
        if new_path == *from {
            return Ok(());
        }
        self.apply(Operation::MoveNode {
            path: from.clone(),
            new_path,
        })
    }

    /// Join the node at `at` into its previous sibling
    ///
    /// Texts concatenate, elements concatenate children; the previous
    /// sibling's tag and props survive.
    pub fn merge_node(&mut self, at: &Path) -> Result<()> {
        let previous = at
            .previous()
            .ok_or_else(|| TransformError::NoPreviousSibling { path: at.clone() })?;
        let position = match self.node(&previous)? {
            Node::Text(text) => text.len(),
            Node::Element(element) => element.children.len(),
        };
        let properties = self.node(at)?.as_element().map(Element::properties);
        self.apply(Operation::MergeNode {
            path: at.clone(),
            position,
            properties,
        })
    }

    /// Split the node at `at` before child (or character) `position`
    ///
    /// The new right-hand element takes `properties`, or a copy of the
    /// original's identity when `None`.
    pub fn split_node(
        &mut self,
        at: &Path,
        position: usize,
        properties: Option<NodeProperties>,
    ) -> Result<()> {
        self.apply(Operation::SplitNode {
            path: at.clone(),
            position,
            properties,
        })
    }

    /// Split every node from the text at `point` up to and including the
    /// ancestor `until`. Only the topmost split uses `properties`.
    pub fn split_nodes(
        &mut self,
        point: &Point,
        until: &Path,
        properties: Option<NodeProperties>,
    ) -> Result<()> {
        if !until.is_ancestor_of(&point.path) {
            return Err(TransformError::invalid_path(until.clone()));
        }
        let mut path = point.path.clone();
        let mut position = point.offset;
        loop {
            let identity = if path == *until {
                properties.clone()
            } else {
                None
            };
            self.split_node(&path, position, identity)?;
            if path == *until {
                return Ok(());
            }
            position = path.last().unwrap_or_default() + 1;
            path = path.parent();
        }
    }

    /// Wrap the node at `at` in a new element built from `wrapper`'s identity
    pub fn wrap_node(&mut self, at: &Path, wrapper: NodeProperties) -> Result<()> {
        self.node(at)?;
        self.insert_node(
            Node::element_with_props(wrapper.tag, wrapper.props, Vec::new()),
            at,
        )?;
        self.move_node(&at.next(), &at.child(0))
    }

    /// Replace the element at `at` with its children
    pub fn unwrap_node(&mut self, at: &Path) -> Result<()> {
        let count = self.element(at)?.children.len();
        let mut wrapper = at.clone();
        for _ in 0..count {
            self.move_node(&wrapper.child(0), &wrapper)?;
            wrapper = wrapper.next();
        }
        self.remove_node(&wrapper)
    }

    /// Unwrap the closest element around the selection whose tag matches.
    /// Returns false when there is no such element.
    pub fn unwrap_nodes(&mut self, matches: impl Fn(&Tag) -> bool) -> Result<bool> {
        let Some(anchor) = self.selection().map(|range| range.anchor.path.clone()) else {
            return Ok(false);
        };
        let Some((path, _)) = self.document().closest(&anchor, matches) else {
            return Ok(false);
        };
        self.unwrap_node(&path)?;
        Ok(true)
    }

    /// Replace the tag and props of the element at `at`
    pub fn set_node(&mut self, at: &Path, new_properties: NodeProperties) -> Result<()> {
        let properties = self.element(at)?.properties();
        if properties == new_properties {
            return Ok(());
        }
        self.apply(Operation::SetNode {
            path: at.clone(),
            properties,
            new_properties,
        })
    }

    /// Retype the element at `at`, dropping its props
    pub fn set_tag(&mut self, at: &Path, tag: Tag) -> Result<()> {
        self.set_node(at, NodeProperties::tag(tag))
    }

    /// Merge `patch` into the props of the element at `at`
    ///
    /// A JSON `null` in the patch removes the key.
    pub fn set_props(&mut self, at: &Path, patch: Props) -> Result<()> {
        let element = self.element(at)?;
        let mut props = element.props.clone();
        for (key, value) in patch {
            if value.is_null() {
                props.remove(&key);
            } else {
                props.insert(key, value);
            }
        }
        let tag = element.tag;
        self.set_node(at, NodeProperties::new(tag, props))
    }

    // ---------------------------------------------------------------------
    // Selection primitives
    // ---------------------------------------------------------------------

    pub fn select(&mut self, range: Range) -> Result<()> {
        if self.selection() == Some(&range) {
            return Ok(());
        }
        self.apply(Operation::SetSelection {
            selection: self.state.selection.clone(),
            new_selection: Some(range),
        })
    }

    /// Collapse the selection to `point`
    pub fn select_point(&mut self, point: Point) -> Result<()> {
        self.select(Range::caret(point))
    }

    pub fn deselect(&mut self) -> Result<()> {
        if self.selection().is_none() {
            return Ok(());
        }
        self.apply(Operation::SetSelection {
            selection: self.state.selection.clone(),
            new_selection: None,
        })
    }

    // ---------------------------------------------------------------------
    // Text primitives
    // ---------------------------------------------------------------------

    /// Insert `text` at `at`
    pub fn insert_text_at(&mut self, at: &Point, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.apply(Operation::InsertText {
            path: at.path.clone(),
            offset: at.offset,
            text: text.to_string(),
        })
    }

    /// Insert `text` at the caret; an expanded selection collapses to its
    /// start first. Without a selection this does nothing.
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        let Some(range) = self.selection().cloned() else {
            return Ok(());
        };
        let (start, _) = range.edges();
        let start = start.clone();
        if !range.is_collapsed() {
            self.select_point(start.clone())?;
        }
        self.insert_text_at(&start, text)
    }

    /// Remove `len` characters starting at `offset` of the text at `path`
    pub fn remove_text(&mut self, path: &Path, offset: usize, len: usize) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        let content = &self
            .node(path)?
            .as_text()
            .ok_or_else(|| TransformError::not_a_text(path.clone()))?
            .text;
        let total = char_len(content);
        if offset + len > total {
            return Err(TransformError::offset_out_of_range(
                path.clone(),
                offset + len,
                total,
            ));
        }
        let removed: String = content.chars().skip(offset).take(len).collect();
        self.apply(Operation::RemoveText {
            path: path.clone(),
            offset,
            text: removed,
        })
    }

    /// Default Backspace: delete the character before the caret, or join the
    /// caret's block into the previous block when the caret is at its start.
    /// Returns false when nothing could be deleted.
    pub fn delete_backward(&mut self) -> Result<bool> {
        let Some(caret) = self.caret() else {
            return Ok(false);
        };
        if caret.offset > 0 {
            self.remove_text(&caret.path, caret.offset - 1, 1)?;
            return Ok(true);
        }
        let block = caret.path.parent();
        let Some(previous) = block.previous() else {
            return Ok(false);
        };
        let joinable = match (self.document().tag(&previous), self.document().tag(&block)) {
            (Some(before), Some(current)) => before.is_text_block() && current.is_text_block(),
            _ => false,
        };
        if !joinable || caret.path.previous().is_some() {
            return Ok(false);
        }
        self.merge_node(&block)?;
        Ok(true)
    }
}
