//! Leveled Metadata List keys
//!
//! A leveled container holds a Header first, then Headers and Items. Items
//! are single lines carrying an `indent` level and a metadata value. One
//! parametrized handler serves Hypotheses, Stakeholders, Risks and Evidence.

use super::{collapsed_caret, Key, KeyEvent, KeyHandler, KeyResponse};
use crate::models::{
    Document, Metadata, Node, NodeProperties, Path, Point, Props, SchemaDescriptor, Tag,
};
use crate::operations::{Transaction, TransformError};
use serde_json::json;

/// Handler for one Leveled Metadata List tool
#[derive(Debug, Clone)]
pub struct LeveledHandler {
    schema: SchemaDescriptor,
    max_indent: u32,
}

impl LeveledHandler {
    pub fn new(schema: SchemaDescriptor, max_indent: u32) -> Self {
        Self { schema, max_indent }
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// The container line holding `caret`
    fn line_at(&self, document: &Document, caret: &Point) -> Option<(Path, Tag)> {
        if caret.path.last() != Some(0) {
            return None;
        }
        let line = caret.path.parent();
        let container = line.parent();
        if line.is_root() || document.tag(&container) != Some(self.schema.container_tag) {
            return None;
        }
        document.tag(&line).map(|tag| (line, tag))
    }

    fn is_header(&self, tag: Tag) -> bool {
        Some(tag) == self.schema.header_tag
    }

    fn indent_at(&self, document: &Document, line: &Path) -> u32 {
        document
            .element(line)
            .map(|element| self.schema.indent_of(&element.props))
            .unwrap_or_default()
    }

    fn set_indent(
        &self,
        tx: &mut Transaction<'_>,
        line: &Path,
        indent: u32,
    ) -> Result<(), TransformError> {
        let mut patch = Props::new();
        patch.insert("indent".to_string(), json!(indent));
        tx.set_props(line, patch)
    }

    /// Caret at the very start of the root block right after this container
    fn after_container(&self, document: &Document, caret: &Point) -> Option<Path> {
        let block = caret.path.indices().first().copied()?;
        let container = Path::from([block.checked_sub(1)?]);
        let starts_block = document.start(&Path::from([block])).as_ref() == Some(caret);
        (starts_block && document.tag(&container) == Some(self.schema.container_tag))
            .then_some(container)
    }

    fn enter(
        &self,
        tx: &mut Transaction<'_>,
        caret: &Point,
        line: &Path,
        tag: Tag,
    ) -> Result<KeyResponse, TransformError> {
        let document = tx.document();
        let container = line.parent();
        let count = document.child_count(&container);
        let is_last = line.last().is_some_and(|index| index + 1 == count);
        let empty = document.is_empty_at(line);

        if self.is_header(tag) {
            let next_is_header = document
                .tag(&line.next())
                .is_some_and(|next| self.is_header(next));
            if !empty && (is_last || next_is_header) {
                let at = line.next();
                tx.insert_node(self.schema.new_item("", 0, Metadata::None), &at)?;
                if let Some(start) = tx.document().start(&at) {
                    tx.select_point(start)?;
                }
                return Ok(KeyResponse::Handled);
            }
            if empty && is_last {
                if count > 1 {
                    tx.remove_node(line)?;
                }
                self.select_after(tx, &container)?;
                return Ok(KeyResponse::Handled);
            }
            return Ok(KeyResponse::Ignored);
        }

        if tag != self.schema.item_tag {
            return Ok(KeyResponse::Ignored);
        }

        let indent = self.indent_at(document, line);
        if empty {
            if indent > 0 {
                self.set_indent(tx, line, indent - 1)?;
            } else if let Some(header) = self.schema.header_tag {
                tx.set_tag(line, header)?;
            }
            return Ok(KeyResponse::Handled);
        }

        let fresh = NodeProperties::new(
            self.schema.item_tag,
            self.schema.item_props(indent, Metadata::None),
        );
        tx.split_nodes(caret, line, Some(fresh))?;
        Ok(KeyResponse::Handled)
    }

    /// Move the caret to the start of the block after `container`, creating
    /// a paragraph there when nothing follows
    fn select_after(
        &self,
        tx: &mut Transaction<'_>,
        container: &Path,
    ) -> Result<(), TransformError> {
        let next = container.next();
        if tx.document().get(&next).is_none() {
            tx.insert_node(Node::paragraph(""), &next)?;
        }
        match tx.document().start(&next) {
            Some(start) => tx.select_point(start),
            None => Err(TransformError::invalid_path(next)),
        }
    }

    fn backspace(
        &self,
        tx: &mut Transaction<'_>,
        caret: &Point,
        line: &Path,
    ) -> Result<KeyResponse, TransformError> {
        let container = line.parent();
        let count = tx.document().child_count(&container);

        if count == 1 {
            tx.set_tag(line, Tag::Paragraph)?;
            tx.unwrap_node(&container)?;
            return Ok(KeyResponse::Handled);
        }

        let Some(previous) = line.previous() else {
            return Ok(KeyResponse::Ignored);
        };
        if caret.offset > 0 || !tx.document().is_empty_at(&previous) {
            return Ok(KeyResponse::Ignored);
        }

        // the earlier line keeps its identity
        let identity = tx
            .document()
            .element(&previous)
            .map(|element| element.properties())
            .ok_or_else(|| TransformError::not_an_element(previous.clone()))?;
        tx.set_node(line, identity)?;
        tx.merge_node(line)?;
        Ok(KeyResponse::Handled)
    }

    /// Tab raises the indent by one, up to one deeper than the previous item
    /// and never past `max_indent`; Shift+Tab lowers it
    fn tab(
        &self,
        tx: &mut Transaction<'_>,
        line: &Path,
        tag: Tag,
        shift: bool,
    ) -> Result<(), TransformError> {
        if tag != self.schema.item_tag {
            return Ok(());
        }
        let document = tx.document();
        let indent = self.indent_at(document, line);

        if shift {
            if indent > 0 {
                self.set_indent(tx, line, indent - 1)?;
            }
            return Ok(());
        }

        let cap = match line.previous() {
            Some(previous) if document.tag(&previous) == Some(self.schema.item_tag) => {
                self.indent_at(document, &previous) + 1
            }
            _ => 0,
        };
        let target = indent + 1;
        if target <= cap.min(self.max_indent) {
            self.set_indent(tx, line, target)?;
        }
        Ok(())
    }
}

impl KeyHandler for LeveledHandler {
    fn name(&self) -> &'static str {
        self.schema.tool.as_str()
    }

    fn handle(
        &self,
        tx: &mut Transaction<'_>,
        event: &KeyEvent,
    ) -> Result<KeyResponse, TransformError> {
        let Some(caret) = collapsed_caret(tx) else {
            return Ok(KeyResponse::Ignored);
        };

        let Some((line, tag)) = self.line_at(tx.document(), &caret) else {
            // Backspace at the start of the block right after a container
            if event.is_backspace() && caret.offset == 0 {
                if let Some(container) = self.after_container(tx.document(), &caret) {
                    if let Some(end) = tx.document().end(&container) {
                        tx.select_point(end)?;
                        return Ok(KeyResponse::Handled);
                    }
                }
            }
            return Ok(KeyResponse::Ignored);
        };

        if event.is_enter() {
            return self.enter(tx, &caret, &line, tag);
        }
        if event.is_backspace() && caret.offset == 0 {
            return self.backspace(tx, &caret, &line);
        }
        if event.key == Key::Tab {
            self.tab(tx, &line, tag, event.shift)?;
            return Ok(KeyResponse::Handled);
        }
        Ok(KeyResponse::Ignored)
    }
}
