//! Simple Outline keys
//!
//! A Simple Outline container holds items shaped `[ItemTitle, BulletedList?]`.
//! The handler is parametrized by the tool's descriptor, so Ranking,
//! Decision Tree and Agenda all run through this one state machine.
//!
//! Title line:
//!
//! | Key        | Precondition                                 | Effect                              |
//! |------------|----------------------------------------------|-------------------------------------|
//! | Enter      | empty last item, only item                   | exit: container becomes a paragraph |
//! | Enter      | empty last item, other items before it       | exit: the item leaves as paragraph  |
//! | Enter      | otherwise                                    | split into two items at the caret   |
//! | Tab        |                                              | indent under the previous item      |
//! | Shift+Tab  |                                              | no-op (already top level)           |
//! | Backspace  | start of the only item                       | exit: container becomes paragraphs  |
//! | Backspace  | start of the first of several items          | item leaves before the container    |
//! | Backspace  | start of an empty last item                  | item leaves after the container     |
//! | Backspace  | start of a later item, previous item empty   | previous item is removed            |
//! | Backspace  | start of a later item                        | merge into the previous item        |
//!
//! Sub-list line:
//!
//! | Key        | Precondition                    | Effect                         |
//! |------------|---------------------------------|--------------------------------|
//! | Enter      | empty line                      | outdent into a new item        |
//! | Enter      | otherwise                       | split the line                 |
//! | Tab        |                                 | indent within the sub-list     |
//! | Shift+Tab  |                                 | outdent into a new item        |
//! | Backspace  | start of the first line         | outdent into a new item        |

use super::{collapsed_caret, indent, outdent, KeyEvent, KeyHandler, KeyResponse};
use crate::models::{Document, Path, Point, SchemaDescriptor, Tag};
use crate::operations::{Transaction, TransformError};

/// Where the caret sits inside an outline container
#[derive(Debug, Clone, PartialEq, Eq)]
enum Position {
    /// In the title of `item`
    Title { item: Path },
    /// In a line of `item`'s sub-list
    SubLine { line: Path },
}

/// Handler for one Simple Outline tool
#[derive(Debug, Clone)]
pub struct OutlineHandler {
    schema: SchemaDescriptor,
}

impl OutlineHandler {
    pub fn new(schema: SchemaDescriptor) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    fn locate(&self, document: &Document, caret: &Point) -> Option<Position> {
        if caret.path.last() != Some(0) {
            return None;
        }
        let block = caret.path.parent();
        let tag = document.tag(&block)?;

        if Some(tag) == self.schema.title_tag && block.last() == Some(0) {
            let item = block.parent();
            let container = item.parent();
            let in_tool = document.tag(&item) == Some(self.schema.item_tag)
                && document.tag(&container) == Some(self.schema.container_tag);
            return in_tool.then_some(Position::Title { item });
        }

        if tag == Tag::ListItem {
            let list = block.parent();
            let owner = list.parent();
            let owned = !owner.is_root() && document.tag(&owner) == Some(self.schema.item_tag);
            return owned.then_some(Position::SubLine { line: block });
        }
        None
    }

    fn title(
        &self,
        tx: &mut Transaction<'_>,
        event: &KeyEvent,
        caret: &Point,
        item: &Path,
    ) -> Result<KeyResponse, TransformError> {
        let container = item.parent();
        let index = item.last().unwrap_or_default();
        let count = tx.document().child_count(&container);
        let is_last = index + 1 == count;
        let has_sublist = tx.document().child_count(item) > 1;
        let is_blank = tx.document().is_empty_at(&caret.path) && !has_sublist;

        if event.is_enter() {
            if is_blank && is_last {
                if count == 1 {
                    self.dissolve(tx, &container)?;
                } else {
                    tx.move_node(item, &container.next())?;
                    self.to_paragraphs(tx, &container.next())?;
                }
            } else {
                tx.split_nodes(caret, item, None)?;
            }
            return Ok(KeyResponse::Handled);
        }

        if event.is_tab() {
            indent(tx, item)?;
            return Ok(KeyResponse::Handled);
        }
        if event.is_shift_tab() {
            return Ok(KeyResponse::Handled);
        }

        if event.is_backspace() && caret.offset == 0 {
            if count == 1 {
                self.dissolve(tx, &container)?;
            } else if index == 0 {
                tx.move_node(item, &container)?;
                self.to_paragraphs(tx, &container)?;
            } else if is_blank && is_last {
                tx.move_node(item, &container.next())?;
                self.to_paragraphs(tx, &container.next())?;
            } else {
                self.merge_into_previous(tx, item)?;
            }
            return Ok(KeyResponse::Handled);
        }

        Ok(KeyResponse::Ignored)
    }

    fn sub_line(
        &self,
        tx: &mut Transaction<'_>,
        event: &KeyEvent,
        caret: &Point,
        line: &Path,
    ) -> Result<KeyResponse, TransformError> {
        if event.is_enter() {
            if tx.document().is_empty_at(&caret.path) {
                outdent(tx, line)?;
            } else {
                tx.split_nodes(caret, line, None)?;
            }
            return Ok(KeyResponse::Handled);
        }
        if event.is_tab() {
            indent(tx, line)?;
            return Ok(KeyResponse::Handled);
        }
        if event.is_shift_tab() {
            outdent(tx, line)?;
            return Ok(KeyResponse::Handled);
        }
        if event.is_backspace() && caret.offset == 0 && line.last() == Some(0) {
            outdent(tx, line)?;
            return Ok(KeyResponse::Handled);
        }
        Ok(KeyResponse::Ignored)
    }

    /// Turn an item that now sits outside its container into plain blocks:
    /// the title becomes a paragraph, the sub-list stays a list after it.
    fn to_paragraphs(&self, tx: &mut Transaction<'_>, item: &Path) -> Result<(), TransformError> {
        tx.set_tag(&item.child(0), Tag::Paragraph)?;
        tx.unwrap_node(item)
    }

    /// Replace a single-item container by the item's content
    fn dissolve(&self, tx: &mut Transaction<'_>, container: &Path) -> Result<(), TransformError> {
        self.to_paragraphs(tx, &container.child(0))?;
        tx.unwrap_node(container)
    }

    /// Backspace at the start of a later item: its title text joins the
    /// previous title and its sub-list joins the previous sub-list.
    fn merge_into_previous(
        &self,
        tx: &mut Transaction<'_>,
        item: &Path,
    ) -> Result<(), TransformError> {
        let Some(previous) = item.previous() else {
            return Err(TransformError::NoPreviousSibling { path: item.clone() });
        };
        let previous_blank =
            tx.document().is_empty_at(&previous) && tx.document().child_count(&previous) < 2;
        if previous_blank {
            return tx.remove_node(&previous);
        }

        let previous_title = previous.child(0);
        let end = tx.document().child_count(&previous_title);
        tx.move_node(&item.child(0).child(0), &previous_title.child(end))?;
        tx.merge_node(&previous_title.child(end))?;

        if tx.document().child_count(item) > 1 {
            let size = tx.document().child_count(&previous);
            tx.move_node(&item.child(1), &previous.child(size))?;
            if size > 1 {
                tx.merge_node(&previous.child(size))?;
            }
        }
        tx.remove_node(item)
    }
}

impl KeyHandler for OutlineHandler {
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
        match self.locate(tx.document(), &caret) {
            Some(Position::Title { item }) => self.title(tx, event, &caret, &item),
            Some(Position::SubLine { line }) => self.sub_line(tx, event, &caret, &line),
            None => Ok(KeyResponse::Ignored),
        }
    }
}
