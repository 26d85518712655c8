//! Generic bulleted list keys
//!
//! | Key        | Where                                  | Effect                          |
//! |------------|----------------------------------------|---------------------------------|
//! | Enter      | non-empty line                         | split the line at the caret     |
//! | Enter      | empty line, nested list                | outdent                         |
//! | Enter      | empty line, top-level list             | lift the line out as paragraph  |
//! | Tab        | any line                               | indent (first line: no-op)      |
//! | Shift+Tab  | nested list                            | outdent (top level: no-op)      |
//! | Backspace  | start of a list's first line           | outdent, or lift at top level   |
//!
//! Lists owned by a tool item are left to that tool's handler for
//! everything except splitting and indenting.

use super::{collapsed_caret, indent, outdent, KeyEvent, KeyHandler, KeyResponse};
use crate::models::{Document, Path, Point, Tag};
use crate::operations::{Transaction, TransformError};

/// Who owns the list a line sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListOwner {
    /// Top-level list (directly under the document root)
    Root,
    /// Nested list of another line
    ListItem,
    /// Sub-list of a tool item
    Tool,
}

/// Handler for plain bulleted lists
#[derive(Debug, Clone, Copy, Default)]
pub struct ListHandler;

impl ListHandler {
    /// The list item whose text holds `caret`
    fn line_at(document: &Document, caret: &Point) -> Option<(Path, ListOwner)> {
        if caret.path.last() != Some(0) {
            return None;
        }
        let line = caret.path.parent();
        if document.tag(&line) != Some(Tag::ListItem) {
            return None;
        }
        let owner = line.parent().parent();
        let kind = if owner.is_root() {
            ListOwner::Root
        } else {
            match document.tag(&owner) {
                Some(Tag::ListItem) => ListOwner::ListItem,
                _ => ListOwner::Tool,
            }
        };
        Some((line, kind))
    }
}

impl KeyHandler for ListHandler {
    fn name(&self) -> &'static str {
        "list"
    }

    fn handle(
        &self,
        tx: &mut Transaction<'_>,
        event: &KeyEvent,
    ) -> Result<KeyResponse, TransformError> {
        let Some(caret) = collapsed_caret(tx) else {
            return Ok(KeyResponse::Ignored);
        };
        let Some((line, owner)) = Self::line_at(tx.document(), &caret) else {
            return Ok(KeyResponse::Ignored);
        };
        let empty = tx.document().is_empty_at(&caret.path);

        if event.is_enter() {
            return match (empty, owner) {
                (false, _) => {
                    tx.split_nodes(&caret, &line, None)?;
                    Ok(KeyResponse::Handled)
                }
                (true, ListOwner::ListItem) => {
                    outdent(tx, &line)?;
                    Ok(KeyResponse::Handled)
                }
                (true, ListOwner::Root) => {
                    lift(tx, &line)?;
                    Ok(KeyResponse::Handled)
                }
                (true, ListOwner::Tool) => Ok(KeyResponse::Ignored),
            };
        }

        if event.is_tab() {
            indent(tx, &line)?;
            return Ok(KeyResponse::Handled);
        }

        if event.is_shift_tab() {
            return match owner {
                ListOwner::ListItem => {
                    outdent(tx, &line)?;
                    Ok(KeyResponse::Handled)
                }
                ListOwner::Root => Ok(KeyResponse::Handled),
                ListOwner::Tool => Ok(KeyResponse::Ignored),
            };
        }

        if event.is_backspace() && caret.offset == 0 && line.last() == Some(0) {
            return match owner {
                ListOwner::ListItem => {
                    outdent(tx, &line)?;
                    Ok(KeyResponse::Handled)
                }
                ListOwner::Root => {
                    lift(tx, &line)?;
                    Ok(KeyResponse::Handled)
                }
                ListOwner::Tool => Ok(KeyResponse::Ignored),
            };
        }

        Ok(KeyResponse::Ignored)
    }
}

/// Turn a line of a top-level list into a paragraph, splitting the list
/// around it. The line's own sub-list stays a list right after it.
fn lift(tx: &mut Transaction<'_>, line: &Path) -> Result<(), TransformError> {
    let Some(index) = line.last() else {
        return Err(TransformError::RootOperation);
    };
    let mut list = line.parent();
    let count = tx.document().child_count(&list);

    if index + 1 < count {
        tx.split_node(&list, index + 1, None)?;
    }
    if index > 0 {
        tx.split_node(&list, index, None)?;
        list = list.next();
    }
    // `list` now holds only the lifted line
    tx.unwrap_node(&list)?;

    let paragraph = list;
    if let Some(sublist) = tx
        .document()
        .element(&paragraph)
        .and_then(|element| element.sublist_index())
    {
        tx.move_node(&paragraph.child(sublist), &paragraph.next())?;
    }
    tx.set_tag(&paragraph, Tag::Paragraph)
}
