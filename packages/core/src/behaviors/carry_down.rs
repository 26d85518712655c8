//! Indent / outdent with carry-down
//!
//! The one reusable nesting algorithm. It works on any "sub-list owner": a
//! `ListItem` (`[Text, BulletedList?]`) or a Simple Outline item
//! (`[ItemTitle, BulletedList?]`). Moving an item never drops the lines that
//! followed it: on outdent they are carried down into the moved item's own
//! sub-list, in order.

use crate::models::{Node, NodeProperties, Path, Tag};
use crate::operations::{Transaction, TransformError};

/// Move `item` to the end of its previous sibling's sub-list
///
/// Outline items are reshaped into list items on the way (their title
/// element is unwrapped). Returns false, without touching the tree, when
/// `item` has no previous sibling that can own a sub-list.
pub fn indent(tx: &mut Transaction<'_>, item: &Path) -> Result<bool, TransformError> {
    let Some(previous) = item.previous() else {
        return Ok(false);
    };
    let document = tx.document();
    let (Some(host), Some(element)) = (document.element(&previous), document.element(item)) else {
        return Err(TransformError::not_an_element(item.clone()));
    };
    if !host.tag.owns_sublist() || !element.tag.owns_sublist() {
        return Ok(false);
    }
    let reshape = element.tag.is_outline_item();
    let (sublist, host_len) = (host.sublist_index(), host.children.len());

    let list = match sublist {
        Some(index) => previous.child(index),
        None => {
            let at = previous.child(host_len);
            tx.insert_node(Node::element(Tag::BulletedList, Vec::new()), &at)?;
            at
        }
    };

    if reshape {
        tx.unwrap_node(&item.child(0))?;
        tx.set_tag(item, Tag::ListItem)?;
    }

    let end = tx.document().child_count(&list);
    tx.move_node(item, &list.child(end))?;
    tracing::trace!(item = %item, list = %list, "indented");
    Ok(true)
}

/// Move `item` out of its sub-list to sit right after the list's owner
///
/// Younger siblings are carried down into `item`'s own sub-list. When the
/// owner is an outline item, `item` becomes an outline item of the same tool.
/// Returns false, without touching the tree, when the enclosing list has no
/// sub-list owner (a top-level list, or a list outside any item).
pub fn outdent(tx: &mut Transaction<'_>, item: &Path) -> Result<bool, TransformError> {
    if item.len() < 3 {
        return Ok(false);
    }
    let Some(index) = item.last() else {
        return Ok(false);
    };
    let list = item.parent();
    let owner = list.parent();
    let document = tx.document();
    if document.tag(&list) != Some(Tag::BulletedList) {
        return Ok(false);
    }
    let Some(owner_tag) = document.tag(&owner).filter(Tag::owns_sublist) else {
        return Ok(false);
    };
    let element = document
        .element(item)
        .ok_or_else(|| TransformError::not_an_element(item.clone()))?;
    let (sublist, item_len) = (element.sublist_index(), element.children.len());
    let younger = document.child_count(&list) - index - 1;

    if younger > 0 {
        let target = match sublist {
            Some(sublist) => item.child(sublist),
            None => {
                let at = item.child(item_len);
                tx.insert_node(Node::element(Tag::BulletedList, Vec::new()), &at)?;
                at
            }
        };
        for _ in 0..younger {
            let end = tx.document().child_count(&target);
            tx.move_node(&item.next(), &target.child(end))?;
        }
    }

    if owner_tag.is_outline_item() {
        if let Some(tool) = owner_tag.tool() {
            tx.wrap_node(&item.child(0), NodeProperties::tag(Tag::ItemTitle(tool)))?;
        }
        tx.set_tag(item, owner_tag)?;
    }

    tx.move_node(item, &owner.next())?;
    if index == 0 {
        tx.remove_node(&list)?;
    }
    tracing::trace!(item = %item, carried = younger, "outdented");
    Ok(true)
}
