//! Schema Normalization
//!
//! After every edit the draft tree is walked from the root in pre-order. The
//! first rule that finds a violation applies one corrective primitive and the
//! walk starts over, until no rule fires. A single handler edit can need
//! several rounds (an unwrap exposes a misplaced child, which is retyped,
//! which then merges with a neighbour, ...).
//!
//! Rules are pure functions from the current tree to an optional `Violation`;
//! only `normalize` mutates, through the `Transaction` primitives, so the
//! selection is carried along like any other edit.
//!
//! ## Rule set
//!
//! - **Root layout** - see [`root_layout`]
//! - **Context** - tool tags outside their own container become paragraphs,
//!   nested containers and stray outline items are unwrapped, stray list items
//!   are wrapped in a list
//! - **Empty elements** - text blocks and list items get an empty Text,
//!   containers get their first line back, empty lists are removed
//! - **Text blocks** - exactly one Text child
//! - **Lists** - lists hold list items, list items are `[Text, BulletedList?]`
//! - **Simple Outline** - container holds items, item is `[ItemTitle, BulletedList?]`
//! - **Leveled list** - Header first, then Header/Item (plus Legend when the
//!   schema allows it); item props carry a valid `indent` and metadata value

pub mod root_layout;


use crate::models::{
    Document, Element, Metadata, Node, NodeProperties, Path, SchemaDescriptor, SchemaRegistry,
    Tag, ToolVariant,
};
use crate::operations::{Transaction, TransformError};
use serde_json::json;
use thiserror::Error;

/// Errors raised while driving a tree to its normal form
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    /// A corrective primitive could not be applied
    #[error("Normalization step failed: {0}")]
    Transform(#[from] TransformError),

    /// Rules kept firing past the configured pass limit
    #[error("Normalization did not converge after {passes} passes")]
    Diverged { passes: usize },
}

/// One corrective primitive
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fix {
    Insert(Path, Node),
    Remove(Path),
    Merge(Path),
    Wrap(Path, NodeProperties),
    Unwrap(Path),
    Set(Path, NodeProperties),
}

impl Fix {
    fn apply(self, tx: &mut Transaction<'_>) -> Result<(), TransformError> {
        match self {
            Fix::Insert(at, node) => tx.insert_node(node, &at),
            Fix::Remove(at) => tx.remove_node(&at),
            Fix::Merge(at) => tx.merge_node(&at),
            Fix::Wrap(at, wrapper) => tx.wrap_node(&at, wrapper),
            Fix::Unwrap(at) => tx.unwrap_node(&at),
            Fix::Set(at, properties) => tx.set_node(&at, properties),
        }
    }
}

/// A rule that fired, with the fix it asks for
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Violation {
    pub rule: &'static str,
    pub fix: Fix,
}

impl Violation {
    pub(crate) fn new(rule: &'static str, fix: Fix) -> Self {
        Self { rule, fix }
    }
}

/// Drive the draft to its normal form
///
/// Returns the number of fixes applied. More than `max_passes` fixes means
/// the rules are fighting each other, reported as `Diverged`.
pub fn normalize(
    tx: &mut Transaction<'_>,
    registry: &SchemaRegistry,
    max_passes: usize,
) -> Result<usize, NormalizationError> {
    let mut passes = 0;
    while let Some(violation) = find_violation(tx.document(), registry) {
        if passes >= max_passes {
            return Err(NormalizationError::Diverged { passes });
        }
        tracing::trace!(rule = violation.rule, pass = passes, "normalization rule fired");
        violation.fix.apply(tx)?;
        passes += 1;
    }
    if passes > 0 {
        tracing::debug!(passes, "document normalized");
    }
    Ok(passes)
}

/// True when no rule fires on `document`
pub fn is_normalized(document: &Document, registry: &SchemaRegistry) -> bool {
    find_violation(document, registry).is_none()
}

/// First violation in pre-order, root layout first
pub(crate) fn find_violation(document: &Document, registry: &SchemaRegistry) -> Option<Violation> {
    root_layout::check(document).or_else(|| visit(registry, &Path::root(), None, &document.children))
}

fn visit(
    registry: &SchemaRegistry,
    path: &Path,
    tag: Option<Tag>,
    children: &[Node],
) -> Option<Violation> {
    if let Some(violation) = check_children(registry, path, tag, children) {
        return Some(violation);
    }
    children.iter().enumerate().find_map(|(index, child)| match child {
        Node::Element(element) => visit(
            registry,
            &path.child(index),
            Some(element.tag),
            &element.children,
        ),
        Node::Text(_) => None,
    })
}

fn check_children(
    registry: &SchemaRegistry,
    path: &Path,
    parent: Option<Tag>,
    children: &[Node],
) -> Option<Violation> {
    let Some(tag) = parent else {
        return misplaced(registry, path, parent, children).or_else(|| root_children(path, children));
    };

    if tag.is_text_block() {
        return text_block(path, children);
    }
    if children.is_empty() {
        return empty_element(registry, path, tag);
    }
    if let Some(violation) = misplaced(registry, path, parent, children) {
        return Some(violation);
    }

    match tag {
        Tag::BulletedList => list_children(path, children),
        Tag::ListItem => list_item_children(path, children),
        Tag::Container(tool) => {
            let schema = registry.get(tool);
            match schema.variant() {
                ToolVariant::SimpleOutline => outline_container(schema, path, children),
                ToolVariant::LeveledList => leveled_container(schema, path, children),
            }
        }
        Tag::Item(tool) => outline_item(registry.get(tool), path, children),
        _ => None,
    }
}

// -------------------------------------------------------------------------
// Context rules
// -------------------------------------------------------------------------

/// Whether an element tagged `child` may sit directly under `parent`
/// (`None` = document root). Tags without a fixed home return true; the
/// parent's own content rules deal with them.
fn belongs(registry: &SchemaRegistry, child: Tag, parent: Option<Tag>) -> bool {
    match child {
        Tag::Title | Tag::Container(_) => parent.is_none(),
        Tag::Header(tool) | Tag::Item(tool) => parent == Some(Tag::Container(tool)),
        Tag::ItemTitle(tool) => parent == Some(Tag::Item(tool)),
        Tag::Legend => matches!(
            parent,
            Some(Tag::Container(tool)) if registry.get(tool).allows_legend
        ),
        Tag::ListItem => parent == Some(Tag::BulletedList),
        Tag::Paragraph | Tag::BulletedList => true,
    }
}

fn misplaced(
    registry: &SchemaRegistry,
    path: &Path,
    parent: Option<Tag>,
    children: &[Node],
) -> Option<Violation> {
    children.iter().enumerate().find_map(|(index, child)| {
        let element = child.as_element()?;
        if belongs(registry, element.tag, parent) {
            return None;
        }
        let at = path.child(index);
        let violation = match element.tag {
            Tag::Container(_) => Violation::new("nested-container", Fix::Unwrap(at)),
            tag if tag.is_outline_item() => Violation::new("stray-outline-item", Fix::Unwrap(at)),
            Tag::ListItem => Violation::new(
                "stray-list-item",
                Fix::Wrap(at, NodeProperties::tag(Tag::BulletedList)),
            ),
            _ => Violation::new(
                "demote-to-paragraph",
                Fix::Set(at, NodeProperties::tag(Tag::Paragraph)),
            ),
        };
        Some(violation)
    })
}

// -------------------------------------------------------------------------
// Content rules
// -------------------------------------------------------------------------

fn empty_element(registry: &SchemaRegistry, path: &Path, tag: Tag) -> Option<Violation> {
    let first = path.child(0);
    let violation = match tag {
        Tag::BulletedList => Violation::new("empty-list", Fix::Remove(path.clone())),
        Tag::ListItem => Violation::new("empty-list-item", Fix::Insert(first, Node::text(""))),
        Tag::Container(tool) => {
            let schema = registry.get(tool);
            let line = match schema.variant() {
                ToolVariant::SimpleOutline => schema.new_outline_item("", &[]),
                ToolVariant::LeveledList => schema.new_header(""),
            };
            Violation::new("empty-container", Fix::Insert(first, line))
        }
        Tag::Item(tool) => {
            let title = registry.get(tool).title_tag.unwrap_or(Tag::Paragraph);
            Violation::new(
                "empty-outline-item",
                Fix::Insert(first, Node::element(title, vec![Node::text("")])),
            )
        }
        _ => return None,
    };
    Some(violation)
}

/// Adjacent top-level lists join into one
fn root_children(path: &Path, children: &[Node]) -> Option<Violation> {
    (1..children.len()).find_map(|index| {
        let joined = is_list(&children[index - 1]) && is_list(&children[index]);
        joined.then(|| Violation::new("join-lists", Fix::Merge(path.child(index))))
    })
}

fn is_list(node: &Node) -> bool {
    node.tag().is_some_and(|tag| tag.is_list())
}

fn is_text_block(node: &Node) -> bool {
    node.tag().is_some_and(|tag| tag.is_text_block())
}

fn text_block(path: &Path, children: &[Node]) -> Option<Violation> {
    if children.is_empty() {
        return Some(Violation::new(
            "empty-text-block",
            Fix::Insert(path.child(0), Node::text("")),
        ));
    }
    if let Some(index) = children.iter().position(|child| !child.is_text()) {
        return Some(Violation::new(
            "flatten-text-block",
            Fix::Unwrap(path.child(index)),
        ));
    }
    (children.len() > 1).then(|| Violation::new("merge-texts", Fix::Merge(path.child(1))))
}

fn list_children(path: &Path, children: &[Node]) -> Option<Violation> {
    children.iter().enumerate().find_map(|(index, child)| {
        let at = path.child(index);
        match child {
            Node::Text(_) => Some(Violation::new(
                "list-text",
                Fix::Wrap(at, NodeProperties::tag(Tag::ListItem)),
            )),
            Node::Element(element) if element.tag == Tag::ListItem => None,
            Node::Element(element) if element.tag.is_text_block() => Some(Violation::new(
                "list-block",
                Fix::Set(at, NodeProperties::tag(Tag::ListItem)),
            )),
            Node::Element(_) => Some(Violation::new("list-element", Fix::Unwrap(at))),
        }
    })
}

/// `[Text, BulletedList?]`
fn list_item_children(path: &Path, children: &[Node]) -> Option<Violation> {
    match &children[0] {
        Node::Text(_) => {}
        child if is_text_block(child) => {
            return Some(Violation::new("list-item-block", Fix::Unwrap(path.child(0))));
        }
        Node::Element(_) => {
            return Some(Violation::new(
                "list-item-text",
                Fix::Insert(path.child(0), Node::text("")),
            ));
        }
    }
    sublist_tail(path, children)
}

/// Everything after the first child of a sub-list owner must end up as one
/// trailing list
fn sublist_tail(path: &Path, children: &[Node]) -> Option<Violation> {
    (1..children.len()).find_map(|index| {
        let at = path.child(index);
        match &children[index] {
            Node::Text(_) if children[index - 1].is_text() => {
                Some(Violation::new("merge-texts", Fix::Merge(at)))
            }
            Node::Text(_) => Some(Violation::new(
                "sublist-text",
                Fix::Wrap(at, NodeProperties::tag(Tag::ListItem)),
            )),
            Node::Element(element) if element.tag.is_list() => {
                is_list(&children[index - 1]).then(|| Violation::new("join-lists", Fix::Merge(at)))
            }
            Node::Element(element) if element.tag.is_text_block() => Some(Violation::new(
                "sublist-block",
                Fix::Set(at, NodeProperties::tag(Tag::ListItem)),
            )),
            Node::Element(_) => Some(Violation::new("sublist-element", Fix::Unwrap(at))),
        }
    })
}

fn outline_container(
    schema: &SchemaDescriptor,
    path: &Path,
    children: &[Node],
) -> Option<Violation> {
    children.iter().enumerate().find_map(|(index, child)| {
        if child.tag() == Some(schema.item_tag) {
            return None;
        }
        Some(Violation::new(
            "outline-wrap-item",
            Fix::Wrap(path.child(index), NodeProperties::tag(schema.item_tag)),
        ))
    })
}

/// `[ItemTitle, BulletedList?]`
fn outline_item(schema: &SchemaDescriptor, path: &Path, children: &[Node]) -> Option<Violation> {
    let title_tag = schema.title_tag.unwrap_or(Tag::Paragraph);
    let first = path.child(0);
    match &children[0] {
        Node::Element(element) if element.tag == title_tag => {}
        Node::Text(_) => {
            return Some(Violation::new(
                "outline-title-wrap",
                Fix::Wrap(first, NodeProperties::tag(title_tag)),
            ));
        }
        child if is_text_block(child) => {
            return Some(Violation::new(
                "outline-title-retype",
                Fix::Set(first, NodeProperties::tag(title_tag)),
            ));
        }
        Node::Element(_) => {
            return Some(Violation::new(
                "outline-title-missing",
                Fix::Insert(first, Node::element(title_tag, vec![Node::text("")])),
            ));
        }
    }
    sublist_tail(path, children)
}

fn leveled_container(
    schema: &SchemaDescriptor,
    path: &Path,
    children: &[Node],
) -> Option<Violation> {
    let header_tag = schema.header_tag.unwrap_or(Tag::Paragraph);
    let first = path.child(0);
    match &children[0] {
        Node::Element(element) if element.tag == header_tag => {}
        child if is_text_block(child) => {
            return Some(Violation::new(
                "leveled-header-retype",
                Fix::Set(first, NodeProperties::tag(header_tag)),
            ));
        }
        _ => {
            return Some(Violation::new(
                "leveled-header-wrap",
                Fix::Wrap(first, NodeProperties::tag(header_tag)),
            ));
        }
    }

    let fresh_item = || NodeProperties::new(schema.item_tag, schema.item_props(0, Metadata::None));
    children.iter().enumerate().skip(1).find_map(|(index, child)| {
        let at = path.child(index);
        match child {
            Node::Element(element) if element.tag == schema.item_tag => {
                repair_item_props(schema, element)
                    .map(|props| Violation::new("leveled-item-props", Fix::Set(at, props)))
            }
            Node::Element(element)
                if element.tag == header_tag
                    || (element.tag == Tag::Legend && schema.allows_legend) =>
            {
                None
            }
            child if is_text_block(child) => Some(Violation::new(
                "leveled-item-retype",
                Fix::Set(at, fresh_item()),
            )),
            _ => Some(Violation::new("leveled-item-wrap", Fix::Wrap(at, fresh_item()))),
        }
    })
}

/// Repaired identity of a leveled item, `None` when its props are valid
fn repair_item_props(schema: &SchemaDescriptor, element: &Element) -> Option<NodeProperties> {
    let mut props = element.props.clone();
    props.insert("indent".to_string(), json!(schema.indent_of(&element.props)));
    if let Some(field) = schema.metadata_field {
        props.insert(
            field.to_string(),
            json!(schema.metadata_of(&element.props).as_str()),
        );
    }
    (props != element.props).then(|| NodeProperties::new(element.tag, props))
}
