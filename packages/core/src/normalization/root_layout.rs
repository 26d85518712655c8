//! Root Layout Enforcer
//!
//! The document root always starts with a Title and ends with an empty
//! Paragraph. Exit behaviors rely on that trailing paragraph being there to
//! receive the caret. These rules run first inside every normalization pass
//! and once more, on their own, at the end of each edit cycle.

use super::{Fix, NormalizationError, Violation};
use crate::models::{Document, Node, NodeProperties, Path, Tag};
use crate::operations::Transaction;

/// First root layout violation, if any
pub(crate) fn check(document: &Document) -> Option<Violation> {
    let children = &document.children;
    let Some(first) = children.first() else {
        return Some(Violation::new(
            "root-title-missing",
            Fix::Insert(Path::from([0]), Node::title("")),
        ));
    };

    if let Some(index) = children.iter().position(Node::is_text) {
        return Some(Violation::new(
            "root-text",
            Fix::Wrap(Path::from([index]), NodeProperties::tag(Tag::Paragraph)),
        ));
    }

    match first.tag() {
        Some(Tag::Title) => {}
        Some(tag) if tag.is_text_block() => {
            return Some(Violation::new(
                "root-title-retype",
                Fix::Set(Path::from([0]), NodeProperties::tag(Tag::Title)),
            ));
        }
        _ => {
            return Some(Violation::new(
                "root-title-missing",
                Fix::Insert(Path::from([0]), Node::title("")),
            ));
        }
    }

    if let Some(index) = children
        .iter()
        .skip(1)
        .position(|child| child.tag() == Some(Tag::Title))
    {
        return Some(Violation::new(
            "root-extra-title",
            Fix::Set(Path::from([index + 1]), NodeProperties::tag(Tag::Paragraph)),
        ));
    }

    let trailing_ok = children.len() > 1
        && children
            .last()
            .is_some_and(|last| last.tag() == Some(Tag::Paragraph) && last.string().is_empty());
    if !trailing_ok {
        return Some(Violation::new(
            "root-trailing-paragraph",
            Fix::Insert(Path::from([children.len()]), Node::paragraph("")),
        ));
    }
    None
}

/// True when the root layout holds for `document`
pub fn is_satisfied(document: &Document) -> bool {
    check(document).is_none()
}

/// Apply root layout fixes until none is left
pub fn enforce(tx: &mut Transaction<'_>, max_passes: usize) -> Result<usize, NormalizationError> {
    let mut passes = 0;
    while let Some(violation) = check(tx.document()) {
        if passes >= max_passes {
            return Err(NormalizationError::Diverged { passes });
        }
        tracing::trace!(rule = violation.rule, "root layout rule fired");
        violation.fix.apply(tx)?;
        passes += 1;
    }
    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EditorState;

    fn enforced(children: Vec<Node>) -> Document {
        let state = EditorState::new(Document::new(children), None);
        let mut tx = Transaction::new(&state);
        enforce(&mut tx, 100).unwrap();
        tx.into_parts().0.document
    }

    #[test]
    fn test_empty_document_gets_title_and_trailing_paragraph() {
        let document = enforced(Vec::new());
        assert_eq!(document, Document::default());
    }

    #[test]
    fn test_first_paragraph_becomes_title() {
        let document = enforced(vec![Node::paragraph("Notes"), Node::paragraph("")]);
        assert_eq!(document.tag(&Path::from([0])), Some(Tag::Title));
        assert_eq!(document.string(&Path::from([0])), "Notes");
        assert_eq!(document.children.len(), 2);
    }

    #[test]
    fn test_list_first_gets_title_inserted() {
        let document = enforced(vec![Node::bulleted_list(&["a"]), Node::paragraph("")]);
        assert_eq!(document.tag(&Path::from([0])), Some(Tag::Title));
        assert_eq!(document.tag(&Path::from([1])), Some(Tag::BulletedList));
    }

    #[test]
    fn test_second_title_is_demoted() {
        let document = enforced(vec![Node::title("A"), Node::title("B"), Node::paragraph("")]);
        assert_eq!(document.tag(&Path::from([1])), Some(Tag::Paragraph));
        assert_eq!(document.string(&Path::from([1])), "B");
    }

    #[test]
    fn test_trailing_paragraph_is_appended_after_text() {
        let document = enforced(vec![Node::title("A"), Node::paragraph("typed")]);
        assert_eq!(document.children.len(), 3);
        assert!(is_satisfied(&document));
    }

    #[test]
    fn test_root_text_is_wrapped() {
        let document = enforced(vec![Node::title("A"), Node::text("loose")]);
        assert_eq!(document.tag(&Path::from([1])), Some(Tag::Paragraph));
        assert_eq!(document.string(&Path::from([1])), "loose");
        assert_eq!(document.children.len(), 3);
    }
}
