//! Integration tests for document invariants
//!
//! Tests cover:
//! - Idempotence of normalization on malformed documents
//! - Root layout and leveled header invariants after long key sequences

use anyhow::Result;
use nodespace_outline::models::{
    core_schema, Document, EditorState, Metadata, Node, Point, SchemaRegistry, Tag, ToolKind,
};
use nodespace_outline::normalization::{is_normalized, root_layout};
use nodespace_outline::{Editor, KeyEvent};
use serde_json::json;

/// Malformed documents as a host might load them
fn malformed_documents() -> Vec<Document> {
    let raw = vec![
        json!({ "children": [] }),
        json!({ "children": [{ "text": "loose" }] }),
        json!({ "children": [
            { "type": "paragraph", "children": [{ "text": "a" }] },
            { "type": "paragraph", "children": [{ "text": "b" }] }
        ] }),
        json!({ "children": [
            { "type": "title", "children": [{ "text": "T" }] },
            { "type": "hypotheses", "children": [
                { "type": "hypotheses-item", "children": [{ "text": "x" }] }
            ] }
        ] }),
        json!({ "children": [
            { "type": "title", "children": [{ "text": "T" }] },
            { "type": "ranking", "children": [
                { "type": "paragraph", "children": [{ "text": "p" }] },
                { "type": "ranking-item", "children": [
                    { "type": "ranking-item-title", "children": [{ "text": "q" }] },
                    { "type": "bulleted-list", "children": [] }
                ] }
            ] }
        ] }),
        json!({ "children": [
            { "type": "title", "children": [{ "text": "T" }] },
            { "type": "stakeholders", "children": [
                { "type": "stakeholders-header", "children": [{ "text": "Team" }] },
                { "type": "legend", "children": [{ "text": "key" }] },
                { "type": "stakeholders-item", "props": { "indent": "deep" }, "children": [{ "text": "x" }] }
            ] },
            { "type": "risks-header", "children": [{ "text": "stray" }] },
            { "type": "title", "children": [{ "text": "second" }] }
        ] }),
        json!({ "children": [
            { "type": "title", "children": [{ "text": "T" }] },
            { "type": "bulleted-list", "children": [
                { "type": "list-item", "children": [{ "text": "a" }, { "text": "b" }] }
            ] },
            { "type": "bulleted-list", "children": [
                { "type": "list-item", "children": [] }
            ] },
            { "type": "paragraph", "children": [{ "text": "end" }] }
        ] }),
    ];
    raw.into_iter()
        .map(|value| serde_json::from_value(value).expect("valid document json"))
        .collect()
}

/// Every invariant a committed state must satisfy
fn assert_invariants(state: &EditorState, registry: &SchemaRegistry, context: &str) {
    let document = &state.document;
    assert!(root_layout::is_satisfied(document), "root layout: {context}");
    assert!(is_normalized(document, registry), "normal form: {context}");

    for (index, block) in document.children.iter().enumerate() {
        let Some(element) = block.as_element() else {
            continue;
        };
        if let Tag::Container(tool) = element.tag {
            if let Some(header) = registry.get(tool).header_tag {
                assert_eq!(
                    element.children.first().and_then(Node::tag),
                    Some(header),
                    "leveled container {index} must start with a header: {context}"
                );
            }
        }
    }

    if let Some(range) = &state.selection {
        assert!(document.is_valid_point(&range.anchor), "anchor: {context}");
        assert!(document.is_valid_point(&range.focus), "focus: {context}");
    }
}

// =========================================================================
// Idempotence
// =========================================================================

#[test]
fn test_normalization_is_idempotent() -> Result<()> {
    let editor = Editor::default();

    for (index, document) in malformed_documents().into_iter().enumerate() {
        let once = editor.normalize(&EditorState::new(document, None))?;
        let twice = editor.normalize(&once.state)?;

        assert_eq!(twice.state, once.state, "document {index}");
        assert!(twice.operations.is_empty(), "document {index}");
        assert_invariants(&once.state, editor.registry(), &format!("document {index}"));
    }
    Ok(())
}

// =========================================================================
// Invariant Preservation
// =========================================================================

/// Deterministic pseudo-random sequence (64-bit LCG)
struct Sequence(u64);

impl Sequence {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}

fn starting_state() -> EditorState {
    let ranking = core_schema(ToolKind::Ranking);
    let risks = core_schema(ToolKind::Risks);
    let stakeholders = core_schema(ToolKind::Stakeholders);
    let document = Document::new(vec![
        Node::title("Plan"),
        Node::paragraph("Intro"),
        Node::element(
            ranking.container_tag,
            vec![
                ranking.new_outline_item("First", &["because", "and"]),
                ranking.new_outline_item("Second", &[]),
                ranking.new_outline_item("", &["orphan"]),
            ],
        ),
        Node::element(
            risks.container_tag,
            vec![
                risks.new_header("Area"),
                risks.new_item("Risk", 0, Metadata::Low),
                risks.new_item("", 1, Metadata::None),
                risks.new_header(""),
            ],
        ),
        Node::bulleted_list(&["one", "two", ""]),
        Node::element(
            stakeholders.container_tag,
            vec![stakeholders.new_header("")],
        ),
        Node::paragraph(""),
    ]);
    EditorState::with_caret(document, Point::new([2, 0, 0, 0], 0))
}

fn random_caret(state: &EditorState, sequence: &mut Sequence) -> Option<Point> {
    let texts = state.document.texts();
    let (path, text) = texts.get(sequence.next(texts.len()))?;
    Some(Point::new(path.clone(), sequence.next(text.len() + 1)))
}

#[test]
fn test_invariants_hold_across_key_sequences() -> Result<()> {
    let editor = Editor::default();
    let registry = editor.registry();

    for seed in [7_u64, 42, 1234] {
        let mut sequence = Sequence(seed);
        let mut state = editor.normalize(&starting_state())?.state;
        assert_invariants(&state, registry, "start");

        for step in 0..150 {
            let context = format!("seed {seed}, step {step}");
            state = match sequence.next(6) {
                0 => editor.handle_keydown(&state, &KeyEvent::enter())?.state,
                1 => editor.handle_keydown(&state, &KeyEvent::backspace())?.state,
                2 => editor.handle_keydown(&state, &KeyEvent::tab())?.state,
                3 => editor.handle_keydown(&state, &KeyEvent::shift_tab())?.state,
                4 => editor.apply(&state, |tx| tx.insert_text("x"))?.state,
                _ => match random_caret(&state, &mut sequence) {
                    Some(caret) => editor.apply(&state, |tx| tx.select_point(caret))?.state,
                    None => state,
                },
            };
            assert_invariants(&state, registry, &context);
        }
    }
    Ok(())
}
