//! Tests for Transaction primitives

#[cfg(test)]
mod tests {
    use crate::models::{
        Document, EditorState, Node, NodeProperties, Path, Point, Props, Range, Tag, ToolKind,
    };
    use crate::operations::{Operation, Transaction, TransformError};
    use serde_json::json;

    fn state(children: Vec<Node>, caret: Point) -> EditorState {
        EditorState::with_caret(Document::new(children), caret)
    }

    fn texts(tx: &Transaction) -> Vec<String> {
        tx.document()
            .children
            .iter()
            .map(Node::string)
            .collect()
    }

    #[test]
    fn test_untouched_transaction_is_clean() {
        let original = EditorState::default();
        let tx = Transaction::new(&original);
        assert!(!tx.is_dirty());
        let (state, operations) = tx.into_parts();
        assert_eq!(state, original);
        assert!(operations.is_empty());
    }

    #[test]
    fn test_failed_primitive_leaves_draft_untouched() {
        let original = EditorState::default();
        let mut tx = Transaction::new(&original);
        let err = tx.remove_node(&Path::from([7])).unwrap_err();
        assert_eq!(err, TransformError::invalid_path(Path::from([7])));
        assert!(!tx.is_dirty());
        assert_eq!(tx.state(), &original);
    }

    #[test]
    fn test_insert_node_shifts_caret() {
        let original = state(
            vec![Node::title("T"), Node::paragraph("abc"), Node::paragraph("")],
            Point::new([1, 0], 2),
        );
        let mut tx = Transaction::new(&original);
        tx.insert_node(Node::paragraph("new"), &Path::from([1])).unwrap();
        assert_eq!(texts(&tx), vec!["T", "new", "abc", ""]);
        assert_eq!(tx.caret(), Some(Point::new([2, 0], 2)));
        assert_eq!(tx.operations().len(), 1);
    }

    #[test]
    fn test_remove_node_reanchors_caret() {
        let original = state(
            vec![Node::title("T"), Node::paragraph("abc"), Node::paragraph("")],
            Point::new([1, 0], 1),
        );
        let mut tx = Transaction::new(&original);
        tx.remove_node(&Path::from([1])).unwrap();
        assert_eq!(texts(&tx), vec!["T", ""]);
        // the following paragraph shares the removed node's slot
        assert_eq!(tx.caret(), Some(Point::new([1, 0], 0)));
    }

    #[test]
    fn test_remove_last_node_falls_back_to_previous_text() {
        let original = state(
            vec![Node::title("Title"), Node::paragraph("abc")],
            Point::new([1, 0], 1),
        );
        let mut tx = Transaction::new(&original);
        tx.remove_node(&Path::from([1])).unwrap();
        assert_eq!(tx.caret(), Some(Point::new([0, 0], 5)));
    }

    #[test]
    fn test_move_node_uses_pre_move_target() {
        let original = state(
            vec![
                Node::title("T"),
                Node::paragraph("a"),
                Node::paragraph("b"),
                Node::paragraph("c"),
                Node::paragraph(""),
            ],
            Point::new([1, 0], 1),
        );
        let mut tx = Transaction::new(&original);
        tx.move_node(&Path::from([1]), &Path::from([4])).unwrap();
        assert_eq!(texts(&tx), vec!["T", "b", "c", "a", ""]);
        assert_eq!(tx.caret(), Some(Point::new([3, 0], 1)));
        assert_eq!(
            tx.operations()[0],
            Operation::MoveNode {
                path: Path::from([1]),
                new_path: Path::from([3]),
            }
        );
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        let original = EditorState::default();
        let mut tx = Transaction::new(&original);
        let err = tx
            .move_node(&Path::from([1]), &Path::from([1, 0]))
            .unwrap_err();
        assert!(matches!(err, TransformError::MoveIntoSelf { .. }));
    }

    #[test]
    fn test_move_to_own_slot_is_noop() {
        let original = EditorState::default();
        let mut tx = Transaction::new(&original);
        tx.move_node(&Path::from([0]), &Path::from([1])).unwrap();
        assert!(!tx.is_dirty());
    }

    #[test]
    fn test_merge_node_joins_blocks_and_texts() {
        let original = state(
            vec![
                Node::title("T"),
                Node::paragraph("ab"),
                Node::paragraph("cd"),
                Node::paragraph(""),
            ],
            Point::new([2, 0], 0),
        );
        let mut tx = Transaction::new(&original);
        tx.merge_node(&Path::from([2])).unwrap();
        assert_eq!(tx.document().child_count(&Path::from([1])), 2);
        assert_eq!(tx.caret(), Some(Point::new([1, 1], 0)));

        tx.merge_node(&Path::from([1, 1])).unwrap();
        assert_eq!(texts(&tx), vec!["T", "abcd", ""]);
        assert_eq!(tx.caret(), Some(Point::new([1, 0], 2)));
    }

    #[test]
    fn test_merge_first_child_fails() {
        let original = EditorState::default();
        let mut tx = Transaction::new(&original);
        let err = tx.merge_node(&Path::from([0])).unwrap_err();
        assert!(matches!(err, TransformError::NoPreviousSibling { .. }));
    }

    #[test]
    fn test_split_nodes_up_to_list_item() {
        let original = state(
            vec![
                Node::title("T"),
                Node::bulleted_list(&["abcd"]),
                Node::paragraph(""),
            ],
            Point::new([1, 0, 0], 2),
        );
        let mut tx = Transaction::new(&original);
        let caret = tx.caret().unwrap();
        tx.split_nodes(&caret, &Path::from([1, 0]), None).unwrap();

        let list = tx.document().element(&Path::from([1])).unwrap();
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.children[0].string(), "ab");
        assert_eq!(list.children[1].string(), "cd");
        assert_eq!(list.children[1].tag(), Some(Tag::ListItem));
        assert_eq!(tx.caret(), Some(Point::new([1, 1, 0], 0)));
    }

    #[test]
    fn test_split_nodes_applies_identity_to_top_split_only() {
        let risks = crate::models::core_schema(ToolKind::Risks);
        let original = state(
            vec![
                Node::title("T"),
                Node::element(
                    risks.container_tag,
                    vec![
                        risks.new_header("Area"),
                        risks.new_item("xy", 2, crate::models::Metadata::High),
                    ],
                ),
                Node::paragraph(""),
            ],
            Point::new([1, 1, 0], 1),
        );
        let mut tx = Transaction::new(&original);
        let caret = tx.caret().unwrap();
        let fresh = NodeProperties::new(
            risks.item_tag,
            risks.item_props(2, crate::models::Metadata::None),
        );
        tx.split_nodes(&caret, &Path::from([1, 1]), Some(fresh.clone()))
            .unwrap();
        let second = tx.document().element(&Path::from([1, 2])).unwrap();
        assert_eq!(second.properties(), fresh);
        assert_eq!(second.string(), "y");
        let first = tx.document().element(&Path::from([1, 1])).unwrap();
        assert_eq!(first.props["probability"], json!("high"));
    }

    #[test]
    fn test_wrap_and_unwrap_round_trip() {
        let original = state(
            vec![Node::title("T"), Node::paragraph("a"), Node::paragraph("")],
            Point::new([1, 0], 1),
        );
        let mut tx = Transaction::new(&original);
        tx.wrap_node(&Path::from([1]), NodeProperties::tag(Tag::BulletedList))
            .unwrap();
        assert_eq!(tx.document().tag(&Path::from([1])), Some(Tag::BulletedList));
        assert_eq!(tx.document().tag(&Path::from([1, 0])), Some(Tag::Paragraph));
        assert_eq!(tx.caret(), Some(Point::new([1, 0, 0], 1)));

        tx.unwrap_node(&Path::from([1])).unwrap();
        assert_eq!(tx.document(), &original.document);
        assert_eq!(tx.caret(), Some(Point::new([1, 0], 1)));
    }

    #[test]
    fn test_unwrap_nodes_finds_closest_match() {
        let original = state(
            vec![
                Node::title("T"),
                Node::bulleted_list(&["one", "two"]),
                Node::paragraph(""),
            ],
            Point::new([1, 1, 0], 0),
        );
        let mut tx = Transaction::new(&original);
        assert!(tx.unwrap_nodes(|tag| tag.is_list()).unwrap());
        assert_eq!(texts(&tx), vec!["T", "one", "two", ""]);
        assert_eq!(tx.caret(), Some(Point::new([2, 0], 0)));
        assert!(!tx.unwrap_nodes(|tag| tag.is_container()).unwrap());
    }

    #[test]
    fn test_set_props_null_removes_key() {
        let risks = crate::models::core_schema(ToolKind::Risks);
        let original = state(
            vec![
                Node::title("T"),
                risks.new_item("x", 1, crate::models::Metadata::Low),
                Node::paragraph(""),
            ],
            Point::new([1, 0], 0),
        );
        let mut tx = Transaction::new(&original);
        let mut patch = Props::new();
        patch.insert("probability".to_string(), json!(null));
        patch.insert("indent".to_string(), json!(2));
        tx.set_props(&Path::from([1]), patch).unwrap();

        let element = tx.document().element(&Path::from([1])).unwrap();
        assert_eq!(element.props.get("indent"), Some(&json!(2)));
        assert!(element.props.get("probability").is_none());
    }

    #[test]
    fn test_set_tag_clears_props() {
        let risks = crate::models::core_schema(ToolKind::Risks);
        let original = state(
            vec![
                Node::title("T"),
                risks.new_item("x", 1, crate::models::Metadata::Low),
                Node::paragraph(""),
            ],
            Point::new([1, 0], 0),
        );
        let mut tx = Transaction::new(&original);
        tx.set_tag(&Path::from([1]), Tag::Paragraph).unwrap();
        let element = tx.document().element(&Path::from([1])).unwrap();
        assert_eq!(element.tag, Tag::Paragraph);
        assert!(element.props.is_empty());
    }

    #[test]
    fn test_select_and_deselect() {
        let original = EditorState::new(Document::default(), None);
        let mut tx = Transaction::new(&original);
        let range = Range::new(Point::new([0, 0], 0), Point::new([1, 0], 0));
        tx.select(range.clone()).unwrap();
        assert_eq!(tx.selection(), Some(&range));
        assert!(tx.caret().is_none());
        tx.deselect().unwrap();
        assert!(tx.selection().is_none());
        assert_eq!(tx.operations().len(), 2);
    }

    #[test]
    fn test_insert_text_moves_caret() {
        let original = state(
            vec![Node::title("Tile"), Node::paragraph("")],
            Point::new([0, 0], 2),
        );
        let mut tx = Transaction::new(&original);
        tx.insert_text("t").unwrap();
        assert_eq!(texts(&tx)[0], "Title");
        assert_eq!(tx.caret(), Some(Point::new([0, 0], 3)));
    }

    #[test]
    fn test_insert_text_counts_characters() {
        let original = state(
            vec![Node::title("né"), Node::paragraph("")],
            Point::new([0, 0], 2),
        );
        let mut tx = Transaction::new(&original);
        tx.insert_text("ü").unwrap();
        assert_eq!(texts(&tx)[0], "néü");
        assert_eq!(tx.caret(), Some(Point::new([0, 0], 3)));
        assert!(tx.remove_text(&Path::from([0, 0]), 1, 5).is_err());
    }

    #[test]
    fn test_delete_backward() {
        let original = state(
            vec![
                Node::title("T"),
                Node::paragraph("ab"),
                Node::paragraph("cd"),
                Node::paragraph(""),
            ],
            Point::new([2, 0], 1),
        );
        let mut tx = Transaction::new(&original);
        assert!(tx.delete_backward().unwrap());
        assert_eq!(texts(&tx), vec!["T", "ab", "d", ""]);

        // caret now at the start of its block: joins into the previous one
        assert!(tx.delete_backward().unwrap());
        assert_eq!(texts(&tx), vec!["T", "abd", ""]);
        assert_eq!(tx.caret(), Some(Point::new([1, 1], 0)));
    }
}
