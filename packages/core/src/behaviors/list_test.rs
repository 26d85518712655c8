//! Tests for the generic bulleted list handler

#[cfg(test)]
mod tests {
    use crate::behaviors::{KeyEvent, KeyHandler, KeyResponse, ListHandler};
    use crate::models::{
        core_schema, Document, EditorState, Node, Point, Range, SchemaRegistry, Tag, ToolKind,
    };
    use crate::normalization::normalize;
    use crate::operations::Transaction;

    fn li(text: &str, nested: Vec<Node>) -> Node {
        let mut children = vec![Node::text(text)];
        if !nested.is_empty() {
            children.push(Node::element(Tag::BulletedList, nested));
        }
        Node::element(Tag::ListItem, children)
    }

    fn list(items: Vec<Node>) -> Node {
        Node::element(Tag::BulletedList, items)
    }

    fn doc(blocks: Vec<Node>) -> Document {
        let mut children = vec![Node::title("T")];
        children.extend(blocks);
        children.push(Node::paragraph(""));
        Document::new(children)
    }

    /// Run the handler on a draft and normalize when it claims the key
    fn press(state: &EditorState, event: KeyEvent) -> (KeyResponse, EditorState) {
        let mut tx = Transaction::new(state);
        let response = ListHandler.handle(&mut tx, &event).unwrap();
        if response == KeyResponse::Handled {
            normalize(&mut tx, &SchemaRegistry::core(), 100).unwrap();
        }
        (response, tx.into_parts().0)
    }

    #[test]
    fn test_enter_splits_line() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("hello", vec![])])]),
            Point::new([1, 0, 0], 2),
        );
        let (response, next) = press(&state, KeyEvent::enter());

        assert_eq!(response, KeyResponse::Handled);
        assert_eq!(
            next.document,
            doc(vec![list(vec![li("he", vec![]), li("llo", vec![])])])
        );
        assert_eq!(next.caret(), Some(&Point::new([1, 1, 0], 0)));
    }

    #[test]
    fn test_enter_at_end_keeps_nested_list_with_new_line() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("a", vec![li("a1", vec![])])])]),
            Point::new([1, 0, 0], 1),
        );
        let (_, next) = press(&state, KeyEvent::enter());
        assert_eq!(
            next.document,
            doc(vec![list(vec![li("a", vec![]), li("", vec![li("a1", vec![])])])])
        );
    }

    #[test]
    fn test_enter_on_empty_nested_line_outdents() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("p", vec![li("a", vec![]), li("", vec![])])])]),
            Point::new([1, 0, 1, 1, 0], 0),
        );
        let (response, next) = press(&state, KeyEvent::enter());

        assert_eq!(response, KeyResponse::Handled);
        assert_eq!(
            next.document,
            doc(vec![list(vec![li("p", vec![li("a", vec![])]), li("", vec![])])])
        );
        assert_eq!(next.caret(), Some(&Point::new([1, 1, 0], 0)));
    }

    #[test]
    fn test_enter_on_empty_top_level_line_lifts_paragraph() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![
                li("a", vec![]),
                li("", vec![]),
                li("b", vec![]),
            ])]),
            Point::new([1, 1, 0], 0),
        );
        let (response, next) = press(&state, KeyEvent::enter());

        assert_eq!(response, KeyResponse::Handled);
        assert_eq!(
            next.document,
            doc(vec![
                list(vec![li("a", vec![])]),
                Node::paragraph(""),
                list(vec![li("b", vec![])]),
            ])
        );
        assert_eq!(next.caret(), Some(&Point::new([2, 0], 0)));
    }

    #[test]
    fn test_backspace_at_start_of_top_level_list_lifts_first_line() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("a", vec![]), li("b", vec![])])]),
            Point::new([1, 0, 0], 0),
        );
        let (response, next) = press(&state, KeyEvent::backspace());

        assert_eq!(response, KeyResponse::Handled);
        assert_eq!(
            next.document,
            doc(vec![Node::paragraph("a"), list(vec![li("b", vec![])])])
        );
    }

    #[test]
    fn test_lifted_line_keeps_its_nested_list() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("a", vec![li("a1", vec![])])])]),
            Point::new([1, 0, 0], 0),
        );
        let (_, next) = press(&state, KeyEvent::backspace());
        assert_eq!(
            next.document,
            doc(vec![Node::paragraph("a"), list(vec![li("a1", vec![])])])
        );
    }

    #[test]
    fn test_backspace_inside_line_is_ignored() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("a", vec![]), li("b", vec![])])]),
            Point::new([1, 1, 0], 0),
        );
        let (response, next) = press(&state, KeyEvent::backspace());
        assert_eq!(response, KeyResponse::Ignored);
        assert_eq!(next, state);
    }

    #[test]
    fn test_tab_nests_under_previous_line() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("a", vec![]), li("b", vec![])])]),
            Point::new([1, 1, 0], 1),
        );
        let (response, next) = press(&state, KeyEvent::tab());

        assert_eq!(response, KeyResponse::Handled);
        assert_eq!(
            next.document,
            doc(vec![list(vec![li("a", vec![li("b", vec![])])])])
        );
        assert_eq!(next.caret(), Some(&Point::new([1, 0, 1, 0, 0], 1)));
    }

    #[test]
    fn test_tab_on_first_line_is_handled_noop() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("a", vec![])])]),
            Point::new([1, 0, 0], 0),
        );
        let (response, next) = press(&state, KeyEvent::tab());
        assert_eq!(response, KeyResponse::Handled);
        assert_eq!(next, state);
    }

    #[test]
    fn test_shift_tab_on_top_level_is_handled_noop() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("a", vec![]), li("b", vec![])])]),
            Point::new([1, 1, 0], 0),
        );
        let (response, next) = press(&state, KeyEvent::shift_tab());
        assert_eq!(response, KeyResponse::Handled);
        assert_eq!(next, state);
    }

    #[test]
    fn test_shift_tab_on_nested_line_outdents() {
        let state = EditorState::with_caret(
            doc(vec![list(vec![li("a", vec![li("b", vec![])])])]),
            Point::new([1, 0, 1, 0, 0], 0),
        );
        let (_, next) = press(&state, KeyEvent::shift_tab());
        assert_eq!(
            next.document,
            doc(vec![list(vec![li("a", vec![]), li("b", vec![])])])
        );
    }

    #[test]
    fn test_tool_sub_list_left_to_tool_handler() {
        let agenda = core_schema(ToolKind::Agenda);
        let container = Node::element(
            agenda.container_tag,
            vec![agenda.new_outline_item("Topic", &[""])],
        );
        let state = EditorState::with_caret(doc(vec![container]), Point::new([1, 0, 1, 0, 0], 0));

        for event in [KeyEvent::shift_tab(), KeyEvent::backspace(), KeyEvent::enter()] {
            let (response, _) = press(&state, event);
            assert_eq!(response, KeyResponse::Ignored, "{event}");
        }
    }

    #[test]
    fn test_expanded_selection_is_ignored() {
        let mut state = EditorState::new(
            doc(vec![list(vec![li("abc", vec![])])]),
            None,
        );
        state.selection = Some(Range::new(
            Point::new([1, 0, 0], 0),
            Point::new([1, 0, 0], 2),
        ));
        let (response, _) = press(&state, KeyEvent::enter());
        assert_eq!(response, KeyResponse::Ignored);
    }
}
