use crate::models::{byte_index, Document, EditorState, Element, Node, Path, Point, Range};
use crate::operations::{Operation, TransformError};

/// Apply `op` to `state`, rewriting the selection so it stays valid
///
/// A failed operation leaves the document unchanged.
pub fn apply_operation(state: &mut EditorState, op: &Operation) -> Result<(), TransformError> {
    apply_to_document(&mut state.document, op)?;
    transform_selection(state, op);
    tracing::trace!(op = op.kind(), "applied operation");
    Ok(())
}

fn split_last(path: &Path) -> Result<(Path, usize), TransformError> {
    let index = path.last().ok_or(TransformError::RootOperation)?;
    Ok((path.parent(), index))
}

fn siblings_mut<'a>(
    document: &'a mut Document,
    path: &Path,
) -> Result<(&'a mut Vec<Node>, usize), TransformError> {
    let (parent, index) = split_last(path)?;
    let children = document
        .children_mut(&parent)
        .ok_or_else(|| TransformError::invalid_path(path.clone()))?;
    Ok((children, index))
}

fn text_mut<'a>(document: &'a mut Document, path: &Path) -> Result<&'a mut String, TransformError> {
    document
        .get_mut(path)
        .and_then(Node::as_text_mut)
        .map(|text| &mut text.text)
        .ok_or_else(|| TransformError::not_a_text(path.clone()))
}

fn char_range(
    text: &str,
    path: &Path,
    offset: usize,
    len: usize,
) -> Result<std::ops::Range<usize>, TransformError> {
    let out_of_range =
        || TransformError::offset_out_of_range(path.clone(), offset + len, crate::models::char_len(text));
    let start = byte_index(text, offset).ok_or_else(out_of_range)?;
    let end = byte_index(text, offset + len).ok_or_else(out_of_range)?;
    Ok(start..end)
}

fn apply_to_document(document: &mut Document, op: &Operation) -> Result<(), TransformError> {
    match op {
        Operation::InsertNode { path, node } => {
            let (children, index) = siblings_mut(document, path)?;
            if index > children.len() {
                return Err(TransformError::invalid_path(path.clone()));
            }
            children.insert(index, node.clone());
        }

        Operation::RemoveNode { path, .. } => {
            let (children, index) = siblings_mut(document, path)?;
            if index >= children.len() {
                return Err(TransformError::invalid_path(path.clone()));
            }
            children.remove(index);
        }

        Operation::InsertText { path, offset, text } => {
            let content = text_mut(document, path)?;
            let range = char_range(content, path, *offset, 0)?;
            content.insert_str(range.start, text);
        }

        Operation::RemoveText { path, offset, text } => {
            let content = text_mut(document, path)?;
            let range = char_range(content, path, *offset, crate::models::char_len(text))?;
            content.replace_range(range, "");
        }

        Operation::MergeNode { path, .. } => {
            let (children, index) = siblings_mut(document, path)?;
            if index == 0 {
                return Err(TransformError::NoPreviousSibling { path: path.clone() });
            }
            if index >= children.len() {
                return Err(TransformError::invalid_path(path.clone()));
            }
            let compatible = matches!(
                (&children[index - 1], &children[index]),
                (Node::Text(_), Node::Text(_)) | (Node::Element(_), Node::Element(_))
            );
            if !compatible {
                return Err(TransformError::IncompatibleMerge { path: path.clone() });
            }
            let node = children.remove(index);
            match (&mut children[index - 1], node) {
                (Node::Text(previous), Node::Text(text)) => previous.text.push_str(&text.text),
                (Node::Element(previous), Node::Element(element)) => {
                    previous.children.extend(element.children)
                }
                _ => unreachable!("merge compatibility checked above"),
            }
        }

        Operation::SplitNode {
            path,
            position,
            properties,
        } => {
            let (children, index) = siblings_mut(document, path)?;
            let node = children
                .get_mut(index)
                .ok_or_else(|| TransformError::invalid_path(path.clone()))?;
            let right = match node {
                Node::Text(text) => {
                    let range = char_range(&text.text, path, *position, 0)?;
                    Node::text(text.text.split_off(range.start))
                }
                Node::Element(element) => {
                    if *position > element.children.len() {
                        return Err(TransformError::invalid_path(path.child(*position)));
                    }
                    let identity = properties.clone().unwrap_or_else(|| element.properties());
                    Node::Element(Element {
                        tag: identity.tag,
                        props: identity.props,
                        children: element.children.split_off(*position),
                    })
                }
            };
            children.insert(index + 1, right);
        }

        Operation::MoveNode { path, new_path } => {
            let (children, index) = siblings_mut(document, path)?;
            if index >= children.len() {
                return Err(TransformError::invalid_path(path.clone()));
            }
            let node = children.remove(index);
            let parent = new_path.parent();
            let target_index = new_path.last().unwrap_or_default();
            let fits = !new_path.is_root()
                && document
                    .children(&parent)
                    .is_some_and(|target| target_index <= target.len());
            match document.children_mut(&parent) {
                Some(target) if fits => target.insert(target_index, node),
                _ => {
                    // a failed move leaves the tree untouched
                    restore(document, path, node);
                    return Err(TransformError::invalid_path(new_path.clone()));
                }
            }
        }

        Operation::SetNode {
            path,
            new_properties,
            ..
        } => {
            let element = document
                .get_mut(path)
                .and_then(Node::as_element_mut)
                .ok_or_else(|| TransformError::not_an_element(path.clone()))?;
            element.tag = new_properties.tag;
            element.props = new_properties.props.clone();
        }

        Operation::SetSelection { .. } => {}
    }
    Ok(())
}

fn restore(document: &mut Document, path: &Path, node: Node) {
    if let Ok((children, index)) = siblings_mut(document, path) {
        children.insert(index.min(children.len()), node);
    }
}

fn transform_selection(state: &mut EditorState, op: &Operation) {
    if let Operation::SetSelection { new_selection, .. } = op {
        state.selection = new_selection.clone();
        return;
    }
    let Some(range) = state.selection.take() else {
        return;
    };
    let (anchor, focus) = range.transform(op);
    let anchor = anchor.or_else(|| relocate(&state.document, op));
    let focus = focus.or_else(|| relocate(&state.document, op));
    state.selection = match (anchor, focus) {
        (Some(anchor), Some(focus)) => Some(Range::new(anchor, focus)),
        _ => None,
    };
}

/// New home for a point whose text was removed: the end of the previous text
/// or the start of the next one, whichever shares the deeper ancestor with the
/// removed node.
fn relocate(document: &Document, op: &Operation) -> Option<Point> {
    let Operation::RemoveNode { path: removed, .. } = op else {
        return None;
    };

    let mut previous: Option<(Path, usize)> = None;
    let mut next: Option<Path> = None;
    for (path, text) in document.texts() {
        if path < *removed {
            previous = Some((path, text.len()));
        } else {
            next = Some(path);
            break;
        }
    }

    let prefer_next = match (&previous, &next) {
        (Some((previous, _)), Some(next)) => {
            if next == removed {
                next.previous().is_none()
            } else {
                previous.common_ancestor(removed).len() < next.common_ancestor(removed).len()
            }
        }
        _ => false,
    };

    match (previous, next) {
        (Some((path, len)), _) if !prefer_next => Some(Point::new(path, len)),
        (_, Some(path)) => Some(Point::new(path, 0)),
        (Some((path, len)), None) => Some(Point::new(path, len)),
        (None, None) => None,
    }
}
