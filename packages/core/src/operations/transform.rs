//! Path and point rewriting
//!
//! Every operation shifts the addresses of other nodes. These functions
//! compute where a path or point ends up after an operation so selections
//! (and handler-held paths) keep pointing at the same content.

use crate::models::{char_len, Affinity, Path, Point};
use crate::operations::Operation;

pub(crate) fn transform_path(path: &Path, op: &Operation) -> Option<Path> {
    transform_path_with(path, op, Affinity::Forward)
}

fn shift(path: &mut Path, depth: usize, up: bool) {
    if let Some(slot) = path.indices_mut().get_mut(depth) {
        if up {
            *slot += 1;
        } else {
            *slot = slot.saturating_sub(1);
        }
    }
}

/// Path transform for the insertion of a node at `at`
fn after_insert(mut p: Path, at: &Path) -> Path {
    if *at == p || at.ends_before(&p) || at.is_ancestor_of(&p) {
        shift(&mut p, at.len() - 1, true);
    }
    p
}

/// Path transform for the removal of the node at `at`
pub(crate) fn after_remove(mut p: Path, at: &Path) -> Option<Path> {
    if *at == p || at.is_ancestor_of(&p) {
        return None;
    }
    if at.ends_before(&p) {
        shift(&mut p, at.len() - 1, false);
    }
    Some(p)
}

pub(crate) fn transform_path_with(path: &Path, op: &Operation, affinity: Affinity) -> Option<Path> {
    let mut p = path.clone();
    match op {
        Operation::InsertNode { path: at, .. } => {
            if at.is_root() {
                return Some(p);
            }
            p = after_insert(p, at);
        }
        Operation::RemoveNode { path: at, .. } => {
            if at.is_root() {
                return Some(p);
            }
            return after_remove(p, at);
        }
        Operation::MergeNode {
            path: at, position, ..
        } => {
            if at.is_root() {
                return Some(p);
            }
            let depth = at.len() - 1;
            if *at == p || at.ends_before(&p) {
                shift(&mut p, depth, false);
            } else if at.is_ancestor_of(&p) {
                shift(&mut p, depth, false);
                p.indices_mut()[at.len()] += position;
            }
        }
        Operation::SplitNode {
            path: at, position, ..
        } => {
            if at.is_root() {
                return Some(p);
            }
            let depth = at.len() - 1;
            if *at == p {
                if affinity == Affinity::Forward {
                    shift(&mut p, depth, true);
                }
            } else if at.ends_before(&p) {
                shift(&mut p, depth, true);
            } else if at.is_ancestor_of(&p) && p.indices()[at.len()] >= *position {
                shift(&mut p, depth, true);
                p.indices_mut()[at.len()] -= position;
            }
        }
        Operation::MoveNode { path: from, new_path } => {
            if from.is_root() || new_path.is_root() {
                return Some(p);
            }
            if *from == p || from.is_ancestor_of(&p) {
                let mut moved = new_path.clone();
                moved
                    .indices_mut()
                    .extend_from_slice(&p.indices()[from.len()..]);
                return Some(moved);
            }
            // `new_path` is expressed in the tree after the removal
            let removed = after_remove(p, from)?;
            p = after_insert(removed, new_path);
        }
        Operation::InsertText { .. }
        | Operation::RemoveText { .. }
        | Operation::SetNode { .. }
        | Operation::SetSelection { .. } => {}
    }
    Some(p)
}

pub(crate) fn transform_point(point: &Point, op: &Operation, affinity: Affinity) -> Option<Point> {
    let mut point = point.clone();
    match op {
        Operation::InsertText { path, offset, text } => {
            if *path == point.path
                && (*offset < point.offset
                    || (*offset == point.offset && affinity == Affinity::Forward))
            {
                point.offset += char_len(text);
            }
        }
        Operation::RemoveText { path, offset, text } => {
            if *path == point.path && *offset <= point.offset {
                point.offset -= (point.offset - offset).min(char_len(text));
            }
        }
        Operation::MergeNode { path, position, .. } => {
            if *path == point.path {
                point.offset += position;
            }
            point.path = transform_path_with(&point.path, op, affinity)?;
        }
        Operation::SplitNode { path, position, .. } => {
            if *path == point.path {
                if *position < point.offset
                    || (*position == point.offset && affinity == Affinity::Forward)
                {
                    point.offset -= position;
                    point.path = point.path.next();
                }
            } else {
                point.path = transform_path_with(&point.path, op, affinity)?;
            }
        }
        _ => {
            point.path = transform_path_with(&point.path, op, affinity)?;
        }
    }
    Some(point)
}
