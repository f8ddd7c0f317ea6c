//! Linear offset ↔ tree position mapping.
//!
//! A linear offset is a char index into the plain-text projection of the
//! tree: text leaves contribute their length, line-break markers contribute
//! one synthetic char, hidden subtrees contribute nothing.
//!
//! Offsets count Unicode scalar values. A grapheme built from several scalars
//! that straddles an inline boundary maps approximately: each scalar is still
//! addressable, but a caret can land between them.

use crate::error::EditorError;
use crate::tree::{ContentTree, NodeId, NodeKind};
use crate::types::Selection;

/// A position inside the tree, with DOM semantics.
///
/// For a text leaf, `offset` is a char offset into its text. For an element,
/// `offset` is a child index (`children.len()` means "after the last child").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreePosition {
    pub node: NodeId,
    pub offset: usize,
}

impl TreePosition {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Linear offset of the start of `target`: the visible length of everything
/// preceding it in document order. The flag is set when `target` or one of
/// its ancestors is hidden.
fn start_offset(tree: &ContentTree, target: NodeId) -> Result<(usize, bool), EditorError> {
    tree.node(target)?;

    let mut acc = 0;
    let mut stack = vec![(tree.root(), false)];
    while let Some((id, hidden_above)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let hidden = hidden_above || node.is_hidden();
        if id == target {
            return Ok((acc, hidden));
        }
        if !hidden {
            acc += node.own_len();
        }
        stack.extend(node.children().iter().rev().map(|child| (*child, hidden)));
    }

    // Live but detached from the root.
    Err(EditorError::StaleNode(target))
}

/// Convert a tree position into a linear offset.
///
/// Intra-node offsets past the end of a leaf are clamped to its length;
/// child indices past the end of an element are clamped to its child count.
/// Any position inside a hidden subtree maps to the subtree's start.
pub fn offset_of(tree: &ContentTree, pos: TreePosition) -> Result<usize, EditorError> {
    let (start, hidden) = start_offset(tree, pos.node)?;
    if hidden {
        return Ok(start);
    }
    let node = tree.node(pos.node)?;

    let within = match &node.kind {
        NodeKind::Text(s) => pos.offset.min(s.chars().count()),
        NodeKind::LineBreak => pos.offset.min(1),
        NodeKind::Element { .. } => {
            let children = node.children();
            let upto = pos.offset.min(children.len());
            let mut sum = 0;
            for child in &children[..upto] {
                sum += tree.visible_len(*child)?;
            }
            sum
        }
    };
    Ok(start + within)
}

/// Convert a linear offset into a tree position.
///
/// Returns the first text leaf whose range contains `target` (a boundary
/// between two leaves resolves to the end of the earlier one). A boundary
/// sitting directly before a line-break marker with no text leaf ending there
/// resolves to the marker's index in its parent. Offsets at or past the end
/// with no leaf to hold them resolve to the root with `offset` equal to its
/// child count.
pub fn position_of(tree: &ContentTree, target: usize) -> TreePosition {
    let mut acc = 0;
    for id in tree.walk_visible(tree.root()) {
        let Some(node) = tree.get(id) else {
            continue;
        };
        match &node.kind {
            NodeKind::Text(s) => {
                let len = s.chars().count();
                if acc + len >= target {
                    return TreePosition::new(id, target - acc);
                }
                acc += len;
            }
            NodeKind::LineBreak => {
                if acc >= target {
                    if let (Ok(Some(parent)), Ok(Some(index))) =
                        (tree.parent(id), tree.index_in_parent(id))
                    {
                        return TreePosition::new(parent, index);
                    }
                }
                acc += 1;
            }
            NodeKind::Element { .. } => {}
        }
    }

    let root = tree.root();
    let child_count = tree.children(root).map(|c| c.len()).unwrap_or(0);
    TreePosition::new(root, child_count)
}

/// Map a linear selection onto tree positions (anchor, focus).
pub fn selection_to_positions(tree: &ContentTree, sel: Selection) -> (TreePosition, TreePosition) {
    (position_of(tree, sel.start), position_of(tree, sel.end))
}

/// Map tree positions back onto a linear selection.
///
/// Fails if either position references a node that is no longer in the tree,
/// e.g. after the content was replaced wholesale.
pub fn selection_from_positions(
    tree: &ContentTree,
    anchor: TreePosition,
    focus: TreePosition,
) -> Result<Selection, EditorError> {
    Ok(Selection::new(
        offset_of(tree, anchor)?,
        offset_of(tree, focus)?,
    ))
}
