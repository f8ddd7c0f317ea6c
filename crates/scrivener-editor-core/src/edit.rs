//! Linear-offset edits applied to the content tree.
//!
//! These back the host-facing `insert_text` / `replace_text` operations.
//! Offsets are resolved through the position mapper, so the same plain-text
//! coordinates are used for editing, selection and spell-check spans.

use std::ops::Range;

use crate::error::EditorError;
use crate::position::position_of;
use crate::tree::{ContentTree, NodeId, NodeKind};

/// Byte index of the `char_idx`-th char of `s` (or `s.len()` past the end).
fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Delete the chars in `range` from the plain-text projection.
///
/// Text leaves are trimmed (and removed when emptied); line-break markers
/// inside the range are removed. Hidden subtrees are untouched.
pub fn delete_range(tree: &mut ContentTree, range: Range<usize>) -> Result<(), EditorError> {
    let len = tree.len();
    if range.end > len {
        return Err(EditorError::OffsetOutOfRange {
            offset: range.end,
            len,
        });
    }
    if range.start >= range.end {
        return Ok(());
    }

    let mut text_cuts: Vec<(NodeId, Range<usize>)> = Vec::new();
    let mut removals: Vec<NodeId> = Vec::new();
    let mut acc = 0;
    for id in tree.walk_visible(tree.root()) {
        if acc >= range.end {
            break;
        }
        let Some(node) = tree.get(id) else {
            continue;
        };
        let node_len = node.own_len();
        let (node_start, node_end) = (acc, acc + node_len);
        acc = node_end;
        if node_len == 0 || node_end <= range.start {
            continue;
        }
        let cut_start = range.start.max(node_start) - node_start;
        let cut_end = range.end.min(node_end) - node_start;
        match &node.kind {
            NodeKind::Text(_) if cut_start == 0 && cut_end == node_len => removals.push(id),
            NodeKind::Text(_) => text_cuts.push((id, cut_start..cut_end)),
            NodeKind::LineBreak => removals.push(id),
            NodeKind::Element { .. } => {}
        }
    }

    for (id, cut) in text_cuts {
        let text = tree.text_mut(id)?;
        let byte_start = char_to_byte(text, cut.start);
        let byte_end = char_to_byte(text, cut.end);
        text.replace_range(byte_start..byte_end, "");
    }
    for id in removals {
        tree.remove(id)?;
    }
    Ok(())
}

/// Insert `text` at linear `offset`. Each `\n` becomes a line-break marker.
///
/// Returns the offset just past the inserted text.
pub fn insert_text(tree: &mut ContentTree, offset: usize, text: &str) -> Result<usize, EditorError> {
    let len = tree.len();
    if offset > len {
        return Err(EditorError::OffsetOutOfRange { offset, len });
    }
    if text.is_empty() {
        return Ok(offset);
    }

    let inserted_len = text.chars().count();
    let segments: Vec<&str> = text.split('\n').collect();
    let pos = position_of(tree, offset);

    let (parent, mut index, tail) = if tree.node(pos.node)?.is_text() {
        let leaf = tree.text_mut(pos.node)?;
        let split_at = char_to_byte(leaf, pos.offset);
        let tail = leaf.split_off(split_at);
        leaf.push_str(segments[0]);
        if segments.len() == 1 {
            leaf.push_str(&tail);
            return Ok(offset + inserted_len);
        }
        let parent = tree
            .parent(pos.node)?
            .ok_or(EditorError::InvalidTarget("text leaf without parent"))?;
        let index = tree
            .index_in_parent(pos.node)?
            .ok_or(EditorError::InvalidTarget("text leaf without parent"))?;
        (parent, index + 1, tail)
    } else {
        let mut index = pos.offset;
        if !segments[0].is_empty() {
            tree.insert_child(pos.node, index, NodeKind::text(segments[0]))?;
            index += 1;
        }
        (pos.node, index, String::new())
    };

    let last = segments.len() - 1;
    for (i, segment) in segments.iter().enumerate().skip(1) {
        tree.insert_child(parent, index, NodeKind::LineBreak)?;
        index += 1;
        let content = if i == last {
            format!("{segment}{tail}")
        } else {
            segment.to_string()
        };
        if !content.is_empty() {
            tree.insert_child(parent, index, NodeKind::Text(content))?;
            index += 1;
        }
    }

    Ok(offset + inserted_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;

    #[test]
    fn test_insert_into_leaf() {
        let mut tree = markup::parse("helo");
        assert_eq!(insert_text(&mut tree, 3, "l").unwrap(), 4);
        assert_eq!(tree.plain_text(), "hello");
        assert_eq!(markup::serialize(&tree), "hello");
    }

    #[test]
    fn test_insert_newline_splits_leaf() {
        let mut tree = markup::parse("<b>abcd</b>");
        assert_eq!(insert_text(&mut tree, 2, "X\nY").unwrap(), 5);
        assert_eq!(tree.plain_text(), "abX\nYcd");
        assert_eq!(markup::serialize(&tree), "<b>abX<br>Ycd</b>");
    }

    #[test]
    fn test_insert_into_empty_tree() {
        let mut tree = markup::parse("");
        assert_eq!(insert_text(&mut tree, 0, "one\n\ntwo").unwrap(), 8);
        assert_eq!(markup::serialize(&tree), "one<br><br>two");
    }

    #[test]
    fn test_insert_before_line_break() {
        let mut tree = markup::parse("<br>");
        insert_text(&mut tree, 0, "x").unwrap();
        assert_eq!(tree.plain_text(), "x\n");
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut tree = markup::parse("ab");
        assert_eq!(
            insert_text(&mut tree, 3, "x"),
            Err(EditorError::OffsetOutOfRange { offset: 3, len: 2 })
        );
    }

    #[test]
    fn test_delete_across_leaves_and_breaks() {
        let mut tree = markup::parse("ab<b>cd</b><br>ef");
        delete_range(&mut tree, 1..5).unwrap();
        assert_eq!(tree.plain_text(), "aef");
        assert_eq!(markup::serialize(&tree), "a<b></b>ef");
    }

    #[test]
    fn test_delete_multibyte() {
        let mut tree = markup::parse("héllo wörld");
        delete_range(&mut tree, 1..8).unwrap();
        assert_eq!(tree.plain_text(), "hrld");
    }

    #[test]
    fn test_delete_leaves_hidden_content() {
        let mut tree = markup::parse(r#"ab<span hidden>zz</span>cd"#);
        delete_range(&mut tree, 1..3).unwrap();
        assert_eq!(tree.plain_text(), "ad");
        assert_eq!(markup::serialize(&tree), r#"a<span hidden="">zz</span>d"#);
    }
}
