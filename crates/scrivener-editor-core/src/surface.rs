//! The editable surface and the host-facing API over it.
//!
//! [`EditorHandle`] is what the surrounding UI talks to. Browser hosts
//! implement it over a `contenteditable` element; [`HeadlessSurface`]
//! implements it over an in-memory [`ContentTree`] and backs the tests and
//! non-browser hosts.
//!
//! Surfaces queue a change notification for every content mutation, tagged
//! with where it came from. The undoable editor drains that queue.

use crate::edit;
use crate::error::EditorError;
use crate::markup;
use crate::platform::PlatformError;
use crate::position::{TreePosition, position_of, selection_from_positions};
use crate::tree::ContentTree;
use crate::types::{Selection, SnapshotSource};

/// Host-facing editor operations.
pub trait EditorHandle {
    /// Opaque platform handle for the editable element.
    type Element;

    fn focus(&mut self) -> Result<(), PlatformError>;

    fn blur(&mut self) -> Result<(), PlatformError>;

    fn is_focused(&self) -> bool;

    /// Current selection in linear offsets, or `None` when the surface has
    /// no live selection.
    fn selection(&self) -> Option<Selection>;

    /// Select `start..end`. Offsets past the end are clamped.
    fn set_selection(&mut self, start: usize, end: usize) -> Result<(), EditorError>;

    /// Replace the current selection with `text` and leave the caret after it.
    fn insert_text(&mut self, text: &str) -> Result<(), EditorError>;

    /// Replace `start..end` with `text` and leave the caret after it.
    fn replace_text(&mut self, start: usize, end: usize, text: &str) -> Result<(), EditorError>;

    fn element(&self) -> Option<&Self::Element>;

    /// Serialized markup of the surface content.
    fn content_markup(&self) -> String;

    /// Plain-text projection of the surface content.
    fn plain_text(&self) -> String;

    /// Swap in new content wholesale. The resulting change is reported with
    /// `source`.
    fn set_content(&mut self, markup: &str, source: SnapshotSource);

    /// Drain queued change notifications, oldest first.
    fn take_changes(&mut self) -> Vec<SnapshotSource>;
}

/// In-memory editable surface.
///
/// The selection is stored as tree positions, the way a DOM selection holds
/// node references, so replacing the content leaves it pointing at nodes
/// that no longer exist.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    tree: ContentTree,
    selection: Option<(TreePosition, TreePosition)>,
    focused: bool,
    changes: Vec<SnapshotSource>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_markup(markup: &str) -> Self {
        Self {
            tree: markup::parse(markup),
            ..Default::default()
        }
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    /// Caret offset used when there is no live selection.
    fn default_caret(&self) -> Selection {
        Selection::collapsed(self.tree.len())
    }

    fn place(&mut self, sel: Selection) {
        let sel = sel.clamp(self.tree.len());
        self.selection = Some((
            position_of(&self.tree, sel.start),
            position_of(&self.tree, sel.end),
        ));
    }

    /// Delete the selection, or the char before the caret.
    pub fn delete_backward(&mut self) -> Result<bool, EditorError> {
        let sel = self.selection().unwrap_or_else(|| self.default_caret());
        let range = if sel.is_collapsed() {
            sel.start.saturating_sub(1)..sel.start
        } else {
            sel.to_range()
        };
        self.delete(range)
    }

    /// Delete the selection, or the char after the caret.
    pub fn delete_forward(&mut self) -> Result<bool, EditorError> {
        let sel = self.selection().unwrap_or_else(|| self.default_caret());
        let range = if sel.is_collapsed() {
            sel.start..(sel.start + 1).min(self.tree.len())
        } else {
            sel.to_range()
        };
        self.delete(range)
    }

    fn delete(&mut self, range: std::ops::Range<usize>) -> Result<bool, EditorError> {
        if range.is_empty() {
            return Ok(false);
        }
        let caret = range.start;
        edit::delete_range(&mut self.tree, range)?;
        self.place(Selection::collapsed(caret));
        self.changes.push(SnapshotSource::User);
        Ok(true)
    }
}

impl EditorHandle for HeadlessSurface {
    type Element = ContentTree;

    fn focus(&mut self) -> Result<(), PlatformError> {
        self.focused = true;
        Ok(())
    }

    fn blur(&mut self) -> Result<(), PlatformError> {
        self.focused = false;
        Ok(())
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn selection(&self) -> Option<Selection> {
        let (anchor, focus) = self.selection?;
        match selection_from_positions(&self.tree, anchor, focus) {
            Ok(sel) => Some(sel),
            Err(err) => {
                tracing::debug!(target: "scrivener::surface", %err, "selection no longer in content");
                None
            }
        }
    }

    fn set_selection(&mut self, start: usize, end: usize) -> Result<(), EditorError> {
        self.place(Selection::new(start, end));
        Ok(())
    }

    fn insert_text(&mut self, text: &str) -> Result<(), EditorError> {
        let sel = self.selection().unwrap_or_else(|| self.default_caret());
        self.replace_text(sel.start, sel.end, text)
    }

    fn replace_text(&mut self, start: usize, end: usize, text: &str) -> Result<(), EditorError> {
        let range = Selection::new(start, end).to_range();
        edit::delete_range(&mut self.tree, range.clone())?;
        let caret = edit::insert_text(&mut self.tree, range.start, text)?;
        self.place(Selection::collapsed(caret));
        self.changes.push(SnapshotSource::User);
        Ok(())
    }

    fn element(&self) -> Option<&ContentTree> {
        Some(&self.tree)
    }

    fn content_markup(&self) -> String {
        markup::serialize(&self.tree)
    }

    fn plain_text(&self) -> String {
        self.tree.plain_text()
    }

    fn set_content(&mut self, markup: &str, source: SnapshotSource) {
        markup::parse_into(&mut self.tree, markup);
        self.changes.push(source);
    }

    fn take_changes(&mut self) -> Vec<SnapshotSource> {
        std::mem::take(&mut self.changes)
    }
}
