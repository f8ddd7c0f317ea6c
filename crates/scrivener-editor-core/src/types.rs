//! Core editor types: selection, history snapshots and visual spans.
//!
//! These types are framework-agnostic and shared by the history store, the
//! editable surface and the spell-check span conversion.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Text selection in linear character offsets.
///
/// `start` is where the selection was anchored, `end` is where the caret is.
/// They may be in any order; use `min()`/`max()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a collapsed selection (caret position).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Lower bound of the selection.
    pub fn min(&self) -> usize {
        self.start.min(self.end)
    }

    /// Upper bound of the selection.
    pub fn max(&self) -> usize {
        self.start.max(self.end)
    }

    /// Check if the selection is collapsed (caret only).
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Selection length in chars.
    pub fn len(&self) -> usize {
        self.max() - self.min()
    }

    /// Same as `is_collapsed`.
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Check if the selection is backwards (caret before anchor).
    pub fn is_backwards(&self) -> bool {
        self.end < self.start
    }

    /// Convert to an ordered `Range<usize>`.
    pub fn to_range(&self) -> Range<usize> {
        self.min()..self.max()
    }

    /// Clamp both ends to `[0, max_offset]`, preserving direction.
    pub fn clamp(self, max_offset: usize) -> Self {
        Self {
            start: self.start.min(max_offset),
            end: self.end.min(max_offset),
        }
    }
}

/// An immutable point in edit history.
///
/// `content` is serialized markup; `selection` offsets index into the
/// plain-text projection of that markup, not into the markup string.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub content: String,
    pub selection: Selection,
}

impl EditorSnapshot {
    pub fn new(content: impl Into<String>, selection: Selection) -> Self {
        Self {
            content: content.into(),
            selection,
        }
    }
}

/// Where a change notification originated.
///
/// Only `User` changes are eligible for a new history entry. Content swaps
/// performed by undo/redo are tagged so they never re-record themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    #[default]
    User,
    Undo,
    Redo,
}

impl SnapshotSource {
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User)
    }
}

/// Screen rectangle covering part of a text range, relative to the editor.
///
/// A range that wraps across lines produces one rect per line.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// One flagged word occurrence, positioned for an underline renderer.
///
/// Carries the linear text offsets of the occurrence plus the horizontal
/// extent and bottom edge of the line rectangle it occupies. A word that
/// wraps across lines yields one `TextPosition` per line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPosition {
    pub word: SmolStr,
    /// Char offset where the word starts.
    pub start_offset: usize,
    /// Char offset just past the word.
    pub end_offset: usize,
    /// Left edge of the rect.
    pub left: f64,
    /// Right edge of the rect.
    pub right: f64,
    /// Bottom edge of the rect.
    pub height: f64,
    pub is_valid: bool,
}
