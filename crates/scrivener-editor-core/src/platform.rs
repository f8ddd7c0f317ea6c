//! Platform abstraction traits for layout queries.
//!
//! Spell-check spans need screen geometry for a range of text. Browser hosts
//! answer from `Range.getClientRects()`; the [`MonospaceLayout`] here answers
//! from a fixed character grid and is what headless hosts and tests use.

use std::ops::Range;

use crate::position::{TreePosition, offset_of};
use crate::tree::ContentTree;
use crate::types::SelectionRect;

/// Error type for platform operations.
#[derive(Debug, Clone)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Geometry for ranges of rendered content.
pub trait LayoutMetrics {
    /// Screen rectangles covering the content between two tree positions,
    /// one per visual line, relative to the editor container.
    fn range_rects(
        &self,
        tree: &ContentTree,
        start: TreePosition,
        end: TreePosition,
    ) -> Result<Vec<SelectionRect>, PlatformError>;
}

/// Fixed-grid layout: every char is `char_width` wide, every line
/// `line_height` tall, optionally soft-wrapped at `wrap_columns`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceLayout {
    pub char_width: f64,
    pub line_height: f64,
    pub wrap_columns: Option<usize>,
}

impl Default for MonospaceLayout {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            wrap_columns: None,
        }
    }
}

impl MonospaceLayout {
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
            wrap_columns: None,
        }
    }

    pub fn with_wrap(mut self, columns: usize) -> Self {
        self.wrap_columns = Some(columns).filter(|c| *c > 0);
        self
    }

    fn rect(&self, row: usize, cols: Range<usize>) -> SelectionRect {
        SelectionRect::new(
            cols.start as f64 * self.char_width,
            row as f64 * self.line_height,
            cols.len() as f64 * self.char_width,
            self.line_height,
        )
    }

    /// Rectangles for `range` of the plain-text projection `text`.
    pub fn text_rects(&self, text: &str, range: Range<usize>) -> Vec<SelectionRect> {
        let mut rects = Vec::new();
        let mut current: Option<(usize, Range<usize>)> = None;
        let (mut row, mut col) = (0usize, 0usize);

        for (i, c) in text.chars().enumerate() {
            if i >= range.end {
                break;
            }
            if c == '\n' {
                row += 1;
                col = 0;
                continue;
            }
            if self.wrap_columns.is_some_and(|w| col >= w) {
                row += 1;
                col = 0;
            }
            if i >= range.start {
                let same_row = matches!(&current, Some((r, _)) if *r == row);
                if same_row {
                    if let Some((_, cols)) = current.as_mut() {
                        cols.end = col + 1;
                    }
                } else if let Some((r, cols)) = current.replace((row, col..col + 1)) {
                    rects.push(self.rect(r, cols));
                }
            }
            col += 1;
        }
        if let Some((r, cols)) = current {
            rects.push(self.rect(r, cols));
        }
        rects
    }
}

impl LayoutMetrics for MonospaceLayout {
    fn range_rects(
        &self,
        tree: &ContentTree,
        start: TreePosition,
        end: TreePosition,
    ) -> Result<Vec<SelectionRect>, PlatformError> {
        let start = offset_of(tree, start).map_err(|e| PlatformError(e.to_string()))?;
        let end = offset_of(tree, end).map_err(|e| PlatformError(e.to_string()))?;
        Ok(self.text_rects(&tree.plain_text(), start.min(end)..start.max(end)))
    }
}
