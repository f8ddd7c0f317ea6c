//! Conversion of flagged words into on-screen spans.
//!
//! Offsets in a check result refer to the text that was sent. By the time the
//! result arrives the user may have typed more, so every occurrence is checked
//! against the current plain text before it is mapped; anything that no longer
//! lines up is skipped and picked up by the next check.

use std::collections::BTreeMap;

use scrivener_editor_core::{ContentTree, LayoutMetrics, TextPosition, position_of};
use smol_str::SmolStr;

use crate::protocol::InvalidWord;
use crate::scanner::scan;

/// Spans for the given invalid words, one per line rectangle they cover.
pub fn text_positions<L: LayoutMetrics>(
    tree: &ContentTree,
    words: &[InvalidWord],
    layout: &L,
) -> Vec<TextPosition> {
    let text = tree.plain_text();
    let bounds = CharBounds::new(&text);
    let mut out = Vec::new();
    for word in words {
        match bounds.slice(&text, word.start, word.end) {
            Some(current) if current == word.word.as_str() => {
                push_spans(tree, layout, word, &mut out);
            }
            _ => {
                tracing::trace!(
                    target: "scrivener::spellcheck",
                    word = %word.word,
                    start = word.start,
                    end = word.end,
                    "skipping stale span"
                );
            }
        }
    }
    out
}

/// Spans for every occurrence in the current text of a word the last pass
/// flagged.
///
/// `delta` is the `currentCheckCache` of a check result: lowercased words
/// mapped to their verdict.
pub fn positions_from_cache<L: LayoutMetrics>(
    tree: &ContentTree,
    delta: &BTreeMap<SmolStr, bool>,
    layout: &L,
) -> Vec<TextPosition> {
    if delta.is_empty() {
        return Vec::new();
    }
    let text = tree.plain_text();
    let words: Vec<InvalidWord> = scan(&text)
        .filter(|token| delta.get(&token.key()) == Some(&false))
        .map(InvalidWord::from)
        .collect();
    let mut out = Vec::new();
    for word in &words {
        push_spans(tree, layout, word, &mut out);
    }
    out
}

fn push_spans<L: LayoutMetrics>(
    tree: &ContentTree,
    layout: &L,
    word: &InvalidWord,
    out: &mut Vec<TextPosition>,
) {
    let start = position_of(tree, word.start);
    let end = position_of(tree, word.end);
    let rects = match layout.range_rects(tree, start, end) {
        Ok(rects) => rects,
        Err(e) => {
            tracing::warn!(target: "scrivener::spellcheck", word = %word.word, "no layout for span: {e}");
            return;
        }
    };
    out.extend(rects.into_iter().map(|rect| TextPosition {
        word: word.word.clone(),
        start_offset: word.start,
        end_offset: word.end,
        left: rect.x,
        right: rect.x + rect.width,
        height: rect.bottom(),
        is_valid: false,
    }));
}

/// Byte index of every char boundary, so char ranges can be sliced.
struct CharBounds(Vec<usize>);

impl CharBounds {
    fn new(text: &str) -> Self {
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bounds.push(text.len());
        Self(bounds)
    }

    fn slice<'t>(&self, text: &'t str, start: usize, end: usize) -> Option<&'t str> {
        if start >= end {
            return None;
        }
        let from = *self.0.get(start)?;
        let to = *self.0.get(end)?;
        text.get(from..to)
    }
}

#[cfg(test)]
mod tests {
    use scrivener_editor_core::{MonospaceLayout, markup};

    use super::*;

    fn flagged(word: &str, start: usize) -> InvalidWord {
        InvalidWord {
            word: word.into(),
            start,
            end: start + word.chars().count(),
        }
    }

    #[test]
    fn test_spans_follow_lines() {
        let tree = markup::parse("Helo wrold<br>ok teh");
        let layout = MonospaceLayout::new(10.0, 20.0);
        let spans = text_positions(&tree, &[flagged("wrold", 5), flagged("teh", 14)], &layout);
        assert_eq!(spans.len(), 2);

        assert_eq!(spans[0].word, "wrold");
        assert_eq!((spans[0].left, spans[0].right), (50.0, 100.0));
        assert_eq!(spans[0].height, 20.0);

        assert_eq!(spans[1].word, "teh");
        assert_eq!((spans[1].left, spans[1].right), (30.0, 60.0));
        assert_eq!(spans[1].height, 40.0);
        assert!(spans.iter().all(|s| !s.is_valid));
    }

    #[test]
    fn test_wrapped_word_splits() {
        let tree = markup::parse("abc wrold");
        let layout = MonospaceLayout::new(10.0, 20.0).with_wrap(6);
        let spans = text_positions(&tree, &[flagged("wrold", 4)], &layout);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].left, spans[0].right, spans[0].height), (40.0, 60.0, 20.0));
        assert_eq!((spans[1].left, spans[1].right, spans[1].height), (0.0, 30.0, 40.0));
        assert!(spans.iter().all(|s| s.start_offset == 4 && s.end_offset == 9));
    }

    #[test]
    fn test_stale_offsets_skipped() {
        let tree = markup::parse("Hello world");
        let layout = MonospaceLayout::default();
        let spans = text_positions(
            &tree,
            &[flagged("wrold", 6), flagged("Helo", 40), flagged("Hello", 0)],
            &layout,
        );
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].word, "Hello");
    }

    #[test]
    fn test_delta_reapplied_to_current_text() {
        // The text moved on since the check: "wrold" now appears twice.
        let tree = markup::parse("Wrold <b>wrold</b> fine");
        let delta = BTreeMap::from([(SmolStr::new("wrold"), false)]);
        let spans = positions_from_cache(&tree, &delta, &MonospaceLayout::new(10.0, 20.0));
        let found: Vec<_> = spans
            .iter()
            .map(|s| (s.word.as_str(), s.start_offset, s.end_offset))
            .collect();
        assert_eq!(found, vec![("Wrold", 0, 5), ("wrold", 6, 11)]);
    }
}
