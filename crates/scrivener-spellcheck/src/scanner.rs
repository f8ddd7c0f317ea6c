//! Word tokenizer over the plain-text projection.
//!
//! A word is a maximal run of letters and apostrophes at least two chars
//! long. Offsets are char offsets, the same units the position mapper uses.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[\p{L}'’]{2,}\b").unwrap());

/// One word occurrence. `word` keeps its display casing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    pub word: SmolStr,
    pub start: usize,
    pub end: usize,
}

impl WordToken {
    /// Comparison key: the word lowercased.
    pub fn key(&self) -> SmolStr {
        SmolStr::new(self.word.to_lowercase())
    }
}

/// Tokenize `text`. Each call starts a fresh pass.
pub fn scan(text: &str) -> Tokens<'_> {
    Tokens {
        text,
        matches: WORD_RE.find_iter(text),
        byte_pos: 0,
        char_pos: 0,
    }
}

/// Lazy token iterator returned by [`scan`].
pub struct Tokens<'t> {
    text: &'t str,
    matches: regex::Matches<'static, 't>,
    byte_pos: usize,
    char_pos: usize,
}

impl Iterator for Tokens<'_> {
    type Item = WordToken;

    fn next(&mut self) -> Option<WordToken> {
        loop {
            let m = self.matches.next()?;
            if m.is_empty() || m.start() < self.byte_pos {
                continue;
            }
            self.char_pos += self.text[self.byte_pos..m.start()].chars().count();
            let start = self.char_pos;
            let len = m.as_str().chars().count();
            self.char_pos += len;
            self.byte_pos = m.end();
            return Some(WordToken {
                word: SmolStr::new(m.as_str()),
                start,
                end: start + len,
            });
        }
    }
}
