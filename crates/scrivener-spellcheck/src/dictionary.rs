//! Dictionary capability and the word sources behind it.
//!
//! The checker only needs `check` and `suggest`. [`HunspellDictionary`] is the
//! built-in implementation over a Hunspell affix file and word list;
//! [`CustomDictionary`] is the session's always-valid overlay.

use std::collections::BTreeSet;
use std::path::Path;

use smol_str::SmolStr;

use crate::error::SpellCheckError;
use crate::protocol::CheckerInput;

/// Accept/reject a word and propose corrections.
pub trait Dictionary {
    fn check(&self, word: &str) -> bool;

    /// Up to `limit` corrections, best first.
    fn suggest(&self, word: &str, limit: usize) -> Vec<SmolStr>;
}

/// The two raw dictionary resources: affix rules and word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryData {
    pub aff: String,
    pub dic: String,
}

impl DictionaryData {
    pub fn new(aff: impl Into<String>, dic: impl Into<String>) -> Self {
        Self {
            aff: aff.into(),
            dic: dic.into(),
        }
    }

    pub fn from_files(aff: impl AsRef<Path>, dic: impl AsRef<Path>) -> Result<Self, SpellCheckError> {
        Ok(Self {
            aff: read(aff.as_ref())?,
            dic: read(dic.as_ref())?,
        })
    }

    /// The message that installs this dictionary in a checker.
    pub fn into_input(self) -> CheckerInput {
        CheckerInput::InitDictionary {
            aff_data: self.aff,
            dic_data: self.dic,
        }
    }
}

fn read(path: &Path) -> Result<String, SpellCheckError> {
    std::fs::read_to_string(path).map_err(|source| SpellCheckError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Hunspell dictionary built from an affix resource and a word list.
///
/// Prefix and suffix rules named by an entry's flags are applied, so
/// `walk/DS` accepts `walked` and `walks`. Capitalized and upper-case forms
/// of lowercase entries are accepted the way Hunspell accepts them.
pub struct HunspellDictionary {
    inner: spellbook::Dictionary,
}

impl HunspellDictionary {
    pub fn from_data(aff: &str, dic: &str) -> Result<Self, SpellCheckError> {
        let entries = count_entries(dic);
        if entries == 0 {
            return Err(SpellCheckError::InvalidDictionary(
                "word list has no entries".into(),
            ));
        }
        let inner = spellbook::Dictionary::new(aff, dic)
            .map_err(|e| SpellCheckError::InvalidDictionary(e.to_string()))?;
        tracing::debug!(target: "scrivener::spellcheck", entries, "parsed hunspell dictionary");
        Ok(Self { inner })
    }
}

impl std::fmt::Debug for HunspellDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HunspellDictionary").finish_non_exhaustive()
    }
}

/// Word entries in a `.dic` resource, skipping the leading count line,
/// blank lines and `#` comments.
fn count_entries(dic: &str) -> usize {
    dic.lines()
        .enumerate()
        .map(|(i, line)| (i, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .filter(|(i, line)| !(*i == 0 && line.chars().all(|c| c.is_ascii_digit())))
        .count()
}

impl Dictionary for HunspellDictionary {
    fn check(&self, word: &str) -> bool {
        self.inner.check(word)
    }

    fn suggest(&self, word: &str, limit: usize) -> Vec<SmolStr> {
        if limit == 0 || self.inner.check(word) {
            return Vec::new();
        }
        let mut suggestions = Vec::new();
        self.inner.suggest(word, &mut suggestions);
        suggestions
            .into_iter()
            .take(limit)
            .map(SmolStr::from)
            .collect()
    }
}

/// Session words that are always valid, stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomDictionary {
    words: BTreeSet<SmolStr>,
}

impl CustomDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the word was newly added.
    pub fn add(&mut self, word: &str) -> bool {
        self.words.insert(SmolStr::new(word.to_lowercase()))
    }

    pub fn add_all<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words.into_iter().filter(|w| self.add(w.as_ref())).count()
    }

    /// Returns whether the word was present.
    pub fn remove(&mut self, word: &str) -> bool {
        self.words.remove(word.to_lowercase().as_str())
    }

    pub fn remove_all<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words.into_iter().filter(|w| self.remove(w.as_ref())).count()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// `key` must already be lowercased.
    pub fn contains(&self, key: &str) -> bool {
        self.words.contains(key)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(SmolStr::as_str)
    }
}
