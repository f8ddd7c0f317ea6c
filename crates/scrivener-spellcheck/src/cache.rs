//! Word-validity memo.
//!
//! Keyed by lowercased word. Invalidation is all-or-nothing: any change to
//! the dictionary or the custom word set clears every entry.

use std::collections::HashMap;

use smol_str::SmolStr;

#[derive(Debug, Default)]
pub struct SpellCheckCache {
    verdicts: HashMap<SmolStr, bool>,
}

impl SpellCheckCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.verdicts.get(key).copied()
    }

    pub fn insert(&mut self, key: SmolStr, valid: bool) {
        self.verdicts.insert(key, valid);
    }

    /// Cached verdict for `key`, computing and memoizing it on a miss.
    pub fn get_or_check(&mut self, key: &str, check: impl FnOnce(&str) -> bool) -> bool {
        if let Some(valid) = self.get(key) {
            return valid;
        }
        let valid = check(key);
        self.insert(SmolStr::new(key), valid);
        valid
    }

    pub fn clear(&mut self) {
        if !self.verdicts.is_empty() {
            tracing::trace!(
                target: "scrivener::spellcheck",
                entries = self.verdicts.len(),
                "clearing verdict cache"
            );
        }
        self.verdicts.clear();
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}
