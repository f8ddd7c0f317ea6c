//! The checker state machine run inside the worker context.
//!
//! `CheckEngine` owns the base dictionary, the custom word set and the
//! verdict cache. Nothing outside the worker touches them; hosts mutate them
//! only by sending [`CheckerInput`]s. Inputs are handled one at a time, so a
//! `CHECK_TEXT` never overlaps another.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use smol_str::SmolStr;
use web_time::Instant;

use crate::cache::SpellCheckCache;
use crate::config::SpellCheckConfig;
use crate::dictionary::{CustomDictionary, Dictionary, HunspellDictionary};
use crate::error::SpellCheckError;
use crate::protocol::{CheckerInput, CheckerOutput, InvalidWord};
use crate::scanner::scan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Uninitialized,
    DictionaryLoading,
    Ready,
}

/// Outcome of one text check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    pub invalid_words: Vec<InvalidWord>,
    /// Lowercased words found invalid in this pass.
    pub current_check_cache: BTreeMap<SmolStr, bool>,
}

pub struct CheckEngine {
    state: EngineState,
    dictionary: Option<Box<dyn Dictionary>>,
    custom: CustomDictionary,
    cache: SpellCheckCache,
    yield_budget: Duration,
}

impl Default for CheckEngine {
    fn default() -> Self {
        Self::new(&SpellCheckConfig::default())
    }
}

impl CheckEngine {
    pub fn new(config: &SpellCheckConfig) -> Self {
        Self {
            state: EngineState::Uninitialized,
            dictionary: None,
            custom: CustomDictionary::new(),
            cache: SpellCheckCache::new(),
            yield_budget: config.yield_budget,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == EngineState::Ready
    }

    pub fn custom_words(&self) -> &CustomDictionary {
        &self.custom
    }

    pub fn cache(&self) -> &SpellCheckCache {
        &self.cache
    }

    /// Install an external dictionary capability.
    pub fn install(&mut self, dictionary: Box<dyn Dictionary>) {
        self.dictionary = Some(dictionary);
        self.cache.clear();
        self.state = EngineState::Ready;
    }

    /// Parse and install the built-in word-list dictionary.
    ///
    /// On failure a previously installed dictionary stays in place.
    pub fn load(&mut self, aff: &str, dic: &str) -> Result<(), SpellCheckError> {
        self.state = EngineState::DictionaryLoading;
        match HunspellDictionary::from_data(aff, dic) {
            Ok(dictionary) => {
                self.install(Box::new(dictionary));
                tracing::info!(target: "scrivener::spellcheck", "dictionary ready");
                Ok(())
            }
            Err(e) => {
                self.state = if self.dictionary.is_some() {
                    EngineState::Ready
                } else {
                    EngineState::Uninitialized
                };
                Err(e)
            }
        }
    }

    pub fn add_word(&mut self, word: &str) {
        self.custom.add(word);
        self.cache.clear();
    }

    pub fn remove_word(&mut self, word: &str) {
        self.custom.remove(word);
        self.cache.clear();
    }

    pub fn clear_words(&mut self) {
        self.custom.clear();
        self.cache.clear();
    }

    /// Verdict for one word: custom set first, then the base dictionary.
    /// Without a dictionary every word passes.
    pub fn check_word(&mut self, word: &str) -> bool {
        let key = word.to_lowercase();
        let custom = &self.custom;
        let dictionary = self.dictionary.as_deref();
        // Verdicts are memoized lowercased, but Hunspell sees the word as written.
        self.cache.get_or_check(&key, |key| {
            custom.contains(key) || dictionary.is_none_or(|d| d.check(word))
        })
    }

    pub fn suggest(&self, word: &str, limit: usize) -> Vec<SmolStr> {
        if self.custom.contains(&word.to_lowercase()) {
            return Vec::new();
        }
        match &self.dictionary {
            Some(dictionary) => dictionary.suggest(word, limit),
            None => Vec::new(),
        }
    }

    /// Scan `text` and collect the invalid words.
    ///
    /// `pause` is awaited whenever the yield budget runs out, letting the
    /// surrounding context run. Returns `None` until a dictionary is ready.
    pub async fn check_text<P, F>(&mut self, text: &str, mut pause: P) -> Option<CheckReport>
    where
        P: FnMut() -> F,
        F: Future<Output = ()>,
    {
        if !self.is_ready() {
            tracing::debug!(
                target: "scrivener::spellcheck",
                state = ?self.state,
                "dropping check before dictionary is ready"
            );
            return None;
        }

        let started = Instant::now();
        let mut slice = Instant::now();
        let mut report = CheckReport::default();
        let mut tokens = 0usize;
        for token in scan(text) {
            tokens += 1;
            if !self.check_word(&token.word) {
                report.current_check_cache.insert(token.key(), false);
                report.invalid_words.push(token.into());
            }
            if slice.elapsed() >= self.yield_budget {
                pause().await;
                slice = Instant::now();
            }
        }

        tracing::debug!(
            target: "scrivener::spellcheck",
            tokens,
            invalid = report.invalid_words.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "checked text"
        );
        Some(report)
    }

    /// Handle one protocol input, returning the reply if it has one.
    pub async fn handle<P, F>(&mut self, input: CheckerInput, pause: P) -> Option<CheckerOutput>
    where
        P: FnMut() -> F,
        F: Future<Output = ()>,
    {
        match input {
            CheckerInput::InitDictionary { aff_data, dic_data } => {
                match self.load(&aff_data, &dic_data) {
                    Ok(()) => Some(CheckerOutput::Ready),
                    Err(e) => {
                        tracing::warn!(target: "scrivener::spellcheck", "dictionary load failed: {e}");
                        Some(CheckerOutput::Error {
                            message: SmolStr::new(e.to_string()),
                        })
                    }
                }
            }
            CheckerInput::AddWord { word } => {
                self.add_word(&word);
                None
            }
            CheckerInput::RemoveWord { word } => {
                self.remove_word(&word);
                None
            }
            CheckerInput::AddWords { words } => {
                self.custom.add_all(&words);
                self.cache.clear();
                None
            }
            CheckerInput::RemoveWords { words } => {
                self.custom.remove_all(&words);
                self.cache.clear();
                None
            }
            CheckerInput::ClearWords => {
                self.clear_words();
                None
            }
            CheckerInput::CheckText {
                full_text,
                request_id,
            } => {
                let report = self.check_text(&full_text, pause).await?;
                Some(CheckerOutput::CheckResult {
                    invalid_words: report.invalid_words,
                    current_check_cache: report.current_check_cache,
                    request_id,
                })
            }
            CheckerInput::Suggest { word, limit } => {
                let suggestions = self.suggest(&word, limit);
                Some(CheckerOutput::Suggestions { word, suggestions })
            }
        }
    }
}
