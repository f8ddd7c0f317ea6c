//! Host-side bookkeeping for a check worker.
//!
//! `SpellCheckClient` sits on the UI side of the channel. It debounces
//! re-checks while the user types, numbers every `CHECK_TEXT`, drops results
//! that a newer request has superseded, and keeps the worker's custom word
//! set in sync with the host's list.

use std::collections::BTreeSet;

use scrivener_editor_core::Debouncer;
use smol_str::SmolStr;
use web_time::Instant;

use crate::config::SpellCheckConfig;
use crate::dictionary::DictionaryData;
use crate::engine::CheckReport;
use crate::error::SpellCheckError;
use crate::protocol::{CheckerInput, CheckerOutput};
use crate::sync::{DictionarySync, SyncPlan};

/// Fire-and-forget transport to a check worker.
pub trait CheckerChannel {
    fn send(&self, input: CheckerInput) -> Result<(), SpellCheckError>;
}

impl<C: CheckerChannel + ?Sized> CheckerChannel for &C {
    fn send(&self, input: CheckerInput) -> Result<(), SpellCheckError> {
        (**self).send(input)
    }
}

pub struct SpellCheckClient<C> {
    channel: C,
    config: SpellCheckConfig,
    sync: DictionarySync,
    rescan: Debouncer<String>,
    next_request: u64,
    latest_request: Option<u64>,
    last_text: Option<String>,
    ready: bool,
    report: Option<CheckReport>,
}

impl<C: CheckerChannel> SpellCheckClient<C> {
    pub fn new(channel: C, config: SpellCheckConfig) -> Self {
        Self {
            channel,
            sync: DictionarySync::new(),
            rescan: Debouncer::new(config.rescan_debounce),
            config,
            next_request: 1,
            latest_request: None,
            last_text: None,
            ready: false,
            report: None,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Local mirror of the worker's custom word set, lowercased.
    pub fn custom_words(&self) -> &BTreeSet<String> {
        self.sync.synced()
    }

    /// Result of the most recent check that was not superseded.
    pub fn report(&self) -> Option<&CheckReport> {
        self.report.as_ref()
    }

    pub fn init_dictionary(&mut self, data: DictionaryData) -> Result<(), SpellCheckError> {
        self.ready = false;
        self.channel.send(data.into_input())
    }

    /// Bring the worker's custom set in line with `words`.
    pub fn set_custom_words<I, S>(&mut self, words: I) -> Result<SyncPlan, SpellCheckError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let plan = self.sync.sync(words);
        let messages = if self.config.batch_sync {
            plan.clone().into_batched_messages()
        } else {
            plan.clone().into_messages()
        };
        for message in messages {
            if let Err(e) = self.channel.send(message) {
                // The worker's state is unknown now; resend everything next time.
                self.sync.reset();
                return Err(e);
            }
        }
        Ok(plan)
    }

    pub fn clear_custom_words(&mut self) -> Result<(), SpellCheckError> {
        self.sync.reset();
        self.channel.send(CheckerInput::ClearWords)
    }

    /// Note an edit; the text is checked once edits pause.
    pub fn text_changed(&mut self, text: impl Into<String>, now: Instant) {
        self.rescan.schedule(text.into(), now);
    }

    /// Send the pending check if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Result<Option<u64>, SpellCheckError> {
        match self.rescan.poll(now) {
            Some(text) => self.check_now(text).map(Some),
            None => Ok(None),
        }
    }

    /// Check `text` immediately. Returns the request id.
    pub fn check_now(&mut self, text: impl Into<String>) -> Result<u64, SpellCheckError> {
        self.rescan.cancel();
        self.send_check(text.into())
    }

    fn send_check(&mut self, text: String) -> Result<u64, SpellCheckError> {
        let id = self.next_request;
        self.next_request += 1;
        self.latest_request = Some(id);
        self.last_text = Some(text.clone());
        self.channel.send(CheckerInput::CheckText {
            full_text: text,
            request_id: Some(id),
        })?;
        Ok(id)
    }

    pub fn suggest(&self, word: impl Into<String>, limit: Option<usize>) -> Result<(), SpellCheckError> {
        self.channel.send(CheckerInput::Suggest {
            word: word.into(),
            limit: limit.unwrap_or(self.config.suggestion_limit),
        })
    }

    /// Feed an output from the worker.
    ///
    /// Returns the output if the host should act on it, or `None` for a
    /// superseded check result. A `READY` re-checks the last text, since
    /// checks sent before it were dropped, unless a debounced rescan with
    /// newer text is already waiting.
    pub fn receive(&mut self, output: CheckerOutput) -> Result<Option<CheckerOutput>, SpellCheckError> {
        match output {
            CheckerOutput::Ready => {
                self.ready = true;
                // A pending rescan carries newer text and will be sent by `poll`.
                if !self.rescan.is_pending() {
                    if let Some(text) = self.last_text.clone() {
                        self.send_check(text)?;
                    }
                }
                Ok(Some(CheckerOutput::Ready))
            }
            CheckerOutput::CheckResult {
                invalid_words,
                current_check_cache,
                request_id,
            } => {
                if is_stale(request_id, self.latest_request) {
                    tracing::trace!(
                        target: "scrivener::spellcheck",
                        ?request_id,
                        latest = ?self.latest_request,
                        "dropping superseded check result"
                    );
                    return Ok(None);
                }
                self.report = Some(CheckReport {
                    invalid_words: invalid_words.clone(),
                    current_check_cache: current_check_cache.clone(),
                });
                Ok(Some(CheckerOutput::CheckResult {
                    invalid_words,
                    current_check_cache,
                    request_id,
                }))
            }
            CheckerOutput::Error { message } => {
                tracing::warn!(target: "scrivener::spellcheck", %message, "checker reported an error");
                Ok(Some(CheckerOutput::Error { message }))
            }
            other @ CheckerOutput::Suggestions { .. } => Ok(Some(other)),
        }
    }

    /// Words the latest report flagged, lowercased.
    pub fn flagged_words(&self) -> impl Iterator<Item = &SmolStr> {
        self.report
            .iter()
            .flat_map(|report| report.current_check_cache.keys())
    }
}

fn is_stale(request_id: Option<u64>, latest: Option<u64>) -> bool {
    match (request_id, latest) {
        (Some(id), Some(latest)) => id < latest,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use super::*;
    use crate::protocol::InvalidWord;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<CheckerInput>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<CheckerInput> {
            std::mem::take(&mut *self.sent.borrow_mut())
        }
    }

    impl CheckerChannel for Recorder {
        fn send(&self, input: CheckerInput) -> Result<(), SpellCheckError> {
            self.sent.borrow_mut().push(input);
            Ok(())
        }
    }

    fn result(id: u64, words: &[&str]) -> CheckerOutput {
        CheckerOutput::CheckResult {
            invalid_words: words
                .iter()
                .map(|w| InvalidWord {
                    word: (*w).into(),
                    start: 0,
                    end: w.chars().count(),
                })
                .collect(),
            current_check_cache: words.iter().map(|w| (SmolStr::new(w), false)).collect(),
            request_id: Some(id),
        }
    }

    #[test]
    fn test_rescan_is_debounced() {
        let recorder = Recorder::default();
        let mut client = SpellCheckClient::new(&recorder, SpellCheckConfig::default());
        let t0 = Instant::now();
        client.text_changed("Hel", t0);
        client.text_changed("Helo", t0 + Duration::from_millis(100));
        assert_eq!(client.poll(t0 + Duration::from_millis(350)).unwrap(), None);
        assert_eq!(client.poll(t0 + Duration::from_millis(400)).unwrap(), Some(1));
        assert_eq!(
            recorder.take(),
            vec![CheckerInput::CheckText {
                full_text: "Helo".into(),
                request_id: Some(1),
            }]
        );
    }

    #[test]
    fn test_superseded_results_dropped() {
        let recorder = Recorder::default();
        let mut client = SpellCheckClient::new(&recorder, SpellCheckConfig::default());
        let first = client.check_now("Helo").unwrap();
        let second = client.check_now("Helo wrold").unwrap();

        assert_eq!(client.receive(result(first, &["helo"])).unwrap(), None);
        assert!(client.report().is_none());

        let fresh = client.receive(result(second, &["helo", "wrold"])).unwrap();
        assert!(fresh.is_some());
        let flagged: Vec<_> = client.flagged_words().map(SmolStr::as_str).collect();
        assert_eq!(flagged, vec!["helo", "wrold"]);
    }

    #[test]
    fn test_ready_rechecks_last_text() {
        let recorder = Recorder::default();
        let mut client = SpellCheckClient::new(&recorder, SpellCheckConfig::default());
        client
            .init_dictionary(DictionaryData::new("", "1\nhello"))
            .unwrap();
        client.check_now("Helo").unwrap();
        recorder.take();

        client.receive(CheckerOutput::Ready).unwrap();
        assert!(client.is_ready());
        assert_eq!(
            recorder.take(),
            vec![CheckerInput::CheckText {
                full_text: "Helo".into(),
                request_id: Some(2),
            }]
        );
    }

    #[test]
    fn test_ready_keeps_pending_rescan() {
        let recorder = Recorder::default();
        let mut client = SpellCheckClient::new(&recorder, SpellCheckConfig::default());
        let t0 = Instant::now();
        client.check_now("Helo").unwrap();
        client.text_changed("Helo wrold newer", t0);
        recorder.take();

        client.receive(CheckerOutput::Ready).unwrap();
        assert!(recorder.take().is_empty());

        assert_eq!(client.poll(t0 + Duration::from_secs(1)).unwrap(), Some(2));
        assert_eq!(
            recorder.take(),
            vec![CheckerInput::CheckText {
                full_text: "Helo wrold newer".into(),
                request_id: Some(2),
            }]
        );
    }

    #[test]
    fn test_custom_words_synced_minimally() {
        let recorder = Recorder::default();
        let mut client = SpellCheckClient::new(&recorder, SpellCheckConfig::default());
        client.set_custom_words(["Helo", "scrivener"]).unwrap();
        recorder.take();

        let plan = client.set_custom_words(["scrivener", "wrold"]).unwrap();
        assert_eq!(plan.to_add, vec!["wrold"]);
        assert!(client.custom_words().contains("scrivener"));
        assert_eq!(
            recorder.take(),
            vec![
                CheckerInput::AddWord {
                    word: "wrold".into()
                },
                CheckerInput::RemoveWord {
                    word: "helo".into()
                },
            ]
        );
    }

    #[test]
    fn test_batched_sync() {
        let recorder = Recorder::default();
        let config = SpellCheckConfig {
            batch_sync: true,
            ..Default::default()
        };
        let mut client = SpellCheckClient::new(&recorder, config);
        client.set_custom_words(["a1", "b2", "c3"]).unwrap();
        assert_eq!(
            recorder.take(),
            vec![CheckerInput::AddWords {
                words: vec!["a1".into(), "b2".into(), "c3".into()]
            }]
        );
    }

    #[test]
    fn test_suggest_uses_default_limit() {
        let recorder = Recorder::default();
        let client = SpellCheckClient::new(&recorder, SpellCheckConfig::default());
        client.suggest("teh", None).unwrap();
        client.suggest("teh", Some(2)).unwrap();
        assert_eq!(
            recorder.take(),
            vec![
                CheckerInput::Suggest {
                    word: "teh".into(),
                    limit: 5
                },
                CheckerInput::Suggest {
                    word: "teh".into(),
                    limit: 2
                },
            ]
        );
    }
}
