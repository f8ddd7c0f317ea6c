//! Snapshot-based undo/redo history.
//!
//! `HistoryStore` keeps past/present/future snapshot stacks with a trailing
//! debounce for typing and an immediate commit for structural keys.
//!
//! Every change notification carries a [`SnapshotSource`]. Only user changes
//! are eligible for a new entry, so the surface echoing an undo/redo content
//! swap never records itself.

use std::collections::VecDeque;
use std::time::Duration;

use web_time::Instant;

use crate::actions::Key;
use crate::debounce::Debouncer;
use crate::types::{EditorSnapshot, SnapshotSource};

/// Tuning for [`HistoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Quiet period after the last edit before it becomes an entry.
    pub debounce: Duration,
    /// Keys whose edits commit immediately, each as its own entry.
    pub flush_keys: Vec<Key>,
    /// Maximum number of `past` entries. `None` keeps everything for the
    /// lifetime of the session.
    pub max_depth: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            flush_keys: vec![Key::Enter, Key::Backspace, Key::Delete],
            max_depth: None,
        }
    }
}

/// The three snapshot stacks.
///
/// `past` is oldest-first, `future` is nearest-first: undo pops the back of
/// `past`, redo pops the front of `future`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryState {
    pub past: VecDeque<EditorSnapshot>,
    pub present: EditorSnapshot,
    pub future: VecDeque<EditorSnapshot>,
}

/// What a change notification did to the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Not a user change; ignored.
    Suppressed,
    /// Held in the debounce timer.
    Scheduled,
    /// Became a new entry immediately.
    Committed,
    /// Identical to the present snapshot; nothing recorded.
    Unchanged,
}

pub struct HistoryStore {
    config: HistoryConfig,
    state: HistoryState,
    pending: Debouncer<EditorSnapshot>,
    last_key: Option<Key>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(EditorSnapshot::default())
    }
}

impl HistoryStore {
    pub fn new(initial: EditorSnapshot) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    pub fn with_config(initial: EditorSnapshot, config: HistoryConfig) -> Self {
        Self {
            pending: Debouncer::new(config.debounce),
            config,
            state: HistoryState {
                present: initial,
                ..Default::default()
            },
            last_key: None,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Note the most recent keydown so the next change can be classified.
    pub fn record_key(&mut self, key: Key) {
        self.last_key = Some(key);
    }

    /// Feed a change notification from the surface.
    ///
    /// A change following a flush key commits any pending edit and then the
    /// new snapshot, both immediately. Anything else restarts the debounce.
    pub fn on_change(
        &mut self,
        snapshot: EditorSnapshot,
        source: SnapshotSource,
        now: Instant,
    ) -> CommitOutcome {
        if !source.is_user() {
            tracing::trace!(target: "scrivener::history", ?source, "ignoring programmatic change");
            return CommitOutcome::Suppressed;
        }

        let structural = self
            .last_key
            .take()
            .is_some_and(|key| self.config.flush_keys.contains(&key));
        if structural {
            self.flush();
            return if self.push(snapshot) {
                CommitOutcome::Committed
            } else {
                CommitOutcome::Unchanged
            };
        }

        self.pending.schedule(snapshot, now);
        CommitOutcome::Scheduled
    }

    /// Commit `snapshot` right away, superseding any pending edit.
    pub fn commit(&mut self, snapshot: EditorSnapshot) -> bool {
        self.pending.cancel();
        self.push(snapshot)
    }

    /// Commit the pending edit if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.poll(now) {
            Some(snapshot) => self.push(snapshot),
            None => false,
        }
    }

    /// Commit the pending edit now, if there is one.
    pub fn flush(&mut self) -> bool {
        match self.pending.flush() {
            Some(snapshot) => self.push(snapshot),
            None => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// When the pending edit will commit, for hosts scheduling a wakeup.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    fn push(&mut self, snapshot: EditorSnapshot) -> bool {
        if snapshot == self.state.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.state.present, snapshot);
        self.state.past.push_back(previous);
        self.state.future.clear();
        if let Some(max) = self.config.max_depth {
            while self.state.past.len() > max {
                self.state.past.pop_front();
            }
        }
        tracing::trace!(
            target: "scrivener::history",
            past = self.state.past.len(),
            "committed snapshot"
        );
        true
    }

    /// Step back one entry. A pending edit is committed first so it can be
    /// undone like any other.
    ///
    /// Returns the snapshot to apply, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&EditorSnapshot> {
        self.flush();
        self.last_key = None;
        let previous = self.state.past.pop_back()?;
        let current = std::mem::replace(&mut self.state.present, previous);
        self.state.future.push_front(current);
        tracing::debug!(
            target: "scrivener::history",
            past = self.state.past.len(),
            future = self.state.future.len(),
            "undo"
        );
        Some(&self.state.present)
    }

    /// Step forward one entry. A pending edit is committed first, which
    /// clears the redo stack.
    pub fn redo(&mut self) -> Option<&EditorSnapshot> {
        self.flush();
        self.last_key = None;
        let next = self.state.future.pop_front()?;
        let current = std::mem::replace(&mut self.state.present, next);
        self.state.past.push_back(current);
        tracing::debug!(
            target: "scrivener::history",
            past = self.state.past.len(),
            future = self.state.future.len(),
            "redo"
        );
        Some(&self.state.present)
    }

    pub fn can_undo(&self) -> bool {
        !self.state.past.is_empty() || self.pending.is_pending()
    }

    pub fn can_redo(&self) -> bool {
        !self.state.future.is_empty() && !self.pending.is_pending()
    }

    /// The committed present snapshot.
    pub fn state(&self) -> &EditorSnapshot {
        &self.state.present
    }

    pub fn history(&self) -> &HistoryState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Selection;

    fn snap(content: &str) -> EditorSnapshot {
        let caret = content.chars().count();
        EditorSnapshot::new(content, Selection::collapsed(caret))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn contents(deque: &VecDeque<EditorSnapshot>) -> Vec<&str> {
        deque.iter().map(|s| s.content.as_str()).collect()
    }

    /// Type `text` one char at a time, `gap` apart, starting at `t0`.
    fn type_text(store: &mut HistoryStore, prefix: &str, text: &str, t0: Instant, gap: Duration) -> Instant {
        let mut now = t0;
        let mut content = prefix.to_string();
        for c in text.chars() {
            store.record_key(Key::character(c.to_string()));
            content.push(c);
            store.on_change(snap(&content), SnapshotSource::User, now);
            now += gap;
        }
        now
    }

    #[test]
    fn test_rapid_edits_coalesce() {
        let t0 = Instant::now();
        let mut store = HistoryStore::default();
        let end = type_text(&mut store, "", "hello", t0, ms(50));

        assert!(store.has_pending());
        assert!(!store.poll(end));
        assert!(store.poll(end + ms(300)));
        assert_eq!(contents(&store.history().past), vec![""]);
        assert_eq!(store.state(), &snap("hello"));
    }

    #[test]
    fn test_structural_key_commits_immediately() {
        // "a", "b", "c" typed quickly, then Backspace.
        let t0 = Instant::now();
        let mut store = HistoryStore::default();
        let now = type_text(&mut store, "", "abc", t0, ms(100));

        store.record_key(Key::Backspace);
        let outcome = store.on_change(snap("ab"), SnapshotSource::User, now);
        assert_eq!(outcome, CommitOutcome::Committed);
        assert!(!store.has_pending());

        let history = store.history();
        assert_eq!(history.past.len(), 2);
        assert_eq!(contents(&history.past), vec!["", "abc"]);
        assert_eq!(history.present, snap("ab"));
    }

    #[test]
    fn test_flush_keys_are_configurable() {
        let config = HistoryConfig {
            flush_keys: vec![Key::Tab],
            ..Default::default()
        };
        let t0 = Instant::now();
        let mut store = HistoryStore::with_config(snap(""), config);

        store.record_key(Key::Enter);
        let outcome = store.on_change(snap("\n"), SnapshotSource::User, t0);
        assert_eq!(outcome, CommitOutcome::Scheduled);

        store.record_key(Key::Tab);
        let outcome = store.on_change(snap("\n\t"), SnapshotSource::User, t0);
        assert_eq!(outcome, CommitOutcome::Committed);
        assert_eq!(contents(&store.history().past), vec!["", "\n"]);
    }

    #[test]
    fn test_undo_redo_inverse() {
        let t0 = Instant::now();
        let mut store = HistoryStore::default();
        let edits = ["one", "one two", "one two three", "one three"];
        for edit in edits {
            store.record_key(Key::Enter);
            store.on_change(snap(edit), SnapshotSource::User, t0);
        }
        let last = store.state().clone();

        for _ in 0..edits.len() {
            assert!(store.undo().is_some());
        }
        assert_eq!(store.state(), &snap(""));
        assert!(!store.can_undo());

        for _ in 0..edits.len() {
            assert!(store.redo().is_some());
        }
        assert_eq!(store.state(), &last);
        assert!(!store.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut store = HistoryStore::new(snap("start"));
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert!(store.undo().is_none());
        assert!(store.redo().is_none());
        assert_eq!(store.state(), &snap("start"));
    }

    #[test]
    fn test_programmatic_changes_are_suppressed() {
        let t0 = Instant::now();
        let mut store = HistoryStore::default();
        store.commit(snap("a"));
        store.commit(snap("ab"));
        store.undo();

        for source in [SnapshotSource::Undo, SnapshotSource::Redo] {
            let outcome = store.on_change(snap("a"), source, t0);
            assert_eq!(outcome, CommitOutcome::Suppressed);
        }
        assert!(!store.has_pending());
        assert!(store.can_redo());
        assert_eq!(contents(&store.history().future), vec!["ab"]);
    }

    #[test]
    fn test_undo_commits_pending_edit_first() {
        let t0 = Instant::now();
        let mut store = HistoryStore::default();
        store.on_change(snap("draft"), SnapshotSource::User, t0);
        assert!(store.can_undo());

        assert_eq!(store.undo(), Some(&snap("")));
        assert_eq!(contents(&store.history().future), vec!["draft"]);
    }

    #[test]
    fn test_new_commit_clears_redo() {
        let mut store = HistoryStore::default();
        store.commit(snap("a"));
        store.commit(snap("ab"));
        store.undo();
        assert!(store.can_redo());
        store.commit(snap("ax"));
        assert!(!store.can_redo());
        assert_eq!(contents(&store.history().past), vec!["", "a"]);
    }

    #[test]
    fn test_identical_snapshot_not_recorded() {
        let t0 = Instant::now();
        let mut store = HistoryStore::new(snap("same"));
        store.record_key(Key::Delete);
        let outcome = store.on_change(snap("same"), SnapshotSource::User, t0);
        assert_eq!(outcome, CommitOutcome::Unchanged);
        assert!(store.history().past.is_empty());
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let config = HistoryConfig {
            max_depth: Some(2),
            ..Default::default()
        };
        let mut store = HistoryStore::with_config(snap(""), config);
        for content in ["a", "ab", "abc", "abcd"] {
            store.commit(snap(content));
        }
        assert_eq!(contents(&store.history().past), vec!["ab", "abc"]);
    }
}
