//! Undoable editor: a surface wired to a history store and the shortcut layer.
//!
//! Hosts forward three things: keydowns (`on_keydown`), input notifications
//! (`on_change`) and a clock (`poll`). Undo and redo swap the surface content
//! to the stored snapshot and put the caret back where it was.

use web_time::Instant;

use crate::actions::{HistoryAction, KeyCombo, KeydownResult, history_shortcut};
use crate::history::{CommitOutcome, HistoryConfig, HistoryStore};
use crate::surface::EditorHandle;
use crate::types::{EditorSnapshot, Selection, SnapshotSource};

pub struct UndoableEditor<S> {
    surface: S,
    history: HistoryStore,
}

impl<S: EditorHandle> UndoableEditor<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, HistoryConfig::default())
    }

    pub fn with_config(mut surface: S, config: HistoryConfig) -> Self {
        // Whatever the surface did before we were attached is the baseline.
        surface.take_changes();
        let initial = snapshot_of(&surface);
        Self {
            surface,
            history: HistoryStore::with_config(initial, config),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Handle a keydown before the surface sees it.
    ///
    /// Undo/redo chords are consumed (`Handled`, so the platform's native
    /// undo never runs) even when there is nothing to undo. Every other key
    /// is recorded for the next change and passed on.
    pub fn on_keydown(&mut self, combo: &KeyCombo) -> KeydownResult {
        match history_shortcut(combo) {
            Some(HistoryAction::Undo) => {
                self.undo();
                KeydownResult::Handled
            }
            Some(HistoryAction::Redo) => {
                self.redo();
                KeydownResult::Handled
            }
            None => {
                self.history.record_key(combo.key.clone());
                KeydownResult::NotHandled
            }
        }
    }

    /// Capture the surface state after it reported changes.
    pub fn on_change(&mut self, now: Instant) -> CommitOutcome {
        let changes = self.surface.take_changes();
        let Some(first) = changes.first().copied() else {
            return CommitOutcome::Unchanged;
        };
        let source = if changes.iter().any(|s| s.is_user()) {
            SnapshotSource::User
        } else {
            first
        };
        let snapshot = self.snapshot();
        self.history.on_change(snapshot, source, now)
    }

    /// Commit a pending edit whose quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.history.poll(now)
    }

    /// Commit the pending edit immediately, e.g. after a paste or an IME
    /// composition ends.
    pub fn flush(&mut self) -> bool {
        self.capture_unreported();
        self.history.flush()
    }

    pub fn undo(&mut self) -> bool {
        self.capture_unreported();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.apply(&snapshot, SnapshotSource::Undo);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.capture_unreported();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.apply(&snapshot, SnapshotSource::Redo);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The committed present snapshot.
    pub fn state(&self) -> &EditorSnapshot {
        self.history.state()
    }

    /// The live surface state, committed or not.
    pub fn snapshot(&self) -> EditorSnapshot {
        snapshot_of(&self.surface)
    }

    /// User changes the host never reported become an entry of their own.
    fn capture_unreported(&mut self) {
        let changes = self.surface.take_changes();
        if changes.iter().any(|s| s.is_user()) {
            let snapshot = self.snapshot();
            self.history.commit(snapshot);
        }
    }

    fn apply(&mut self, snapshot: &EditorSnapshot, source: SnapshotSource) {
        self.surface.set_content(&snapshot.content, source);
        let Selection { start, end } = snapshot.selection;
        if let Err(err) = self.surface.set_selection(start, end) {
            tracing::warn!(
                target: "scrivener::editor",
                %err,
                start,
                end,
                "could not restore selection"
            );
        }
    }
}

/// Current `{markup, selection}` of a surface. Without a live selection the
/// caret is taken to be at the end of the content.
fn snapshot_of<S: EditorHandle>(surface: &S) -> EditorSnapshot {
    let selection = surface
        .selection()
        .unwrap_or_else(|| Selection::collapsed(surface.plain_text().chars().count()));
    EditorSnapshot::new(surface.content_markup(), selection)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::actions::{Key, Modifiers};
    use crate::surface::HeadlessSurface;

    fn type_key(editor: &mut UndoableEditor<HeadlessSurface>, c: &str, now: Instant) {
        let result = editor.on_keydown(&KeyCombo::new(Key::character(c)));
        assert_eq!(result, KeydownResult::NotHandled);
        editor.surface_mut().insert_text(c).unwrap();
        editor.on_change(now);
    }

    fn backspace(editor: &mut UndoableEditor<HeadlessSurface>, now: Instant) {
        editor.on_keydown(&KeyCombo::new(Key::Backspace));
        editor.surface_mut().delete_backward().unwrap();
        editor.on_change(now);
    }

    #[test]
    fn test_typing_then_backspace_gives_two_entries() {
        let t0 = Instant::now();
        let mut editor = UndoableEditor::new(HeadlessSurface::new());
        type_key(&mut editor, "a", t0);
        type_key(&mut editor, "b", t0 + Duration::from_millis(100));
        type_key(&mut editor, "c", t0 + Duration::from_millis(200));
        backspace(&mut editor, t0 + Duration::from_millis(250));

        let history = editor.history().history();
        assert_eq!(history.past.len(), 2);
        assert_eq!(history.past[1].content, "abc");
        assert_eq!(editor.state().content, "ab");
    }

    #[test]
    fn test_undo_restores_content_and_caret() {
        let t0 = Instant::now();
        let mut editor = UndoableEditor::new(HeadlessSurface::from_markup("Hello"));
        editor.surface_mut().set_selection(0, 0).unwrap();
        type_key(&mut editor, "X", t0);
        assert!(editor.poll(t0 + Duration::from_millis(300)));
        assert_eq!(editor.state().content, "XHello");

        let undo = KeyCombo::ctrl(Key::character("z"));
        assert_eq!(editor.on_keydown(&undo), KeydownResult::Handled);
        assert_eq!(editor.surface().plain_text(), "Hello");
        assert_eq!(editor.surface().selection(), Some(Selection::collapsed(5)));

        let redo = KeyCombo::with_modifiers(Key::character("Z"), Modifiers::CTRL_SHIFT);
        assert_eq!(editor.on_keydown(&redo), KeydownResult::Handled);
        assert_eq!(editor.surface().plain_text(), "XHello");
        assert_eq!(editor.surface().selection(), Some(Selection::collapsed(1)));
    }

    #[test]
    fn test_swap_echo_is_not_recorded() {
        let t0 = Instant::now();
        let mut editor = UndoableEditor::new(HeadlessSurface::new());
        type_key(&mut editor, "a", t0);
        editor.flush();
        assert!(editor.undo());

        // The surface reports the swap like any other input.
        assert_eq!(editor.on_change(t0), CommitOutcome::Suppressed);
        assert!(!editor.poll(t0 + Duration::from_secs(1)));
        assert!(editor.can_redo());
    }

    #[test]
    fn test_shortcut_on_empty_history_still_handled() {
        let mut editor = UndoableEditor::new(HeadlessSurface::from_markup("text"));
        let undo = KeyCombo::meta(Key::character("z"));
        assert_eq!(editor.on_keydown(&undo), KeydownResult::Handled);
        assert!(!editor.can_undo());
        assert_eq!(editor.surface().plain_text(), "text");
    }

    #[test]
    fn test_unreported_edit_is_undoable() {
        let mut editor = UndoableEditor::new(HeadlessSurface::from_markup("ab"));
        editor.surface_mut().insert_text("c").unwrap();
        assert!(editor.undo());
        assert_eq!(editor.surface().plain_text(), "ab");
        assert!(editor.redo());
        assert_eq!(editor.surface().plain_text(), "abc");
    }
}
