//! scrivener-editor-core: framework-free editing core.
//!
//! This crate provides:
//! - `ContentTree` - the editable surface content as an arena tree, plus a
//!   tolerant markup codec
//! - Offset mapping between linear plain-text offsets and tree positions
//! - `HistoryStore` - debounced snapshot undo/redo
//! - `EditorHandle` / `HeadlessSurface` - the host-facing editor API
//! - `UndoableEditor<S>` - a surface wired to history and keyboard shortcuts

pub mod actions;
pub mod debounce;
pub mod edit;
pub mod editor;
pub mod error;
pub mod history;
pub mod markup;
pub mod platform;
pub mod position;
pub mod surface;
pub mod tree;
pub mod types;

pub use actions::{HistoryAction, Key, KeyCombo, KeydownResult, Modifiers, history_shortcut};
pub use debounce::Debouncer;
pub use editor::UndoableEditor;
pub use error::EditorError;
pub use history::{CommitOutcome, HistoryConfig, HistoryState, HistoryStore};
pub use platform::{LayoutMetrics, MonospaceLayout, PlatformError};
pub use position::{
    TreePosition, offset_of, position_of, selection_from_positions, selection_to_positions,
};
pub use smol_str::SmolStr;
pub use surface::{EditorHandle, HeadlessSurface};
pub use tree::{ContentTree, Node, NodeId, NodeKind, Visibility};
pub use types::{EditorSnapshot, Selection, SelectionRect, SnapshotSource, TextPosition};
