//! scrivener-spellcheck: incremental background spell checking.
//!
//! The worker side is [`CheckEngine`]: it owns the dictionary, the custom
//! word set and the verdict cache, and answers [`CheckerInput`] messages.
//! The host side is [`SpellCheckClient`], which debounces re-checks, keeps
//! the custom set in sync and filters superseded results. [`spans`] turns a
//! result into on-screen rectangles.

pub mod bootstrap;
pub mod cache;
pub mod client;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod scanner;
pub mod spans;
pub mod sync;

pub use bootstrap::fetch_dictionary;
pub use cache::SpellCheckCache;
pub use client::{CheckerChannel, SpellCheckClient};
pub use config::SpellCheckConfig;
pub use dictionary::{CustomDictionary, Dictionary, DictionaryData, HunspellDictionary};
pub use engine::{CheckEngine, CheckReport, EngineState};
pub use error::SpellCheckError;
pub use protocol::{CheckerInput, CheckerOutput, InvalidWord};
pub use scanner::{WordToken, scan};
pub use spans::{positions_from_cache, text_positions};
pub use sync::{DictionarySync, SyncPlan};
