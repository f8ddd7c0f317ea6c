//! Error types for the check worker hosts.

use scrivener_spellcheck::SpellCheckError;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WorkerError {
    /// The worker thread could not be started.
    #[error("failed to start check worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The worker thread panicked before it could be joined.
    #[error("check worker thread panicked")]
    Panicked,

    /// A global tracing subscriber was already installed.
    #[error("failed to install logging: {0}")]
    Logging(String),

    /// Reading or writing the stdio transport failed.
    #[error("stdio transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SpellCheck(#[from] SpellCheckError),
}
