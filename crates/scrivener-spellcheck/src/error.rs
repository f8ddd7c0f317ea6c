//! Error types for spell-check operations.

use thiserror::Error;

/// Errors that can occur while loading dictionaries or talking to the checker.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SpellCheckError {
    /// Fetching a dictionary resource failed.
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Reading a dictionary resource from disk failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The word list could not be used as a dictionary.
    #[error("invalid dictionary: {0}")]
    InvalidDictionary(String),

    /// A protocol message could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    /// The checker's input channel is gone.
    #[error("checker channel closed")]
    ChannelClosed,
}
