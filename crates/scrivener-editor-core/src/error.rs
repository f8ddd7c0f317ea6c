//! Error types for editor core operations.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors that can occur while mapping or editing content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// A position referenced a node that is no longer part of the tree.
    #[error("stale node reference: {0:?}")]
    StaleNode(NodeId),

    /// A child index was past the end of its container.
    #[error("child index {index} out of range for node with {len} children")]
    ChildIndexOutOfRange { index: usize, len: usize },

    /// A linear offset was past the end of the plain-text projection.
    #[error("offset {offset} out of range (length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// The node cannot hold the requested operation (e.g. inserting into a line break).
    #[error("invalid target node: {0}")]
    InvalidTarget(&'static str),
}
