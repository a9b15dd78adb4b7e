//! Core error types for astex-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! ways a translation unit handed over by a front end can be malformed.

use crate::id::{FileId, NodeId, TypeId};
use thiserror::Error;

/// Core errors produced by the astex-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node id was not found in the node arena.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },

    /// A type id was not found in the type arena.
    #[error("type not found: TypeId({id})", id = id.0)]
    TypeNotFound { id: TypeId },

    /// A file id was not found in the file table.
    #[error("file not found: FileId({id})", id = id.0)]
    FileNotFound { id: FileId },

    /// A reference points at an entity of the wrong kind, e.g. a record type
    /// whose declaration is not a record declaration.
    #[error("invalid reference from {from}: {reason}")]
    InvalidReference { from: String, reason: String },

    /// The translation unit could not be read from or written to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
