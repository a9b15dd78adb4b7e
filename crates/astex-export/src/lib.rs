//! Graph export engine.
//!
//! Turns an in-memory [`TranslationUnit`](astex_core::TranslationUnit) into a
//! compact, self-describing CBOR document that records every reachable
//! syntax node and type exactly once, keyed by stable [`EntityKey`]s.
//!
//! # Modules
//!
//! - [`key`] -- Entity keys (node/type space + const bit)
//! - [`tags`] -- Wire tags for node, type and string-literal kinds
//! - [`registry`] -- At-most-once emission gate
//! - [`location`] -- File path to dense index table
//! - [`cbor`] -- CBOR writer and its sinks
//! - [`document`] -- Two-pass document assembly
//! - [`reader`] -- Decoding and integrity checks for downstream tools
//! - [`error`] -- Export and decode errors
//!
//! The node and type encoders are private; they are reached through
//! [`export`].

pub mod cbor;
pub mod document;
pub mod error;
mod exporter;
pub mod key;
pub mod location;
mod node_encoder;
pub mod reader;
pub mod registry;
pub mod tags;
mod type_encoder;

pub use document::{export, export_with_stats, probe_size};
pub use error::{DecodeError, ExportError};
pub use key::EntityKey;
pub use reader::{Document, Entry, NodeEntry, TypeEntry, Value};

use serde::{Deserialize, Serialize};

/// Options controlling an export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Maximum nesting of nodes and types (counted together) before the
    /// export aborts with [`ExportError::DepthLimitExceeded`].
    pub max_depth: usize,
}

impl ExportOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 2_048;
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Counts describing one exported document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub nodes: usize,
    pub types: usize,
    pub files: usize,
    pub top_level: usize,
    pub bytes: usize,
}
