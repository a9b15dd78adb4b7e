//! Error types for document export and decoding.
//!
//! [`ExportError`] covers every way an export run can abort. None of them
//! leave a partial document behind: bytes are only handed out after both
//! passes succeed. [`DecodeError`] covers malformed input to the reader.

use astex_core::CoreError;
use thiserror::Error;

use crate::key::EntityKey;

/// Errors that abort an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The translation unit refers to an entity it does not contain.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The syntax tree or type graph nests deeper than the configured bound.
    #[error("recursion depth limit of {limit} exceeded at {entity}")]
    DepthLimitExceeded { limit: usize, entity: EntityKey },

    /// The real pass wrote past the capacity measured by the sizing pass.
    #[error("output buffer overflow: capacity is {capacity} bytes, {needed} needed")]
    BufferOverflow { capacity: usize, needed: usize },

    /// The real pass wrote a different number of bytes than the sizing pass
    /// measured.
    #[error("sizing pass measured {probed} bytes but the real pass wrote {written}")]
    SizeMismatch { probed: usize, written: usize },
}

/// Errors produced while reading a document back.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {offset}")]
    Truncated { offset: usize },

    #[error("unsupported CBOR item 0x{byte:02x} at offset {offset}")]
    Unsupported { offset: usize, byte: u8 },

    #[error("invalid UTF-8 in text string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("{count} trailing byte(s) after the file table")]
    TrailingBytes { count: usize },

    #[error("unknown {space} tag {tag}")]
    UnknownTag { space: &'static str, tag: u64 },

    #[error("malformed document: {reason}")]
    Malformed { reason: String },
}
