//! Document assembler: measure, then write.
//!
//! An export runs the full traversal twice. The first pass writes into a
//! [`SizeProbe`] and stores nothing; the second writes into a
//! [`FixedBuffer`] of exactly the measured size. The traversal depends only
//! on the translation unit, so both passes produce the same byte stream. A
//! divergence is reported as an error and no document is returned.

use astex_core::TranslationUnit;

use crate::cbor::{FixedBuffer, SizeProbe, Sink};
use crate::error::ExportError;
use crate::exporter::Exporter;
use crate::{ExportOptions, ExportStats};

/// Exports `tu` as a document.
pub fn export(tu: &TranslationUnit, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    export_with_stats(tu, options).map(|(bytes, _)| bytes)
}

/// Runs only the sizing pass and returns the document size in bytes.
pub fn probe_size(tu: &TranslationUnit, options: &ExportOptions) -> Result<usize, ExportError> {
    let (probe, _) = Exporter::new(tu, SizeProbe::new(), options).run()?;
    Ok(probe.written())
}

/// Exports `tu`, also returning entity counts for the document.
pub fn export_with_stats(
    tu: &TranslationUnit,
    options: &ExportOptions,
) -> Result<(Vec<u8>, ExportStats), ExportError> {
    let probed = probe_size(tu, options)?;
    tracing::debug!(bytes = probed, "sizing pass complete");

    let (buffer, stats) = Exporter::new(tu, FixedBuffer::with_capacity(probed), options).run()?;
    let written = buffer.written();
    if written != probed {
        return Err(ExportError::SizeMismatch { probed, written });
    }

    tracing::debug!(
        nodes = stats.nodes,
        types = stats.types,
        files = stats.files,
        bytes = stats.bytes,
        "document written"
    );
    Ok((buffer.into_inner(), stats))
}
