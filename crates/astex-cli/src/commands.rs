//! Subcommand logic, kept apart from argument parsing so it can be tested
//! against real files.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use astex_core::{CoreError, TranslationUnit};
use astex_export::{
    export_with_stats, DecodeError, Document, EntityKey, ExportError, ExportOptions, ExportStats,
};

/// Errors from one subcommand invocation on one file.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: invalid translation unit: {source}", path = path.display())]
    Input { path: PathBuf, source: CoreError },

    #[error("{path}: export failed: {source}", path = path.display())]
    Export { path: PathBuf, source: ExportError },

    #[error("{path}: cannot decode document: {source}", path = path.display())]
    Decode { path: PathBuf, source: DecodeError },

    #[error("{path}: cannot render document as JSON: {source}", path = path.display())]
    Render {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CommandError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Export { .. } | CommandError::Render { .. } => 1,
            CommandError::Input { .. } | CommandError::Decode { .. } => 2,
            CommandError::Io { .. } => 3,
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CommandError + '_ {
    move |source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

/// Result of exporting one input, printed as a JSON line.
#[derive(Debug, Serialize)]
pub struct ExportSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: ExportStats,
}

/// `<input>.cbor`, placed in `out_dir` when given.
pub fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(".cbor");
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

pub fn export_file(
    input: &Path,
    out_dir: Option<&Path>,
    options: &ExportOptions,
) -> Result<ExportSummary, CommandError> {
    let json = fs::read_to_string(input).map_err(io_error(input))?;
    let input_error = |source| CommandError::Input {
        path: input.to_path_buf(),
        source,
    };
    let tu = TranslationUnit::from_json(&json).map_err(input_error)?;
    tu.validate().map_err(input_error)?;

    let (bytes, stats) = export_with_stats(&tu, options).map_err(|source| {
        CommandError::Export {
            path: input.to_path_buf(),
            source,
        }
    })?;

    let output = output_path(input, out_dir);
    fs::write(&output, &bytes).map_err(io_error(&output))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        nodes = stats.nodes,
        types = stats.types,
        bytes = stats.bytes,
        "exported"
    );

    Ok(ExportSummary {
        input: input.to_path_buf(),
        output,
        stats,
    })
}

// ---------------------------------------------------------------------------
// dump / check
// ---------------------------------------------------------------------------

fn read_document(path: &Path) -> Result<Document, CommandError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    let doc = Document::from_bytes(&bytes).map_err(|source| CommandError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        entries = doc.entries.len(),
        files = doc.files.len(),
        "decoded document"
    );
    Ok(doc)
}

pub fn dump_file(path: &Path, pretty: bool) -> Result<String, CommandError> {
    read_document(path)?
        .to_json(pretty)
        .map_err(|source| CommandError::Render {
            path: path.to_path_buf(),
            source,
        })
}

/// Integrity findings for one document.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    pub entries: usize,
    pub duplicate_ids: Vec<EntityKey>,
    /// `(from, to)` pairs.
    pub dangling_references: Vec<(EntityKey, EntityKey)>,
    pub unreachable: Vec<EntityKey>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.dangling_references.is_empty()
            && self.unreachable.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} duplicate id(s), {} dangling reference(s), {} unreachable",
            self.duplicate_ids.len(),
            self.dangling_references.len(),
            self.unreachable.len()
        )
    }
}

pub fn check_file(path: &Path) -> Result<CheckReport, CommandError> {
    let doc = read_document(path)?;
    let report = CheckReport {
        entries: doc.entries.len(),
        duplicate_ids: doc.duplicate_ids(),
        dangling_references: doc.dangling_references(),
        unreachable: doc.unreachable_from_top_level(),
    };
    if !report.is_clean() {
        tracing::warn!(path = %path.display(), %report, "document failed integrity check");
    }
    Ok(report)
}
