//! astex command-line driver.
//!
//! Provides the `astex` binary:
//! - `export` reads JSON translation units and writes one CBOR document per
//!   input, next to the input as `<input>.cbor` unless `--out-dir` is given.
//! - `dump` decodes a document and prints it as JSON.
//! - `check` decodes a document and reports duplicate ids, dangling
//!   references and unreachable entries.
//!
//! Exit codes: 0 = success, 1 = export failure or failed check,
//! 2 = invalid input or undecodable document, 3 = I/O error.

mod commands;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use astex_export::ExportOptions;

use commands::CommandError;

/// Graph export tools for C translation units.
#[derive(Parser)]
#[command(name = "astex", about = "Export C syntax trees and type graphs as CBOR documents")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export translation units (JSON) to CBOR documents.
    Export {
        /// Input translation units.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write documents here instead of next to each input.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Maximum nesting depth of the syntax tree and type graph.
        #[arg(long, env = "ASTEX_MAX_DEPTH", default_value_t = ExportOptions::DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Print a document as JSON.
    Dump {
        document: PathBuf,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Check a document's structural integrity.
    Check { document: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let exit_code = match cli.command {
        Commands::Export {
            inputs,
            out_dir,
            max_depth,
        } => run_export(&inputs, out_dir, ExportOptions { max_depth }),
        Commands::Dump { document, pretty } => run_dump(&document, pretty),
        Commands::Check { document } => run_check(&document),
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn report(err: &CommandError) -> i32 {
    eprintln!("Error: {}", err);
    err.exit_code()
}

/// Exports every input; one failure does not stop the rest. Returns the
/// highest exit code seen.
fn run_export(inputs: &[PathBuf], out_dir: Option<PathBuf>, options: ExportOptions) -> i32 {
    let mut exit_code = 0;
    for input in inputs {
        match commands::export_file(input, out_dir.as_deref(), &options) {
            Ok(summary) => {
                let json = serde_json::to_string(&summary).unwrap_or_else(|e| {
                    format!("{{\"error\": \"failed to serialize summary: {}\"}}", e)
                });
                println!("{}", json);
            }
            Err(err) => exit_code = exit_code.max(report(&err)),
        }
    }
    exit_code
}

fn run_dump(document: &Path, pretty: bool) -> i32 {
    match commands::dump_file(document, pretty) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(err) => report(&err),
    }
}

fn run_check(document: &Path) -> i32 {
    match commands::check_file(document) {
        Ok(check) => {
            let json = serde_json::to_string_pretty(&check).unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize report: {}\"}}", e)
            });
            println!("{}", json);
            if check.is_clean() {
                0
            } else {
                eprintln!("Check failed: {}", check);
                1
            }
        }
        Err(err) => report(&err),
    }
}
