//! Shared state of one export pass.
//!
//! The node encoder ([`crate::node_encoder`]) and the type encoder
//! ([`crate::type_encoder`]) are two `impl` blocks on [`Exporter`]: they call
//! each other directly and share one registry, one location table, one
//! record guard and one output stream.

use std::collections::HashSet;

use astex_core::{NodeId, TranslationUnit};

use crate::cbor::{Encoder, Sink};
use crate::error::ExportError;
use crate::key::EntityKey;
use crate::location::LocationTable;
use crate::registry::IdentityRegistry;
use crate::{ExportOptions, ExportStats};

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs one level of the recursive walk, first growing the stack if it is
/// close to exhausted. `max_depth` stays the logical bound; this keeps any
/// depth below it from overflowing the thread's stack.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

pub(crate) struct Exporter<'tu, S> {
    pub(crate) tu: &'tu TranslationUnit,
    pub(crate) out: Encoder<S>,
    pub(crate) registry: IdentityRegistry,
    pub(crate) locations: LocationTable,
    /// Record declarations whose bodies are being walked on behalf of a
    /// record type. A declaration is never re-entered while listed here.
    pub(crate) records_in_progress: HashSet<NodeId>,
    pub(crate) stats: ExportStats,
    depth: usize,
    max_depth: usize,
}

impl<'tu, S: Sink> Exporter<'tu, S> {
    pub(crate) fn new(tu: &'tu TranslationUnit, sink: S, options: &ExportOptions) -> Self {
        Exporter {
            tu,
            out: Encoder::new(sink),
            registry: IdentityRegistry::new(),
            locations: LocationTable::new(),
            records_in_progress: HashSet::new(),
            stats: ExportStats::default(),
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// Runs the whole pass: entries, top-level list, file table.
    pub(crate) fn run(mut self) -> Result<(S, ExportStats), ExportError> {
        let tu = self.tu;

        self.out.begin_array()?;
        for &decl in tu.top_level() {
            self.traverse(decl)?;
        }
        self.out.end()?;

        self.out.begin_array()?;
        for &decl in tu.top_level() {
            self.out.uint(EntityKey::node(decl).as_u64())?;
        }
        self.out.end()?;

        self.out.array(self.locations.len())?;
        for path in self.locations.paths() {
            self.out.text(path)?;
        }

        self.stats.files = self.locations.len();
        self.stats.top_level = tu.top_level().len();
        self.stats.bytes = self.out.sink().written();
        Ok((self.out.into_sink(), self.stats))
    }

    /// Enters one level of recursion on behalf of `entity`.
    pub(crate) fn enter(&mut self, entity: EntityKey) -> Result<(), ExportError> {
        if self.depth >= self.max_depth {
            return Err(ExportError::DepthLimitExceeded {
                limit: self.max_depth,
                entity,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }
}
