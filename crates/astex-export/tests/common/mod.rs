//! Shared helpers for the export integration tests.

#![allow(dead_code)]

use astex_core::TranslationUnit;
use astex_export::{export, Document, EntityKey, Entry, ExportOptions, NodeEntry, TypeEntry};

/// Exports with default options and decodes the result.
pub fn export_doc(tu: &TranslationUnit) -> Document {
    let bytes = export(tu, &ExportOptions::default()).expect("export should succeed");
    Document::from_bytes(&bytes).expect("exported document should decode")
}

/// Asserts uniqueness, referential closure and reachability.
pub fn assert_well_formed(doc: &Document) {
    assert!(doc.duplicate_ids().is_empty(), "duplicate ids: {:?}", doc.duplicate_ids());
    assert!(
        doc.dangling_references().is_empty(),
        "dangling references: {:?}",
        doc.dangling_references()
    );
    assert!(
        doc.unreachable_from_top_level().is_empty(),
        "unreachable entries: {:?}",
        doc.unreachable_from_top_level()
    );
}

pub fn node_entry(doc: &Document, key: EntityKey) -> &NodeEntry {
    match doc.entry(key) {
        Some(Entry::Node(node)) => node,
        other => panic!("expected node entry for {}, got {:?}", key, other),
    }
}

pub fn type_entry(doc: &Document, key: EntityKey) -> &TypeEntry {
    match doc.entry(key) {
        Some(Entry::Type(ty)) => ty,
        other => panic!("expected type entry for {}, got {:?}", key, other),
    }
}

/// Position of `key` in the entry sequence.
pub fn position(doc: &Document, key: EntityKey) -> usize {
    doc.entries
        .iter()
        .position(|e| e.id() == key)
        .unwrap_or_else(|| panic!("{} not in document", key))
}
