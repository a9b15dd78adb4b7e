//! Location table: dense file indices for compact source positions.
//!
//! File indices are assigned in order of first reference during a pass,
//! starting at 0, so the document's file table only lists files that some
//! entry actually points at.

use astex_core::{CoreError, SourceLoc, TranslationUnit};
use indexmap::IndexSet;

/// File index written for nodes the front end cannot attribute to a file.
/// It never occupies a slot in the file table.
pub const UNKNOWN_FILE: u64 = 0xFFFF_FFFF;

/// Encoded source position of one node entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub file: u64,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn unknown() -> Self {
        Position {
            file: UNKNOWN_FILE,
            line: 0,
            column: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.file == UNKNOWN_FILE
    }
}

#[derive(Debug, Default)]
pub struct LocationTable {
    paths: IndexSet<String>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `path`, allocating the next one on first use.
    pub fn resolve(&mut self, path: &str) -> u64 {
        if let Some(index) = self.paths.get_index_of(path) {
            return index as u64;
        }
        let (index, _) = self.paths.insert_full(path.to_owned());
        index as u64
    }

    /// Encodes `loc` against this table, resolving its file path through
    /// the translation unit.
    pub fn position_of(
        &mut self,
        tu: &TranslationUnit,
        loc: SourceLoc,
    ) -> Result<Position, CoreError> {
        match loc.file {
            None => Ok(Position::unknown()),
            Some(file) => {
                let path = tu.file_path(file)?;
                Ok(Position {
                    file: self.resolve(path),
                    line: loc.line,
                    column: loc.column,
                })
            }
        }
    }

    /// Paths in index order.
    pub fn paths(&self) -> impl ExactSizeIterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_same_index() {
        let mut table = LocationTable::new();
        assert_eq!(table.resolve("a.c"), 0);
        assert_eq!(table.resolve("a.c"), 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn indices_follow_first_reference() {
        let mut table = LocationTable::new();
        for (i, path) in ["z.h", "a.c", "m.h"].iter().enumerate() {
            assert_eq!(table.resolve(path), i as u64);
        }
        assert_eq!(table.resolve("a.c"), 1);
        assert_eq!(table.paths().collect::<Vec<_>>(), vec!["z.h", "a.c", "m.h"]);
    }

    #[test]
    fn implicit_location_uses_sentinel_without_allocating() {
        let tu = TranslationUnit::new();
        let mut table = LocationTable::new();
        let pos = table.position_of(&tu, SourceLoc::implicit()).unwrap();
        assert!(pos.is_unknown());
        assert_eq!((pos.line, pos.column), (0, 0));
        assert!(table.is_empty());
    }

    #[test]
    fn resolution_order_is_reference_order_not_front_end_order() {
        let mut tu = TranslationUnit::new();
        let first = tu.add_file("first.c");
        let second = tu.add_file("second.h");
        let mut table = LocationTable::new();

        let pos = table.position_of(&tu, SourceLoc::new(second, 3, 7)).unwrap();
        assert_eq!(pos, Position { file: 0, line: 3, column: 7 });
        let pos = table.position_of(&tu, SourceLoc::new(first, 1, 1)).unwrap();
        assert_eq!(pos.file, 1);
    }
}
