//! Identity registry: the at-most-once gate for entity emission.

use std::collections::HashSet;

use crate::key::EntityKey;

/// Set of entity keys already emitted during one export pass.
///
/// Encoders call [`register`](Self::register) before computing an entry's
/// payload and skip the entry when it returns `false`.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    seen: HashSet<EntityKey>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key`. Returns `true` on the first sighting only.
    pub fn register(&mut self, key: EntityKey) -> bool {
        self.seen.insert(key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.seen.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
