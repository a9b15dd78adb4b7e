//! Entity keys: the surrogate ids written into export documents.
//!
//! A key packs an arena index, an id space and the const qualifier into one
//! `u64`:
//!
//! ```text
//!   bits 63..2   arena index (NodeId.0 or TypeId.0)
//!   bit  1       space: 0 = syntax node, 1 = type
//!   bit  0       const qualifier (types only)
//! ```
//!
//! Node and type keys never collide, `T` and `const T` differ, and a reader
//! can tell which kind of entry a key names without looking it up. Keys are
//! a pure function of the translation unit's ids, so both export passes
//! produce the same keys.

use std::fmt;

use astex_core::{NodeId, QualType, TypeId};
use serde::{Deserialize, Serialize};

const CONST_BIT: u64 = 0b01;
const TYPE_SPACE: u64 = 0b10;
const INDEX_SHIFT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(u64);

impl EntityKey {
    pub fn node(id: NodeId) -> Self {
        EntityKey(u64::from(id.0) << INDEX_SHIFT)
    }

    pub fn of_type(qt: QualType) -> Self {
        let const_bit = if qt.is_const { CONST_BIT } else { 0 };
        EntityKey((u64::from(qt.ty.0) << INDEX_SHIFT) | TYPE_SPACE | const_bit)
    }

    /// Wraps a raw key read back from a document.
    pub fn from_raw(raw: u64) -> Self {
        EntityKey(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn is_type(self) -> bool {
        self.0 & TYPE_SPACE != 0
    }

    pub fn is_node(self) -> bool {
        !self.is_type()
    }

    pub fn is_const(self) -> bool {
        self.is_type() && self.0 & CONST_BIT != 0
    }

    /// Recovers the node id, if this key names a node.
    pub fn as_node(self) -> Option<NodeId> {
        self.is_node().then(|| NodeId((self.0 >> INDEX_SHIFT) as u32))
    }

    /// Recovers the qualified type, if this key names a type.
    pub fn as_type(self) -> Option<QualType> {
        self.is_type().then(|| QualType {
            ty: TypeId((self.0 >> INDEX_SHIFT) as u32),
            is_const: self.0 & CONST_BIT != 0,
        })
    }
}

impl From<EntityKey> for u64 {
    fn from(key: EntityKey) -> Self {
        key.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.as_node(), self.as_type()) {
            (Some(node), _) => write!(f, "node#{}", node),
            (_, Some(qt)) if qt.is_const => write!(f, "type#{}c", qt.ty),
            (_, Some(qt)) => write!(f, "type#{}", qt.ty),
            _ => write!(f, "{}", self.0),
        }
    }
}
