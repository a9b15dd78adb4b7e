//! Stable ID newtypes for translation-unit entities.
//!
//! All IDs are distinct newtype wrappers over `u32` indexing into the arenas
//! owned by [`TranslationUnit`](crate::unit::TranslationUnit), so that a
//! `NodeId` cannot be accidentally used where a `TypeId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Syntax node identifier (declaration, statement, expression or literal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Type identifier. Const qualification is not part of a `TypeId`; see
/// [`QualType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

/// Source file identifier, as assigned by the front end's source manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

/// A type reference together with its const qualifier.
///
/// `int` and `const int` share a [`TypeId`] but are different `QualType`s,
/// and they export as different entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualType {
    pub ty: TypeId,
    #[serde(default)]
    pub is_const: bool,
}

impl QualType {
    /// Unqualified reference to `ty`.
    pub fn new(ty: TypeId) -> Self {
        QualType {
            ty,
            is_const: false,
        }
    }

    /// Const-qualified reference to `ty`.
    pub fn constant(ty: TypeId) -> Self {
        QualType { ty, is_const: true }
    }
}

impl From<TypeId> for QualType {
    fn from(ty: TypeId) -> Self {
        QualType::new(ty)
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QualType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const {}", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}
