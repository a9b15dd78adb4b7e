//! The type graph handed over by the front end.
//!
//! Types form a DAG except through record declarations: a record's fields may
//! point back at the record itself. Every constituent reference is a
//! [`QualType`], so const qualification travels with the edge and not with
//! the type node.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::id::{NodeId, QualType};

/// One node of the type graph. Each variant represents a distinct kind of type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    /// Scalar and `void` types.
    Builtin(BuiltinKind),

    /// `T *`.
    Pointer { pointee: QualType },

    /// `T[N]`.
    ConstantArray { element: QualType, size: u64 },

    /// `T[n]` where `n` is only known at run time.
    VariableArray { element: QualType },

    /// `T[]`.
    IncompleteArray { element: QualType },

    /// Function type with a parameter list.
    FunctionProto {
        ret: QualType,
        params: Vec<QualType>,
        #[serde(default)]
        is_variadic: bool,
    },

    /// K&R-style function type without a prototype.
    FunctionNoProto { ret: QualType },

    /// `enum E`, referencing the enum declaration node.
    Enum { decl: NodeId },

    /// `struct S` / `union U`, referencing the record declaration node.
    Record { decl: NodeId },

    /// A typedef name, referencing the typedef declaration node.
    Typedef { decl: NodeId },

    /// `typeof(...)`, already resolved to the underlying type.
    TypeOf { underlying: QualType },

    /// A type written with an elaborated keyword (`struct S` as opposed to `S`).
    Elaborated { named: QualType },

    /// An array or function parameter type after decay to a pointer.
    Decayed { decayed: QualType },

    /// A type the front end could not model.
    Unsupported { description: String },
}

/// Scalar (builtin) type kinds as reported by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinKind {
    Void,
    Bool,
    /// Plain `char`, whatever its signedness on the target.
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    Int128,
    UInt128,
    Half,
    WChar,
}

impl Type {
    /// Returns the constituent types this type refers to, in payload order.
    ///
    /// For function types the return type comes first, followed by the
    /// parameters.
    pub fn constituents(&self) -> SmallVec<[QualType; 4]> {
        match self {
            Type::Pointer { pointee } => SmallVec::from_slice(&[*pointee]),
            Type::ConstantArray { element, .. }
            | Type::VariableArray { element }
            | Type::IncompleteArray { element } => SmallVec::from_slice(&[*element]),
            Type::FunctionProto { ret, params, .. } => {
                let mut out = SmallVec::with_capacity(params.len() + 1);
                out.push(*ret);
                out.extend(params.iter().copied());
                out
            }
            Type::FunctionNoProto { ret } => SmallVec::from_slice(&[*ret]),
            Type::TypeOf { underlying } => SmallVec::from_slice(&[*underlying]),
            Type::Elaborated { named } => SmallVec::from_slice(&[*named]),
            Type::Decayed { decayed } => SmallVec::from_slice(&[*decayed]),
            Type::Builtin(_)
            | Type::Enum { .. }
            | Type::Record { .. }
            | Type::Typedef { .. }
            | Type::Unsupported { .. } => SmallVec::new(),
        }
    }

    /// Returns the declaration a named type refers to, if any.
    pub fn decl(&self) -> Option<NodeId> {
        match self {
            Type::Enum { decl } | Type::Record { decl } | Type::Typedef { decl } => Some(*decl),
            _ => None,
        }
    }
}
