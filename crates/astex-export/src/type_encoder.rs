//! Type encoder: one entry per distinct (type, const) pair.
//!
//! A type is registered, written, and only then are its constituents
//! visited, so the transitive closure of every referenced type ends up in
//! the document exactly once. Named types route their declaration through
//! the node encoder; record declarations additionally go through the
//! in-progress guard, which is what stops `struct S { struct S *next; }`
//! after one level of expansion.
//!
//! Type entry layout:
//!
//! ```text
//! [id, tag, extra...]
//! ```

use astex_core::{NodeId, QualType, Type};

use crate::cbor::Sink;
use crate::error::ExportError;
use crate::exporter::{ensure_sufficient_stack, Exporter};
use crate::key::EntityKey;
use crate::tags::TypeTag;

fn type_key(qt: QualType) -> u64 {
    EntityKey::of_type(qt).as_u64()
}

impl<'tu, S: Sink> Exporter<'tu, S> {
    /// Encodes `qt` and every type and declaration it depends on, at most once.
    pub(crate) fn encode_type(&mut self, qt: QualType) -> Result<(), ExportError> {
        ensure_sufficient_stack(|| self.visit_type(qt))
    }

    fn visit_type(&mut self, qt: QualType) -> Result<(), ExportError> {
        let key = EntityKey::of_type(qt);
        if !self.registry.register(key) {
            return Ok(());
        }
        self.enter(key)?;

        let tu = self.tu;
        let ty = tu.ty(qt.ty)?;
        self.write_type_entry(key, ty)?;

        match ty {
            Type::Record { decl } => self.expand_record(*decl)?,
            Type::Enum { decl } | Type::Typedef { decl } => self.traverse(*decl)?,
            _ => {
                for part in ty.constituents() {
                    self.encode_type(part)?;
                }
            }
        }

        self.leave();
        Ok(())
    }

    /// Walks a record declaration so its fields (and their types) are
    /// exported, unless that declaration is already being expanded further
    /// up the stack.
    fn expand_record(&mut self, decl: NodeId) -> Result<(), ExportError> {
        if !self.records_in_progress.insert(decl) {
            tracing::trace!(decl = %decl, "record already being expanded, not re-entering");
            return Ok(());
        }
        let result = self.traverse(decl);
        self.records_in_progress.remove(&decl);
        result
    }

    fn write_type_entry(&mut self, key: EntityKey, ty: &Type) -> Result<(), ExportError> {
        let tag = TypeTag::of(ty);
        let out = &mut self.out;
        out.begin_array()?;
        out.uint(key.as_u64())?;
        out.uint(tag as u64)?;

        match ty {
            Type::Pointer { pointee: inner }
            | Type::TypeOf { underlying: inner }
            | Type::Elaborated { named: inner }
            | Type::Decayed { decayed: inner }
            | Type::IncompleteArray { element: inner } => out.uint(type_key(*inner))?,
            Type::ConstantArray { element, size } => {
                out.uint(type_key(*element))?;
                out.uint(*size)?;
            }
            Type::VariableArray { element } => {
                out.uint(type_key(*element))?;
                // size is a run-time value
                out.undefined()?;
            }
            Type::FunctionProto {
                ret,
                params,
                is_variadic,
            } => {
                out.array(params.len() + 1)?;
                out.uint(type_key(*ret))?;
                for param in params {
                    out.uint(type_key(*param))?;
                }
                out.bool(*is_variadic)?;
            }
            Type::FunctionNoProto { ret } => {
                out.array(1)?;
                out.uint(type_key(*ret))?;
            }
            Type::Enum { decl } | Type::Record { decl } | Type::Typedef { decl } => {
                out.uint(EntityKey::node(*decl).as_u64())?;
            }
            Type::Builtin(kind) => {
                if tag == TypeTag::TypeUnknown {
                    tracing::trace!(type_key = %key, ?kind, "builtin kind has no wire tag");
                }
            }
            Type::Unsupported { description } => {
                tracing::trace!(type_key = %key, %description, "exporting unsupported type as TypeUnknown");
            }
        }

        out.end()?;
        self.stats.types += 1;
        Ok(())
    }
}
