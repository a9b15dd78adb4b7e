//! Node encoder: depth-first walk of the syntax tree.
//!
//! Every node is registered before anything is written for it, then its entry
//! is written in full, then its type and its children are visited. Entries
//! therefore never interleave, and any later encounter of the same node
//! (a `DeclRef` to an already-walked declaration, a record re-expansion)
//! stops at the registry.
//!
//! Node entry layout:
//!
//! ```text
//! [id, tag, [child | null, ...], file, line, column, type | null, extra...]
//! ```

use astex_core::{ChildSlots, Node, NodeId, NodeKind, QualType};

use crate::cbor::Sink;
use crate::error::ExportError;
use crate::exporter::{ensure_sufficient_stack, Exporter};
use crate::key::EntityKey;
use crate::tags::{NodeTag, StringTag};

impl<'tu, S: Sink> Exporter<'tu, S> {
    /// Encodes `id` and everything reachable from it, at most once.
    pub(crate) fn traverse(&mut self, id: NodeId) -> Result<(), ExportError> {
        ensure_sufficient_stack(|| self.visit_node(id))
    }

    fn visit_node(&mut self, id: NodeId) -> Result<(), ExportError> {
        let key = EntityKey::node(id);
        if !self.registry.register(key) {
            return Ok(());
        }
        self.enter(key)?;

        let tu = self.tu;
        let node = tu.node(id)?;
        let slots = node.kind.child_slots();
        let ty = node.ty.filter(|_| node.kind.carries_type());

        self.write_node_entry(id, node, &slots, ty)?;

        if let Some(qt) = ty {
            self.encode_type(qt)?;
        }
        if let NodeKind::SizeOfAlignOf {
            arg_type: Some(qt), ..
        } = &node.kind
        {
            self.encode_type(*qt)?;
        }
        for child in slots.into_iter().flatten() {
            self.traverse(child)?;
        }

        self.leave();
        Ok(())
    }

    fn write_node_entry(
        &mut self,
        id: NodeId,
        node: &Node,
        slots: &ChildSlots,
        ty: Option<QualType>,
    ) -> Result<(), ExportError> {
        let tu = self.tu;
        let pos = self.locations.position_of(tu, node.loc)?;
        if pos.is_unknown() {
            tracing::trace!(node = %id, "no file attribution, writing unknown-file sentinel");
        }

        let out = &mut self.out;
        out.begin_array()?;
        out.uint(EntityKey::node(id).as_u64())?;
        out.uint(NodeTag::of(&node.kind) as u64)?;

        out.array(slots.len())?;
        for slot in slots {
            out.opt_uint(slot.map(|child| EntityKey::node(child).as_u64()))?;
        }

        out.uint(pos.file)?;
        out.uint(u64::from(pos.line))?;
        out.uint(u64::from(pos.column))?;
        out.opt_uint(ty.map(|qt| EntityKey::of_type(qt).as_u64()))?;

        self.write_node_extras(id, &node.kind)?;
        self.out.end()?;

        self.stats.nodes += 1;
        Ok(())
    }

    fn write_node_extras(&mut self, id: NodeId, kind: &NodeKind) -> Result<(), ExportError> {
        let out = &mut self.out;
        match kind {
            NodeKind::Function { name, .. }
            | NodeKind::Var { name, .. }
            | NodeKind::Param { name }
            | NodeKind::Field { name }
            | NodeKind::Enum { name, .. }
            | NodeKind::Typedef { name }
            | NodeKind::Label { name, .. } => out.text(name),
            NodeKind::Record { name, is_union, .. } => {
                out.text(name)?;
                out.bool(*is_union)
            }
            NodeKind::EnumConstant { name, value, .. } => {
                out.text(name)?;
                out.int(*value)
            }
            NodeKind::ImplicitCast { cast_kind, .. } | NodeKind::CStyleCast { cast_kind, .. } => {
                out.text(cast_kind)
            }
            NodeKind::Unary {
                opcode, is_prefix, ..
            } => {
                out.text(opcode)?;
                out.bool(*is_prefix)
            }
            NodeKind::Binary { opcode, .. } => out.text(opcode),
            NodeKind::Member { is_arrow, .. } => out.bool(*is_arrow),
            NodeKind::SizeOfAlignOf {
                trait_kind,
                arg_type,
                ..
            } => {
                out.text(trait_kind.as_str())?;
                out.opt_uint(arg_type.map(|qt| EntityKey::of_type(qt).as_u64()))
            }
            NodeKind::Integer { value } => {
                let limited = u64::try_from(*value).unwrap_or_else(|_| {
                    tracing::warn!(
                        node = %id,
                        value = %value,
                        "integer literal wider than 64 bits, saturating to u64::MAX"
                    );
                    u64::MAX
                });
                out.uint(limited)
            }
            NodeKind::Character { value } => out.uint(u64::from(*value)),
            NodeKind::String {
                kind,
                char_width,
                bytes,
            } => {
                out.uint(StringTag::of(*kind) as u64)?;
                out.uint(u64::from(*char_width))?;
                out.bytes(bytes)
            }
            NodeKind::Floating { value } => out.f64(*value),
            NodeKind::Unknown { description, .. } => {
                tracing::trace!(node = %id, %description, "exporting unmodelled construct as Unknown");
                out.text(description)
            }
            NodeKind::Compound { .. }
            | NodeKind::Return { .. }
            | NodeKind::Do { .. }
            | NodeKind::Goto { .. }
            | NodeKind::Null
            | NodeKind::If { .. }
            | NodeKind::For { .. }
            | NodeKind::While { .. }
            | NodeKind::DeclStmt { .. }
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Case { .. }
            | NodeKind::Switch { .. }
            | NodeKind::Default { .. }
            | NodeKind::Paren { .. }
            | NodeKind::InitList { .. }
            | NodeKind::ImplicitValueInit
            | NodeKind::Conditional { .. }
            | NodeKind::BinaryConditional { .. }
            | NodeKind::DeclRef { .. }
            | NodeKind::Call { .. }
            | NodeKind::ArraySubscript { .. }
            | NodeKind::CompoundLiteral { .. } => Ok(()),
        }
    }
}
