//! TranslationUnit: the arena container a front end hands to the exporter.
//!
//! [`TranslationUnit`] owns every syntax node, every type and the source file
//! table of one translation unit. Entities refer to each other through
//! [`NodeId`]/[`TypeId`] indices into these arenas; nothing is addressed by
//! pointer identity. The program root is implicit: its direct children are
//! the ordered [`top_level`](TranslationUnit::top_level) declarations.

use indexmap::IndexSet;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::id::{FileId, NodeId, QualType, TypeId};
use crate::node::{Node, NodeKind};
use crate::types::Type;

/// One translation unit: nodes, types, source files and top-level order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Nodes indexed by NodeId.0
    nodes: Vec<Node>,
    /// Types indexed by TypeId.0
    types: Vec<Type>,
    /// Source file paths indexed by FileId.0
    #[serde(deserialize_with = "unique_paths")]
    files: IndexSet<String>,
    /// Direct children of the program root, in source order
    top_level: Vec<NodeId>,
}

/// Reads the file table, refusing repeated paths. Collapsing a repeat would
/// shift every later `FileId`.
fn unique_paths<'de, D: Deserializer<'de>>(deserializer: D) -> Result<IndexSet<String>, D::Error> {
    let paths = Vec::<String>::deserialize(deserializer)?;
    let mut files = IndexSet::with_capacity(paths.len());
    for (index, path) in paths.into_iter().enumerate() {
        if let Some(first) = files.get_index_of(path.as_str()) {
            return Err(D::Error::custom(format!(
                "file path {:?} listed as FileId({}) and again as FileId({})",
                path, first, index
            )));
        }
        files.insert(path);
    }
    Ok(files)
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a translation unit from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the translation unit as JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    // -----------------------------------------------------------------------
    // Builder methods
    // -----------------------------------------------------------------------

    /// Registers a source file, returning the existing id if `path` is known.
    pub fn add_file(&mut self, path: impl Into<String>) -> FileId {
        let (index, _) = self.files.insert_full(path.into());
        FileId(index as u32)
    }

    pub fn add_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Appends a declaration to the program root.
    pub fn push_top_level(&mut self, decl: NodeId) {
        self.top_level.push(decl);
    }

    /// Replaces the kind of an existing node.
    ///
    /// Front ends need this to close cycles: a record declaration is added
    /// first so its type can be created, then its fields are filled in.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> Result<(), CoreError> {
        let node = self
            .nodes
            .get_mut(id.0 as usize)
            .ok_or(CoreError::NodeNotFound { id })?;
        node.kind = kind;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Result<&Node, CoreError> {
        self.nodes
            .get(id.0 as usize)
            .ok_or(CoreError::NodeNotFound { id })
    }

    pub fn ty(&self, id: TypeId) -> Result<&Type, CoreError> {
        self.types
            .get(id.0 as usize)
            .ok_or(CoreError::TypeNotFound { id })
    }

    pub fn file_path(&self, id: FileId) -> Result<&str, CoreError> {
        self.files
            .get_index(id.0 as usize)
            .map(String::as_str)
            .ok_or(CoreError::FileNotFound { id })
    }

    pub fn top_level(&self) -> &[NodeId] {
        &self.top_level
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Checks that every id stored in the unit resolves, and that named
    /// types point at declarations of the matching kind.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), CoreError> {
        for &decl in &self.top_level {
            self.node(decl)?;
        }

        for node in &self.nodes {
            if let Some(file) = node.loc.file {
                self.file_path(file)?;
            }
            if let Some(qt) = node.ty {
                self.ty(qt.ty)?;
            }
            for child in node.kind.child_slots().into_iter().flatten() {
                self.node(child)?;
            }
            if let NodeKind::SizeOfAlignOf {
                arg_type: Some(qt), ..
            } = &node.kind
            {
                self.ty(qt.ty)?;
            }
        }

        for (index, ty) in self.types.iter().enumerate() {
            for QualType { ty: part, .. } in ty.constituents() {
                self.ty(part)?;
            }
            if let Some(decl) = ty.decl() {
                let target = &self.node(decl)?.kind;
                let matches = matches!(
                    (ty, target),
                    (Type::Record { .. }, NodeKind::Record { .. })
                        | (Type::Enum { .. }, NodeKind::Enum { .. })
                        | (Type::Typedef { .. }, NodeKind::Typedef { .. })
                );
                if !matches {
                    return Err(CoreError::InvalidReference {
                        from: format!("TypeId({})", index),
                        reason: format!("declaration {} has the wrong kind", decl),
                    });
                }
            }
        }

        Ok(())
    }
}
