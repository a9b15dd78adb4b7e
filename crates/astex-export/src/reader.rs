//! Reading documents back.
//!
//! [`Document::from_bytes`] decodes the three top-level items of an export
//! (entries, top-level keys, file table) into typed entries, and the
//! `Document` methods check the properties an exported graph must have:
//! unique ids, no dangling references, and every entry reachable from a
//! top-level declaration.
//!
//! The decoder understands the CBOR subset the exporter writes plus
//! single-precision floats. Lengths read from the input are never trusted
//! for preallocation.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::Serialize;

use crate::error::DecodeError;
use crate::key::EntityKey;
use crate::tags::{NodeTag, TypeTag};

/// Nesting bound for generic values. Documents themselves nest three deep.
const MAX_NESTING: usize = 64;
const BREAK: u8 = 0xff;

/// A decoded CBOR data item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Uint(u64),
    Negative(i64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Value>),
    Bool(bool),
    Null,
    Undefined,
    Float(f64),
}

impl Value {
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn peek(&self) -> Result<u8, DecodeError> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::Truncated { offset: self.pos })
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(DecodeError::Truncated {
                offset: self.bytes.len(),
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn be_uint(&mut self, n: usize) -> Result<u64, DecodeError> {
        Ok(self
            .take(n)?
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    /// Reads the argument that follows an initial byte. `None` means the
    /// indefinite-length marker.
    fn argument(&mut self, start: usize, initial: u8) -> Result<Option<u64>, DecodeError> {
        match initial & 0x1f {
            info @ 0..=23 => Ok(Some(u64::from(info))),
            24 => self.be_uint(1).map(Some),
            25 => self.be_uint(2).map(Some),
            26 => self.be_uint(4).map(Some),
            27 => self.be_uint(8).map(Some),
            31 => Ok(None),
            _ => Err(DecodeError::Unsupported {
                offset: start,
                byte: initial,
            }),
        }
    }

    fn definite(&mut self, start: usize, initial: u8) -> Result<u64, DecodeError> {
        self.argument(start, initial)?.ok_or(DecodeError::Unsupported {
            offset: start,
            byte: initial,
        })
    }

    fn length(&mut self, start: usize, initial: u8) -> Result<usize, DecodeError> {
        let len = self.definite(start, initial)?;
        usize::try_from(len).map_err(|_| DecodeError::Truncated {
            offset: self.bytes.len(),
        })
    }

    fn value(&mut self, nesting: usize) -> Result<Value, DecodeError> {
        if nesting > MAX_NESTING {
            return Err(DecodeError::Malformed {
                reason: format!("nesting deeper than {} at offset {}", MAX_NESTING, self.pos),
            });
        }

        let start = self.pos;
        let initial = self.peek()?;
        self.pos += 1;

        match initial >> 5 {
            0 => Ok(Value::Uint(self.definite(start, initial)?)),
            1 => {
                let n = self.definite(start, initial)?;
                let n = i64::try_from(n).map_err(|_| DecodeError::Malformed {
                    reason: format!("negative integer out of range at offset {}", start),
                })?;
                Ok(Value::Negative(-1 - n))
            }
            2 => {
                let len = self.length(start, initial)?;
                Ok(Value::Bytes(self.take(len)?.to_vec()))
            }
            3 => {
                let len = self.length(start, initial)?;
                let raw = self.take(len)?;
                let text = std::str::from_utf8(raw)
                    .map_err(|_| DecodeError::InvalidUtf8 { offset: start })?;
                Ok(Value::Text(text.to_string()))
            }
            4 => {
                let mut items = Vec::new();
                match self.argument(start, initial)? {
                    Some(len) => {
                        for _ in 0..len {
                            items.push(self.value(nesting + 1)?);
                        }
                    }
                    None => {
                        while self.peek()? != BREAK {
                            items.push(self.value(nesting + 1)?);
                        }
                        self.pos += 1;
                    }
                }
                Ok(Value::Array(items))
            }
            7 => match initial {
                0xf4 => Ok(Value::Bool(false)),
                0xf5 => Ok(Value::Bool(true)),
                0xf6 => Ok(Value::Null),
                0xf7 => Ok(Value::Undefined),
                0xfa => {
                    let bits = self.be_uint(4)? as u32;
                    Ok(Value::Float(f64::from(f32::from_bits(bits))))
                }
                0xfb => Ok(Value::Float(f64::from_bits(self.be_uint(8)?))),
                _ => Err(DecodeError::Unsupported {
                    offset: start,
                    byte: initial,
                }),
            },
            _ => Err(DecodeError::Unsupported {
                offset: start,
                byte: initial,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A syntax-node entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeEntry {
    pub id: EntityKey,
    pub tag: NodeTag,
    pub children: Vec<Option<EntityKey>>,
    pub file: u64,
    pub line: u64,
    pub column: u64,
    #[serde(rename = "type")]
    pub ty: Option<EntityKey>,
    pub extra: Vec<Value>,
}

/// A type entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeEntry {
    pub id: EntityKey,
    pub tag: TypeTag,
    pub extra: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entity", rename_all = "lowercase")]
pub enum Entry {
    Node(NodeEntry),
    Type(TypeEntry),
}

impl Entry {
    pub fn id(&self) -> EntityKey {
        match self {
            Entry::Node(node) => node.id,
            Entry::Type(ty) => ty.id,
        }
    }

    pub fn extra(&self) -> &[Value] {
        match self {
            Entry::Node(node) => &node.extra,
            Entry::Type(ty) => &ty.extra,
        }
    }

    /// Every entity key this entry refers to: child slots, the node's type,
    /// and the keys carried in payloads.
    pub fn references(&self) -> Vec<EntityKey> {
        let keys_in = |value: Option<&Value>| -> Vec<EntityKey> {
            match value {
                Some(Value::Uint(raw)) => vec![EntityKey::from_raw(*raw)],
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_uint)
                    .map(EntityKey::from_raw)
                    .collect(),
                _ => Vec::new(),
            }
        };

        match self {
            Entry::Node(node) => {
                let mut refs: Vec<EntityKey> = node.children.iter().flatten().copied().collect();
                refs.extend(node.ty);
                if node.tag == NodeTag::UnaryExprOrTypeTraitExpr {
                    refs.extend(keys_in(node.extra.get(1)));
                }
                refs
            }
            Entry::Type(ty) if ty.tag.is_scalar() => Vec::new(),
            Entry::Type(ty) => keys_in(ty.extra.first()),
        }
    }

    fn decode(value: &Value) -> Result<Entry, DecodeError> {
        let items = value
            .as_array()
            .ok_or_else(|| malformed("entry is not an array"))?;
        let raw_id = uint_at(items, 0, "entry id")?;
        let raw_tag = uint_at(items, 1, "entry tag")?;
        let id = EntityKey::from_raw(raw_id);

        if id.is_type() {
            let tag = TypeTag::from_u64(raw_tag).ok_or(DecodeError::UnknownTag {
                space: "type",
                tag: raw_tag,
            })?;
            return Ok(Entry::Type(TypeEntry {
                id,
                tag,
                extra: items[2..].to_vec(),
            }));
        }

        let tag = NodeTag::from_u64(raw_tag).ok_or(DecodeError::UnknownTag {
            space: "node",
            tag: raw_tag,
        })?;
        if items.len() < 7 {
            return Err(malformed(format!("node entry {} has {} items", id, items.len())));
        }
        let children = items[2]
            .as_array()
            .ok_or_else(|| malformed(format!("node entry {} has no child array", id)))?
            .iter()
            .map(|child| opt_key(child, "child slot"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Entry::Node(NodeEntry {
            id,
            tag,
            children,
            file: uint_at(items, 3, "file index")?,
            line: uint_at(items, 4, "line")?,
            column: uint_at(items, 5, "column")?,
            ty: opt_key(&items[6], "type reference")?,
            extra: items[7..].to_vec(),
        }))
    }
}

fn malformed(reason: impl Into<String>) -> DecodeError {
    DecodeError::Malformed {
        reason: reason.into(),
    }
}

fn uint_at(items: &[Value], index: usize, what: &str) -> Result<u64, DecodeError> {
    items
        .get(index)
        .and_then(Value::as_uint)
        .ok_or_else(|| malformed(format!("{} is missing or not an unsigned integer", what)))
}

fn opt_key(value: &Value, what: &str) -> Result<Option<EntityKey>, DecodeError> {
    match value {
        Value::Null => Ok(None),
        Value::Uint(raw) => Ok(Some(EntityKey::from_raw(*raw))),
        other => Err(malformed(format!("{} is {:?}", what, other))),
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A decoded export document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub entries: Vec<Entry>,
    pub top_level: Vec<EntityKey>,
    pub files: Vec<String>,
    /// First entry index for each id.
    #[serde(skip)]
    index: HashMap<EntityKey, usize>,
}

impl Document {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::new(bytes);
        let entries = cursor.value(0)?;
        let top_level = cursor.value(0)?;
        let files = cursor.value(0)?;
        if cursor.remaining() > 0 {
            return Err(DecodeError::TrailingBytes {
                count: cursor.remaining(),
            });
        }

        let entries = entries
            .as_array()
            .ok_or_else(|| malformed("entry section is not an array"))?
            .iter()
            .map(Entry::decode)
            .collect::<Result<Vec<_>, _>>()?;

        let top_level = top_level
            .as_array()
            .ok_or_else(|| malformed("top-level section is not an array"))?
            .iter()
            .map(|v| {
                v.as_uint()
                    .map(EntityKey::from_raw)
                    .ok_or_else(|| malformed("top-level key is not an unsigned integer"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let files = files
            .as_array()
            .ok_or_else(|| malformed("file table is not an array"))?
            .iter()
            .map(|v| {
                v.as_text()
                    .map(str::to_string)
                    .ok_or_else(|| malformed("file path is not a text string"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.id()).or_insert(i);
        }

        Ok(Document {
            entries,
            top_level,
            files,
            index,
        })
    }

    pub fn entry(&self, key: EntityKey) -> Option<&Entry> {
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    pub fn node_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Node(_)))
            .count()
    }

    pub fn type_count(&self) -> usize {
        self.entries.len() - self.node_count()
    }

    /// Ids that label more than one entry, in order of first repetition.
    pub fn duplicate_ids(&self) -> Vec<EntityKey> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.entries
            .iter()
            .map(Entry::id)
            .filter(|id| !seen.insert(*id) && reported.insert(*id))
            .collect()
    }

    /// `(from, to)` pairs where `to` names no entry in the document. Top-level
    /// keys that name no entry are reported with `from == to`.
    pub fn dangling_references(&self) -> Vec<(EntityKey, EntityKey)> {
        let mut dangling: Vec<_> = self
            .top_level
            .iter()
            .filter(|key| !self.index.contains_key(key))
            .map(|key| (*key, *key))
            .collect();
        for entry in &self.entries {
            for target in entry.references() {
                if !self.index.contains_key(&target) {
                    dangling.push((entry.id(), target));
                }
            }
        }
        dangling
    }

    /// Entries no top-level declaration reaches through references, in
    /// document order.
    pub fn unreachable_from_top_level(&self) -> Vec<EntityKey> {
        let mut graph: DiGraph<EntityKey, ()> = DiGraph::new();
        let mut nodes: HashMap<EntityKey, NodeIndex> = HashMap::new();
        for entry in &self.entries {
            nodes
                .entry(entry.id())
                .or_insert_with(|| graph.add_node(entry.id()));
        }
        for entry in &self.entries {
            let from = nodes[&entry.id()];
            for target in entry.references() {
                if let Some(&to) = nodes.get(&target) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let mut reached = HashSet::new();
        let mut dfs = Dfs::empty(&graph);
        for root in &self.top_level {
            let Some(&start) = nodes.get(root) else {
                continue;
            };
            if reached.contains(&start) {
                continue;
            }
            dfs.move_to(start);
            while let Some(idx) = dfs.next(&graph) {
                reached.insert(idx);
            }
        }

        let mut reported = HashSet::new();
        self.entries
            .iter()
            .map(Entry::id)
            .filter(|id| !reached.contains(&nodes[id]) && reported.insert(*id))
            .collect()
    }

    /// Renders the document as JSON for inspection.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
