//! Syntax nodes of a translation unit.
//!
//! A [`Node`] pairs a [`NodeKind`] with its source location and, for
//! expressions and typed declarations, the node's type. Child operands are
//! [`NodeId`]s into the same arena; optional operands are `Option<NodeId>`
//! so that "no operand" stays distinguishable from any present node.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::id::{FileId, NodeId, QualType};

/// Child slots of a node: `None` marks an absent optional operand.
pub type ChildSlots = SmallVec<[Option<NodeId>; 4]>;

/// Presumed source position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLoc {
    /// `None` for implicit or compiler-synthesized nodes.
    pub file: Option<FileId>,
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    pub fn new(file: FileId, line: u32, column: u32) -> Self {
        SourceLoc {
            file: Some(file),
            line,
            column,
        }
    }

    /// A location the front end cannot attribute to any file.
    pub fn implicit() -> Self {
        SourceLoc {
            file: None,
            line: 0,
            column: 0,
        }
    }
}

impl Default for SourceLoc {
    fn default() -> Self {
        Self::implicit()
    }
}

/// One syntax element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub loc: SourceLoc,
    /// Type of an expression or typed declaration. Ignored for statements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<QualType>,
}

impl Node {
    pub fn new(kind: NodeKind, loc: SourceLoc) -> Self {
        Node { kind, loc, ty: None }
    }

    pub fn typed(kind: NodeKind, loc: SourceLoc, ty: impl Into<QualType>) -> Self {
        Node {
            kind,
            loc,
            ty: Some(ty.into()),
        }
    }
}

/// Encoding of a string literal's code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringKind {
    /// Narrow `"..."`.
    Ascii,
    /// `L"..."`.
    Wide,
    /// `u8"..."`.
    Utf8,
    /// `u"..."`.
    Utf16,
    /// `U"..."`.
    Utf32,
}

/// `sizeof` vs `alignof`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitKind {
    SizeOf,
    AlignOf,
}

impl TraitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TraitKind::SizeOf => "sizeof",
            TraitKind::AlignOf => "alignof",
        }
    }
}

/// Coarse classification of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    Decl,
    Stmt,
    Expr,
    Literal,
    Unknown,
}

/// The closed set of syntax constructs the front end hands over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    // -- Declarations -------------------------------------------------------
    Function {
        name: String,
        params: Vec<NodeId>,
        body: Option<NodeId>,
    },
    Var {
        name: String,
        init: Option<NodeId>,
    },
    Param {
        name: String,
    },
    Record {
        name: String,
        #[serde(default)]
        is_union: bool,
        fields: Vec<NodeId>,
    },
    Field {
        name: String,
    },
    Enum {
        name: String,
        constants: Vec<NodeId>,
    },
    EnumConstant {
        name: String,
        value: i64,
        init: Option<NodeId>,
    },
    Typedef {
        name: String,
    },

    // -- Statements ---------------------------------------------------------
    Compound {
        stmts: Vec<NodeId>,
    },
    Return {
        value: Option<NodeId>,
    },
    Do {
        body: NodeId,
        cond: NodeId,
    },
    Goto {
        label: NodeId,
    },
    Label {
        name: String,
        sub: NodeId,
    },
    Null,
    If {
        cond: NodeId,
        then: NodeId,
        #[serde(rename = "else")]
        else_: Option<NodeId>,
    },
    For {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        inc: Option<NodeId>,
        body: NodeId,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    DeclStmt {
        decls: Vec<NodeId>,
    },
    Break,
    Continue,
    Case {
        lhs: NodeId,
        sub: NodeId,
    },
    Switch {
        cond: NodeId,
        body: NodeId,
    },
    Default {
        sub: NodeId,
    },

    // -- Expressions --------------------------------------------------------
    Paren {
        sub: NodeId,
    },
    Member {
        base: NodeId,
        member: NodeId,
        #[serde(default)]
        is_arrow: bool,
    },
    InitList {
        inits: Vec<NodeId>,
    },
    ImplicitValueInit,
    ImplicitCast {
        sub: NodeId,
        cast_kind: String,
    },
    CStyleCast {
        sub: NodeId,
        cast_kind: String,
    },
    Unary {
        sub: NodeId,
        opcode: String,
        is_prefix: bool,
    },
    Binary {
        lhs: NodeId,
        rhs: NodeId,
        opcode: String,
    },
    Conditional {
        cond: NodeId,
        then: NodeId,
        #[serde(rename = "else")]
        else_: NodeId,
    },
    /// GNU `a ?: b`.
    BinaryConditional {
        common: NodeId,
        #[serde(rename = "else")]
        else_: NodeId,
    },
    DeclRef {
        decl: NodeId,
    },
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    ArraySubscript {
        base: NodeId,
        index: NodeId,
    },
    SizeOfAlignOf {
        trait_kind: TraitKind,
        arg_expr: Option<NodeId>,
        arg_type: Option<QualType>,
    },
    CompoundLiteral {
        init: NodeId,
    },

    // -- Literals -----------------------------------------------------------
    Integer {
        value: u128,
    },
    Character {
        value: u32,
    },
    String {
        kind: StringKind,
        /// Bytes per code unit (1, 2 or 4).
        char_width: u8,
        /// Raw code units in target byte order. Not necessarily valid text.
        bytes: Vec<u8>,
    },
    Floating {
        value: f64,
    },

    /// A construct the front end could not model. Its children are still
    /// part of the tree.
    Unknown {
        description: String,
        #[serde(default)]
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    pub fn category(&self) -> NodeCategory {
        use NodeKind::*;
        match self {
            Function { .. } | Var { .. } | Param { .. } | Record { .. } | Field { .. }
            | Enum { .. } | EnumConstant { .. } | Typedef { .. } => NodeCategory::Decl,
            Compound { .. } | Return { .. } | Do { .. } | Goto { .. } | Label { .. } | Null
            | If { .. } | For { .. } | While { .. } | DeclStmt { .. } | Break | Continue
            | Case { .. } | Switch { .. } | Default { .. } => NodeCategory::Stmt,
            Paren { .. } | Member { .. } | InitList { .. } | ImplicitValueInit
            | ImplicitCast { .. } | CStyleCast { .. } | Unary { .. } | Binary { .. }
            | Conditional { .. } | BinaryConditional { .. } | DeclRef { .. } | Call { .. }
            | ArraySubscript { .. } | SizeOfAlignOf { .. } | CompoundLiteral { .. } => {
                NodeCategory::Expr
            }
            Integer { .. } | Character { .. } | String { .. } | Floating { .. } => {
                NodeCategory::Literal
            }
            Unknown { .. } => NodeCategory::Unknown,
        }
    }

    /// Returns `true` if nodes of this kind may reference a type.
    /// Statements never do.
    pub fn carries_type(&self) -> bool {
        self.category() != NodeCategory::Stmt
    }

    /// Returns the ordered child slots of this node.
    ///
    /// Fixed-arity kinds always return the same number of slots, with `None`
    /// where an optional operand is missing. References to declarations
    /// elsewhere in the tree (`DeclRef`, `Member`, `Goto`) are slots too.
    pub fn child_slots(&self) -> ChildSlots {
        use NodeKind::*;
        let mut slots = ChildSlots::new();
        match self {
            Function { params, body, .. } => {
                slots.extend(params.iter().map(|p| Some(*p)));
                slots.push(*body);
            }
            Var { init, .. } | EnumConstant { init, .. } => slots.push(*init),
            Record { fields, .. } => slots.extend(fields.iter().map(|f| Some(*f))),
            Enum { constants, .. } => slots.extend(constants.iter().map(|c| Some(*c))),
            Compound { stmts } => slots.extend(stmts.iter().map(|s| Some(*s))),
            Return { value } => slots.push(*value),
            Do { body, cond } => slots.extend([Some(*body), Some(*cond)]),
            Goto { label } => slots.push(Some(*label)),
            Label { sub, .. } | Default { sub } => slots.push(Some(*sub)),
            If { cond, then, else_ } => slots.extend([Some(*cond), Some(*then), *else_]),
            For {
                init,
                cond,
                inc,
                body,
            } => slots.extend([*init, *cond, *inc, Some(*body)]),
            While { cond, body } | Switch { cond, body } => {
                slots.extend([Some(*cond), Some(*body)])
            }
            DeclStmt { decls } => slots.extend(decls.iter().map(|d| Some(*d))),
            Case { lhs, sub } => slots.extend([Some(*lhs), Some(*sub)]),
            Paren { sub }
            | ImplicitCast { sub, .. }
            | CStyleCast { sub, .. }
            | Unary { sub, .. } => slots.push(Some(*sub)),
            Member { base, member, .. } => slots.extend([Some(*base), Some(*member)]),
            InitList { inits } => slots.extend(inits.iter().map(|i| Some(*i))),
            Binary { lhs, rhs, .. } => slots.extend([Some(*lhs), Some(*rhs)]),
            Conditional { cond, then, else_ } => {
                slots.extend([Some(*cond), Some(*then), Some(*else_)])
            }
            BinaryConditional { common, else_ } => slots.extend([Some(*common), Some(*else_)]),
            DeclRef { decl } => slots.push(Some(*decl)),
            Call { callee, args } => {
                slots.push(Some(*callee));
                slots.extend(args.iter().map(|a| Some(*a)));
            }
            ArraySubscript { base, index } => slots.extend([Some(*base), Some(*index)]),
            SizeOfAlignOf { arg_expr, .. } => slots.push(*arg_expr),
            CompoundLiteral { init } => slots.push(Some(*init)),
            Unknown { children, .. } => slots.extend(children.iter().map(|c| Some(*c))),
            Param { .. } | Field { .. } | Typedef { .. } | Null | Break | Continue
            | ImplicitValueInit | Integer { .. } | Character { .. } | String { .. }
            | Floating { .. } => {}
        }
        slots
    }
}
