//! Wire tags for node and type entries.
//!
//! Discriminants are part of the document format: they are written as plain
//! unsigned integers and must never be renumbered. Adding or changing a tag
//! bumps [`TAG_VERSION`].

use astex_core::{BuiltinKind, NodeKind, StringKind, Type};
use serde::Serialize;

/// Version of the tag tables below.
pub const TAG_VERSION: u32 = 1;

/// Tag of a syntax-node entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum NodeTag {
    // Declarations
    FunctionDecl = 0,
    VarDecl = 1,
    ParmVarDecl = 2,
    RecordDecl = 3,
    FieldDecl = 4,
    EnumDecl = 5,
    EnumConstantDecl = 6,
    TypedefDecl = 7,

    // Statements
    CompoundStmt = 16,
    ReturnStmt = 17,
    DoStmt = 18,
    GotoStmt = 19,
    LabelStmt = 20,
    NullStmt = 21,
    IfStmt = 22,
    ForStmt = 23,
    WhileStmt = 24,
    DeclStmt = 25,
    BreakStmt = 26,
    ContinueStmt = 27,
    CaseStmt = 28,
    SwitchStmt = 29,
    DefaultStmt = 30,

    // Expressions
    ParenExpr = 32,
    MemberExpr = 33,
    InitListExpr = 34,
    ImplicitValueInitExpr = 35,
    ImplicitCastExpr = 36,
    CStyleCastExpr = 37,
    UnaryOperator = 38,
    BinaryOperator = 39,
    ConditionalOperator = 40,
    BinaryConditionalOperator = 41,
    DeclRefExpr = 42,
    CallExpr = 43,
    ArraySubscriptExpr = 44,
    UnaryExprOrTypeTraitExpr = 45,
    CompoundLiteralExpr = 46,

    // Literals
    IntegerLiteral = 48,
    CharacterLiteral = 49,
    StringLiteral = 50,
    FloatingLiteral = 51,

    Unknown = 63,
}

/// Tag of a type entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TypeTag {
    TypeUnknown = 0,
    Void = 1,
    Bool = 2,
    Char = 3,
    SChar = 4,
    UChar = 5,
    Short = 6,
    UShort = 7,
    Int = 8,
    UInt = 9,
    Long = 10,
    ULong = 11,
    LongLong = 12,
    ULongLong = 13,
    Float = 14,
    Double = 15,
    LongDouble = 16,

    Pointer = 32,
    ConstantArray = 33,
    VariableArray = 34,
    IncompleteArray = 35,
    FunctionProto = 36,
    FunctionNoProto = 37,
    Enum = 38,
    Record = 39,
    Typedef = 40,
    TypeOf = 41,
    Elaborated = 42,
    Decayed = 43,
}

/// Encoding variant of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum StringTag {
    Ascii = 0,
    Wide = 1,
    Utf8 = 2,
    Utf16 = 3,
    Utf32 = 4,
}

impl NodeTag {
    const ALL: [NodeTag; 43] = [
        NodeTag::FunctionDecl,
        NodeTag::VarDecl,
        NodeTag::ParmVarDecl,
        NodeTag::RecordDecl,
        NodeTag::FieldDecl,
        NodeTag::EnumDecl,
        NodeTag::EnumConstantDecl,
        NodeTag::TypedefDecl,
        NodeTag::CompoundStmt,
        NodeTag::ReturnStmt,
        NodeTag::DoStmt,
        NodeTag::GotoStmt,
        NodeTag::LabelStmt,
        NodeTag::NullStmt,
        NodeTag::IfStmt,
        NodeTag::ForStmt,
        NodeTag::WhileStmt,
        NodeTag::DeclStmt,
        NodeTag::BreakStmt,
        NodeTag::ContinueStmt,
        NodeTag::CaseStmt,
        NodeTag::SwitchStmt,
        NodeTag::DefaultStmt,
        NodeTag::ParenExpr,
        NodeTag::MemberExpr,
        NodeTag::InitListExpr,
        NodeTag::ImplicitValueInitExpr,
        NodeTag::ImplicitCastExpr,
        NodeTag::CStyleCastExpr,
        NodeTag::UnaryOperator,
        NodeTag::BinaryOperator,
        NodeTag::ConditionalOperator,
        NodeTag::BinaryConditionalOperator,
        NodeTag::DeclRefExpr,
        NodeTag::CallExpr,
        NodeTag::ArraySubscriptExpr,
        NodeTag::UnaryExprOrTypeTraitExpr,
        NodeTag::CompoundLiteralExpr,
        NodeTag::IntegerLiteral,
        NodeTag::CharacterLiteral,
        NodeTag::StringLiteral,
        NodeTag::FloatingLiteral,
        NodeTag::Unknown,
    ];

    pub fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Function { .. } => NodeTag::FunctionDecl,
            NodeKind::Var { .. } => NodeTag::VarDecl,
            NodeKind::Param { .. } => NodeTag::ParmVarDecl,
            NodeKind::Record { .. } => NodeTag::RecordDecl,
            NodeKind::Field { .. } => NodeTag::FieldDecl,
            NodeKind::Enum { .. } => NodeTag::EnumDecl,
            NodeKind::EnumConstant { .. } => NodeTag::EnumConstantDecl,
            NodeKind::Typedef { .. } => NodeTag::TypedefDecl,
            NodeKind::Compound { .. } => NodeTag::CompoundStmt,
            NodeKind::Return { .. } => NodeTag::ReturnStmt,
            NodeKind::Do { .. } => NodeTag::DoStmt,
            NodeKind::Goto { .. } => NodeTag::GotoStmt,
            NodeKind::Label { .. } => NodeTag::LabelStmt,
            NodeKind::Null => NodeTag::NullStmt,
            NodeKind::If { .. } => NodeTag::IfStmt,
            NodeKind::For { .. } => NodeTag::ForStmt,
            NodeKind::While { .. } => NodeTag::WhileStmt,
            NodeKind::DeclStmt { .. } => NodeTag::DeclStmt,
            NodeKind::Break => NodeTag::BreakStmt,
            NodeKind::Continue => NodeTag::ContinueStmt,
            NodeKind::Case { .. } => NodeTag::CaseStmt,
            NodeKind::Switch { .. } => NodeTag::SwitchStmt,
            NodeKind::Default { .. } => NodeTag::DefaultStmt,
            NodeKind::Paren { .. } => NodeTag::ParenExpr,
            NodeKind::Member { .. } => NodeTag::MemberExpr,
            NodeKind::InitList { .. } => NodeTag::InitListExpr,
            NodeKind::ImplicitValueInit => NodeTag::ImplicitValueInitExpr,
            NodeKind::ImplicitCast { .. } => NodeTag::ImplicitCastExpr,
            NodeKind::CStyleCast { .. } => NodeTag::CStyleCastExpr,
            NodeKind::Unary { .. } => NodeTag::UnaryOperator,
            NodeKind::Binary { .. } => NodeTag::BinaryOperator,
            NodeKind::Conditional { .. } => NodeTag::ConditionalOperator,
            NodeKind::BinaryConditional { .. } => NodeTag::BinaryConditionalOperator,
            NodeKind::DeclRef { .. } => NodeTag::DeclRefExpr,
            NodeKind::Call { .. } => NodeTag::CallExpr,
            NodeKind::ArraySubscript { .. } => NodeTag::ArraySubscriptExpr,
            NodeKind::SizeOfAlignOf { .. } => NodeTag::UnaryExprOrTypeTraitExpr,
            NodeKind::CompoundLiteral { .. } => NodeTag::CompoundLiteralExpr,
            NodeKind::Integer { .. } => NodeTag::IntegerLiteral,
            NodeKind::Character { .. } => NodeTag::CharacterLiteral,
            NodeKind::String { .. } => NodeTag::StringLiteral,
            NodeKind::Floating { .. } => NodeTag::FloatingLiteral,
            NodeKind::Unknown { .. } => NodeTag::Unknown,
        }
    }

    pub fn from_u64(raw: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| *tag as u64 == raw)
    }
}

impl TypeTag {
    const ALL: [TypeTag; 29] = [
        TypeTag::TypeUnknown,
        TypeTag::Void,
        TypeTag::Bool,
        TypeTag::Char,
        TypeTag::SChar,
        TypeTag::UChar,
        TypeTag::Short,
        TypeTag::UShort,
        TypeTag::Int,
        TypeTag::UInt,
        TypeTag::Long,
        TypeTag::ULong,
        TypeTag::LongLong,
        TypeTag::ULongLong,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::LongDouble,
        TypeTag::Pointer,
        TypeTag::ConstantArray,
        TypeTag::VariableArray,
        TypeTag::IncompleteArray,
        TypeTag::FunctionProto,
        TypeTag::FunctionNoProto,
        TypeTag::Enum,
        TypeTag::Record,
        TypeTag::Typedef,
        TypeTag::TypeOf,
        TypeTag::Elaborated,
        TypeTag::Decayed,
    ];

    /// Tag for `ty`. Kinds without a wire representation map to
    /// [`TypeTag::TypeUnknown`].
    pub fn of(ty: &Type) -> Self {
        match ty {
            Type::Builtin(kind) => Self::of_builtin(*kind),
            Type::Pointer { .. } => TypeTag::Pointer,
            Type::ConstantArray { .. } => TypeTag::ConstantArray,
            Type::VariableArray { .. } => TypeTag::VariableArray,
            Type::IncompleteArray { .. } => TypeTag::IncompleteArray,
            Type::FunctionProto { .. } => TypeTag::FunctionProto,
            Type::FunctionNoProto { .. } => TypeTag::FunctionNoProto,
            Type::Enum { .. } => TypeTag::Enum,
            Type::Record { .. } => TypeTag::Record,
            Type::Typedef { .. } => TypeTag::Typedef,
            Type::TypeOf { .. } => TypeTag::TypeOf,
            Type::Elaborated { .. } => TypeTag::Elaborated,
            Type::Decayed { .. } => TypeTag::Decayed,
            Type::Unsupported { .. } => TypeTag::TypeUnknown,
        }
    }

    fn of_builtin(kind: BuiltinKind) -> Self {
        match kind {
            BuiltinKind::Void => TypeTag::Void,
            BuiltinKind::Bool => TypeTag::Bool,
            BuiltinKind::Char => TypeTag::Char,
            BuiltinKind::SChar => TypeTag::SChar,
            BuiltinKind::UChar => TypeTag::UChar,
            BuiltinKind::Short => TypeTag::Short,
            BuiltinKind::UShort => TypeTag::UShort,
            BuiltinKind::Int => TypeTag::Int,
            BuiltinKind::UInt => TypeTag::UInt,
            BuiltinKind::Long => TypeTag::Long,
            BuiltinKind::ULong => TypeTag::ULong,
            BuiltinKind::LongLong => TypeTag::LongLong,
            BuiltinKind::ULongLong => TypeTag::ULongLong,
            BuiltinKind::Float => TypeTag::Float,
            BuiltinKind::Double => TypeTag::Double,
            BuiltinKind::LongDouble => TypeTag::LongDouble,
            BuiltinKind::Int128 | BuiltinKind::UInt128 | BuiltinKind::Half | BuiltinKind::WChar => {
                TypeTag::TypeUnknown
            }
        }
    }

    pub fn from_u64(raw: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| *tag as u64 == raw)
    }

    /// Returns `true` for scalar tags (including the unknown tag), which
    /// carry no payload.
    pub fn is_scalar(self) -> bool {
        (self as u8) < TypeTag::Pointer as u8
    }
}

impl StringTag {
    pub fn of(kind: StringKind) -> Self {
        match kind {
            StringKind::Ascii => StringTag::Ascii,
            StringKind::Wide => StringTag::Wide,
            StringKind::Utf8 => StringTag::Utf8,
            StringKind::Utf16 => StringTag::Utf16,
            StringKind::Utf32 => StringTag::Utf32,
        }
    }
}
