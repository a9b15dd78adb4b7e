pub mod error;
pub mod id;
pub mod node;
pub mod types;
pub mod unit;

// Re-export commonly used types
pub use error::CoreError;
pub use id::{FileId, NodeId, QualType, TypeId};
pub use node::{ChildSlots, Node, NodeCategory, NodeKind, SourceLoc, StringKind, TraitKind};
pub use types::{BuiltinKind, Type};
pub use unit::TranslationUnit;
