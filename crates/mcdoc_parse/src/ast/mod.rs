//! Abstract syntax produced by the parser.
//!
//! Nothing here is resolved: paths are source-level, registries are raw
//! resource locations, and references are unchecked. Resolution happens in
//! `mcdoc_loader` and `mcdoc_types`.

pub mod attr;
pub mod index;
pub mod items;
pub mod path;
pub mod types;

pub use attr::{AttrLeaf, AttrTree, AttrValue, Attribute, Delimiter};
pub use index::{AccessorKey, Index, StaticKey};
pub use items::{
    DispatchStmt, EnumDef, File, GenericParams, Injection, InjectionKind, Item, StructDef,
    TypeAliasDef, UseStmt,
};
pub use path::Path;
pub use types::{
    EnumBaseKind, EnumVariant, EnumVariantValue, FieldKey, StructField, TypeExpr, TypeExprKind,
    ValueRange,
};
