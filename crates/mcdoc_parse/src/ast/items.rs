use mcdoc_ir::{Span, Symbol};

use super::attr::Attribute;
use super::index::Index;
use super::path::Path;
use super::types::TypeExpr;

#[derive(Clone, Debug, Default)]
pub struct GenericParams {
    pub params: Vec<Symbol>,
}

#[derive(Clone, Debug)]
pub struct StructDef {
    pub name: Symbol,
    pub generics: GenericParams,
    pub body: TypeExpr,
    pub attrs: Vec<Attribute>,
    pub doc: Option<Symbol>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct EnumDef {
    pub name: Symbol,
    pub body: TypeExpr,
    pub attrs: Vec<Attribute>,
    pub doc: Option<Symbol>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct TypeAliasDef {
    pub name: Symbol,
    pub generics: GenericParams,
    pub body: TypeExpr,
    pub attrs: Vec<Attribute>,
    pub doc: Option<Symbol>,
    pub span: Span,
}

/// `use path::to::item` or `use path::to::item as alias`.
#[derive(Clone, Debug)]
pub struct UseStmt {
    pub path: Path,
    pub alias: Option<Symbol>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum InjectionKind {
    Struct { fields: Vec<super::types::StructField> },
    Enum { variants: Vec<super::types::EnumVariant> },
}

/// `inject struct some:registry[...] { ... }` or the enum equivalent.
#[derive(Clone, Debug)]
pub struct Injection {
    pub target: Path,
    pub indices: Vec<Index>,
    pub kind: InjectionKind,
    pub attrs: Vec<Attribute>,
    pub span: Span,
}

/// `dispatch some:registry[key, key, …] <T, …>? to TypeExpr`.
///
/// One statement may register several static keys against the same target.
#[derive(Clone, Debug)]
pub struct DispatchStmt {
    pub registry: mcdoc_ir::ResourceLocation,
    pub keys: Vec<super::index::StaticKey>,
    pub generics: GenericParams,
    pub target: TypeExpr,
    pub attrs: Vec<Attribute>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum Item {
    Struct(StructDef),
    Enum(EnumDef),
    TypeAlias(TypeAliasDef),
    Use(UseStmt),
    Injection(Injection),
    Dispatch(DispatchStmt),
}

/// The parsed contents of a single `.mcdoc` file.
#[derive(Clone, Debug, Default)]
pub struct File {
    pub items: Vec<Item>,
}
