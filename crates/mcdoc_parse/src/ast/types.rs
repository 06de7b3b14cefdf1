use mcdoc_ir::{FloatRange, IntRange, NumericKind, PrimArrayKind, ResourceLocation, Span, Symbol, TypedNumber};

use super::attr::Attribute;
use super::index::Index;
use super::path::Path;

/// A numeric value range: integral kinds use `IntRange`, floating kinds use
/// `FloatRange`.
#[derive(Clone, Debug)]
pub enum ValueRange {
    Int(IntRange),
    Float(FloatRange),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EnumBaseKind {
    String,
    Numeric(NumericKind),
}

#[derive(Clone, Debug)]
pub enum EnumVariantValue {
    Number(TypedNumber),
    Str(Symbol),
}

#[derive(Clone, Debug)]
pub struct EnumVariant {
    pub name: Symbol,
    pub value: EnumVariantValue,
    pub attrs: Vec<Attribute>,
    pub doc: Option<Symbol>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum FieldKey {
    Ident(Symbol),
    Str(Symbol),
    Computed(Box<TypeExpr>),
}

#[derive(Clone, Debug)]
pub enum StructField {
    Named {
        key: FieldKey,
        optional: bool,
        ty: TypeExpr,
        attrs: Vec<Attribute>,
        doc: Option<Symbol>,
        span: Span,
    },
    Spread {
        ty: TypeExpr,
        attrs: Vec<Attribute>,
        span: Span,
    },
}

/// The recursive core of the grammar: a type expression plus the attributes
/// attached to it.
#[derive(Clone, Debug)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub attrs: Vec<Attribute>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum TypeExprKind {
    Any,
    /// Top and bottom simultaneously; see assignability §4.5.1.
    Unsafe,
    Boolean,
    StringT {
        len_range: Option<IntRange>,
    },
    LiteralBool(bool),
    LiteralString(Symbol),
    LiteralNumber(TypedNumber),
    Numeric {
        kind: NumericKind,
        value_range: Option<ValueRange>,
    },
    PrimArray {
        elem_kind: PrimArrayKind,
        elem_range: Option<IntRange>,
        len_range: Option<IntRange>,
    },
    List {
        elem: Box<TypeExpr>,
        len_range: Option<IntRange>,
    },
    /// Non-empty; a single-element tuple requires the parser to have seen a
    /// trailing comma (that distinction lives only in the parser, not here —
    /// by the time this node exists, `[T]` has already become `List`).
    Tuple {
        elems: Vec<TypeExpr>,
    },
    Struct {
        fields: Vec<StructField>,
    },
    Enum {
        base_kind: EnumBaseKind,
        variants: Vec<EnumVariant>,
    },
    Reference {
        path: Path,
        type_args: Vec<TypeExpr>,
    },
    Dispatcher {
        registry: ResourceLocation,
        indices: Vec<Index>,
    },
    /// Empty ⇒ the bottom type.
    Union {
        members: Vec<TypeExpr>,
    },
    Indexed {
        base: Box<TypeExpr>,
        indices: Vec<Index>,
    },
}
