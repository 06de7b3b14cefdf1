//! The instantiated type: the output of the engine, with every reference,
//! generic, index, and dispatcher lookup resolved away.
//!
//! Mirrors `mcdoc_parse::ast::TypeExprKind` minus `Reference`, `Indexed`, and
//! `Dispatcher` — those are all reduced during instantiation. Container
//! children (`List`/`Tuple`/`Struct` members) stay as a `TypeExpr` paired
//! with the environment it must be instantiated in until a caller forces
//! them; this is what makes a self-referential struct terminate without any
//! special-casing at the container level.

use std::sync::Arc;

use mcdoc_ir::{IntRange, NumericKind, PrimArrayKind, Span, Symbol, TypedNumber};
use mcdoc_parse::ast::{Attribute, EnumBaseKind, FieldKey, TypeExpr, ValueRange};

use crate::env::Env;

/// The display path of the file a `TypeExpr` came from, carried alongside
/// every lazy child so a diagnostic raised when it's eventually forced
/// still names the right file. Cheap to clone (refcounted), unlike `String`.
pub type LogicalPath = Arc<str>;

/// A `TypeExpr` plus the environment it must be instantiated in. Held by
/// every container child so instantiation only happens when a consumer
/// actually descends into it.
#[derive(Clone)]
pub struct LazyChild {
    pub(crate) expr: TypeExpr,
    pub(crate) env: Env,
    pub(crate) logical_path: LogicalPath,
}

impl LazyChild {
    pub(crate) fn new(expr: TypeExpr, env: Env, logical_path: LogicalPath) -> Self {
        LazyChild { expr, env, logical_path }
    }

    /// Instantiate this child now.
    #[must_use]
    pub fn force(&self, engine: &crate::Engine) -> InstantiatedType {
        crate::instantiate::instantiate(&self.expr, self.env.clone(), engine, &self.logical_path)
    }
}

/// A computed struct field key (`[TypeExpr]`), staying lazy like any other
/// container child.
#[derive(Clone)]
pub enum InstantiatedFieldKey {
    Ident(Symbol),
    Str(Symbol),
    Computed(Box<LazyChild>),
}

#[derive(Clone)]
pub struct InstantiatedField {
    pub key: InstantiatedFieldKey,
    pub optional: bool,
    pub ty: LazyChild,
    pub attrs: Vec<Attribute>,
}

impl InstantiatedField {
    /// `true` if `key` (an already-resolved struct field key elsewhere)
    /// textually matches this field's key. A computed key never matches a
    /// static lookup (spec §4.4.1).
    #[must_use]
    pub fn static_key_matches(&self, key: Symbol) -> bool {
        match self.key {
            InstantiatedFieldKey::Ident(s) | InstantiatedFieldKey::Str(s) => s == key,
            InstantiatedFieldKey::Computed(_) => false,
        }
    }
}

/// One already-instantiated, already-simplified union member, plus the
/// members simplification dropped in its favor (spec §4.5.2). `shadowed`
/// is engine-native metadata, not a source attribute: the attribute
/// vocabulary's leaf values (`AttrLeaf`) can't carry a nested
/// `InstantiatedType`, so this is exposed as a typed field instead (see
/// DESIGN.md).
#[derive(Clone)]
pub struct UnionMember {
    pub ty: InstantiatedType,
    pub shadowed: Vec<InstantiatedType>,
}

#[derive(Clone)]
pub enum InstantiatedKind {
    Any,
    /// Top and bottom simultaneously; see [`crate::assignability`].
    Unsafe,
    /// The bottom type: the empty union, and the result of a cycle closing
    /// with no other escape.
    Bottom,
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
        elem: Box<LazyChild>,
        len_range: Option<IntRange>,
    },
    Tuple {
        elems: Vec<LazyChild>,
    },
    Struct {
        fields: Vec<InstantiatedField>,
    },
    Enum {
        base_kind: EnumBaseKind,
        variants: Vec<mcdoc_parse::ast::EnumVariant>,
    },
    /// Already instantiated and passed through the simplifier; unlike the
    /// other container arms, union members are not lazy (spec §4.4).
    Union {
        members: Vec<UnionMember>,
    },
    /// A reference or dispatcher case re-entered while still being
    /// expanded. Forcing it restarts instantiation from a clean visit
    /// stack; well-formed recursive schemas never reach this because a
    /// `List`/`Tuple`/`Struct` boundary already broke the cycle (spec §4.4,
    /// §9 "cyclic type graphs").
    Cycle(Box<LazyChild>),
    /// Resolution failed (unknown path, bad index, arity mismatch). Carries
    /// no payload: the originating diagnostic was already reported once at
    /// the point of failure (spec §7).
    Error,
    /// The cancellation token was observed set before this node was
    /// descended into. Not a diagnostic: the caller asked to stop, nothing
    /// went wrong (spec §5).
    Cancelled,
}

/// A fully instantiated type: its shape, plus the attributes attached to it
/// (propagated from the source form and from any reference that was
/// dereferenced to produce it — spec §4.4.2).
#[derive(Clone)]
pub struct InstantiatedType {
    pub kind: InstantiatedKind,
    pub attrs: Vec<Attribute>,
}

impl InstantiatedType {
    pub(crate) fn new(kind: InstantiatedKind, attrs: Vec<Attribute>) -> Self {
        InstantiatedType { kind, attrs }
    }

    #[must_use]
    pub fn any() -> Self {
        InstantiatedType::new(InstantiatedKind::Any, Vec::new())
    }

    #[must_use]
    pub fn unsafe_top() -> Self {
        InstantiatedType::new(InstantiatedKind::Unsafe, Vec::new())
    }

    #[must_use]
    pub fn bottom() -> Self {
        InstantiatedType::new(InstantiatedKind::Bottom, Vec::new())
    }

    #[must_use]
    pub fn error() -> Self {
        InstantiatedType::new(InstantiatedKind::Error, Vec::new())
    }

    #[must_use]
    pub fn cancelled() -> Self {
        InstantiatedType::new(InstantiatedKind::Cancelled, Vec::new())
    }

    #[must_use]
    pub fn has_attr(&self, name: Symbol) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    pub(crate) fn with_attr(mut self, attr: Attribute) -> Self {
        self.attrs.push(attr);
        self
    }

    pub(crate) fn with_prepended_attrs(mut self, mut outer: Vec<Attribute>) -> Self {
        outer.append(&mut self.attrs);
        self.attrs = outer;
        self
    }
}

/// Marker attribute name the engine synthesizes for a dynamic-index fallback
/// union (spec §4.4.1). Has no value; presence is the signal.
pub const NONEXHAUSTIVE_ATTR: &str = "nonexhaustive";

/// Marker attribute name the engine synthesizes to record a dynamic
/// accessor chain verbatim (spec §4.4.1). The engine never evaluates it.
pub const ACCESSOR_ATTR: &str = "accessor";

pub(crate) fn dummy_span() -> Span {
    Span::DUMMY
}

pub(crate) fn field_key_symbol(key: &FieldKey) -> Option<Symbol> {
    match key {
        FieldKey::Ident(s) | FieldKey::Str(s) => Some(*s),
        FieldKey::Computed(_) => None,
    }
}
