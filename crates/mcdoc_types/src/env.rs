//! The generic-binding and cycle-detection environment.
//!
//! A persistent, singly-linked chain of frames, generalizing the teacher's
//! single-threaded `Rc`-based scope chain to `Arc` so the host may hold an
//! `Engine` across threads (spec §5). Cloning an `Env` is a refcount bump;
//! pushing a frame never mutates an existing one, so a `LazyChild` captured
//! before a push is unaffected by anything pushed after it.

use std::sync::Arc;

use mcdoc_ir::{CanonicalPath, ResourceLocation, Symbol};
use mcdoc_parse::ast::TypeExpr;
use rustc_hash::FxHashMap;

use crate::instantiated::LogicalPath;

/// A generic parameter bound to the type expression supplied at the
/// reference site, plus the environment that expression must itself be
/// read in — substitution is lazy, not eager expansion (spec §4.4, §9).
#[derive(Clone)]
pub struct BoundArg {
    pub expr: TypeExpr,
    pub env: Env,
    pub logical_path: LogicalPath,
}

/// What a visit-stack entry guards against re-entering: a declaration at a
/// canonical path, or a dispatcher registry lookup.
#[derive(Clone)]
pub enum VisitTarget {
    Decl(CanonicalPath),
    Registry(ResourceLocation),
}

impl PartialEq for VisitTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (VisitTarget::Decl(a), VisitTarget::Decl(b)) => a == b,
            (VisitTarget::Registry(a), VisitTarget::Registry(b)) => a == b,
            _ => false,
        }
    }
}

/// `(canonical path or registry key, actual type arguments)` — the cycle
/// detection key from spec §4.4. `TypeExpr` carries `f64` (via numeric
/// literals and ranges) and so cannot derive `Eq`; arguments are compared
/// structurally, ignoring spans and attributes, via [`type_expr_eq`].
#[derive(Clone)]
pub struct VisitKey {
    pub target: VisitTarget,
    pub args: Vec<TypeExpr>,
}

impl VisitKey {
    #[must_use]
    pub fn new(target: VisitTarget, args: Vec<TypeExpr>) -> Self {
        VisitKey { target, args }
    }

    fn matches(&self, other: &VisitKey) -> bool {
        self.target == other.target
            && self.args.len() == other.args.len()
            && self
                .args
                .iter()
                .zip(&other.args)
                .all(|(a, b)| type_expr_eq(a, b))
    }
}

/// Structural equality on `TypeExpr`, ignoring spans and attributes. Used
/// only to compare visit-stack keys, which are small and shallow in
/// practice (a handful of type arguments at a handful of nesting levels).
#[must_use]
pub fn type_expr_eq(a: &TypeExpr, b: &TypeExpr) -> bool {
    use mcdoc_parse::ast::TypeExprKind as K;
    match (&a.kind, &b.kind) {
        (K::Any, K::Any) | (K::Unsafe, K::Unsafe) | (K::Boolean, K::Boolean) => true,
        (K::StringT { len_range: a }, K::StringT { len_range: b }) => int_range_eq(a, b),
        (K::LiteralBool(a), K::LiteralBool(b)) => a == b,
        (K::LiteralString(a), K::LiteralString(b)) => a == b,
        (K::LiteralNumber(a), K::LiteralNumber(b)) => a.kind == b.kind && number_value_eq(&a.value, &b.value),
        (
            K::Numeric { kind: ka, value_range: ra },
            K::Numeric { kind: kb, value_range: rb },
        ) => ka == kb && value_range_eq(ra, rb),
        (
            K::PrimArray { elem_kind: ka, elem_range: era, len_range: lra },
            K::PrimArray { elem_kind: kb, elem_range: erb, len_range: lrb },
        ) => ka == kb && int_range_eq(era, erb) && int_range_eq(lra, lrb),
        (
            K::List { elem: ea, len_range: la },
            K::List { elem: eb, len_range: lb },
        ) => type_expr_eq(ea, eb) && int_range_eq(la, lb),
        (K::Tuple { elems: a }, K::Tuple { elems: b }) | (K::Union { members: a }, K::Union { members: b }) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| type_expr_eq(x, y))
        }
        (K::Struct { fields: a }, K::Struct { fields: b }) => a.len() == b.len(),
        (
            K::Reference { path: pa, type_args: ta },
            K::Reference { path: pb, type_args: tb },
        ) => {
            pa.absolute == pb.absolute
                && pa.supers == pb.supers
                && pa.segments == pb.segments
                && ta.len() == tb.len()
                && ta.iter().zip(tb).all(|(x, y)| type_expr_eq(x, y))
        }
        (K::Dispatcher { registry: a, .. }, K::Dispatcher { registry: b, .. }) => a == b,
        (K::Indexed { base: a, .. }, K::Indexed { base: b, .. }) => type_expr_eq(a, b),
        (K::Enum { .. }, K::Enum { .. }) => true,
        _ => false,
    }
}

fn int_range_eq(a: &Option<mcdoc_ir::IntRange>, b: &Option<mcdoc_ir::IntRange>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.lower == b.lower
                && a.upper == b.upper
                && a.exclusive_lower == b.exclusive_lower
                && a.exclusive_upper == b.exclusive_upper
        }
        _ => false,
    }
}

fn value_range_eq(a: &Option<mcdoc_parse::ast::ValueRange>, b: &Option<mcdoc_parse::ast::ValueRange>) -> bool {
    use mcdoc_parse::ast::ValueRange as V;
    match (a, b) {
        (None, None) => true,
        (Some(V::Int(a)), Some(V::Int(b))) => int_range_eq(&Some(*a), &Some(*b)),
        (Some(V::Float(a)), Some(V::Float(b))) => {
            a.lower == b.lower
                && a.upper == b.upper
                && a.exclusive_lower == b.exclusive_lower
                && a.exclusive_upper == b.exclusive_upper
        }
        _ => false,
    }
}

fn number_value_eq(a: &mcdoc_ir::NumberValue, b: &mcdoc_ir::NumberValue) -> bool {
    use mcdoc_ir::NumberValue as N;
    match (a, b) {
        (N::Int(a), N::Int(b)) => a == b,
        (N::Float(a), N::Float(b)) => a.to_bits() == b.to_bits(),
        _ => false,
    }
}

enum Frame {
    Bindings(FxHashMap<Symbol, BoundArg>),
    Visit(VisitKey),
}

struct EnvInner {
    frame: Frame,
    parent: Option<Env>,
}

/// A persistent environment chain. The empty chain is the root: no generic
/// bindings in scope, nothing on the visit stack.
#[derive(Clone, Default)]
pub struct Env(Option<Arc<EnvInner>>);

impl Env {
    #[must_use]
    pub fn root() -> Self {
        Env(None)
    }

    #[must_use]
    pub fn push_bindings(&self, bindings: FxHashMap<Symbol, BoundArg>) -> Self {
        if bindings.is_empty() {
            return self.clone();
        }
        Env(Some(Arc::new(EnvInner {
            frame: Frame::Bindings(bindings),
            parent: Some(self.clone()),
        })))
    }

    #[must_use]
    pub fn push_visit(&self, key: VisitKey) -> Self {
        Env(Some(Arc::new(EnvInner {
            frame: Frame::Visit(key),
            parent: Some(self.clone()),
        })))
    }

    /// Look up a generic parameter by name, walking outward through every
    /// binding frame. Visit-stack frames are skipped.
    #[must_use]
    pub fn lookup(&self, name: Symbol) -> Option<BoundArg> {
        let mut current = self.0.as_ref();
        while let Some(inner) = current {
            if let Frame::Bindings(map) = &inner.frame {
                if let Some(arg) = map.get(&name) {
                    return Some(arg.clone());
                }
            }
            current = inner.parent.as_ref().and_then(|e| e.0.as_ref());
        }
        None
    }

    /// `true` if `key` is already on the visit stack: re-entering the same
    /// declaration (or registry) with the same actual type arguments.
    #[must_use]
    pub fn is_visiting(&self, key: &VisitKey) -> bool {
        let mut current = self.0.as_ref();
        while let Some(inner) = current {
            if let Frame::Visit(existing) = &inner.frame {
                if existing.matches(key) {
                    return true;
                }
            }
            current = inner.parent.as_ref().and_then(|e| e.0.as_ref());
        }
        false
    }
}
