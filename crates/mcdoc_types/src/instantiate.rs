//! The core instantiation algorithm (spec §4.4).
//!
//! Self-contained forms (`any`, `boolean`, a numeric kind, …) are returned
//! as-is. Container forms (`List`/`Tuple`/`Struct`) are not recursively
//! pre-expanded: their children are captured as [`LazyChild`] values paired
//! with the current environment, and only instantiated when a consumer
//! forces them. References substitute generics capture-free and
//! re-instantiate the substituted body. Dispatchers and `Indexed` forms
//! resolve through [`crate::index`]. Unions instantiate every member
//! eagerly (they are not lazy, unlike container children) and pass the
//! result through [`crate::simplify`].

use std::sync::Arc;

use mcdoc_ir::CanonicalPath;
use mcdoc_loader::{DeclKind, DispatchCase};
use mcdoc_parse::ast::{FieldKey, GenericParams, Path, StructField, TypeExpr, TypeExprKind};
use rustc_hash::FxHashMap;

use crate::cancellation::CancellationToken;
use crate::env::{BoundArg, Env, VisitKey, VisitTarget};
use crate::instantiated::{
    InstantiatedField, InstantiatedFieldKey, InstantiatedKind, InstantiatedType, LazyChild, LogicalPath,
    UnionMember,
};
use crate::Engine;

pub(crate) fn instantiate(expr: &TypeExpr, env: Env, engine: &Engine, logical_path: &str) -> InstantiatedType {
    instantiate_impl(expr, env, engine, logical_path, None)
}

pub(crate) fn instantiate_checked(
    expr: &TypeExpr,
    env: Env,
    engine: &Engine,
    logical_path: &str,
    token: &CancellationToken,
) -> InstantiatedType {
    instantiate_impl(expr, env, engine, logical_path, Some(token))
}

fn instantiate_impl(
    expr: &TypeExpr,
    env: Env,
    engine: &Engine,
    logical_path: &str,
    token: Option<&CancellationToken>,
) -> InstantiatedType {
    if let Some(t) = token {
        if t.is_cancelled() {
            return InstantiatedType::cancelled();
        }
    }

    let lp: LogicalPath = Arc::from(logical_path);
    let (kind, baked_attrs) = match &expr.kind {
        TypeExprKind::Any => (InstantiatedKind::Any, Vec::new()),
        TypeExprKind::Unsafe => (InstantiatedKind::Unsafe, Vec::new()),
        TypeExprKind::Boolean => (InstantiatedKind::Boolean, Vec::new()),
        TypeExprKind::StringT { len_range } => (InstantiatedKind::StringT { len_range: *len_range }, Vec::new()),
        TypeExprKind::LiteralBool(b) => (InstantiatedKind::LiteralBool(*b), Vec::new()),
        TypeExprKind::LiteralString(s) => (InstantiatedKind::LiteralString(*s), Vec::new()),
        TypeExprKind::LiteralNumber(n) => (InstantiatedKind::LiteralNumber(*n), Vec::new()),
        TypeExprKind::Numeric { kind, value_range } => (
            InstantiatedKind::Numeric { kind: *kind, value_range: value_range.clone() },
            Vec::new(),
        ),
        TypeExprKind::PrimArray { elem_kind, elem_range, len_range } => (
            InstantiatedKind::PrimArray { elem_kind: *elem_kind, elem_range: *elem_range, len_range: *len_range },
            Vec::new(),
        ),
        TypeExprKind::List { elem, len_range } => (
            InstantiatedKind::List {
                elem: Box::new(LazyChild::new((**elem).clone(), env.clone(), lp.clone())),
                len_range: *len_range,
            },
            Vec::new(),
        ),
        TypeExprKind::Tuple { elems } => (
            InstantiatedKind::Tuple {
                elems: elems.iter().map(|e| LazyChild::new(e.clone(), env.clone(), lp.clone())).collect(),
            },
            Vec::new(),
        ),
        TypeExprKind::Struct { fields } => instantiate_struct(fields, &env, engine, &lp, token),
        TypeExprKind::Enum { base_kind, variants } => (
            InstantiatedKind::Enum { base_kind: *base_kind, variants: variants.clone() },
            Vec::new(),
        ),
        TypeExprKind::Reference { path, type_args } => {
            return instantiate_reference(expr, path, type_args, env, engine, &lp, token);
        }
        TypeExprKind::Dispatcher { registry, indices } => {
            let result = if let Some((first, rest)) = indices.split_first() {
                let mut current = crate::index::resolve_first_dispatcher_index(*registry, first, &env, engine);
                for idx in rest {
                    current = crate::index::resolve_index_on_type(current, idx, engine);
                }
                current
            } else {
                InstantiatedType::any()
            };
            return result.with_prepended_attrs(expr.attrs.clone());
        }
        TypeExprKind::Union { members } => {
            let instantiated: Vec<UnionMember> = members
                .iter()
                .map(|m| UnionMember {
                    ty: instantiate_impl(m, env.clone(), engine, logical_path, token),
                    shadowed: Vec::new(),
                })
                .collect();
            let simplified = crate::simplify::simplify_union(instantiated, engine);
            return crate::simplify::fold_union(simplified).with_prepended_attrs(expr.attrs.clone());
        }
        TypeExprKind::Indexed { base, indices } => {
            let base_val = instantiate_impl(base, env.clone(), engine, logical_path, token);
            let result = indices
                .iter()
                .fold(base_val, |acc, idx| crate::index::resolve_index_on_type(acc, idx, engine));
            return result.with_prepended_attrs(expr.attrs.clone());
        }
    };

    InstantiatedType::new(kind, baked_attrs).with_prepended_attrs(expr.attrs.clone())
}

fn instantiate_struct(
    fields: &[StructField],
    env: &Env,
    engine: &Engine,
    lp: &LogicalPath,
    token: Option<&CancellationToken>,
) -> (InstantiatedKind, Vec<mcdoc_parse::ast::Attribute>) {
    let mut out_fields = Vec::new();
    let mut extra_attrs = Vec::new();

    for field in fields {
        match field {
            StructField::Named { key, optional, ty, attrs, .. } => {
                out_fields.push(InstantiatedField {
                    key: instantiate_field_key(key, env, engine, lp, token),
                    optional: *optional,
                    ty: LazyChild::new(ty.clone(), env.clone(), lp.clone()),
                    attrs: attrs.clone(),
                });
            }
            StructField::Spread { ty, attrs, .. } => {
                extra_attrs.extend(attrs.clone());
                let spread_val = instantiate_impl(ty, env.clone(), engine, lp, token);
                extra_attrs.extend(spread_val.attrs);
                if let InstantiatedKind::Struct { fields: inner } = spread_val.kind {
                    out_fields.extend(inner);
                }
            }
        }
    }

    (InstantiatedKind::Struct { fields: out_fields }, extra_attrs)
}

fn instantiate_field_key(
    key: &FieldKey,
    env: &Env,
    _engine: &Engine,
    lp: &LogicalPath,
    _token: Option<&CancellationToken>,
) -> InstantiatedFieldKey {
    match key {
        FieldKey::Ident(s) => InstantiatedFieldKey::Ident(*s),
        FieldKey::Str(s) => InstantiatedFieldKey::Str(*s),
        FieldKey::Computed(expr) => {
            InstantiatedFieldKey::Computed(Box::new(LazyChild::new((**expr).clone(), env.clone(), lp.clone())))
        }
    }
}

fn is_generic_param_path(path: &Path) -> bool {
    !path.absolute && path.supers == 0 && path.segments.len() == 1
}

fn instantiate_reference(
    expr: &TypeExpr,
    path: &Path,
    type_args: &[TypeExpr],
    env: Env,
    engine: &Engine,
    lp: &LogicalPath,
    token: Option<&CancellationToken>,
) -> InstantiatedType {
    // By loader-time construction, the only relative `Path` that can survive
    // into a stored declaration is a bare reference to one of its own
    // generic parameters (see `mcdoc_loader::resolve`).
    if is_generic_param_path(path) {
        let result = match env.lookup(path.segments[0]) {
            Some(bound) => instantiate_impl(&bound.expr, bound.env, engine, &bound.logical_path, token),
            None => {
                engine.diagnose_unknown_path(lp, expr.span);
                InstantiatedType::error()
            }
        };
        return result.with_prepended_attrs(expr.attrs.clone());
    }

    let canonical = CanonicalPath::from_segments(path.segments.clone());
    let Some(decl) = engine.resolve_decl(&canonical) else {
        engine.diagnose_unknown_path(lp, expr.span);
        return InstantiatedType::error().with_prepended_attrs(expr.attrs.clone());
    };

    let generics = decl_generics(&decl.kind);
    if generics.params.len() != type_args.len() {
        engine.diagnose_type_arg_count_mismatch(lp, expr.span);
        return InstantiatedType::error().with_prepended_attrs(expr.attrs.clone());
    }

    let visit_key = VisitKey::new(VisitTarget::Decl(canonical.clone()), type_args.to_vec());
    if env.is_visiting(&visit_key) {
        let handle = LazyChild::new(expr.clone(), env.clone(), lp.clone());
        return InstantiatedType::new(InstantiatedKind::Cycle(Box::new(handle)), Vec::new())
            .with_prepended_attrs(expr.attrs.clone());
    }

    let module = canonical.popped().unwrap_or_else(CanonicalPath::root);
    let mut bindings = FxHashMap::default();
    for (param, arg) in generics.params.iter().zip(type_args) {
        let shadow_path = module.joined(*param);
        if engine.resolve_decl(&shadow_path).is_some() {
            engine.diagnose_generic_shadows_declaration(lp, expr.span);
            bindings.insert(
                *param,
                BoundArg {
                    expr: TypeExpr {
                        kind: TypeExprKind::Reference {
                            path: Path { absolute: true, supers: 0, segments: shadow_path.segments().to_vec() },
                            type_args: Vec::new(),
                        },
                        attrs: Vec::new(),
                        span: expr.span,
                    },
                    env: Env::root(),
                    logical_path: lp.clone(),
                },
            );
        } else {
            bindings.insert(*param, BoundArg { expr: arg.clone(), env: env.clone(), logical_path: lp.clone() });
        }
    }

    let decl_logical_path: LogicalPath = Arc::from(decl.logical_path.as_str());
    let declared_env = Env::root().push_bindings(bindings).push_visit(visit_key);
    let body = decl_body(&decl.kind);
    let result = instantiate_impl(body, declared_env, engine, &decl_logical_path, token);
    result.with_prepended_attrs(expr.attrs.clone())
}

/// Instantiate one dispatcher case's target. The case's own `generics` have
/// no use-site syntax to supply actual arguments (an index chain carries no
/// type argument list), so they are bound to `unsafe`.
///
/// `outer_env` is threaded through only so its visit stack chains: a
/// registry that recurses through itself (`dispatch r[a] to r[b]`,
/// `dispatch r[b] to r[a]`) is caught even though the keys differ, because
/// every case under one `registry` shares the same visit key.
pub(crate) fn instantiate_dispatch_case(
    registry: mcdoc_ir::ResourceLocation,
    case: &DispatchCase,
    outer_env: &Env,
    engine: &Engine,
) -> InstantiatedType {
    let visit_key = VisitKey::new(VisitTarget::Registry(registry), Vec::new());
    if outer_env.is_visiting(&visit_key) {
        let handle = LazyChild::new(case.target.clone(), outer_env.clone(), Arc::from(case.logical_path.as_str()));
        return InstantiatedType::new(InstantiatedKind::Cycle(Box::new(handle)), Vec::new());
    }

    let mut bindings = FxHashMap::default();
    for param in &case.generics.params {
        bindings.insert(
            *param,
            BoundArg {
                expr: TypeExpr { kind: TypeExprKind::Unsafe, attrs: Vec::new(), span: case.span },
                env: Env::root(),
                logical_path: Arc::from(case.logical_path.as_str()),
            },
        );
    }
    let env = outer_env.push_bindings(bindings).push_visit(visit_key);
    instantiate(&case.target, env, engine, &case.logical_path)
}

fn decl_generics(kind: &DeclKind) -> GenericParams {
    match kind {
        DeclKind::Struct(def) => def.generics.clone(),
        DeclKind::TypeAlias(def) => def.generics.clone(),
        DeclKind::Enum(_) => GenericParams::default(),
    }
}

fn decl_body(kind: &DeclKind) -> &TypeExpr {
    match kind {
        DeclKind::Struct(def) => &def.body,
        DeclKind::Enum(def) => &def.body,
        DeclKind::TypeAlias(def) => &def.body,
    }
}

#[cfg(test)]
mod tests {
    use mcdoc_loader::FileInput;

    use super::*;
    use crate::Engine;

    fn engine_for(source: &str) -> Engine {
        let project =
            mcdoc_loader::load_project(&[FileInput { logical_folder: &[], file_stem: "a", display_path: "a.mcdoc", source }]);
        Engine::new(project)
    }

    fn path(engine: &Engine, segments: &[&str]) -> CanonicalPath {
        segments
            .iter()
            .fold(CanonicalPath::root(), |p, s| p.joined(engine.interner().intern(s)))
    }

    fn struct_fields(ty: &InstantiatedType) -> &[InstantiatedField] {
        match &ty.kind {
            InstantiatedKind::Struct { fields } => fields,
            _ => panic!("expected a struct"),
        }
    }

    fn find_field<'a>(fields: &'a [InstantiatedField], engine: &Engine, name: &str) -> &'a InstantiatedField {
        let sym = engine.interner().intern(name);
        fields
            .iter()
            .find(|f| f.static_key_matches(sym))
            .unwrap_or_else(|| panic!("no field named {name}"))
    }

    #[test]
    fn generic_type_alias_substitutes_its_parameter_at_the_use_site() {
        let engine = engine_for(
            "type Tag<V> = struct { replace?: boolean, values: [V] }\n\
             type BlockTag = Tag<string>",
        );
        let block_tag = path(&engine, &["BlockTag"]);
        let instantiated = engine.instantiate_path(&block_tag);
        let fields = struct_fields(&instantiated);
        let values = find_field(fields, &engine, "values");
        let forced = values.ty.force(&engine);
        let InstantiatedKind::List { elem, .. } = &forced.kind else { panic!("expected a list") };
        assert!(matches!(elem.force(&engine).kind, InstantiatedKind::StringT { .. }));
    }

    #[test]
    fn a_self_referential_struct_terminates_and_exposes_a_cycle_sentinel() {
        let engine = engine_for("struct Node { value: int, children: [Node] }");
        let node = path(&engine, &["Node"]);
        let instantiated = engine.instantiate_path(&node);
        let fields = struct_fields(&instantiated);
        let children = find_field(fields, &engine, "children");
        let forced = children.ty.force(&engine);
        let InstantiatedKind::List { elem, .. } = &forced.kind else { panic!("expected a list") };
        let elem_ty = elem.force(&engine);
        assert!(matches!(elem_ty.kind, InstantiatedKind::Cycle(_)), "the self-reference must not be expanded eagerly");
    }

    #[test]
    fn struct_spread_inlines_fields_in_source_order() {
        let engine = engine_for("struct Base { a: int }\nstruct Combined { ...Base, b: int }");
        let combined = path(&engine, &["Combined"]);
        let instantiated = engine.instantiate_path(&combined);
        let fields = struct_fields(&instantiated);
        assert_eq!(fields.len(), 2);
        let names: Vec<&str> = fields
            .iter()
            .map(|f| match f.key {
                InstantiatedFieldKey::Ident(s) => engine.interner().resolve(s),
                _ => panic!("expected an ident key"),
            })
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
