//! Index resolution (spec §4.4.1): applying `[key]`/`[%key, %parent, …]` to
//! a dispatcher registry or to an already-instantiated struct.

use mcdoc_ir::ResourceLocation;
use mcdoc_parse::ast::{AccessorKey, AttrLeaf, AttrTree, AttrValue, Attribute, Index, StaticKey};

use crate::instantiated::{InstantiatedKind, InstantiatedType, UnionMember, ACCESSOR_ATTR, NONEXHAUSTIVE_ATTR};
use crate::{Engine, Env};

fn synth_flag_attr(engine: &Engine, name: &str) -> Attribute {
    Attribute {
        name: engine.interner().intern(name),
        value: None,
        span: mcdoc_ir::Span::DUMMY,
    }
}

fn accessor_leaf(engine: &Engine, key: &AccessorKey) -> AttrLeaf {
    match key {
        AccessorKey::Key => AttrLeaf::Ident(engine.interner().intern("%key")),
        AccessorKey::Parent => AttrLeaf::Ident(engine.interner().intern("%parent")),
        AccessorKey::Ident(s) => AttrLeaf::Ident(*s),
        AccessorKey::Str(s) => AttrLeaf::Str(*s),
    }
}

fn synth_accessor_attr(engine: &Engine, chain: &[AccessorKey]) -> Attribute {
    let tree = AttrTree {
        delimiter: Some(mcdoc_parse::ast::Delimiter::Paren),
        positional: chain
            .iter()
            .map(|k| AttrValue::Leaf(accessor_leaf(engine, k)))
            .collect(),
        named: Vec::new(),
    };
    Attribute {
        name: engine.interner().intern(ACCESSOR_ATTR),
        value: Some(AttrValue::Tree(tree)),
        span: mcdoc_ir::Span::DUMMY,
    }
}

/// Tag a dynamic-index result as nonexhaustive, recording the accessor
/// chain verbatim for tooling. Never evaluated by the engine itself.
fn tag_dynamic(engine: &Engine, ty: InstantiatedType, chain: &[AccessorKey]) -> InstantiatedType {
    ty.with_attr(synth_flag_attr(engine, NONEXHAUSTIVE_ATTR))
        .with_attr(synth_accessor_attr(engine, chain))
}

fn union_of(members: Vec<UnionMember>, engine: &Engine) -> InstantiatedType {
    crate::simplify::fold_union(crate::simplify::simplify_union(members, engine))
}

/// Every registered case for `registry` except `%none`/`%unknown` (but
/// including `%fallback`) — the synthetic fallback case from the glossary,
/// shared by a missed static key and a dynamic index alike.
fn fallback_cases(registry: ResourceLocation, outer_env: &Env, engine: &Engine) -> Vec<UnionMember> {
    engine
        .project()
        .dispatch
        .cases(&registry)
        .into_iter()
        .flat_map(|cases| cases.iter())
        .filter(|(key, _)| !matches!(key, StaticKey::None | StaticKey::Unknown))
        .map(|(_, case)| UnionMember {
            ty: crate::instantiate::instantiate_dispatch_case(registry, case, outer_env, engine),
            shadowed: Vec::new(),
        })
        .collect()
}

/// Resolve the first index applied directly to a dispatcher registry.
pub(crate) fn resolve_first_dispatcher_index(
    registry: ResourceLocation,
    index: &Index,
    outer_env: &Env,
    engine: &Engine,
) -> InstantiatedType {
    if !engine.project().dispatch.is_known_registry(&registry) {
        engine.diagnose_unknown_registry(registry, index);
        return InstantiatedType::any();
    }

    match index {
        Index::Static(key) => {
            let case = engine
                .project()
                .dispatch
                .case(&registry, key)
                .or_else(|| engine.project().dispatch.case(&registry, &StaticKey::Unknown))
                .or_else(|| engine.project().dispatch.case(&registry, &StaticKey::Fallback));
            match case {
                Some(case) => crate::instantiate::instantiate_dispatch_case(registry, case, outer_env, engine),
                None => {
                    let members = fallback_cases(registry, outer_env, engine);
                    union_of(members, engine).with_attr(synth_flag_attr(engine, NONEXHAUSTIVE_ATTR))
                }
            }
        }
        Index::Dynamic(chain) => {
            let members = fallback_cases(registry, outer_env, engine);
            tag_dynamic(engine, union_of(members, engine), chain)
        }
    }
}

/// Resolve an index applied to an already-instantiated type: a field lookup
/// on a struct, or a diagnostic everywhere else (spec §4.4.1 — a static key
/// on a non-dispatcher, non-struct type is always an error; a computed
/// `[Type]` field key never matches a static lookup).
pub(crate) fn resolve_index_on_type(base: InstantiatedType, index: &Index, engine: &Engine) -> InstantiatedType {
    match index {
        Index::Static(key) => resolve_static_on_type(base, key, engine),
        Index::Dynamic(chain) => resolve_dynamic_on_type(base, chain, engine),
    }
}

fn resolve_static_on_type(base: InstantiatedType, key: &StaticKey, engine: &Engine) -> InstantiatedType {
    let InstantiatedKind::Struct { fields } = &base.kind else {
        engine.diagnose_static_key_misuse();
        return InstantiatedType::error();
    };
    let sym = match key {
        StaticKey::Ident(s) | StaticKey::Str(s) => Some(*s),
        StaticKey::Fallback | StaticKey::None | StaticKey::Unknown | StaticKey::ResLoc(_) => None,
    };
    let Some(sym) = sym else {
        engine.diagnose_static_key_misuse();
        return InstantiatedType::error();
    };
    match fields.iter().find(|f| f.static_key_matches(sym)) {
        Some(field) => field.ty.force(engine),
        None => {
            engine.diagnose_static_key_misuse();
            InstantiatedType::error()
        }
    }
}

fn resolve_dynamic_on_type(base: InstantiatedType, chain: &[AccessorKey], engine: &Engine) -> InstantiatedType {
    let InstantiatedKind::Struct { fields } = &base.kind else {
        engine.diagnose_static_key_misuse();
        return InstantiatedType::error();
    };
    let members = fields
        .iter()
        .map(|f| UnionMember {
            ty: f.ty.force(engine),
            shadowed: Vec::new(),
        })
        .collect();
    tag_dynamic(engine, union_of(members, engine), chain)
}
