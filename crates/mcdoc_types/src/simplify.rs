//! Union simplification (spec §4.5.2): flatten, drop the bottom type,
//! drop strict subsets onto their superset's `shadowed` list, merge
//! mutually-assignable members keeping the first in source order. Running
//! this twice on its own output is a no-op.

use crate::instantiated::{InstantiatedKind, InstantiatedType, UnionMember};
use crate::Engine;

fn flatten(members: Vec<UnionMember>, out: &mut Vec<UnionMember>) {
    for m in members {
        let InstantiatedType { kind, attrs } = m.ty;
        match kind {
            InstantiatedKind::Union { members: inner } => {
                flatten(inner, out);
                for shadow in m.shadowed {
                    out.push(UnionMember { ty: shadow, shadowed: Vec::new() });
                }
            }
            other => out.push(UnionMember {
                ty: InstantiatedType::new(other, attrs),
                shadowed: m.shadowed,
            }),
        }
    }
}

#[must_use]
pub fn simplify_union(members: Vec<UnionMember>, engine: &Engine) -> Vec<UnionMember> {
    let mut flat = Vec::new();
    flatten(members, &mut flat);
    flat.retain(|m| !matches!(m.ty.kind, InstantiatedKind::Bottom));

    let n = flat.len();
    let mut dropped = vec![false; n];
    let mut extra_shadow: Vec<Vec<InstantiatedType>> = vec![Vec::new(); n];

    for p in 0..n {
        if dropped[p] {
            continue;
        }
        for q in (p + 1)..n {
            if dropped[q] {
                continue;
            }
            let p_sub_q = crate::assignability::assignable(&flat[p].ty, &flat[q].ty, engine);
            let q_sub_p = crate::assignability::assignable(&flat[q].ty, &flat[p].ty, engine);
            if p_sub_q && q_sub_p {
                dropped[q] = true;
                extra_shadow[p].push(flat[q].ty.clone());
                extra_shadow[p].extend(flat[q].shadowed.drain(..));
            } else if p_sub_q {
                dropped[p] = true;
                extra_shadow[q].push(flat[p].ty.clone());
                extra_shadow[q].extend(flat[p].shadowed.drain(..));
                break;
            } else if q_sub_p {
                dropped[q] = true;
                extra_shadow[p].push(flat[q].ty.clone());
                extra_shadow[p].extend(flat[q].shadowed.drain(..));
            }
        }
    }

    let mut result = Vec::with_capacity(n);
    for (i, m) in flat.into_iter().enumerate() {
        if dropped[i] {
            continue;
        }
        let mut shadowed = m.shadowed;
        shadowed.append(&mut extra_shadow[i]);
        result.push(UnionMember { ty: m.ty, shadowed });
    }
    result
}

/// Fold a simplified member list back into a single [`InstantiatedType`]:
/// empty becomes the bottom type, a single unshadowed member unwraps, and
/// anything else stays a `Union`.
#[must_use]
pub fn fold_union(members: Vec<UnionMember>) -> InstantiatedType {
    match members.len() {
        0 => InstantiatedType::new(InstantiatedKind::Bottom, Vec::new()),
        1 if members[0].shadowed.is_empty() => members.into_iter().next().unwrap().ty,
        _ => InstantiatedType::new(InstantiatedKind::Union { members }, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Engine;

    fn test_engine() -> Engine {
        Engine::new(mcdoc_loader::load_project(&[]))
    }

    fn member(kind: InstantiatedKind) -> UnionMember {
        UnionMember { ty: InstantiatedType::new(kind, Vec::new()), shadowed: Vec::new() }
    }

    fn string_lit(engine: &Engine, s: &str) -> InstantiatedKind {
        InstantiatedKind::LiteralString(engine.interner().intern(s))
    }

    #[test]
    fn bottom_members_are_dropped() {
        let engine = test_engine();
        let members = vec![member(InstantiatedKind::Bottom), member(InstantiatedKind::Boolean)];
        let result = simplify_union(members, &engine);
        assert_eq!(result.len(), 1);
        assert!(matches!(result[0].ty.kind, InstantiatedKind::Boolean));
    }

    #[test]
    fn literal_string_members_are_shadowed_by_a_wider_string_type() {
        let engine = test_engine();
        let foo = string_lit(&engine, "foo");
        let bar = string_lit(&engine, "bar");
        let members = vec![
            member(InstantiatedKind::StringT { len_range: None }),
            member(foo),
            member(bar),
        ];
        let result = simplify_union(members, &engine);
        assert_eq!(result.len(), 1);
        assert!(matches!(result[0].ty.kind, InstantiatedKind::StringT { .. }));
        assert_eq!(result[0].shadowed.len(), 2);
    }

    #[test]
    fn a_member_absorbing_shadows_stays_wrapped_so_shadowed_types_survive() {
        let engine = test_engine();
        let foo = string_lit(&engine, "foo");
        let bar = string_lit(&engine, "bar");
        let members = vec![
            member(InstantiatedKind::StringT { len_range: None }),
            member(foo),
            member(bar),
        ];
        let folded = fold_union(simplify_union(members, &engine));
        let InstantiatedKind::Union { members } = &folded.kind else {
            panic!("a member carrying shadowed types is not unwrapped");
        };
        assert_eq!(members.len(), 1);
        assert!(matches!(members[0].ty.kind, InstantiatedKind::StringT { .. }));
        assert_eq!(members[0].shadowed.len(), 2);
    }

    #[test]
    fn a_lone_member_with_nothing_shadowed_unwraps() {
        let engine = test_engine();
        let members = vec![member(InstantiatedKind::Bottom), member(InstantiatedKind::Boolean)];
        let folded = fold_union(simplify_union(members, &engine));
        assert!(matches!(folded.kind, InstantiatedKind::Boolean));
    }

    #[test]
    fn nested_unions_flatten_one_level() {
        let engine = test_engine();
        let inner = InstantiatedKind::Union {
            members: vec![member(InstantiatedKind::Boolean), member(string_lit(&engine, "x"))],
        };
        let members = vec![member(inner), member(InstantiatedKind::StringT { len_range: None })];
        let result = simplify_union(members, &engine);
        // boolean, string (the literal "x" is subsumed by the wider `string`)
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn empty_union_folds_to_bottom() {
        let folded = fold_union(Vec::new());
        assert!(matches!(folded.kind, InstantiatedKind::Bottom));
    }

    #[test]
    fn simplification_is_idempotent() {
        let engine = test_engine();
        let foo = string_lit(&engine, "foo");
        let bar = string_lit(&engine, "bar");
        let members = vec![
            member(InstantiatedKind::StringT { len_range: None }),
            member(foo),
            member(bar),
        ];
        let once = fold_union(simplify_union(members, &engine));

        // Re-wrap the once-simplified result as a trivial single-member union
        // and simplify again: the absorbed members must still be there,
        // unchanged, not re-shadowed or dropped a second time.
        let rewrapped = vec![UnionMember { ty: once.clone(), shadowed: Vec::new() }];
        let twice = fold_union(simplify_union(rewrapped, &engine));

        let (InstantiatedKind::Union { members: m1 }, InstantiatedKind::Union { members: m2 }) =
            (&once.kind, &twice.kind)
        else {
            panic!("expected both passes to keep the shadow-carrying member wrapped");
        };
        assert_eq!(m1.len(), m2.len());
        assert_eq!(m1[0].shadowed.len(), m2[0].shadowed.len());
    }
}
