//! A debug pretty-printer for instantiated types, used by `mcdocc dump`.
//!
//! Not part of the engine's own interface (spec §6 has no printer query):
//! this walks an already-produced [`InstantiatedType`], forcing every lazy
//! child exactly once. Termination follows from the engine's own cycle
//! detection (spec §9) — a self-reference always bottoms out at a `Cycle`
//! sentinel before this ever has to force the same frame twice.

use std::fmt::Write as _;

use mcdoc_types::{Engine, InstantiatedFieldKey, InstantiatedKind, InstantiatedType};

pub fn render(ty: &InstantiatedType, engine: &Engine) -> String {
    let mut out = String::new();
    write_type(&mut out, ty, engine, 0);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_attrs(out: &mut String, ty: &InstantiatedType, engine: &Engine) {
    for attr in &ty.attrs {
        let _ = write!(out, " #[{}]", engine.interner().resolve(attr.name));
    }
}

fn write_type(out: &mut String, ty: &InstantiatedType, engine: &Engine, depth: usize) {
    match &ty.kind {
        InstantiatedKind::Any => out.push_str("any"),
        InstantiatedKind::Unsafe => out.push_str("unsafe"),
        InstantiatedKind::Bottom => out.push_str("⊥"),
        InstantiatedKind::Boolean => out.push_str("boolean"),
        InstantiatedKind::StringT { len_range } => {
            let _ = write!(out, "string {len_range:?}");
        }
        InstantiatedKind::LiteralBool(b) => {
            let _ = write!(out, "{b}");
        }
        InstantiatedKind::LiteralString(s) => {
            let _ = write!(out, "{:?}", engine.interner().resolve(*s));
        }
        InstantiatedKind::LiteralNumber(n) => {
            let _ = write!(out, "{:?} {}", n.kind, n.value);
        }
        InstantiatedKind::Numeric { kind, value_range } => {
            let _ = write!(out, "{kind:?} {value_range:?}");
        }
        InstantiatedKind::PrimArray { elem_kind, elem_range, len_range } => {
            let _ = write!(out, "{elem_kind:?}[] elem={elem_range:?} len={len_range:?}");
        }
        InstantiatedKind::List { elem, len_range } => {
            out.push_str("list[\n");
            indent(out, depth + 1);
            write_type(out, &elem.force(engine), engine, depth + 1);
            out.push('\n');
            indent(out, depth);
            let _ = write!(out, "] len={len_range:?}");
        }
        InstantiatedKind::Tuple { elems } => {
            out.push_str("tuple[\n");
            for elem in elems {
                indent(out, depth + 1);
                write_type(out, &elem.force(engine), engine, depth + 1);
                out.push('\n');
            }
            indent(out, depth);
            out.push(']');
        }
        InstantiatedKind::Struct { fields } => {
            out.push_str("struct {\n");
            for field in fields {
                indent(out, depth + 1);
                match &field.key {
                    InstantiatedFieldKey::Ident(s) | InstantiatedFieldKey::Str(s) => {
                        out.push_str(engine.interner().resolve(*s));
                    }
                    InstantiatedFieldKey::Computed(_) => out.push_str("[computed]"),
                }
                if field.optional {
                    out.push('?');
                }
                out.push_str(": ");
                write_type(out, &field.ty.force(engine), engine, depth + 1);
                out.push('\n');
            }
            indent(out, depth);
            out.push('}');
        }
        InstantiatedKind::Enum { base_kind, variants } => {
            let _ = write!(out, "enum({base_kind:?}) {{ {} variants }}", variants.len());
        }
        InstantiatedKind::Union { members } => {
            out.push_str("(\n");
            for member in members {
                indent(out, depth + 1);
                write_type(out, &member.ty, engine, depth + 1);
                if !member.shadowed.is_empty() {
                    let _ = write!(out, "  # shadows {} member(s)", member.shadowed.len());
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push(')');
        }
        InstantiatedKind::Cycle(_) => out.push_str("<cycle>"),
        InstantiatedKind::Error => out.push_str("<error>"),
        InstantiatedKind::Cancelled => out.push_str("<cancelled>"),
    }
    write_attrs(out, ty, engine);
}
