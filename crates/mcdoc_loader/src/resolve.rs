//! Rewrites every `Path` inside a parsed type tree into absolute, canonical
//! form against one file's module and `use` map.
//!
//! Doing this once, at load time, means `mcdoc_types` never has to carry a
//! module or `use` map around while it walks a type: every `Reference` it
//! sees already names a canonical path relative to nothing — with one
//! deliberate exception. A bare single-segment relative reference matching
//! one of the enclosing declaration's generic parameters (`V` inside
//! `struct Tag<V> { values: [V] }`) is left untouched: `mcdoc_types`
//! recognizes any remaining non-absolute path as a parameter reference and
//! substitutes it, diagnosing the rare case where the name also shadows a
//! real module-level declaration (spec: the module-level name wins).

use mcdoc_ir::{CanonicalPath, Symbol};
use mcdoc_parse::ast::{FieldKey, Path, StructField, TypeExpr, TypeExprKind};

use crate::canonical::{resolve_path, ResolveError, UseMap};
use mcdoc_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticQueue};

fn is_generic_param_reference(path: &Path, generics: &[Symbol]) -> bool {
    !path.absolute
        && path.supers == 0
        && path.segments.len() == 1
        && generics.contains(&path.segments[0])
}

fn make_absolute(resolved: CanonicalPath) -> Path {
    Path {
        absolute: true,
        supers: 0,
        segments: resolved.segments().to_vec(),
    }
}

fn canonicalize_path(
    path: &mut Path,
    module: &CanonicalPath,
    use_map: &UseMap,
    logical_path: &str,
    span: mcdoc_ir::Span,
    diagnostics: &mut DiagnosticQueue,
) {
    match resolve_path(module, use_map, path) {
        Ok(resolved) => *path = make_absolute(resolved),
        Err(ResolveError::SuperPastRoot) => {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::SuperPastRoot,
                logical_path.to_string(),
                span,
                "`super` used past the project root",
            ));
        }
    }
}

/// Recursively rewrite every `Path` reachable from `expr`, except bare
/// references to one of `generics` (see module docs).
pub fn canonicalize_type_expr(
    expr: &mut TypeExpr,
    module: &CanonicalPath,
    use_map: &UseMap,
    generics: &[Symbol],
    logical_path: &str,
    diagnostics: &mut DiagnosticQueue,
) {
    let span = expr.span;
    match &mut expr.kind {
        TypeExprKind::Reference { path, type_args } => {
            if !is_generic_param_reference(path, generics) {
                canonicalize_path(path, module, use_map, logical_path, span, diagnostics);
            }
            for arg in type_args {
                canonicalize_type_expr(arg, module, use_map, generics, logical_path, diagnostics);
            }
        }
        TypeExprKind::List { elem, .. } => {
            canonicalize_type_expr(elem, module, use_map, generics, logical_path, diagnostics);
        }
        TypeExprKind::Tuple { elems } | TypeExprKind::Union { members: elems } => {
            for elem in elems {
                canonicalize_type_expr(elem, module, use_map, generics, logical_path, diagnostics);
            }
        }
        TypeExprKind::Struct { fields } => {
            canonicalize_struct_fields(fields, module, use_map, generics, logical_path, diagnostics);
        }
        // Variant values are number/string literals; nothing to rewrite.
        TypeExprKind::Enum { .. } => {}
        // `Index` never carries a `Path`: static keys are idents/strings/
        // resource locations, dynamic keys are accessor chains.
        TypeExprKind::Indexed { base, .. } => {
            canonicalize_type_expr(base, module, use_map, generics, logical_path, diagnostics);
        }
        TypeExprKind::Dispatcher { .. } => {}
        TypeExprKind::Any
        | TypeExprKind::Unsafe
        | TypeExprKind::Boolean
        | TypeExprKind::StringT { .. }
        | TypeExprKind::LiteralBool(_)
        | TypeExprKind::LiteralString(_)
        | TypeExprKind::LiteralNumber(_)
        | TypeExprKind::Numeric { .. }
        | TypeExprKind::PrimArray { .. } => {}
    }
}

fn canonicalize_struct_fields(
    fields: &mut [StructField],
    module: &CanonicalPath,
    use_map: &UseMap,
    generics: &[Symbol],
    logical_path: &str,
    diagnostics: &mut DiagnosticQueue,
) {
    for field in fields {
        match field {
            StructField::Named { key, ty, .. } => {
                if let FieldKey::Computed(computed) = key {
                    canonicalize_type_expr(computed, module, use_map, generics, logical_path, diagnostics);
                }
                canonicalize_type_expr(ty, module, use_map, generics, logical_path, diagnostics);
            }
            StructField::Spread { ty, .. } => {
                canonicalize_type_expr(ty, module, use_map, generics, logical_path, diagnostics);
            }
        }
    }
}
