//! The injection queue: additive struct/enum edits collected while loading,
//! applied once every declaration is known.

use mcdoc_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticQueue};
use mcdoc_ir::{CanonicalPath, Span};
use mcdoc_parse::ast::{EnumVariant, FieldKey, StructField, TypeExprKind};

use crate::declaration::{DeclKind, SymbolTable};

/// One `inject struct|enum Path { … }`, resolved against its originating
/// module's `use` map at collection time.
pub struct PendingInjection {
    pub target: CanonicalPath,
    pub kind: PendingInjectionKind,
    pub logical_path: String,
    pub load_order: usize,
    pub span: Span,
}

pub enum PendingInjectionKind {
    Struct { fields: Vec<StructField> },
    Enum { variants: Vec<EnumVariant> },
}

/// Apply every queued injection against the now-complete symbol table.
///
/// Injections are applied in queue order (source load order); within a
/// single struct, an injected field with a key already present replaces the
/// former field's type in place, keeping its original position — the same
/// rule intra-file duplicate fields follow.
pub fn apply_injections(
    table: &mut SymbolTable,
    queue: Vec<PendingInjection>,
    diagnostics: &mut DiagnosticQueue,
) {
    for injection in queue {
        let Some(decl) = table.get_mut(&injection.target) else {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::UnknownInjectionTarget,
                injection.logical_path.clone(),
                injection.span,
                "injection target does not exist",
            ));
            continue;
        };

        match (&mut decl.kind, injection.kind) {
            (DeclKind::Struct(def), PendingInjectionKind::Struct { fields }) => {
                let TypeExprKind::Struct { fields: existing } = &mut def.body.kind else {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticCode::UnknownInjectionTarget,
                        injection.logical_path.clone(),
                        injection.span,
                        "injection target is not a plain struct body",
                    ));
                    continue;
                };
                for field in fields {
                    merge_struct_field(existing, field);
                }
            }
            (DeclKind::Enum(def), PendingInjectionKind::Enum { variants }) => {
                let TypeExprKind::Enum { variants: existing, .. } = &mut def.body.kind else {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticCode::UnknownInjectionTarget,
                        injection.logical_path.clone(),
                        injection.span,
                        "injection target is not a plain enum body",
                    ));
                    continue;
                };
                for variant in variants {
                    merge_enum_variant(existing, variant);
                }
            }
            _ => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::UnknownInjectionTarget,
                    injection.logical_path.clone(),
                    injection.span,
                    "injection kind does not match the target declaration's kind",
                ));
            }
        }
    }
}

fn field_key_matches(a: &FieldKey, b: &FieldKey) -> bool {
    match (a, b) {
        (FieldKey::Ident(x), FieldKey::Ident(y)) | (FieldKey::Str(x), FieldKey::Str(y)) => x == y,
        (FieldKey::Ident(x), FieldKey::Str(y)) | (FieldKey::Str(x), FieldKey::Ident(y)) => x == y,
        _ => false,
    }
}

fn merge_struct_field(existing: &mut Vec<StructField>, incoming: StructField) {
    if let StructField::Named { key: incoming_key, .. } = &incoming {
        let slot = existing.iter_mut().find(|field| {
            matches!(field, StructField::Named { key, .. } if field_key_matches(key, incoming_key))
        });
        if let Some(slot) = slot {
            *slot = incoming;
            return;
        }
    }
    existing.push(incoming);
}

fn merge_enum_variant(existing: &mut Vec<EnumVariant>, incoming: EnumVariant) {
    let slot = existing.iter_mut().find(|v| v.name == incoming.name);
    if let Some(slot) = slot {
        *slot = incoming;
    } else {
        existing.push(incoming);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;
    use mcdoc_ir::{Interner, NumericKind, TypedNumber};
    use mcdoc_parse::ast::{EnumBaseKind, EnumDef, EnumVariantValue, GenericParams, StructDef, TypeExpr};

    fn struct_with_fields(name: mcdoc_ir::Symbol, fields: Vec<StructField>) -> Declaration {
        Declaration {
            kind: DeclKind::Struct(StructDef {
                name,
                generics: GenericParams::default(),
                body: TypeExpr {
                    kind: TypeExprKind::Struct { fields },
                    attrs: vec![],
                    span: Span::DUMMY,
                },
                attrs: vec![],
                doc: None,
                span: Span::DUMMY,
            }),
            logical_path: "a".to_string(),
            load_order: 0,
            span: Span::DUMMY,
        }
    }

    fn named_field(key: FieldKey, ty: TypeExprKind) -> StructField {
        StructField::Named {
            key,
            optional: true,
            ty: TypeExpr {
                kind: ty,
                attrs: vec![],
                span: Span::DUMMY,
            },
            attrs: vec![],
            doc: None,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn injected_field_appends_in_source_order() {
        let interner = Interner::new();
        let path = CanonicalPath::root().joined(interner.intern("Foo"));
        let a = interner.intern("a");
        let b = interner.intern("b");

        let mut table = SymbolTable::new();
        let mut diagnostics = DiagnosticQueue::new();
        table.register(
            path.clone(),
            struct_with_fields(
                interner.intern("Foo"),
                vec![named_field(FieldKey::Ident(a), TypeExprKind::Any)],
            ),
            &mut diagnostics,
        );

        let queue = vec![PendingInjection {
            target: path.clone(),
            kind: PendingInjectionKind::Struct {
                fields: vec![named_field(FieldKey::Ident(b), TypeExprKind::Boolean)],
            },
            logical_path: "b".to_string(),
            load_order: 1,
            span: Span::DUMMY,
        }];
        apply_injections(&mut table, queue, &mut diagnostics);

        let DeclKind::Struct(def) = &table.get(&path).unwrap().kind else { panic!() };
        let TypeExprKind::Struct { fields } = &def.body.kind else { panic!() };
        assert_eq!(fields.len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn injected_field_with_same_key_replaces_type_in_place() {
        let interner = Interner::new();
        let path = CanonicalPath::root().joined(interner.intern("Foo"));
        let a = interner.intern("a");

        let mut table = SymbolTable::new();
        let mut diagnostics = DiagnosticQueue::new();
        table.register(
            path.clone(),
            struct_with_fields(
                interner.intern("Foo"),
                vec![named_field(FieldKey::Ident(a), TypeExprKind::Any)],
            ),
            &mut diagnostics,
        );

        let queue = vec![PendingInjection {
            target: path.clone(),
            kind: PendingInjectionKind::Struct {
                fields: vec![named_field(FieldKey::Ident(a), TypeExprKind::Boolean)],
            },
            logical_path: "b".to_string(),
            load_order: 1,
            span: Span::DUMMY,
        }];
        apply_injections(&mut table, queue, &mut diagnostics);

        let DeclKind::Struct(def) = &table.get(&path).unwrap().kind else { panic!() };
        let TypeExprKind::Struct { fields } = &def.body.kind else { panic!() };
        assert_eq!(fields.len(), 1);
        let StructField::Named { ty, .. } = &fields[0] else { panic!() };
        assert!(matches!(ty.kind, TypeExprKind::Boolean));
    }

    #[test]
    fn injecting_into_a_missing_path_is_diagnosed() {
        let interner = Interner::new();
        let mut table = SymbolTable::new();
        let mut diagnostics = DiagnosticQueue::new();
        let queue = vec![PendingInjection {
            target: CanonicalPath::root().joined(interner.intern("Missing")),
            kind: PendingInjectionKind::Struct { fields: vec![] },
            logical_path: "a".to_string(),
            load_order: 0,
            span: Span::DUMMY,
        }];
        apply_injections(&mut table, queue, &mut diagnostics);
        assert_eq!(diagnostics.as_slice().len(), 1);
        assert_eq!(diagnostics.as_slice()[0].code, DiagnosticCode::UnknownInjectionTarget);
    }

    #[test]
    fn injected_variant_with_same_name_replaces_in_place() {
        let interner = Interner::new();
        let path = CanonicalPath::root().joined(interner.intern("Foo"));
        let variant_name = interner.intern("A");

        let mut table = SymbolTable::new();
        let mut diagnostics = DiagnosticQueue::new();
        table.register(
            path.clone(),
            Declaration {
                kind: DeclKind::Enum(EnumDef {
                    name: interner.intern("Foo"),
                    body: TypeExpr {
                        kind: TypeExprKind::Enum {
                            base_kind: EnumBaseKind::Numeric(NumericKind::Int),
                            variants: vec![EnumVariant {
                                name: variant_name,
                                value: EnumVariantValue::Number(TypedNumber::new(
                                    NumericKind::Int,
                                    mcdoc_ir::NumberValue::Int(1),
                                )),
                                attrs: vec![],
                                doc: None,
                                span: Span::DUMMY,
                            }],
                        },
                        attrs: vec![],
                        span: Span::DUMMY,
                    },
                    attrs: vec![],
                    doc: None,
                    span: Span::DUMMY,
                }),
                logical_path: "a".to_string(),
                load_order: 0,
                span: Span::DUMMY,
            },
            &mut diagnostics,
        );

        let queue = vec![PendingInjection {
            target: path.clone(),
            kind: PendingInjectionKind::Enum {
                variants: vec![EnumVariant {
                    name: variant_name,
                    value: EnumVariantValue::Number(TypedNumber::new(
                        NumericKind::Int,
                        mcdoc_ir::NumberValue::Int(2),
                    )),
                    attrs: vec![],
                    doc: None,
                    span: Span::DUMMY,
                }],
            },
            logical_path: "b".to_string(),
            load_order: 1,
            span: Span::DUMMY,
        }];
        apply_injections(&mut table, queue, &mut diagnostics);

        let DeclKind::Enum(def) = &table.get(&path).unwrap().kind else { panic!() };
        let TypeExprKind::Enum { variants, .. } = &def.body.kind else { panic!() };
        assert_eq!(variants.len(), 1);
        let EnumVariantValue::Number(n) = &variants[0].value else { panic!() };
        assert_eq!(n.value, mcdoc_ir::NumberValue::Int(2));
    }
}
