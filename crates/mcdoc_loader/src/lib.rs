//! Multi-file project loader for mcdoc.
//!
//! Turns a set of parsed `.mcdoc` files into one project-wide symbol table:
//! canonical declarations, the dispatch registry, and applied injections.
//! Every `Path` inside a stored declaration or dispatch case has already
//! been rewritten to absolute form (see [`resolve`]) — `mcdoc_types` looks
//! things up by canonical path and never resolves `use`/`super` itself.

mod canonical;
mod declaration;
mod dispatch;
mod injection;
mod resolve;

pub use canonical::{resolve_path, ResolveError, UseMap};
pub use declaration::{DeclKind, Declaration, SymbolTable};
pub use dispatch::{DispatchCase, DispatchRegistry};
pub use injection::{apply_injections, PendingInjection, PendingInjectionKind};

use mcdoc_diagnostic::DiagnosticQueue;
use mcdoc_ir::{CanonicalPath, Interner};
use mcdoc_parse::ast::{Item, UseStmt};

/// One file to load: its folder chain and stem (used to derive its module
/// path), a display path for diagnostics, and its source text.
pub struct FileInput<'a> {
    pub logical_folder: &'a [&'a str],
    pub file_stem: &'a str,
    pub display_path: &'a str,
    pub source: &'a str,
}

/// The result of loading a whole project.
pub struct LoadedProject {
    pub interner: Interner,
    pub symbols: SymbolTable,
    pub dispatch: DispatchRegistry,
    pub diagnostics: DiagnosticQueue,
}

/// Parse and register every file, in the order given, then apply the
/// injection queue once every declaration is known.
///
/// Files are loaded in caller order but declaration precedence (earliest
/// wins on a duplicate path or dispatch key) follows that same order, not
/// alphabetical or any other rediscovered ordering — the caller controls
/// load order deliberately for this reason.
#[must_use]
pub fn load_project(files: &[FileInput<'_>]) -> LoadedProject {
    let interner = Interner::new();
    let mut symbols = SymbolTable::new();
    let mut dispatch = DispatchRegistry::new();
    let mut diagnostics = DiagnosticQueue::new();
    let mut injections = Vec::new();

    for (load_order, file) in files.iter().enumerate() {
        load_file(
            file,
            load_order,
            &interner,
            &mut symbols,
            &mut dispatch,
            &mut injections,
            &mut diagnostics,
        );
    }

    apply_injections(&mut symbols, injections, &mut diagnostics);

    LoadedProject {
        interner,
        symbols,
        dispatch,
        diagnostics,
    }
}

#[allow(clippy::too_many_arguments)]
fn load_file(
    file: &FileInput<'_>,
    load_order: usize,
    interner: &Interner,
    symbols: &mut SymbolTable,
    dispatch: &mut DispatchRegistry,
    injections: &mut Vec<PendingInjection>,
    diagnostics: &mut DiagnosticQueue,
) {
    let lexed = mcdoc_lexer::lex(file.source, file.display_path, interner);
    diagnostics.extend(lexed.diagnostics);

    let (ast, parse_diagnostics) = mcdoc_parse::parse_file(&lexed.tokens, file.display_path, interner);
    diagnostics.extend(parse_diagnostics);

    let module = canonical::module_path(interner, file.logical_folder, file.file_stem);
    let use_map = build_use_map(&ast.items, &module, interner, file.display_path, diagnostics);

    for item in ast.items {
        match item {
            Item::Struct(mut def) => {
                resolve::canonicalize_type_expr(
                    &mut def.body,
                    &module,
                    &use_map,
                    &def.generics.params,
                    file.display_path,
                    diagnostics,
                );
                let path = module.joined(def.name);
                symbols.register(
                    path,
                    declaration::Declaration {
                        span: def.span,
                        kind: DeclKind::Struct(def),
                        logical_path: file.display_path.to_string(),
                        load_order,
                    },
                    diagnostics,
                );
            }
            Item::Enum(mut def) => {
                resolve::canonicalize_type_expr(&mut def.body, &module, &use_map, &[], file.display_path, diagnostics);
                let path = module.joined(def.name);
                symbols.register(
                    path,
                    declaration::Declaration {
                        span: def.span,
                        kind: DeclKind::Enum(def),
                        logical_path: file.display_path.to_string(),
                        load_order,
                    },
                    diagnostics,
                );
            }
            Item::TypeAlias(mut def) => {
                resolve::canonicalize_type_expr(
                    &mut def.body,
                    &module,
                    &use_map,
                    &def.generics.params,
                    file.display_path,
                    diagnostics,
                );
                let path = module.joined(def.name);
                symbols.register(
                    path,
                    declaration::Declaration {
                        span: def.span,
                        kind: DeclKind::TypeAlias(def),
                        logical_path: file.display_path.to_string(),
                        load_order,
                    },
                    diagnostics,
                );
            }
            Item::Use(_) => {
                // Already folded into `use_map` above.
            }
            Item::Injection(mut inj) => {
                let target = match resolve_path(&module, &use_map, &inj.target) {
                    Ok(resolved) => resolved,
                    Err(ResolveError::SuperPastRoot) => {
                        diagnostics.push(mcdoc_diagnostic::Diagnostic::new(
                            mcdoc_diagnostic::DiagnosticCode::SuperPastRoot,
                            file.display_path,
                            inj.span,
                            "`super` used past the project root",
                        ));
                        continue;
                    }
                };
                let kind = match &mut inj.kind {
                    mcdoc_parse::ast::InjectionKind::Struct { fields } => {
                        for field in fields.iter_mut() {
                            canonicalize_struct_field(field, &module, &use_map, &[], file.display_path, diagnostics);
                        }
                        PendingInjectionKind::Struct {
                            fields: std::mem::take(fields),
                        }
                    }
                    mcdoc_parse::ast::InjectionKind::Enum { variants } => PendingInjectionKind::Enum {
                        variants: std::mem::take(variants),
                    },
                };
                injections.push(PendingInjection {
                    target,
                    kind,
                    logical_path: file.display_path.to_string(),
                    load_order,
                    span: inj.span,
                });
            }
            Item::Dispatch(mut stmt) => {
                resolve::canonicalize_type_expr(
                    &mut stmt.target,
                    &module,
                    &use_map,
                    &stmt.generics.params,
                    file.display_path,
                    diagnostics,
                );
                for key in stmt.keys {
                    let registry = stmt.registry;
                    dispatch.register(
                        registry,
                        key,
                        DispatchCase {
                            target: stmt.target.clone(),
                            generics: stmt.generics.clone(),
                            logical_path: file.display_path.to_string(),
                            load_order,
                            span: stmt.span,
                        },
                        diagnostics,
                    );
                }
            }
        }
    }
}

fn canonicalize_struct_field(
    field: &mut mcdoc_parse::ast::StructField,
    module: &CanonicalPath,
    use_map: &UseMap,
    generics: &[mcdoc_ir::Symbol],
    logical_path: &str,
    diagnostics: &mut DiagnosticQueue,
) {
    use mcdoc_parse::ast::{FieldKey, StructField};
    match field {
        StructField::Named { key, ty, .. } => {
            if let FieldKey::Computed(computed) = key {
                resolve::canonicalize_type_expr(computed, module, use_map, generics, logical_path, diagnostics);
            }
            resolve::canonicalize_type_expr(ty, module, use_map, generics, logical_path, diagnostics);
        }
        StructField::Spread { ty, .. } => {
            resolve::canonicalize_type_expr(ty, module, use_map, generics, logical_path, diagnostics);
        }
    }
}

/// Fold this file's `use` statements into an alias map, resolving each
/// aliased path against the module as it's encountered so a later `use` may
/// build on an earlier one.
fn build_use_map(
    items: &[Item],
    module: &CanonicalPath,
    interner: &Interner,
    logical_path: &str,
    diagnostics: &mut DiagnosticQueue,
) -> UseMap {
    let mut use_map = UseMap::default();
    for item in items {
        let Item::Use(UseStmt { path, alias, span }) = item else {
            continue;
        };
        let resolved = match resolve_path(module, &use_map, path) {
            Ok(resolved) => resolved,
            Err(ResolveError::SuperPastRoot) => {
                diagnostics.push(mcdoc_diagnostic::Diagnostic::new(
                    mcdoc_diagnostic::DiagnosticCode::SuperPastRoot,
                    logical_path,
                    *span,
                    "`super` used past the project root",
                ));
                continue;
            }
        };
        let name = alias.unwrap_or_else(|| {
            path.segments
                .last()
                .copied()
                .unwrap_or_else(|| interner.intern(""))
        });
        use_map.insert(name, resolved);
    }
    use_map
}
