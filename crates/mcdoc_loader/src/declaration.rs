//! The project-wide declaration table: one entry per canonical path.

use mcdoc_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticQueue};
use mcdoc_ir::{CanonicalPath, Span};
use mcdoc_parse::ast::{EnumDef, StructDef, TypeAliasDef};
use rustc_hash::FxHashMap;

/// The body of a registered declaration.
///
/// By the time one of these is registered, every `Path` inside its body has
/// already been rewritten to absolute form by [`crate::resolve`] — `mcdoc_types`
/// never needs a module or `use` map to resolve a reference.
#[derive(Clone, Debug)]
pub enum DeclKind {
    Struct(StructDef),
    Enum(EnumDef),
    TypeAlias(TypeAliasDef),
}

/// A declaration plus the bookkeeping the loader needs to break ties.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub kind: DeclKind,
    pub logical_path: String,
    pub load_order: usize,
    pub span: Span,
}

/// Canonical-path-keyed table of every struct, enum, and type alias in a
/// project.
///
/// Earliest registration wins: a later declaration at the same path is
/// diagnosed and dropped, never overwrites.
#[derive(Default)]
pub struct SymbolTable {
    declarations: FxHashMap<CanonicalPath, Declaration>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        path: CanonicalPath,
        decl: Declaration,
        diagnostics: &mut DiagnosticQueue,
    ) {
        if let Some(existing) = self.declarations.get(&path) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::DuplicateDeclaration,
                decl.logical_path.clone(),
                decl.span,
                format!(
                    "duplicate declaration; first declared in {}",
                    existing.logical_path
                ),
            ));
            return;
        }
        self.declarations.insert(path, decl);
    }

    #[must_use]
    pub fn get(&self, path: &CanonicalPath) -> Option<&Declaration> {
        self.declarations.get(path)
    }

    #[must_use]
    pub fn get_mut(&mut self, path: &CanonicalPath) -> Option<&mut Declaration> {
        self.declarations.get_mut(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalPath, &Declaration)> {
        self.declarations.iter()
    }
}
