//! Type instantiation engine and assignability relation for mcdoc.
//!
//! `mcdoc_loader` hands this crate a [`LoadedProject`]: a symbol table and
//! dispatch registry with every path already absolute. This crate turns
//! that static declaration graph into on-demand instantiated types
//! (generics substituted, struct spreads inlined, dispatcher/struct indices
//! resolved) and implements the assignability and simplification relations
//! over the result.
//!
//! The engine is logically a pure function from `(declaration graph, query)`
//! to a result plus a stream of diagnostics (spec §5, §7) — nothing it does
//! can abort the host process; every failure becomes a diagnostic and a
//! sentinel value (an error type, a fallback union, `any`).

mod assignability;
mod cache;
mod cancellation;
mod env;
mod index;
mod instantiate;
mod instantiated;
mod simplify;

pub use assignability::{assignable, JsonValidatorProfile, NbtValidatorProfile, ValidatorProfile};
pub use cancellation::CancellationToken;
pub use env::{BoundArg, Env, VisitKey, VisitTarget};
pub use instantiated::{
    InstantiatedField, InstantiatedFieldKey, InstantiatedKind, InstantiatedType, LazyChild, LogicalPath,
    UnionMember, ACCESSOR_ATTR, NONEXHAUSTIVE_ATTR,
};
pub use simplify::{fold_union, simplify_union};

use std::sync::Arc;

use mcdoc_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticQueue};
use mcdoc_ir::{CanonicalPath, Interner, ResourceLocation};
use mcdoc_loader::{DeclKind, Declaration, LoadedProject};
use mcdoc_parse::ast::{Index, TypeExpr};
use parking_lot::Mutex;

/// The engine's view of one loaded project: its declarations, its
/// dispatcher registry, and the queries defined over them (spec §6).
pub struct Engine {
    project: LoadedProject,
    cache: cache::InstantiationCache,
    diagnostics: Mutex<DiagnosticQueue>,
    validator: Option<Box<dyn ValidatorProfile>>,
    default_any_is_unsafe: bool,
}

/// What [`Engine::resolve`] found (or didn't) at a canonical path.
pub enum Resolution<'a> {
    Found(&'a Declaration),
    Unknown,
}

impl Engine {
    #[must_use]
    pub fn new(project: LoadedProject) -> Self {
        Engine {
            project,
            cache: cache::InstantiationCache::new(),
            diagnostics: Mutex::new(DiagnosticQueue::new()),
            validator: None,
            default_any_is_unsafe: false,
        }
    }

    /// Install a data-validator profile (spec §6). Its
    /// `default_any_is_unsafe()` overrides the engine's own toggle.
    #[must_use]
    pub fn with_validator(mut self, validator: Box<dyn ValidatorProfile>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Set the `any`-behaves-like-`unsafe` toggle directly, for hosts with
    /// no validator profile of their own.
    #[must_use]
    pub fn with_default_any_is_unsafe(mut self, value: bool) -> Self {
        self.default_any_is_unsafe = value;
        self
    }

    /// The interner backing every canonical path and field key the engine
    /// hands back. Hosts need this to turn a user-facing name into the
    /// `Symbol` a query like [`Engine::resolve`] or [`Engine::instantiate_path`]
    /// expects.
    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.project.interner
    }

    pub(crate) fn project(&self) -> &LoadedProject {
        &self.project
    }

    pub(crate) fn cache(&self) -> &cache::InstantiationCache {
        &self.cache
    }

    pub(crate) fn resolve_decl(&self, path: &CanonicalPath) -> Option<&Declaration> {
        self.project.symbols.get(path)
    }

    pub(crate) fn validator(&self) -> Option<&dyn ValidatorProfile> {
        self.validator.as_deref()
    }

    pub(crate) fn default_any_is_unsafe(&self) -> bool {
        self.validator
            .as_ref()
            .map_or(self.default_any_is_unsafe, |v| v.default_any_is_unsafe())
    }

    pub(crate) fn push_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    pub(crate) fn diagnose_unknown_path(&self, logical_path: &str, span: mcdoc_ir::Span) {
        self.push_diagnostic(Diagnostic::new(
            DiagnosticCode::UnknownPath,
            logical_path,
            span,
            "reference to an undeclared path",
        ));
    }

    pub(crate) fn diagnose_type_arg_count_mismatch(&self, logical_path: &str, span: mcdoc_ir::Span) {
        self.push_diagnostic(Diagnostic::new(
            DiagnosticCode::TypeArgCountMismatch,
            logical_path,
            span,
            "generic argument count does not match the declaration",
        ));
    }

    pub(crate) fn diagnose_generic_shadows_declaration(&self, logical_path: &str, span: mcdoc_ir::Span) {
        self.push_diagnostic(Diagnostic::new(
            DiagnosticCode::DuplicateDeclaration,
            logical_path,
            span,
            "generic parameter name shadows a module-level declaration; the declaration wins",
        ));
    }

    pub(crate) fn diagnose_unknown_registry(&self, registry: ResourceLocation, _index: &Index) {
        self.push_diagnostic(Diagnostic::new(
            DiagnosticCode::UnknownDispatcherRegistry,
            "<mcdoc_types>",
            mcdoc_ir::Span::DUMMY,
            format!(
                "unknown dispatcher registry `{}`",
                registry.display(|s| self.interner().resolve(s))
            ),
        ));
    }

    pub(crate) fn diagnose_static_key_misuse(&self) {
        self.push_diagnostic(Diagnostic::new(
            DiagnosticCode::StaticKeyOnNonDispatcherNonStruct,
            "<mcdoc_types>",
            mcdoc_ir::Span::DUMMY,
            "static key applied to a type with no matching field",
        ));
    }

    /// `resolve(absolute_path)` (spec §6): look up a canonical path in the
    /// project's symbol table.
    #[must_use]
    pub fn resolve(&self, path: &CanonicalPath) -> Resolution<'_> {
        match self.project.symbols.get(path) {
            Some(decl) => Resolution::Found(decl),
            None => Resolution::Unknown,
        }
    }

    /// `instantiate(type_expr, env)` (spec §6).
    #[must_use]
    pub fn instantiate(&self, expr: &TypeExpr, env: Env) -> InstantiatedType {
        instantiate::instantiate(expr, env, self, "<query>")
    }

    /// Like [`Engine::instantiate`], but checks `token` before descending
    /// into each node (spec §5).
    #[must_use]
    pub fn instantiate_cancellable(&self, expr: &TypeExpr, env: Env, token: &CancellationToken) -> InstantiatedType {
        instantiate::instantiate_checked(expr, env, self, "<query>", token)
    }

    /// Instantiate the declaration at `path` with no type arguments,
    /// consulting and populating the zero-argument cache.
    #[must_use]
    pub fn instantiate_path(&self, path: &CanonicalPath) -> InstantiatedType {
        if let Some(cached) = self.cache.get(path) {
            return cached;
        }
        let result = match self.project.symbols.get(path) {
            Some(decl) => {
                let logical_path: LogicalPath = Arc::from(decl.logical_path.as_str());
                let env = Env::root().push_visit(VisitKey::new(VisitTarget::Decl(path.clone()), Vec::new()));
                instantiate::instantiate(decl_body(&decl.kind), env, self, &logical_path)
            }
            None => {
                self.diagnose_unknown_path("<query>", mcdoc_ir::Span::DUMMY);
                InstantiatedType::error()
            }
        };
        self.cache.insert(path.clone(), result.clone());
        result
    }

    /// `dispatch(registry, [index, …])` (spec §6).
    #[must_use]
    pub fn dispatch(&self, registry: ResourceLocation, indices: &[Index]) -> InstantiatedType {
        let Some((first, rest)) = indices.split_first() else {
            return InstantiatedType::any();
        };
        let mut current = index::resolve_first_dispatcher_index(registry, first, &Env::root(), self);
        for idx in rest {
            current = index::resolve_index_on_type(current, idx, self);
        }
        current
    }

    /// `assignable(A, B)` (spec §6).
    #[must_use]
    pub fn assignable(&self, a: &InstantiatedType, b: &InstantiatedType) -> bool {
        assignability::assignable(a, b, self)
    }

    /// `simplify(A)` (spec §6): a no-op for anything but a `Union`.
    #[must_use]
    pub fn simplify(&self, ty: InstantiatedType) -> InstantiatedType {
        let InstantiatedType { kind, attrs } = ty;
        match kind {
            InstantiatedKind::Union { members } => {
                fold_union(simplify_union(members, self)).with_prepended_attrs(attrs)
            }
            other => InstantiatedType::new(other, attrs),
        }
    }

    /// `diagnostics()` (spec §6): every diagnostic raised while loading the
    /// project plus every one raised so far while instantiating.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = self.project.diagnostics.as_slice().to_vec();
        all.extend(self.diagnostics.lock().as_slice().iter().cloned());
        all
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
    use mcdoc_parse::ast::{AccessorKey, Index, StaticKey};

    use super::*;

    fn single_file(source: &str) -> LoadedProject {
        mcdoc_loader::load_project(&[FileInput {
            logical_folder: &[],
            file_stem: "a",
            display_path: "a.mcdoc",
            source,
        }])
    }

    #[test]
    fn resolve_finds_a_registered_declaration() {
        let engine = Engine::new(single_file("struct Foo {}"));
        let foo = CanonicalPath::root().joined(engine.interner().intern("Foo"));
        assert!(matches!(engine.resolve(&foo), Resolution::Found(_)));
    }

    #[test]
    fn resolve_reports_unknown_for_an_unregistered_path() {
        let engine = Engine::new(single_file("struct Foo {}"));
        let bar = CanonicalPath::root().joined(engine.interner().intern("Bar"));
        assert!(matches!(engine.resolve(&bar), Resolution::Unknown));
    }

    #[test]
    fn path_resolution_follows_super_across_files() {
        let files = vec![
            FileInput { logical_folder: &[], file_stem: "foo", display_path: "foo.mcdoc", source: "struct A {}" },
            FileInput {
                logical_folder: &["foo"],
                file_stem: "bar",
                display_path: "foo/bar.mcdoc",
                source: "type Bar = super::super::qux::Something",
            },
            FileInput {
                logical_folder: &[],
                file_stem: "qux",
                display_path: "qux.mcdoc",
                source: "struct Something {}",
            },
        ];
        let project = mcdoc_loader::load_project(&files);
        assert!(project.diagnostics.as_slice().is_empty());
        let engine = Engine::new(project);

        let bar_path = CanonicalPath::root()
            .joined(engine.interner().intern("foo"))
            .joined(engine.interner().intern("bar"))
            .joined(engine.interner().intern("Bar"));
        let result = engine.instantiate_path(&bar_path);
        assert!(matches!(&result.kind, InstantiatedKind::Struct { fields } if fields.is_empty()));
    }

    #[test]
    fn a_nested_module_file_sharing_a_flat_files_module_path_can_still_collide() {
        // `foo.mcdoc` and `foo/mod.mcdoc` both contribute to module `::foo`;
        // declaring the same name from both is a duplicate, earliest wins.
        let files = vec![
            FileInput { logical_folder: &[], file_stem: "foo", display_path: "foo.mcdoc", source: "struct Z {}" },
            FileInput { logical_folder: &["foo"], file_stem: "mod", display_path: "foo/mod.mcdoc", source: "struct Z {}" },
        ];
        let project = mcdoc_loader::load_project(&files);
        assert_eq!(
            project
                .diagnostics
                .as_slice()
                .iter()
                .filter(|d| d.code == mcdoc_diagnostic::DiagnosticCode::DuplicateDeclaration)
                .count(),
            1
        );
        let engine = Engine::new(project);
        let z = CanonicalPath::root().joined(engine.interner().intern("foo")).joined(engine.interner().intern("Z"));
        let Resolution::Found(decl) = engine.resolve(&z) else { panic!("expected the earliest declaration to win") };
        assert_eq!(decl.logical_path, "foo.mcdoc");
    }

    #[test]
    fn dispatch_resolves_a_static_key_and_falls_back_to_percent_unknown() {
        let engine = Engine::new(single_file(
            "dispatch minecraft:r[uniform] to struct { min?: int, max?: int }\ndispatch minecraft:r[%unknown] to any",
        ));
        let registry = ResourceLocation::new(engine.interner().intern("minecraft"), engine.interner().intern("r"));

        let uniform = engine.dispatch(registry, &[Index::Static(StaticKey::Ident(engine.interner().intern("uniform")))]);
        assert!(matches!(uniform.kind, InstantiatedKind::Struct { .. }));

        let missing = engine.dispatch(registry, &[Index::Static(StaticKey::Ident(engine.interner().intern("nope")))]);
        assert!(matches!(missing.kind, InstantiatedKind::Any));
    }

    #[test]
    fn a_missed_static_key_with_neither_percent_unknown_nor_percent_fallback_yields_the_case_union() {
        // No `%unknown`/`%fallback` registered: a miss must fall back to the
        // synthetic fallback union of every concrete case, not widen to `any`.
        let engine = Engine::new(single_file("dispatch minecraft:r[uniform] to struct { min?: int, max?: int }"));
        let registry = ResourceLocation::new(engine.interner().intern("minecraft"), engine.interner().intern("r"));

        let missing = engine.dispatch(registry, &[Index::Static(StaticKey::Ident(engine.interner().intern("nope")))]);
        assert!(missing.has_attr(engine.interner().intern(NONEXHAUSTIVE_ATTR)));
        // A single registered case folds out of the union wrapper (spec §4.5.2).
        assert!(matches!(missing.kind, InstantiatedKind::Struct { .. }));
    }

    #[test]
    fn dispatch_on_an_unknown_registry_is_diagnosed_and_falls_back_to_any() {
        let engine = Engine::new(single_file("struct Foo {}"));
        let registry = ResourceLocation::new(engine.interner().intern("minecraft"), engine.interner().intern("ghost"));
        let result = engine.dispatch(registry, &[Index::Static(StaticKey::Ident(engine.interner().intern("x")))]);
        assert!(matches!(result.kind, InstantiatedKind::Any));
        assert!(engine
            .diagnostics()
            .iter()
            .any(|d| d.code == mcdoc_diagnostic::DiagnosticCode::UnknownDispatcherRegistry));
    }

    #[test]
    fn dynamic_dispatch_index_yields_a_nonexhaustive_fallback_union() {
        let engine = Engine::new(single_file(
            "dispatch minecraft:r[uniform] to struct { min?: int }\ndispatch minecraft:r[binomial] to struct { n?: int }\ndispatch minecraft:r[%none] to any",
        ));
        let registry = ResourceLocation::new(engine.interner().intern("minecraft"), engine.interner().intern("r"));
        let chain = vec![AccessorKey::Ident(engine.interner().intern("type"))];
        let result = engine.dispatch(registry, &[Index::Dynamic(chain)]);

        assert!(result.has_attr(engine.interner().intern(NONEXHAUSTIVE_ATTR)));
        // `%none` is excluded from the dynamic fallback union (spec §4.4.1).
        let InstantiatedKind::Union { members } = &result.kind else {
            panic!("expected a fallback union of the two concrete cases");
        };
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn injection_is_visible_regardless_of_file_load_order() {
        let files = vec![
            FileInput {
                logical_folder: &[],
                file_stem: "b",
                display_path: "b.mcdoc",
                source: "inject struct ::Foo { b?: string }",
            },
            FileInput { logical_folder: &[], file_stem: "a", display_path: "a.mcdoc", source: "struct Foo { a: int }" },
        ];
        let project = mcdoc_loader::load_project(&files);
        assert!(project.diagnostics.as_slice().is_empty());
        let engine = Engine::new(project);

        let foo = CanonicalPath::root().joined(engine.interner().intern("Foo"));
        let result = engine.instantiate_path(&foo);
        let InstantiatedKind::Struct { fields } = &result.kind else { panic!("expected struct") };
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn unknown_reference_yields_an_error_sentinel_and_one_diagnostic() {
        let engine = Engine::new(single_file("struct Foo { x: ::DoesNotExist }"));
        let foo = CanonicalPath::root().joined(engine.interner().intern("Foo"));
        let result = engine.instantiate_path(&foo);
        let InstantiatedKind::Struct { fields } = &result.kind else { panic!("expected struct") };
        let forced = fields[0].ty.force(&engine);
        assert!(matches!(forced.kind, InstantiatedKind::Error));
        assert_eq!(
            engine
                .diagnostics()
                .iter()
                .filter(|d| d.code == mcdoc_diagnostic::DiagnosticCode::UnknownPath)
                .count(),
            1
        );
    }

    #[test]
    fn instantiate_path_caches_the_zero_argument_case() {
        let engine = Engine::new(single_file("struct Foo { x: int }"));
        let foo = CanonicalPath::root().joined(engine.interner().intern("Foo"));
        let first = engine.instantiate_path(&foo);
        let second = engine.instantiate_path(&foo);
        assert!(matches!(first.kind, InstantiatedKind::Struct { .. }));
        assert!(matches!(second.kind, InstantiatedKind::Struct { .. }));
    }
}
