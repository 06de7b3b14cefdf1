//! The project-wide dispatch registry: `registry[key] -> TypeExpr`.
//!
//! Built additively from every `dispatch` statement across the whole
//! project; registries are never scoped by `use` or by the module the
//! statement appears in.

use mcdoc_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticQueue};
use mcdoc_ir::{ResourceLocation, Span};
use mcdoc_parse::ast::{GenericParams, StaticKey, TypeExpr};
use rustc_hash::FxHashMap;

/// One `dispatch registry[key] <T,…>? to TypeExpr` registration.
///
/// `target`'s `Path`s are already absolute by the time this is registered;
/// see [`crate::resolve`].
#[derive(Clone, Debug)]
pub struct DispatchCase {
    pub target: TypeExpr,
    pub generics: GenericParams,
    pub logical_path: String,
    pub load_order: usize,
    pub span: Span,
}

#[derive(Default)]
pub struct DispatchRegistry {
    registries: FxHashMap<ResourceLocation, FxHashMap<StaticKey, DispatchCase>>,
}

impl DispatchRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        registry: ResourceLocation,
        key: StaticKey,
        case: DispatchCase,
        diagnostics: &mut DiagnosticQueue,
    ) {
        let cases = self.registries.entry(registry).or_default();
        if let Some(existing) = cases.get(&key) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::DuplicateDispatchKey,
                case.logical_path.clone(),
                case.span,
                format!(
                    "duplicate dispatch key; first registered in {}",
                    existing.logical_path
                ),
            ));
            return;
        }
        cases.insert(key, case);
    }

    #[must_use]
    pub fn cases(&self, registry: &ResourceLocation) -> Option<&FxHashMap<StaticKey, DispatchCase>> {
        self.registries.get(registry)
    }

    #[must_use]
    pub fn case(&self, registry: &ResourceLocation, key: &StaticKey) -> Option<&DispatchCase> {
        self.registries.get(registry)?.get(key)
    }

    #[must_use]
    pub fn is_known_registry(&self, registry: &ResourceLocation) -> bool {
        self.registries.contains_key(registry)
    }
}
