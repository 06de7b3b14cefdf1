//! Canonical path derivation and resolution.
//!
//! A source file contributes a module path built from the folder chain the
//! caller hands in plus its own file stem; a file stem of `mod` contributes
//! no segment of its own; (the folder *is* the module). Resolving a
//! source-level `mcdoc_parse::ast::Path` against a module and its `use` map
//! turns it into a `mcdoc_ir::CanonicalPath` the symbol table can look up.

use mcdoc_ir::{CanonicalPath, Interner, Symbol};
use mcdoc_parse::ast::Path as AstPath;
use rustc_hash::FxHashMap;

/// A file's `use` aliases: alias name to the canonical path it stands for.
pub type UseMap = FxHashMap<Symbol, CanonicalPath>;

/// Build the canonical module path a file's declarations live under.
#[must_use]
pub fn module_path(interner: &Interner, logical_folder: &[&str], file_stem: &str) -> CanonicalPath {
    let mut path = CanonicalPath::root();
    for segment in logical_folder {
        path = path.joined(interner.intern(segment));
    }
    if file_stem != "mod" {
        path = path.joined(interner.intern(file_stem));
    }
    path
}

#[derive(Debug)]
pub enum ResolveError {
    /// `super` was applied more times than the current module has segments.
    SuperPastRoot,
}

/// Resolve a source-level path against the module it appears in.
///
/// Absolute paths (`::foo::bar`) are taken as canonical paths directly.
/// Relative paths pop one segment off `current_module` per leading `super`,
/// then — unless the first remaining segment matches an entry in `use_map` —
/// append the rest onto whatever's left of the module path. A bare
/// `super::super` with no trailing segments resolves to the popped module
/// itself.
pub fn resolve_path(
    current_module: &CanonicalPath,
    use_map: &UseMap,
    path: &AstPath,
) -> Result<CanonicalPath, ResolveError> {
    if path.absolute {
        return Ok(CanonicalPath::from_segments(path.segments.clone()));
    }

    let mut base = current_module.clone();
    for _ in 0..path.supers {
        base = base.popped().ok_or(ResolveError::SuperPastRoot)?;
    }

    let Some((&first, rest)) = path.segments.split_first() else {
        return Ok(base);
    };

    if let Some(aliased) = use_map.get(&first) {
        let mut resolved = aliased.clone();
        for &segment in rest {
            resolved = resolved.joined(segment);
        }
        return Ok(resolved);
    }

    let mut resolved = base;
    for &segment in &path.segments {
        resolved = resolved.joined(segment);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_file_contributes_no_segment() {
        let interner = Interner::new();
        let path = module_path(&interner, &["foo", "bar"], "mod");
        assert_eq!(
            path.display(|s| interner.resolve(s)),
            "::foo::bar"
        );
    }

    #[test]
    fn named_file_appends_its_stem() {
        let interner = Interner::new();
        let path = module_path(&interner, &["foo"], "bar");
        assert_eq!(path.display(|s| interner.resolve(s)), "::foo::bar");
    }

    #[test]
    fn absolute_path_ignores_current_module() {
        let interner = Interner::new();
        let current = module_path(&interner, &["foo", "bar"], "mod");
        let target = AstPath {
            absolute: true,
            supers: 0,
            segments: vec![interner.intern("qux")],
        };
        let resolved = resolve_path(&current, &FxHashMap::default(), &target).unwrap();
        assert_eq!(resolved.display(|s| interner.resolve(s)), "::qux");
    }

    #[test]
    fn super_chain_pops_and_appends() {
        let interner = Interner::new();
        let current = module_path(&interner, &["foo"], "bar");
        let target = AstPath {
            absolute: false,
            supers: 2,
            segments: vec![interner.intern("qux"), interner.intern("Something")],
        };
        let resolved = resolve_path(&current, &FxHashMap::default(), &target).unwrap();
        assert_eq!(
            resolved.display(|s| interner.resolve(s)),
            "::qux::Something"
        );
    }

    #[test]
    fn super_past_root_is_an_error() {
        let interner = Interner::new();
        let current = CanonicalPath::root();
        let target = AstPath {
            absolute: false,
            supers: 1,
            segments: vec![],
        };
        assert!(matches!(
            resolve_path(&current, &FxHashMap::default(), &target),
            Err(ResolveError::SuperPastRoot)
        ));
    }

    #[test]
    fn use_alias_replaces_first_segment() {
        let interner = Interner::new();
        let current = module_path(&interner, &["foo"], "bar");
        let mut use_map = FxHashMap::default();
        let alias = interner.intern("U");
        let aliased_target = CanonicalPath::root()
            .joined(interner.intern("elsewhere"))
            .joined(interner.intern("Thing"));
        use_map.insert(alias, aliased_target);

        let target = AstPath {
            absolute: false,
            supers: 0,
            segments: vec![alias, interner.intern("Variant")],
        };
        let resolved = resolve_path(&current, &use_map, &target).unwrap();
        assert_eq!(
            resolved.display(|s| interner.resolve(s)),
            "::elsewhere::Thing::Variant"
        );
    }
}
