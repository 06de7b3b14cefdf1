//! Instantiation memoization.
//!
//! Only the zero-type-argument case is cached, keyed by canonical path.
//! `TypeExpr` has no `Eq`/`Hash` impl (it carries `f64` through numeric
//! literals and ranges), so a generic instantiation's actual type arguments
//! can't cheaply become part of a hash key; those are recomputed on every
//! call instead. Correctness never depends on this cache, only on repeated
//! work for the common non-generic case being avoided (spec §5's
//! single-flight description, narrowed to what a hashable key supports).
//!
//! `dashmap`'s sharded locking already gives the "first writer computes,
//! later readers see the published value" behavior spec §5 asks for: two
//! threads racing to instantiate the same path either both compute and the
//! second overwrite is harmless (instantiation is pure), or one blocks on
//! the other's shard lock.

use dashmap::DashMap;
use mcdoc_ir::CanonicalPath;

use crate::instantiated::InstantiatedType;

#[derive(Default)]
pub struct InstantiationCache {
    entries: DashMap<CanonicalPath, InstantiatedType>,
}

impl InstantiationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, path: &CanonicalPath) -> Option<InstantiatedType> {
        self.entries.get(path).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, path: CanonicalPath, ty: InstantiatedType) {
        self.entries.insert(path, ty);
    }
}
