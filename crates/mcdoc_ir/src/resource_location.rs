//! Resource locations (`namespace:path/segments`), the key type for dispatcher registries.

use crate::Symbol;
use std::fmt;

/// A `namespace:path` identifier, distinguished from a plain identifier only
/// by the presence of a `:` in the source token.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResourceLocation {
    pub namespace: Symbol,
    pub path: Symbol,
}

impl ResourceLocation {
    #[must_use]
    pub fn new(namespace: Symbol, path: Symbol) -> Self {
        ResourceLocation { namespace, path }
    }

    #[must_use]
    pub fn display<'a>(&self, resolve: impl Fn(Symbol) -> &'a str) -> String {
        format!("{}:{}", resolve(self.namespace), resolve(self.path))
    }
}

impl fmt::Debug for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceLocation({:?}:{:?})", self.namespace, self.path)
    }
}
