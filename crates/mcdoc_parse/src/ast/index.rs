use mcdoc_ir::{ResourceLocation, Symbol};

/// A static index key: either one of the three special keys, or a concrete
/// identifier/string/resource-location key.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum StaticKey {
    Fallback,
    None,
    Unknown,
    Ident(Symbol),
    Str(Symbol),
    ResLoc(ResourceLocation),
}

/// One step of a dynamic accessor: `%key`, `%parent`, or a named field step.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AccessorKey {
    Key,
    Parent,
    Ident(Symbol),
    Str(Symbol),
}

#[derive(Clone, Debug)]
pub enum Index {
    Static(StaticKey),
    /// A non-empty accessor chain.
    Dynamic(Vec<AccessorKey>),
}
