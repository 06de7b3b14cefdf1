use mcdoc_ir::Symbol;

/// A source-level path: `::foo::bar`, `super::super::foo`, or `foo::bar`.
///
/// Resolved against the current module and the file's `use` map by
/// `mcdoc_loader` into a `mcdoc_ir::CanonicalPath`.
#[derive(Clone, Debug)]
pub struct Path {
    pub absolute: bool,
    pub supers: u32,
    pub segments: Vec<Symbol>,
}

impl Path {
    #[must_use]
    pub fn relative(segments: Vec<Symbol>) -> Self {
        Path {
            absolute: false,
            supers: 0,
            segments,
        }
    }
}
