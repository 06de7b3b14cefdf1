//! Canonical, root-anchored module paths.

use crate::Symbol;
use std::fmt;

/// A canonical path: a non-empty sequence of identifier segments, always
/// rooted (an implicit leading `::` that is never stored).
///
/// Produced by the loader (`mcdoc_loader`) when it derives a declaration's
/// fully-qualified name, and by the resolver when it turns a source-level
/// `Path` (relative or absolute, possibly prefixed by `super`) into a
/// canonical one.
#[derive(Clone, Eq, PartialEq, Hash, Default)]
pub struct CanonicalPath {
    segments: Vec<Symbol>,
}

impl CanonicalPath {
    #[must_use]
    pub fn root() -> Self {
        CanonicalPath {
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_segments(segments: Vec<Symbol>) -> Self {
        CanonicalPath { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Symbol] {
        &self.segments
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<Symbol> {
        self.segments.last().copied()
    }

    #[must_use]
    pub fn joined(&self, segment: Symbol) -> CanonicalPath {
        let mut segments = self.segments.clone();
        segments.push(segment);
        CanonicalPath { segments }
    }

    /// Pop one segment, as the `super` keyword does.
    ///
    /// Returns `None` if the path is already the root (`super-past-root`).
    #[must_use]
    pub fn popped(&self) -> Option<CanonicalPath> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(CanonicalPath { segments })
    }

    #[must_use]
    pub fn display<'a>(&'a self, resolve: impl Fn(Symbol) -> &'a str + 'a) -> String {
        let mut s = String::from("::");
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                s.push_str("::");
            }
            s.push_str(resolve(*seg));
        }
        s
    }
}

impl fmt::Debug for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::")?;
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "::")?;
            }
            write!(f, "{seg:?}")?;
        }
        Ok(())
    }
}
