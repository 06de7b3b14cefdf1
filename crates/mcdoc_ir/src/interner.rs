//! String interner for identifiers, resource location segments, and literal strings.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;

/// An interned string.
///
/// Two `Symbol`s compare equal iff their underlying text is equal, in O(1),
/// without touching the interner.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// The empty string. Always interned at index 0.
    pub const EMPTY: Symbol = Symbol(0);
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

struct InternerData {
    map: FxHashMap<&'static str, Symbol>,
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// Leaks string storage (bounded by total distinct source text across a
/// project), trading a bit of memory for `&'static str` access without
/// lifetimes threaded through the whole pipeline.
pub struct Interner {
    data: RwLock<InternerData>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        map.insert("", Symbol::EMPTY);
        Interner {
            data: RwLock::new(InternerData {
                map,
                strings: vec![""],
            }),
        }
    }

    pub fn intern(&self, s: &str) -> Symbol {
        if let Some(sym) = self.data.read().map.get(s) {
            return *sym;
        }
        let mut data = self.data.write();
        if let Some(sym) = data.map.get(s) {
            return *sym;
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let sym = Symbol(
            u32::try_from(data.strings.len()).expect("interner overflowed u32::MAX strings"),
        );
        data.strings.push(leaked);
        data.map.insert(leaked, sym);
        sym
    }

    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &'static str {
        self.data.read().strings[sym.0 as usize]
    }
}
