//! Core data types shared across the mcdoc engine.
//!
//! This crate holds the vocabulary every other stage speaks: source spans,
//! interned identifiers, canonical module paths, resource locations, and
//! numeric literal representations. It has no knowledge of grammar, syntax
//! trees, or type instantiation — those live in `mcdoc_parse`, `mcdoc_loader`,
//! and `mcdoc_types` respectively.

mod interner;
mod number;
mod path;
mod range;
mod resource_location;
mod span;
pub mod token;

pub use interner::{Interner, Symbol};
pub use number::{NumberValue, NumericKind, PrimArrayKind, TypedNumber};
pub use path::CanonicalPath;
pub use range::{FloatRange, IntRange};
pub use resource_location::ResourceLocation;
pub use span::Span;
pub use token::{Keyword, NumberToken, Token, TokenKind};
