//! The assignability relation `A ⊆ B` (spec §4.5.1).
//!
//! Operates purely on already-instantiated types: `InstantiatedType` has no
//! `Reference`/`Dispatcher`/`Indexed` variant, so the "re-instantiate first"
//! step the spec calls out for those forms has already happened by the time
//! anything reaches here.

use mcdoc_ir::{IntRange, NumberValue, NumericKind, TypedNumber};
use mcdoc_parse::ast::ValueRange;

use crate::instantiated::{InstantiatedField, InstantiatedFieldKey, InstantiatedKind, InstantiatedType};
use crate::Engine;

/// Host hook consulted before the default rules (spec §6): lets a data
/// format's validator special-case its own numeric-kind equivalences, and
/// pick whether `any` behaves like `unsafe` by default.
pub trait ValidatorProfile: Send + Sync {
    /// Return `Some(verdict)` to short-circuit the default rules entirely
    /// for this pair, or `None` to fall through to them.
    fn override_assignability(&self, a: &InstantiatedType, b: &InstantiatedType) -> Option<bool>;

    /// Whether `any` should behave identically to `unsafe` (top and
    /// bottom) under this profile. Most hosts want `false`.
    fn default_any_is_unsafe(&self) -> bool {
        false
    }
}

fn int_range_subset(a: &Option<IntRange>, b: &Option<IntRange>) -> bool {
    match (a, b) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(a), Some(b)) => a.is_subset_of(b),
    }
}

fn value_range_subset(a: &Option<ValueRange>, b: &Option<ValueRange>) -> bool {
    match (a, b) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(ValueRange::Int(a)), Some(ValueRange::Int(b))) => a.is_subset_of(b),
        (Some(ValueRange::Float(a)), Some(ValueRange::Float(b))) => a.is_subset_of(b),
        _ => false,
    }
}

fn number_satisfies(n: TypedNumber, range: &Option<ValueRange>) -> bool {
    match range {
        None => true,
        Some(ValueRange::Int(r)) => match n.value {
            NumberValue::Int(v) => r.contains(v),
            NumberValue::Float(_) => false,
        },
        Some(ValueRange::Float(r)) => r.contains(n.value.as_f64()),
    }
}

fn string_len_satisfies(engine: &Engine, s: mcdoc_ir::Symbol, len_range: &Option<IntRange>) -> bool {
    match len_range {
        None => true,
        Some(r) => r.contains(engine.interner().resolve(s).chars().count() as i64),
    }
}

fn struct_subset(a_fields: &[InstantiatedField], b_fields: &[InstantiatedField], engine: &Engine) -> bool {
    for bf in b_fields {
        let key = match &bf.key {
            InstantiatedFieldKey::Ident(s) | InstantiatedFieldKey::Str(s) => Some(*s),
            InstantiatedFieldKey::Computed(_) => None,
        };
        let Some(key) = key else {
            // A computed key on the target side can't be checked structurally.
            if bf.optional {
                continue;
            }
            return false;
        };
        match a_fields.iter().find(|af| af.static_key_matches(key)) {
            Some(af) => {
                if !assignable(&af.ty.force(engine), &bf.ty.force(engine), engine) {
                    return false;
                }
            }
            None => {
                if !bf.optional {
                    return false;
                }
            }
        }
    }
    true
}

fn enum_variant_values_subset(
    a: &[mcdoc_parse::ast::EnumVariant],
    b: &[mcdoc_parse::ast::EnumVariant],
) -> bool {
    use mcdoc_parse::ast::EnumVariantValue as V;
    a.iter().all(|av| {
        b.iter().any(|bv| match (&av.value, &bv.value) {
            (V::Number(x), V::Number(y)) => x.kind == y.kind && number_value_eq(x.value, y.value),
            (V::Str(x), V::Str(y)) => x == y,
            _ => false,
        })
    })
}

fn number_value_eq(a: NumberValue, b: NumberValue) -> bool {
    match (a, b) {
        (NumberValue::Int(a), NumberValue::Int(b)) => a == b,
        (NumberValue::Float(a), NumberValue::Float(b)) => a.to_bits() == b.to_bits(),
        _ => false,
    }
}

/// `A ⊆ B`.
#[must_use]
pub fn assignable(a: &InstantiatedType, b: &InstantiatedType, engine: &Engine) -> bool {
    if let Some(profile) = engine.validator() {
        if let Some(verdict) = profile.override_assignability(a, b) {
            return verdict;
        }
    }

    let any_is_unsafe = engine.default_any_is_unsafe();
    let is_top_bottom = |t: &InstantiatedType| {
        matches!(t.kind, InstantiatedKind::Unsafe) || (any_is_unsafe && matches!(t.kind, InstantiatedKind::Any))
    };
    if is_top_bottom(a) || is_top_bottom(b) {
        return true;
    }
    if matches!(a.kind, InstantiatedKind::Bottom) {
        return true;
    }
    if matches!(b.kind, InstantiatedKind::Any) {
        return true;
    }
    if matches!(a.kind, InstantiatedKind::Any) {
        return false;
    }

    // A union on the left: every member must fit B (which may itself be a
    // union — that recursion happens through the match arms below).
    if let InstantiatedKind::Union { members } = &a.kind {
        return members.iter().all(|m| assignable(&m.ty, b, engine));
    }
    // A union on the right, A not a union: some member must admit A.
    if let InstantiatedKind::Union { members } = &b.kind {
        return members.iter().any(|m| assignable(a, &m.ty, engine));
    }

    match (&a.kind, &b.kind) {
        (InstantiatedKind::Boolean, InstantiatedKind::Boolean) => true,
        (InstantiatedKind::LiteralBool(_), InstantiatedKind::Boolean) => true,
        (InstantiatedKind::LiteralBool(x), InstantiatedKind::LiteralBool(y)) => x == y,
        (InstantiatedKind::LiteralString(x), InstantiatedKind::LiteralString(y)) => x == y,
        (InstantiatedKind::LiteralString(s), InstantiatedKind::StringT { len_range }) => {
            string_len_satisfies(engine, *s, len_range)
        }
        (InstantiatedKind::StringT { len_range: a }, InstantiatedKind::StringT { len_range: b }) => {
            int_range_subset(a, b)
        }
        (InstantiatedKind::LiteralNumber(n), InstantiatedKind::Numeric { kind, value_range }) => {
            n.kind == *kind && number_satisfies(*n, value_range)
        }
        (InstantiatedKind::LiteralNumber(x), InstantiatedKind::LiteralNumber(y)) => {
            x.kind == y.kind && number_value_eq(x.value, y.value)
        }
        (
            InstantiatedKind::Numeric { kind: ka, value_range: ra },
            InstantiatedKind::Numeric { kind: kb, value_range: rb },
        ) => ka == kb && value_range_subset(ra, rb),
        (
            InstantiatedKind::PrimArray { elem_kind: ka, elem_range: era, len_range: lra },
            InstantiatedKind::PrimArray { elem_kind: kb, elem_range: erb, len_range: lrb },
        ) => ka == kb && int_range_subset(era, erb) && int_range_subset(lra, lrb),
        (
            InstantiatedKind::List { elem: ea, len_range: la },
            InstantiatedKind::List { elem: eb, len_range: lb },
        ) => int_range_subset(la, lb) && assignable(&ea.force(engine), &eb.force(engine), engine),
        (InstantiatedKind::Tuple { elems: ea }, InstantiatedKind::Tuple { elems: eb }) => {
            ea.len() == eb.len()
                && ea
                    .iter()
                    .zip(eb)
                    .all(|(x, y)| assignable(&x.force(engine), &y.force(engine), engine))
        }
        (InstantiatedKind::Struct { fields: fa }, InstantiatedKind::Struct { fields: fb }) => {
            struct_subset(fa, fb, engine)
        }
        (
            InstantiatedKind::Enum { base_kind: ka, variants: va },
            InstantiatedKind::Enum { base_kind: kb, variants: vb },
        ) => ka == kb && enum_variant_values_subset(va, vb),
        _ => false,
    }
}

/// `true` if every numeric kind is mutually assignable — grounds a
/// JSON-flavored host, which has no wire distinction between numeric kinds.
pub struct JsonValidatorProfile;

impl ValidatorProfile for JsonValidatorProfile {
    fn override_assignability(&self, a: &InstantiatedType, b: &InstantiatedType) -> Option<bool> {
        match (&a.kind, &b.kind) {
            (InstantiatedKind::Numeric { .. }, InstantiatedKind::Numeric { .. }) => Some(true),
            (InstantiatedKind::LiteralNumber(_), InstantiatedKind::Numeric { .. }) => Some(true),
            _ => None,
        }
    }
}

/// `boolean ≡ byte @ 0..1 ⊂ byte` — grounds an NBT-flavored host, which
/// encodes booleans as a range-restricted byte.
pub struct NbtValidatorProfile;

impl ValidatorProfile for NbtValidatorProfile {
    fn override_assignability(&self, a: &InstantiatedType, b: &InstantiatedType) -> Option<bool> {
        let is_restricted_byte = |t: &InstantiatedType| {
            matches!(
                &t.kind,
                InstantiatedKind::Numeric { kind: NumericKind::Byte, value_range: Some(ValueRange::Int(r)) }
                    if *r == IntRange { lower: Some(0), upper: Some(1), exclusive_lower: false, exclusive_upper: false }
            )
        };
        match (&a.kind, &b.kind) {
            (InstantiatedKind::Boolean, InstantiatedKind::Numeric { kind: NumericKind::Byte, .. }) => Some(true),
            (_, _) if matches!(a.kind, InstantiatedKind::Boolean) && is_restricted_byte(b) => Some(true),
            (_, _) if is_restricted_byte(a) && matches!(b.kind, InstantiatedKind::Boolean) => Some(true),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use mcdoc_ir::NumberValue;
    use mcdoc_parse::ast::ValueRange;

    use super::*;
    use crate::Engine;

    fn test_engine() -> Engine {
        Engine::new(mcdoc_loader::load_project(&[]))
    }

    fn numeric(kind: NumericKind, range: Option<ValueRange>) -> InstantiatedType {
        InstantiatedType::new(InstantiatedKind::Numeric { kind, value_range: range }, Vec::new())
    }

    fn literal(kind: NumericKind, value: NumberValue) -> InstantiatedType {
        InstantiatedType::new(InstantiatedKind::LiteralNumber(TypedNumber::new(kind, value)), Vec::new())
    }

    #[test]
    fn bottom_is_assignable_to_everything() {
        let engine = test_engine();
        let bottom = InstantiatedType::bottom();
        for target in [
            InstantiatedType::any(),
            InstantiatedType::unsafe_top(),
            numeric(NumericKind::Int, None),
            InstantiatedType::new(InstantiatedKind::Boolean, Vec::new()),
        ] {
            assert!(assignable(&bottom, &target, &engine));
        }
    }

    #[test]
    fn everything_is_assignable_to_any() {
        let engine = test_engine();
        let any = InstantiatedType::any();
        for source in [
            InstantiatedType::bottom(),
            InstantiatedType::unsafe_top(),
            numeric(NumericKind::Long, None),
            InstantiatedType::new(InstantiatedKind::Boolean, Vec::new()),
        ] {
            assert!(assignable(&source, &any, &engine));
        }
    }

    #[test]
    fn assignability_is_reflexive() {
        let engine = test_engine();
        for t in [
            InstantiatedType::any(),
            InstantiatedType::unsafe_top(),
            InstantiatedType::bottom(),
            InstantiatedType::new(InstantiatedKind::Boolean, Vec::new()),
            numeric(NumericKind::Double, None),
        ] {
            assert!(assignable(&t, &t, &engine));
        }
    }

    #[test]
    fn unsafe_is_top_and_bottom() {
        let engine = test_engine();
        let boolean = InstantiatedType::new(InstantiatedKind::Boolean, Vec::new());
        let u = InstantiatedType::unsafe_top();
        assert!(assignable(&u, &boolean, &engine));
        assert!(assignable(&boolean, &u, &engine));
    }

    #[test]
    fn any_is_not_unsafe_by_default() {
        let engine = test_engine();
        let any = InstantiatedType::any();
        let boolean = InstantiatedType::new(InstantiatedKind::Boolean, Vec::new());
        assert!(assignable(&boolean, &any, &engine), "any is always top");
        assert!(!assignable(&any, &boolean, &engine), "any is bottom only when toggled");
    }

    #[test]
    fn any_behaves_as_unsafe_when_toggled() {
        let engine = Engine::new(mcdoc_loader::load_project(&[])).with_default_any_is_unsafe(true);
        let any = InstantiatedType::any();
        let boolean = InstantiatedType::new(InstantiatedKind::Boolean, Vec::new());
        assert!(assignable(&any, &boolean, &engine));
    }

    #[test]
    fn literal_number_within_numeric_range_is_assignable() {
        let engine = test_engine();
        let range = ValueRange::Int(IntRange { lower: Some(0), upper: Some(10), exclusive_lower: false, exclusive_upper: false });
        let target = numeric(NumericKind::Int, Some(range));

        let inside = literal(NumericKind::Int, NumberValue::Int(5));
        assert!(assignable(&inside, &target, &engine));

        let outside = literal(NumericKind::Int, NumberValue::Int(20));
        assert!(!assignable(&outside, &target, &engine));
    }

    #[test]
    fn struct_width_subtyping_tolerates_extra_fields() {
        let engine = test_engine();
        let interner = engine.interner();
        let a_key = interner.intern("a");
        let b_key = interner.intern("b");

        let field = |key| InstantiatedField {
            key: InstantiatedFieldKey::Ident(key),
            optional: false,
            ty: crate::instantiated::LazyChild::new(
                mcdoc_parse::ast::TypeExpr {
                    kind: mcdoc_parse::ast::TypeExprKind::Boolean,
                    attrs: Vec::new(),
                    span: mcdoc_ir::Span::DUMMY,
                },
                crate::Env::root(),
                std::sync::Arc::from("<test>"),
            ),
            attrs: Vec::new(),
        };

        let wide = InstantiatedType::new(
            InstantiatedKind::Struct { fields: vec![field(a_key), field(b_key)] },
            Vec::new(),
        );
        let narrow = InstantiatedType::new(InstantiatedKind::Struct { fields: vec![field(a_key)] }, Vec::new());

        assert!(assignable(&wide, &narrow, &engine), "extra fields on the source are tolerated");
        assert!(!assignable(&narrow, &wide, &engine), "a required field missing on the source is rejected");
    }

    #[test]
    fn json_profile_treats_every_numeric_kind_as_mutually_assignable() {
        let engine = Engine::new(mcdoc_loader::load_project(&[])).with_validator(Box::new(JsonValidatorProfile));
        let int_ty = numeric(NumericKind::Int, None);
        let double_ty = numeric(NumericKind::Double, None);
        assert!(assignable(&int_ty, &double_ty, &engine));
        assert!(assignable(&double_ty, &int_ty, &engine));
    }

    #[test]
    fn nbt_profile_treats_boolean_as_a_restricted_byte() {
        let engine = Engine::new(mcdoc_loader::load_project(&[])).with_validator(Box::new(NbtValidatorProfile));
        let boolean = InstantiatedType::new(InstantiatedKind::Boolean, Vec::new());
        let byte = numeric(NumericKind::Byte, None);
        assert!(assignable(&boolean, &byte, &engine));
        assert_eq!(assignable(&byte, &boolean, &engine), false);
    }
}
