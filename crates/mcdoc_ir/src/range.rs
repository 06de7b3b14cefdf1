//! Integer and float ranges with independent inclusive/exclusive endpoints.
//!
//! Either endpoint may be absent (open). An absent endpoint is always treated
//! as unbounded, regardless of the exclusive flag on that side.

/// A range over `i64`, used for integral numeric kinds and for length ranges
/// (string/list/array/prim-array lengths, which are always non-negative
/// integers).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct IntRange {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
    pub exclusive_lower: bool,
    pub exclusive_upper: bool,
}

impl IntRange {
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exact(value: i64) -> Self {
        IntRange {
            lower: Some(value),
            upper: Some(value),
            exclusive_lower: false,
            exclusive_upper: false,
        }
    }

    #[must_use]
    pub fn contains(&self, v: i64) -> bool {
        let lower_ok = match self.lower {
            None => true,
            Some(l) if self.exclusive_lower => v > l,
            Some(l) => v >= l,
        };
        let upper_ok = match self.upper {
            None => true,
            Some(u) if self.exclusive_upper => v < u,
            Some(u) => v <= u,
        };
        lower_ok && upper_ok
    }

    /// The effective inclusive lower bound, or `None` if unbounded.
    #[must_use]
    fn effective_lower(&self) -> Option<i64> {
        self.lower.map(|l| if self.exclusive_lower { l + 1 } else { l })
    }

    /// The effective inclusive upper bound, or `None` if unbounded.
    #[must_use]
    fn effective_upper(&self) -> Option<i64> {
        self.upper.map(|u| if self.exclusive_upper { u - 1 } else { u })
    }

    /// `true` if no integer satisfies this range (e.g. `1<..<2`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match (self.effective_lower(), self.effective_upper()) {
            (Some(l), Some(u)) => l > u,
            _ => false,
        }
    }

    /// `self ⊆ other`: every integer satisfying `self` also satisfies `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &IntRange) -> bool {
        if self.is_empty() {
            return true;
        }
        let self_lower = self.effective_lower();
        let self_upper = self.effective_upper();
        let other_lower = other.effective_lower();
        let other_upper = other.effective_upper();

        let lower_ok = match (self_lower, other_lower) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a >= b,
        };
        let upper_ok = match (self_upper, other_upper) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a <= b,
        };
        lower_ok && upper_ok
    }
}

/// A range over `f64`, used for `float`/`double` value ranges.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct FloatRange {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub exclusive_lower: bool,
    pub exclusive_upper: bool,
}

impl FloatRange {
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, v: f64) -> bool {
        let lower_ok = match self.lower {
            None => true,
            Some(l) if self.exclusive_lower => v > l,
            Some(l) => v >= l,
        };
        let upper_ok = match self.upper {
            None => true,
            Some(u) if self.exclusive_upper => v < u,
            Some(u) => v <= u,
        };
        lower_ok && upper_ok
    }

    /// `true` if the interval described by the bounds is empty. Unlike
    /// `IntRange`, this only catches the degenerate `lower > upper` or the
    /// single-point-excluded-twice case; floats are dense so `1.0<..<1.1` is
    /// non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match (self.lower, self.upper) {
            (Some(l), Some(u)) => {
                l > u || (l == u && (self.exclusive_lower || self.exclusive_upper))
            }
            _ => false,
        }
    }

    /// `self ⊆ other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &FloatRange) -> bool {
        if self.is_empty() {
            return true;
        }
        let lower_ok = match (self.lower, other.lower) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => {
                a > b || (a == b && (self.exclusive_lower || !other.exclusive_lower))
            }
        };
        let upper_ok = match (self.upper, other.upper) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => {
                a < b || (a == b && (self.exclusive_upper || !other.exclusive_upper))
            }
        };
        lower_ok && upper_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_int_range_between_adjacent_ints_is_empty() {
        let r = IntRange {
            lower: Some(1),
            upper: Some(2),
            exclusive_lower: true,
            exclusive_upper: true,
        };
        assert!(r.is_empty());
        assert!(!r.contains(1));
        assert!(!r.contains(2));
    }

    #[test]
    fn inclusive_int_range_contains_endpoints() {
        let r = IntRange {
            lower: Some(1),
            upper: Some(5),
            exclusive_lower: false,
            exclusive_upper: false,
        };
        assert!(r.contains(1));
        assert!(r.contains(5));
        assert!(!r.contains(0));
        assert!(!r.contains(6));
    }

    #[test]
    fn int_subset_requires_tighter_bounds() {
        let narrow = IntRange {
            lower: Some(2),
            upper: Some(4),
            ..Default::default()
        };
        let wide = IntRange {
            lower: Some(0),
            upper: Some(10),
            ..Default::default()
        };
        assert!(narrow.is_subset_of(&wide));
        assert!(!wide.is_subset_of(&narrow));
    }

    #[test]
    fn unbounded_range_is_subset_only_of_unbounded() {
        let unbounded = IntRange::unbounded();
        let bounded = IntRange {
            lower: Some(0),
            upper: Some(10),
            ..Default::default()
        };
        assert!(!unbounded.is_subset_of(&bounded));
        assert!(bounded.is_subset_of(&unbounded));
    }

    #[test]
    fn empty_range_is_subset_of_anything() {
        let empty = IntRange {
            lower: Some(5),
            upper: Some(1),
            ..Default::default()
        };
        let other = IntRange {
            lower: Some(100),
            upper: Some(200),
            ..Default::default()
        };
        assert!(empty.is_subset_of(&other));
    }

    #[test]
    fn float_range_equal_bound_exclusive_is_empty() {
        let r = FloatRange {
            lower: Some(1.0),
            upper: Some(1.0),
            exclusive_lower: true,
            exclusive_upper: false,
        };
        assert!(r.is_empty());
    }

    #[test]
    fn float_subset_of_self_holds() {
        let r = FloatRange {
            lower: Some(0.0),
            upper: Some(1.0),
            ..Default::default()
        };
        assert!(r.is_subset_of(&r));
    }
}
