//! Cost algebra: the value type every search quantity is expressed in.
//!
//! A cost is totally ordered, has a combine operator (`⊕`), an identity
//! element for `⊕`, and a maximal element standing for "unreachable".
//! Combining anything with the maximal element yields the maximal element.
//!
//! Implementations ship for `f64`, `u64` and `i64`. Float costs are ordered
//! with `f64::total_cmp`, so `NaN` sorts above `+inf` instead of poisoning
//! comparisons; callers that produce `NaN` costs violate the domain contract.

use std::cmp::Ordering;
use std::fmt::Debug;

/// Totally ordered cost with combine, identity and maximal element.
pub trait Cost: Copy + Debug {
    /// Identity element of [`Cost::combine`] (zero cost).
    fn identity() -> Self;

    /// Maximal element (infinite / unreachable cost).
    fn max_value() -> Self;

    /// The combine operator. Must saturate at [`Cost::max_value`].
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Scale by a non-negative factor (heuristic inflation).
    ///
    /// The maximal element stays maximal. Integer implementations keep finite
    /// values finite: an overflowing product is capped one below the maximal
    /// element.
    #[must_use]
    fn scale(self, factor: f64) -> Self;

    /// Total order over costs.
    fn cmp_cost(&self, other: &Self) -> Ordering;

    /// Canonical text form for audit artifacts.
    ///
    /// Canonical JSON carries integers only, so costs travel as strings.
    fn canonical_repr(&self) -> String {
        format!("{self:?}")
    }

    /// `true` if this is the maximal element.
    fn is_max(&self) -> bool {
        self.cmp_cost(&Self::max_value()) == Ordering::Equal
    }

    /// The smaller of two costs (`self` on ties).
    #[must_use]
    fn min_cost(self, other: Self) -> Self {
        if other.cmp_cost(&self) == Ordering::Less {
            other
        } else {
            self
        }
    }
}

/// Whole, non-negative factors small enough to multiply exactly as integers.
#[allow(clippy::cast_precision_loss)]
fn is_whole_factor(factor: f64) -> bool {
    factor.fract() == 0.0 && (0.0..=i64::MAX as f64).contains(&factor)
}

impl Cost for f64 {
    fn identity() -> Self {
        0.0
    }

    fn max_value() -> Self {
        f64::INFINITY
    }

    fn combine(self, other: Self) -> Self {
        self + other
    }

    fn scale(self, factor: f64) -> Self {
        if self.is_infinite() {
            self
        } else {
            self * factor
        }
    }

    fn cmp_cost(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl Cost for u64 {
    fn identity() -> Self {
        0
    }

    fn max_value() -> Self {
        u64::MAX
    }

    fn combine(self, other: Self) -> Self {
        self.saturating_add(other)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn scale(self, factor: f64) -> Self {
        if self == u64::MAX {
            return self;
        }
        let scaled = if is_whole_factor(factor) {
            self.saturating_mul(factor as u64)
        } else {
            // `as` saturates float-to-int conversions.
            (self as f64 * factor).round() as u64
        };
        scaled.min(u64::MAX - 1)
    }

    fn cmp_cost(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl Cost for i64 {
    fn identity() -> Self {
        0
    }

    fn max_value() -> Self {
        i64::MAX
    }

    fn combine(self, other: Self) -> Self {
        if self == i64::MAX || other == i64::MAX {
            return i64::MAX;
        }
        self.saturating_add(other)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn scale(self, factor: f64) -> Self {
        if self == i64::MAX {
            return self;
        }
        let scaled = if is_whole_factor(factor) {
            self.saturating_mul(factor as i64)
        } else {
            (self as f64 * factor).round() as i64
        };
        scaled.min(i64::MAX - 1)
    }

    fn cmp_cost(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}
