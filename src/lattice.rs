//! Lattice dominance over MLS levels.
//!
//! Level A dominates level B when A's sensitivity is at least B's and B's
//! categories are a subset of A's. Both halves are computed with `subtle`
//! primitives across every word of the category mask, so the time taken
//! does not depend on where (or whether) the sets differ.

use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater};

use crate::label::{CategorySet, MlsLevel, MlsRange, SecurityContext, SensitivityLevel};

/// `object ⊆ subject`, evaluated over all words without early exit.
pub fn covers_categories(subject: &CategorySet, object: &CategorySet) -> Choice {
    let mut masked = [0u64; crate::label::CATEGORY_WORDS];
    for (slot, (s, o)) in masked
        .iter_mut()
        .zip(subject.words().iter().zip(object.words()))
    {
        *slot = s & o;
    }
    masked[..].ct_eq(&object.words()[..])
}

/// `subject >= object` on sensitivity rank.
pub fn covers_sensitivity(subject: SensitivityLevel, object: SensitivityLevel) -> Choice {
    !object.value().ct_gt(&subject.value())
}

fn dominance(subject: &MlsLevel, object: &MlsLevel) -> Choice {
    covers_sensitivity(subject.sensitivity(), object.sensitivity())
        & covers_categories(subject.categories(), object.categories())
}

// ── Level ordering ──

impl MlsLevel {
    /// True iff `self` dominates `other` (`self >= other` in the lattice).
    pub fn dominates(&self, other: &Self) -> bool {
        dominance(self, other).into()
    }

    /// True iff `other` dominates `self`.
    pub fn dominated_by(&self, other: &Self) -> bool {
        dominance(other, self).into()
    }

    /// True when neither level dominates the other.
    pub fn is_incomparable(&self, other: &Self) -> bool {
        let either = dominance(self, other) | dominance(other, self);
        !bool::from(either)
    }

    /// Least upper bound: higher sensitivity, union of categories.
    #[must_use]
    pub fn lub(&self, other: &Self) -> Self {
        Self::new(
            self.sensitivity().max(other.sensitivity()),
            self.categories().union(other.categories()),
        )
    }

    /// Greatest lower bound: lower sensitivity, intersection of categories.
    #[must_use]
    pub fn glb(&self, other: &Self) -> Self {
        Self::new(
            self.sensitivity().min(other.sensitivity()),
            self.categories().intersection(other.categories()),
        )
    }
}

// ── Ranges and contexts ──

impl MlsRange {
    /// True iff `low <= level <= high`.
    pub fn contains(&self, level: &MlsLevel) -> bool {
        let inside = dominance(level, self.low()) & dominance(self.high(), level);
        inside.into()
    }
}

impl SecurityContext {
    /// Compare effective levels: does this subject dominate `object`?
    ///
    /// User, role and type play no part; type enforcement is the kernel's
    /// concern.
    pub fn dominates(&self, object: &Self) -> bool {
        self.level().dominates(object.level())
    }
}
