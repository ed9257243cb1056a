//! MCS categories and the fixed-width category bitmask.
//!
//! The kernel keeps categories in a sparse `ebitmap`. Userland can afford a
//! dense 1024-bit array instead, which makes every set operation a fixed
//! number of word operations regardless of how many categories are present.

use std::fmt;
use std::str::FromStr;

use crate::error::LabelError;

/// Number of categories the policy defines (`c0` .. `c1023`).
pub const MAX_CATEGORIES: usize = 1024;

const WORD_BITS: usize = 64;

/// Number of machine words backing a [`CategorySet`].
pub const CATEGORY_WORDS: usize = MAX_CATEGORIES / WORD_BITS;

/// A single validated category index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category(u16);

impl Category {
    /// Validate an index against `[0, MAX_CATEGORIES)`.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::CategoryOutOfRange`] for indices at or above
    /// [`MAX_CATEGORIES`].
    pub fn new(id: u32) -> Result<Self, LabelError> {
        match u16::try_from(id) {
            Ok(value) if usize::from(value) < MAX_CATEGORIES => Ok(Self(value)),
            _ => Err(LabelError::CategoryOutOfRange(id)),
        }
    }

    /// Numeric index.
    pub const fn id(self) -> u16 {
        self.0
    }

    #[allow(clippy::arithmetic_side_effects)] // id < MAX_CATEGORIES, shift < 64
    fn slot(self) -> (usize, u64) {
        let id = usize::from(self.0);
        (id / WORD_BITS, 1u64 << (id % WORD_BITS))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A set of categories stored as a 1024-bit mask.
///
/// Equality, hashing and ordering are structural over the mask, so the
/// order in which categories were inserted never matters. The derived
/// `Ord` is an arbitrary total order used for indexing; it is not the
/// lattice order (see [`MlsLevel::dominates`](crate::MlsLevel::dominates)).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategorySet {
    bits: [u64; CATEGORY_WORDS],
}

impl CategorySet {
    /// The empty set.
    pub const fn new() -> Self {
        Self {
            bits: [0; CATEGORY_WORDS],
        }
    }

    /// Every category the policy defines (`c0.c1023`).
    pub const fn full() -> Self {
        Self {
            bits: [u64::MAX; CATEGORY_WORDS],
        }
    }

    /// Build from an iterator of categories. Duplicates collapse.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut set = Self::new();
        for cat in categories {
            set.insert(cat);
        }
        set
    }

    /// Add a category. Returns false if it was already present.
    pub fn insert(&mut self, cat: Category) -> bool {
        let (word, mask) = cat.slot();
        let fresh = self.bits[word] & mask == 0;
        self.bits[word] |= mask;
        fresh
    }

    /// Pure variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, cat: Category) -> Self {
        self.insert(cat);
        self
    }

    /// Add every category in `start..=end` at once.
    ///
    /// The set is left untouched on error.
    ///
    /// # Errors
    ///
    /// [`LabelError::InvertedCategoryRange`] when `end < start`, and
    /// [`LabelError::OverlappingCategories`] naming the lowest category
    /// that was already present.
    pub fn insert_range(&mut self, start: Category, end: Category) -> Result<(), LabelError> {
        if end < start {
            return Err(LabelError::InvertedCategoryRange {
                start: start.id(),
                end: end.id(),
            });
        }
        let span = Self::span(start, end);
        let overlap = self.intersection(&span);
        if let Some(first) = overlap.iter().next() {
            return Err(LabelError::OverlappingCategories(first.id()));
        }
        for (word, add) in self.bits.iter_mut().zip(span.bits) {
            *word |= add;
        }
        Ok(())
    }

    /// Remove a category. Returns true if it was present.
    pub fn remove(&mut self, cat: Category) -> bool {
        let (word, mask) = cat.slot();
        let present = self.bits[word] & mask != 0;
        self.bits[word] &= !mask;
        present
    }

    /// Membership test.
    pub fn contains(&self, cat: Category) -> bool {
        let (word, mask) = cat.slot();
        self.bits[word] & mask != 0
    }

    /// True when no category is present.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().fold(0u64, |acc, w| acc | w) == 0
    }

    /// Number of categories present (popcount over all words).
    pub fn len(&self) -> usize {
        let ones: u32 = self.bits.iter().map(|w| w.count_ones()).sum();
        usize::try_from(ones).unwrap_or(MAX_CATEGORIES)
    }

    /// Word-wise OR.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = Self::new();
        for (slot, (a, b)) in out.bits.iter_mut().zip(self.bits.iter().zip(&other.bits)) {
            *slot = a | b;
        }
        out
    }

    /// Word-wise AND.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Self::new();
        for (slot, (a, b)) in out.bits.iter_mut().zip(self.bits.iter().zip(&other.bits)) {
            *slot = a & b;
        }
        out
    }

    /// True iff every category in `self` is also in `other`
    /// (`self & other == self`), evaluated over all words in constant time.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        crate::lattice::covers_categories(other, self).into()
    }

    /// Categories in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        (0u16..)
            .take(MAX_CATEGORIES)
            .map(Category)
            .filter(move |&cat| self.contains(cat))
    }

    /// Raw backing words, lowest categories first.
    pub const fn words(&self) -> &[u64; CATEGORY_WORDS] {
        &self.bits
    }

    /// Contiguous runs as inclusive `(first, last)` pairs, ascending.
    pub fn runs(&self) -> Vec<(Category, Category)> {
        let mut runs: Vec<(Category, Category)> = Vec::new();
        for cat in self.iter() {
            match runs.last_mut() {
                Some((_, last)) if last.id().checked_add(1) == Some(cat.id()) => *last = cat,
                _ => runs.push((cat, cat)),
            }
        }
        runs
    }

    fn span(start: Category, end: Category) -> Self {
        (start.id()..=end.id()).map(Category).collect()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::from_categories(iter)
    }
}

/// Canonical form: ascending, runs of three or more written `cN.cM`, runs of
/// two written `cN,cM`. The empty set renders as an empty string; callers
/// that need a non-empty rendering go through [`MlsLevel`](crate::MlsLevel).
impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (start, end) in self.runs() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            match end.id().saturating_sub(start.id()) {
                0 => write!(f, "{start}")?,
                1 => write!(f, "{start},{end}")?,
                _ => write!(f, "{start}.{end}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CategorySet({self})")
    }
}

/// Parses a category list (`c0,c5`, `c0.c3,c9`) through both parser paths.
impl FromStr for CategorySet {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::gate::parse_categories(s.as_bytes())
    }
}
