//! MLS levels and clearance ranges.
//!
//! A level is one point in the lattice: `s2:c0,c3`. A range pairs a low
//! (effective) level with a high (clearance) level: `s0-s15:c0.c1023`.

use std::fmt;
use std::str::FromStr;

use crate::error::LabelError;
use crate::label::category::CategorySet;
use crate::label::sensitivity::SensitivityLevel;

/// Sensitivity plus category set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MlsLevel {
    sensitivity: SensitivityLevel,
    categories: CategorySet,
}

impl MlsLevel {
    /// Combine already-validated primitives.
    pub const fn new(sensitivity: SensitivityLevel, categories: CategorySet) -> Self {
        Self {
            sensitivity,
            categories,
        }
    }

    /// `s0` with no categories.
    pub const fn system_low() -> Self {
        Self::new(SensitivityLevel::LOW, CategorySet::new())
    }

    /// Highest sensitivity with every category.
    pub const fn system_high() -> Self {
        Self::new(SensitivityLevel::HIGH, CategorySet::full())
    }

    /// Hierarchical component.
    pub const fn sensitivity(&self) -> SensitivityLevel {
        self.sensitivity
    }

    /// Compartment component.
    pub const fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// True if any category is present.
    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// Canonical `sN` or `sN:cats`. Never empty.
impl fmt::Display for MlsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.categories.is_empty() {
            write!(f, "{}", self.sensitivity)
        } else {
            write!(f, "{}:{}", self.sensitivity, self.categories)
        }
    }
}

/// Parses a single level through both parser paths.
impl FromStr for MlsLevel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::gate::parse_level(s.as_bytes())
    }
}

/// A low/high level pair where high dominates low.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MlsRange {
    low: MlsLevel,
    high: MlsLevel,
}

impl MlsRange {
    /// Pair two levels.
    ///
    /// # Errors
    ///
    /// [`LabelError::RangeNotDominated`] unless `high` dominates `low`.
    pub fn new(low: MlsLevel, high: MlsLevel) -> Result<Self, LabelError> {
        if !high.dominates(&low) {
            return Err(LabelError::RangeNotDominated {
                low: low.to_string(),
                high: high.to_string(),
            });
        }
        Ok(Self { low, high })
    }

    /// Degenerate range where low and high coincide.
    pub fn single(level: MlsLevel) -> Self {
        Self {
            high: level.clone(),
            low: level,
        }
    }

    /// Effective (current) level.
    pub const fn low(&self) -> &MlsLevel {
        &self.low
    }

    /// Clearance level.
    pub const fn high(&self) -> &MlsLevel {
        &self.high
    }

    /// True when low and high coincide.
    pub fn is_single(&self) -> bool {
        self.low == self.high
    }
}

/// `low` alone when the range is degenerate, otherwise `low-high`.
impl fmt::Display for MlsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

/// Parses a level or range through both parser paths.
impl FromStr for MlsRange {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::gate::parse_range(s.as_bytes())
    }
}
