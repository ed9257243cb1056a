//! MLS sensitivity levels (`s0` .. `s15`).
//!
//! Sensitivities are the hierarchical half of an MLS level. The numeric
//! domain is a compile-time policy bound rather than something discovered
//! per input.

use std::fmt;
use std::str::FromStr;

use crate::error::LabelError;

/// Highest sensitivity the policy defines.
pub const MAX_SENSITIVITY: u16 = 15;

/// A validated sensitivity level, totally ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SensitivityLevel(u16);

impl SensitivityLevel {
    /// Lowest level (`s0`, "SystemLow").
    pub const LOW: Self = Self(0);

    /// Highest level the policy defines.
    pub const HIGH: Self = Self(MAX_SENSITIVITY);

    /// Validate a numeric rank against the policy bound.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::SensitivityOutOfRange`] above [`MAX_SENSITIVITY`].
    pub fn new(rank: u32) -> Result<Self, LabelError> {
        match u16::try_from(rank) {
            Ok(value) if value <= MAX_SENSITIVITY => Ok(Self(value)),
            _ => Err(LabelError::SensitivityOutOfRange(rank)),
        }
    }

    /// Numeric rank.
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for SensitivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Parses a bare `sN` through both parser paths. A level carrying
/// categories is rejected.
impl FromStr for SensitivityLevel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = crate::gate::parse_level(s.as_bytes())?;
        if level.has_categories() {
            return Err(LabelError::malformed(format!(
                "'{s}' is a level with categories, not a sensitivity"
            )));
        }
        Ok(level.sensitivity())
    }
}
