//! Error taxonomy for label construction and parsing.
//!
//! Every variant is a rejection. Nothing in this crate downgrades one of
//! these to a warning or retries the operation that produced it.

use thiserror::Error;

use crate::label::category::MAX_CATEGORIES;
use crate::label::sensitivity::MAX_SENSITIVITY;

/// Why an identifier (user, role or type) failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentError {
    /// The identifier has no bytes at all.
    #[error("identifier is empty")]
    Empty,
    /// The identifier is nothing but its suffix.
    #[error("identifier has no stem before its suffix")]
    EmptyStem,
    /// The identifier exceeds the policy maximum.
    #[error("identifier exceeds maximum length ({0} bytes)")]
    TooLong(usize),
    /// A byte outside `[a-z0-9_]` was found.
    #[error("invalid byte {} in identifier", escape(*.0))]
    InvalidCharacter(u8),
    /// The identifier does not end with the suffix its kind requires.
    #[error("identifier must end with '{0}'")]
    MissingSuffix(&'static str),
}

/// Label construction, parsing and integrity failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// The input violates the context, level or category grammar.
    #[error("malformed security context: {reason}")]
    MalformedContext {
        /// Where and how the grammar was violated.
        reason: String,
    },
    /// A category index is outside `[0, MAX_CATEGORIES)`.
    #[error(
        "category c{0} is outside the policy range c0..c{max}",
        max = MAX_CATEGORIES.saturating_sub(1)
    )]
    CategoryOutOfRange(u32),
    /// A sensitivity is above the policy maximum.
    #[error("sensitivity s{0} exceeds policy maximum s{max}", max = MAX_SENSITIVITY)]
    SensitivityOutOfRange(u32),
    /// A `cN.cM` token with `M < N`.
    #[error("inverted category range c{start}.c{end}")]
    InvertedCategoryRange {
        /// First category of the token.
        start: u16,
        /// Last category of the token.
        end: u16,
    },
    /// Two category tokens in one list name the same category.
    #[error("category c{0} is named more than once")]
    OverlappingCategories(u16),
    /// A user, role or type field failed validation.
    #[error("invalid SELinux {kind}: {source}")]
    InvalidIdentifier {
        /// Which field: `user`, `role` or `type`.
        kind: &'static str,
        /// The specific validation failure.
        #[source]
        source: IdentError,
    },
    /// A clearance range whose high level does not dominate its low level.
    #[error("range high level {high} does not dominate low level {low}")]
    RangeNotDominated {
        /// Canonical form of the low level.
        low: String,
        /// Canonical form of the high level.
        high: String,
    },
    /// The two independent parsers disagreed about the same input.
    #[error("integrity mismatch: {detail}")]
    IntegrityMismatch {
        /// What disagreed.
        detail: String,
    },
}

impl LabelError {
    /// Shorthand for a grammar violation.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedContext {
            reason: reason.into(),
        }
    }

    /// Returns true for the dual-path disagreement variant.
    pub fn is_integrity_mismatch(&self) -> bool {
        matches!(self, Self::IntegrityMismatch { .. })
    }
}

fn escape(byte: u8) -> String {
    std::ascii::escape_default(byte).to_string()
}
