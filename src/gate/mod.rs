//! Dual-path parser gate.
//!
//! Every label string entering the crate is parsed twice, by two parsers
//! that share no parsing code:
//!
//! - [`declarative`]: a `nom` grammar over raw bytes
//! - [`imperative`]: a manual scanner
//!
//! Decision rule:
//!
//! | Path A | Path B | Result |
//! |--------|--------|--------|
//! | `Ok(x)` | `Ok(x)` | accept `x` |
//! | `Ok(x)` | `Ok(y)`, `x != y` | [`LabelError::IntegrityMismatch`] |
//! | `Ok` | `Err` | [`LabelError::IntegrityMismatch`] |
//! | `Err` | `Ok` | [`LabelError::IntegrityMismatch`] |
//! | `Err(e)` | `Err` | reject with `e` |
//!
//! Both paths see the identical byte slice. Neither treats NUL as a
//! terminator, so a label with embedded NULs is malformed for both.

use std::fmt;
use std::time::Instant;

use tracing::{debug, error, trace};

use crate::error::LabelError;
use crate::label::{CategorySet, MlsLevel, MlsRange, SecurityContext};

mod declarative;
mod imperative;

/// Longest decimal run accepted for a sensitivity or category number.
pub(crate) const MAX_DIGITS: usize = 5;

type PathFn<T> = fn(&[u8]) -> Result<T, LabelError>;

/// Run both paths over `raw` and apply the decision rule.
pub(crate) fn adjudicate<T>(
    what: &'static str,
    raw: &[u8],
    declarative: PathFn<T>,
    imperative: PathFn<T>,
) -> Result<T, LabelError>
where
    T: PartialEq + fmt::Display,
{
    let started = Instant::now();
    let path_a = declarative(raw);
    let path_a_elapsed = started.elapsed();

    let started = Instant::now();
    let path_b = imperative(raw);
    let path_b_elapsed = started.elapsed();

    trace!(
        what,
        declarative = ?path_a_elapsed,
        imperative = ?path_b_elapsed,
        "gate timings"
    );

    let detail = match (path_a, path_b) {
        (Ok(a), Ok(b)) if a == b => {
            debug!(what, value = %a, "gate accepted");
            return Ok(a);
        }
        (Err(e), Err(_)) => {
            debug!(what, input = %raw.escape_ascii(), error = %e, "gate rejected");
            return Err(e);
        }
        (Ok(a), Ok(b)) => format!("{what}: parsers disagree ({a} vs {b})"),
        (Ok(a), Err(e)) => format!("{what}: declarative accepted {a}, imperative rejected: {e}"),
        (Err(e), Ok(b)) => format!("{what}: declarative rejected ({e}), imperative accepted {b}"),
    };
    error!(input = %raw.escape_ascii(), detail = %detail, "gate integrity mismatch");
    Err(LabelError::IntegrityMismatch { detail })
}

/// Parse a full `user:role:type:level` context.
///
/// # Errors
///
/// The shared grammar error when both paths reject, or
/// [`LabelError::IntegrityMismatch`] when they disagree.
pub fn parse_context(raw: &[u8]) -> Result<SecurityContext, LabelError> {
    adjudicate(
        "context",
        raw,
        declarative::parse_context,
        imperative::parse_context,
    )
}

/// Parse a single `sN[:cats]` level.
///
/// # Errors
///
/// As [`parse_context`].
pub fn parse_level(raw: &[u8]) -> Result<MlsLevel, LabelError> {
    adjudicate("level", raw, declarative::parse_level, imperative::parse_level)
}

/// Parse a level or a `low-high` range.
///
/// # Errors
///
/// As [`parse_context`].
pub fn parse_range(raw: &[u8]) -> Result<MlsRange, LabelError> {
    adjudicate("range", raw, declarative::parse_range, imperative::parse_range)
}

/// Parse a bare category list such as `c0.c3,c7`.
///
/// # Errors
///
/// As [`parse_context`].
pub fn parse_categories(raw: &[u8]) -> Result<CategorySet, LabelError> {
    adjudicate(
        "categories",
        raw,
        declarative::parse_categories,
        imperative::parse_categories,
    )
}
