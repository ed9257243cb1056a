//! SELinux user, role and type identifiers.
//!
//! The three kinds share one validation rule and differ only in their
//! mandatory suffix:
//!
//! - ASCII `[a-z0-9_]` only (so no whitespace, no NUL, no uppercase)
//! - at most 255 bytes
//! - ends in `_u`, `_r` or `_t`, with at least one byte before the suffix

use std::fmt;
use std::str::FromStr;

use crate::error::{IdentError, LabelError};

/// Longest identifier accepted.
pub const MAX_IDENT_LEN: usize = 255;

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_'
}

fn validate(raw: &[u8], suffix: &'static str) -> Result<String, IdentError> {
    if raw.is_empty() {
        return Err(IdentError::Empty);
    }
    if raw.len() > MAX_IDENT_LEN {
        return Err(IdentError::TooLong(raw.len()));
    }
    if let Some(&bad) = raw.iter().find(|&&b| !is_ident_byte(b)) {
        return Err(IdentError::InvalidCharacter(bad));
    }
    if !raw.ends_with(suffix.as_bytes()) {
        return Err(IdentError::MissingSuffix(suffix));
    }
    if raw.len() == suffix.len() {
        return Err(IdentError::EmptyStem);
    }
    // Every byte is ASCII at this point.
    Ok(raw.iter().map(|&b| char::from(b)).collect())
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $suffix:literal, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Required suffix for a ", $kind, " identifier.")]
            pub const SUFFIX: &'static str = $suffix;

            #[doc = concat!("Validate a ", $kind, " identifier from text.")]
            ///
            /// # Errors
            ///
            /// Returns [`IdentError`] describing the first rule violated.
            pub fn new(value: &str) -> Result<Self, IdentError> {
                Self::from_bytes(value.as_bytes())
            }

            #[doc = concat!("Validate a ", $kind, " identifier from raw label bytes.")]
            ///
            /// # Errors
            ///
            /// Returns [`IdentError`] describing the first rule violated.
            pub fn from_bytes(raw: &[u8]) -> Result<Self, IdentError> {
                validate(raw, $suffix).map(Self)
            }

            /// Borrow the identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub(crate) fn labeled(raw: &[u8]) -> Result<Self, LabelError> {
                Self::from_bytes(raw).map_err(|source| LabelError::InvalidIdentifier {
                    kind: $kind,
                    source,
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier!(
    /// SELinux user (`system_u`, `staff_u`, `unconfined_u`).
    SelinuxUser,
    "_u",
    "user"
);

identifier!(
    /// SELinux role (`object_r`, `sysadm_r`).
    SelinuxRole,
    "_r",
    "role"
);

identifier!(
    /// SELinux type or domain (`sshd_t`, `etc_t`).
    SelinuxType,
    "_t",
    "type"
);
