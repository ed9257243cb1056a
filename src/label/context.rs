//! The four-field security context `user:role:type:range`.

use std::fmt;
use std::str::FromStr;

use crate::error::LabelError;
use crate::label::ident::{SelinuxRole, SelinuxType, SelinuxUser};
use crate::label::level::{MlsLevel, MlsRange};

/// A fully validated SELinux security context.
///
/// Instances only come out of the parser gate or from already-validated
/// parts, so holding one means every field passed its rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityContext {
    user: SelinuxUser,
    role: SelinuxRole,
    security_type: SelinuxType,
    range: MlsRange,
}

impl SecurityContext {
    /// Context at a single level (no separate clearance).
    pub fn new(
        user: SelinuxUser,
        role: SelinuxRole,
        security_type: SelinuxType,
        level: MlsLevel,
    ) -> Self {
        Self::with_range(user, role, security_type, MlsRange::single(level))
    }

    /// Context carrying a low/high range.
    pub fn with_range(
        user: SelinuxUser,
        role: SelinuxRole,
        security_type: SelinuxType,
        range: MlsRange,
    ) -> Self {
        Self {
            user,
            role,
            security_type,
            range,
        }
    }

    /// SELinux user.
    pub fn user(&self) -> &SelinuxUser {
        &self.user
    }

    /// SELinux role.
    pub fn role(&self) -> &SelinuxRole {
        &self.role
    }

    /// SELinux type (domain for processes).
    pub fn security_type(&self) -> &SelinuxType {
        &self.security_type
    }

    /// Effective level, the low end of the range.
    pub fn level(&self) -> &MlsLevel {
        self.range.low()
    }

    /// Clearance, the high end of the range.
    pub fn clearance(&self) -> &MlsLevel {
        self.range.high()
    }

    /// Full MLS range.
    pub fn range(&self) -> &MlsRange {
        &self.range
    }
}

impl fmt::Display for SecurityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.user, self.role, self.security_type, self.range
        )
    }
}

/// Parses through the dual-path gate; see [`crate::gate::parse_context`].
impl FromStr for SecurityContext {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::gate::parse_context(s.as_bytes())
    }
}
