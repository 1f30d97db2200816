//! Policy code constants shared with the policy manager.
//!
//! The cache stores codes as raw `i32` and never validates them.  The enums
//! here give callers named values and let diagnostics print readable names.

use std::fmt;

use thiserror::Error;

/// A raw code that does not correspond to any known constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("unknown password quality code {0:#x}")]
    UnknownPasswordQuality(i32),
    #[error("unknown permission policy code {0}")]
    UnknownPermissionPolicy(i32),
}

// ---------------------------------------------------------------------------
// PasswordQuality
// ---------------------------------------------------------------------------

/// Minimum password quality required for a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PasswordQuality {
    Unspecified = 0x0,
    BiometricWeak = 0x8000,
    Something = 0x1_0000,
    Numeric = 0x2_0000,
    NumericComplex = 0x3_0000,
    Alphabetic = 0x4_0000,
    Alphanumeric = 0x5_0000,
    Complex = 0x6_0000,
    Managed = 0x8_0000,
}

impl PasswordQuality {
    /// Reported for users with no cached entry.
    pub const DEFAULT: PasswordQuality = PasswordQuality::Unspecified;

    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            PasswordQuality::Unspecified => "UNSPECIFIED",
            PasswordQuality::BiometricWeak => "BIOMETRIC_WEAK",
            PasswordQuality::Something => "SOMETHING",
            PasswordQuality::Numeric => "NUMERIC",
            PasswordQuality::NumericComplex => "NUMERIC_COMPLEX",
            PasswordQuality::Alphabetic => "ALPHABETIC",
            PasswordQuality::Alphanumeric => "ALPHANUMERIC",
            PasswordQuality::Complex => "COMPLEX",
            PasswordQuality::Managed => "MANAGED",
        }
    }
}

impl TryFrom<i32> for PasswordQuality {
    type Error = CodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0x0 => PasswordQuality::Unspecified,
            0x8000 => PasswordQuality::BiometricWeak,
            0x1_0000 => PasswordQuality::Something,
            0x2_0000 => PasswordQuality::Numeric,
            0x3_0000 => PasswordQuality::NumericComplex,
            0x4_0000 => PasswordQuality::Alphabetic,
            0x5_0000 => PasswordQuality::Alphanumeric,
            0x6_0000 => PasswordQuality::Complex,
            0x8_0000 => PasswordQuality::Managed,
            other => return Err(CodeError::UnknownPasswordQuality(other)),
        })
    }
}

impl From<PasswordQuality> for i32 {
    fn from(q: PasswordQuality) -> Self {
        q.code()
    }
}

impl fmt::Display for PasswordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// PermissionPolicy
// ---------------------------------------------------------------------------

/// How runtime permission requests are resolved for a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PermissionPolicy {
    /// Ask the user.
    Prompt = 0,
    AutoGrant = 1,
    AutoDeny = 2,
}

impl PermissionPolicy {
    /// Reported for users with no cached entry.
    pub const DEFAULT: PermissionPolicy = PermissionPolicy::Prompt;

    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            PermissionPolicy::Prompt => "PROMPT",
            PermissionPolicy::AutoGrant => "AUTO_GRANT",
            PermissionPolicy::AutoDeny => "AUTO_DENY",
        }
    }
}

impl TryFrom<i32> for PermissionPolicy {
    type Error = CodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PermissionPolicy::Prompt),
            1 => Ok(PermissionPolicy::AutoGrant),
            2 => Ok(PermissionPolicy::AutoDeny),
            other => Err(CodeError::UnknownPermissionPolicy(other)),
        }
    }
}

impl From<PermissionPolicy> for i32 {
    fn from(p: PermissionPolicy) -> Self {
        p.code()
    }
}

impl fmt::Display for PermissionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_wire_values() {
        assert_eq!(PasswordQuality::DEFAULT.code(), 0);
        assert_eq!(PermissionPolicy::DEFAULT.code(), 0);
    }

    #[test]
    fn known_codes_convert_back() {
        assert_eq!(
            PasswordQuality::try_from(0x5_0000),
            Ok(PasswordQuality::Alphanumeric)
        );
        assert_eq!(
            PermissionPolicy::try_from(2),
            Ok(PermissionPolicy::AutoDeny)
        );
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(
            PasswordQuality::try_from(0x7_0000),
            Err(CodeError::UnknownPasswordQuality(0x7_0000))
        );
        assert_eq!(
            PermissionPolicy::try_from(9),
            Err(CodeError::UnknownPermissionPolicy(9))
        );
        assert_eq!(
            CodeError::UnknownPasswordQuality(0x7_0000).to_string(),
            "unknown password quality code 0x70000"
        );
    }
}
