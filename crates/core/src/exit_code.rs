//! Exit code definitions for blobcli
//!
//! Deployment tooling branches on these values, so they are part of the
//! public contract. Any change here is a breaking change.

/// Exit codes for the blobcli application.
///
/// `NotFound` is reserved for `exists` reporting an absent key. Every other
/// command reports a missing object as `GeneralError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// Local I/O failure or backend/transport failure
    GeneralError = 1,

    /// User input error: invalid arguments, bad destination, bad configuration
    UsageError = 2,

    /// `exists` checked the bucket and the key is absent
    NotFound = 3,

    /// Authentication or permission failure
    AuthError = 4,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NotFound),
            4 => Some(Self::AuthError),
            _ => None,
        }
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or configuration",
            Self::NotFound => "Object not found",
            Self::AuthError => "Authentication or permission failure",
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
