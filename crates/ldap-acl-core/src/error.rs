//! Error codes and core parse errors.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// Stable numeric codes reported in [`AuthResponse::error_code`].
///
/// Callers match on these values, so a variant's number never changes.
///
/// # Families
/// - 4000, 4001, 4004, 4005: authentication failures
/// - 4002, 4003, 4006..=4009: setup failures
/// - 4999: anything not covered above
///
/// [`AuthResponse::error_code`]: crate::AuthResponse::error_code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ErrorCode {
    None = 0,
    UserNotFound = 4000,
    PermissionMismatch = 4001,
    StoreNotFound = 4002,
    ServerAddressNotFound = 4003,
    UserNotInAnyGroup = 4004,
    NoRegisteredGroup = 4005,
    InvalidPermissionValue = 4006,
    InvalidKindValue = 4007,
    StoreWriteFailed = 4008,
    ReachabilityProbeFailed = 4009,
    Unclassified = 4999,
}

impl ErrorCode {
    /// The numeric value carried on the wire.
    pub fn as_i32(self) -> i32 {
        self.into()
    }

    /// Whether this code belongs to the setup family (store, config, probe).
    pub fn is_setup(self) -> bool {
        matches!(
            self,
            ErrorCode::StoreNotFound
                | ErrorCode::ServerAddressNotFound
                | ErrorCode::InvalidPermissionValue
                | ErrorCode::InvalidKindValue
                | ErrorCode::StoreWriteFailed
                | ErrorCode::ReachabilityProbeFailed
        )
    }

    /// Whether this code belongs to the authentication family.
    pub fn is_authentication(self) -> bool {
        matches!(
            self,
            ErrorCode::UserNotFound
                | ErrorCode::PermissionMismatch
                | ErrorCode::UserNotInAnyGroup
                | ErrorCode::NoRegisteredGroup
        )
    }
}

/// Errors raised while parsing textual principal kinds and permissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid permission type: '{0}'. Allowed: A (Admin), O (Operator).")]
    InvalidPermission(String),

    #[error("Invalid entry type: '{0}'. Allowed: U (User), G (Group).")]
    InvalidKind(String),
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidPermission(_) => ErrorCode::InvalidPermissionValue,
            CoreError::InvalidKind(_) => ErrorCode::InvalidKindValue,
        }
    }
}
