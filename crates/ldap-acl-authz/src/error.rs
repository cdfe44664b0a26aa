//! Error types for authorization decisions.

use ldap_acl_core::{ErrorCode, Permission};
use ldap_acl_directory::DirectoryError;
use ldap_acl_store::StoreError;
use thiserror::Error;

/// Why a principal was not authorized.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// No direct row for the user.
    #[error("User '{0}' not found in ACL store.")]
    UserNotFound(String),

    /// A row matched by name and kind but carries another permission.
    #[error("{principal} found, but permission type does not match. Expected: {expected}, Found: {found}")]
    PermissionMismatch {
        principal: String,
        expected: Permission,
        found: Permission,
    },

    /// The server line is missing, unparsable or lists no address.
    #[error("LDAP server address not found in ACL store header.")]
    ServerAddressNotFound,

    /// The user has no groups, or they could not be retrieved.
    #[error("User '{user}' does not belong to any groups or failed to retrieve groups.")]
    NotInAnyGroup {
        user: String,
        #[source]
        source: Option<DirectoryError>,
    },

    /// None of the user's groups is registered with the permission.
    #[error("No registered group found for user in ACL store with permission type '{0}'.")]
    NoRegisteredGroup(Permission),

    /// The directory rejected the credentials or could not be reached.
    #[error("directory bind failed: {0}")]
    Bind(#[source] DirectoryError),

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthzError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthzError::UserNotFound(_) => ErrorCode::UserNotFound,
            AuthzError::PermissionMismatch { .. } => ErrorCode::PermissionMismatch,
            AuthzError::ServerAddressNotFound => ErrorCode::ServerAddressNotFound,
            AuthzError::NotInAnyGroup { .. } => ErrorCode::UserNotInAnyGroup,
            AuthzError::NoRegisteredGroup(_) => ErrorCode::NoRegisteredGroup,
            AuthzError::Bind(_) => ErrorCode::Unclassified,
            AuthzError::Store(e) => e.code(),
        }
    }

    /// Whether the decision fell to the group step after a direct-user miss.
    pub fn is_direct_miss(&self) -> bool {
        matches!(
            self,
            AuthzError::UserNotFound(_) | AuthzError::PermissionMismatch { .. }
        )
    }
}

/// Result type for authorization.
pub type Result<T> = std::result::Result<T, AuthzError>;
