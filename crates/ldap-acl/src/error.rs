//! Error types for the service façade.

use std::path::PathBuf;

use ldap_acl_authz::AuthzError;
use ldap_acl_core::{CoreError, ErrorCode};
use ldap_acl_directory::DirectoryError;
use ldap_acl_store::StoreError;
use thiserror::Error;

/// Errors that can occur in service operations.
#[derive(Debug, Error)]
pub enum AclError {
    /// Invalid textual kind or permission.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Directory or probe error.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Authorization denied or failed.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The store location could not be determined.
    #[error("cannot resolve store location: {0}")]
    PathResolution(String),

    /// A collaborator panicked.
    #[error("internal error: {0}")]
    Panic(String),
}

impl AclError {
    /// Numeric code reported in the response envelope.
    pub fn code(&self) -> ErrorCode {
        match self {
            AclError::Core(e) => e.code(),
            AclError::Store(e) => e.code(),
            AclError::Directory(e) => e.code(),
            AclError::Authz(e) => e.code(),
            AclError::ConfigRead { .. }
            | AclError::ConfigParse(_)
            | AclError::PathResolution(_)
            | AclError::Panic(_) => ErrorCode::Unclassified,
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, AclError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let err: AclError = CoreError::InvalidKind("X".into()).into();
        assert_eq!(err.code().as_i32(), 4007);
        assert_eq!(
            err.to_string(),
            "Invalid entry type: 'X'. Allowed: U (User), G (Group)."
        );

        let err: AclError = StoreError::NotFound("LDAP.ini".into()).into();
        assert_eq!(err.code().as_i32(), 4002);

        let err: AclError = DirectoryError::ProbeFailed { host: "dc".into() }.into();
        assert_eq!(err.code().as_i32(), 4009);

        assert_eq!(AclError::Panic("boom".into()).code().as_i32(), 4999);
    }
}
