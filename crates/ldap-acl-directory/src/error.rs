//! Error types for directory collaborators.

use ldap_acl_core::ErrorCode;
use thiserror::Error;

/// Errors raised by a [`DirectoryClient`](crate::DirectoryClient) or a
/// [`ReachabilityProbe`](crate::ReachabilityProbe).
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The supplied credentials were rejected.
    #[error("bind failed for {username}: {reason}")]
    BindFailed { username: String, reason: String },

    /// The directory could not be contacted at all.
    #[error("directory unreachable at {path}: {reason}")]
    Unreachable { path: String, reason: String },

    /// A search returned no object.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// The host did not answer the reachability probe.
    #[error("host did not respond: {host}")]
    ProbeFailed { host: String },

    /// Any other collaborator failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DirectoryError {
    /// Numeric code surfaced to callers.
    pub fn code(&self) -> ErrorCode {
        match self {
            DirectoryError::ProbeFailed { .. } => ErrorCode::ReachabilityProbeFailed,
            _ => ErrorCode::Unclassified,
        }
    }

    pub fn is_bind_failure(&self) -> bool {
        matches!(self, DirectoryError::BindFailed { .. })
    }
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
