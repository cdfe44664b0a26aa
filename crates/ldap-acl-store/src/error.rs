//! Error types for the store module.

use ldap_acl_core::ErrorCode;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has not been initialized by recording a server.
    #[error("ACL store does not exist: {0}")]
    NotFound(String),

    /// The medium refused the write.
    #[error("failed to write ACL store {location}: {source}")]
    Write {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading an existing store failed.
    #[error("failed to read ACL store {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Principal name cannot be stored as a single column.
    #[error("invalid principal name: {0:?}")]
    InvalidName(String),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NotFound(_) => ErrorCode::StoreNotFound,
            StoreError::Write { .. } => ErrorCode::StoreWriteFailed,
            StoreError::Read { .. } | StoreError::InvalidName(_) => ErrorCode::Unclassified,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
