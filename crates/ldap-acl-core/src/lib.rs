//! # LDAP ACL Core
//!
//! Pure primitives for directory ACL authorization: principals, permission
//! levels, the stable error-code table and the uniform response envelope.
//!
//! This crate contains no I/O. The store, directory and authorization crates
//! build on the types defined here.
//!
//! ## Key Types
//!
//! - [`PrincipalKind`] - User (`U`) or group (`G`) row discriminator
//! - [`Permission`] - Admin (`A`) or Operator (`O`)
//! - [`AclEntry`] - One `(name, kind, permission)` row
//! - [`ServerRecord`] - The directory server identity stored in the header
//! - [`ErrorCode`] - Closed table of stable numeric codes
//! - [`AuthResponse`] - The envelope every public operation returns

pub mod error;
pub mod response;
pub mod types;

pub use error::{CoreError, ErrorCode};
pub use response::AuthResponse;
pub use types::{AclEntry, Permission, PrincipalKind, ServerRecord};
