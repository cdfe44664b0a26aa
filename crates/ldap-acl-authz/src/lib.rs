//! # LDAP ACL Authorization
//!
//! Decides whether a directory principal may act with a permission level.
//!
//! ## Overview
//!
//! The [`Authorizer`] binds the caller against the recorded directory
//! server, then checks for a direct user row and finally for a row naming
//! one of the user's groups. The first matching row grants access and is
//! reported as a [`Grant`].
//!
//! What a row with the wrong permission means is set by
//! [`AuthorizationPolicy`]. By default a user mismatch falls through to the
//! group check and a group mismatch keeps scanning.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let authorizer = Authorizer::new(&store, &directory, AuthorizationPolicy::default());
//! match authorizer.authorize("jdoe", "secret", Permission::Admin) {
//!     Ok(grant) => println!("granted by {}", grant.principal()),
//!     Err(e) => println!("denied ({}): {e}", e.code().as_i32()),
//! }
//! ```

pub mod engine;
pub mod error;
pub mod policy;

pub use engine::{check_user, principal_path, Authorizer, Grant};
pub use error::{AuthzError, Result};
pub use policy::{AuthorizationPolicy, GroupMismatch, UserMismatch};
