//! # LDAP ACL Directory
//!
//! Interfaces to the directory service the ACL is checked against.
//!
//! ## Overview
//!
//! The authorization engine depends on two collaborators, both behind
//! traits so they can be swapped for fakes:
//!
//! - [`DirectoryClient`]: bind with credentials, list a user's groups,
//!   and browse users and groups for administration
//! - [`ReachabilityProbe`]: check that a host answers and learn its addresses
//!
//! In-memory doubles live in `client::memory` and `probe::memory`.
//! [`TcpProbe`] is a working probe over plain TCP.
//!
//! ## Key Types
//!
//! - [`PrincipalPath`]: `LDAP://<host>` address a client binds against
//! - [`ProbeReport`]: addresses and host name learned by a probe

pub mod client;
pub mod error;
pub mod path;
pub mod probe;

pub use client::{DirectoryClient, DirectoryGroup, DirectoryUser};
pub use error::{DirectoryError, Result};
pub use path::{group_name_from_dn, PrincipalPath, LDAP_SCHEME};
pub use probe::{ProbeReport, ReachabilityProbe, TcpProbe, LDAP_PORT};
