//! # LDAP ACL
//!
//! Directory-backed access control: a local ACL of users and groups with
//! two permission levels, checked against a directory service.
//!
//! ## Overview
//!
//! [`AclService`] is the public surface. It covers three areas:
//!
//! - **Setup**: record the directory server, upsert and clear ACL rows
//! - **Browsing**: look up directory users and groups while building the ACL
//! - **Authentication**: bind a user and decide a permission request
//!
//! Every operation returns an [`AuthResponse`]. Callers branch on `success`
//! and `error_code`; the codes are listed on [`ErrorCode`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ldap_acl::{AclConfig, AclService};
//!
//! ldap_acl::logging::init_tracing("info");
//! let service = AclService::from_config(AclConfig::default(), my_directory_client)?;
//!
//! service.record_server("dc01.corp.local");
//! service.upsert_permission("Engineering", "G", "O");
//!
//! let response = service.authenticate("alice", "secret", "O");
//! if response.success {
//!     println!("granted by {}", response.result_string);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `ldap_acl::core` - Principals, permissions, codes, response envelope
//! - `ldap_acl::store` - ACL document and stores
//! - `ldap_acl::directory` - Directory client and probe interfaces
//! - `ldap_acl::authz` - Decision engine and policy

pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use ldap_acl_authz as authz;
pub use ldap_acl_core as core;
pub use ldap_acl_directory as directory;
pub use ldap_acl_store as store;

pub use config::{AclConfig, PathResolver, StoreLocation};
pub use error::{AclError, Result};
pub use service::AclService;

pub use ldap_acl_authz::{AuthorizationPolicy, GroupMismatch, UserMismatch};
pub use ldap_acl_core::{AclEntry, AuthResponse, ErrorCode, Permission, PrincipalKind, ServerRecord};
