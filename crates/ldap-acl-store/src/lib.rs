//! # LDAP ACL Store
//!
//! Persistence for the access control list: a flat, line-oriented,
//! human-editable file holding the directory server identity and
//! `name,kind,permission` rows.
//!
//! ## Overview
//!
//! Backends implement the small [`AclStore`] trait (load/save a whole
//! document). All ACL semantics live on [`AclStoreExt`] and in
//! [`AclDocument`], so every backend behaves identically. The primary
//! backend is [`FileStore`], with [`MemoryStore`] for tests.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ldap_acl_core::{AclEntry, Permission, PrincipalKind, ServerRecord};
//! use ldap_acl_store::{AclStoreExt, FileStore};
//!
//! let store = FileStore::new("LDAP.ini");
//! let server = ServerRecord::new(vec!["10.0.0.5".into()], "dc01.corp.local");
//! store.record_server(&server).unwrap();
//! store.upsert(&AclEntry::user("jdoe", Permission::Admin)).unwrap();
//! assert_eq!(
//!     store.lookup("jdoe", PrincipalKind::User).unwrap(),
//!     Some(Permission::Admin)
//! );
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent writes**: identical server records and upserts skip the write
//! - **Verbatim lines**: comments, blanks and unknown lines survive row edits
//! - **Single writer**: no locking; concurrent writers can lose updates

pub mod document;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use document::{validate_name, AclDocument};
pub use error::{Result, StoreError};
pub use file::{FileStore, DEFAULT_FILE_NAME};
pub use memory::MemoryStore;
pub use traits::{AclStore, AclStoreExt, RecordOutcome, UpsertOutcome};
