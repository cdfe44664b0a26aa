//! # LDAP ACL Testkit
//!
//! Testing utilities for the ldap-acl crates.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: store texts before and after an operation, pinning the file format
//! - **Generators**: Proptest strategies for names, entries and server records
//! - **Fixtures**: A service wired to in-memory directory and probe doubles
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ldap_acl_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use ldap_acl_testkit::fixtures::{TestFixture, PASSWORD};
//!
//! let fixture = TestFixture::recorded();
//! fixture.grant(&[("Engineering", "G", "O")]);
//! assert!(fixture.service.authenticate("alice", PASSWORD, "O").success);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{memory_service, standard_directory, standard_probe, TestFixture};
pub use generators::{acl_entries, acl_entry, permission, principal_kind, principal_name, server_record};
pub use vectors::{all_vectors, apply_vector, verify_all_vectors, GoldenOp, GoldenVector, FRESH_STORE};
