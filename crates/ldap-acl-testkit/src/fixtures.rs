//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a service wired to an in-memory
//! directory and probe, over either a temporary store file or a memory store.

use std::fs;
use std::path::PathBuf;

use ldap_acl::{AclConfig, AclService, AuthorizationPolicy};
use ldap_acl_directory::client::memory::MemoryDirectory;
use ldap_acl_directory::probe::memory::MemoryProbe;
use ldap_acl_directory::DirectoryUser;
use ldap_acl_store::{FileStore, MemoryStore};
use tempfile::TempDir;

/// Host name the fixture probe answers for.
pub const HOST: &str = "dc01";
/// Address the fixture probe resolves [`HOST`] to.
pub const ADDRESS: &str = "10.0.0.5";
/// Fully qualified name reported for [`HOST`].
pub const HOST_NAME: &str = "dc01.corp.local";
/// Password of every fixture user.
pub const PASSWORD: &str = "Passw0rd!";

/// A directory with a few users and groups.
///
/// - `jdoe`: member of Engineering
/// - `alice`: member of Engineering and Ops
/// - `bob`: member of Ops
/// - `loner`: no groups
pub fn standard_directory() -> MemoryDirectory {
    let directory = MemoryDirectory::new();
    directory.add_user(
        DirectoryUser {
            account_name: "jdoe".into(),
            display_name: "John Doe".into(),
            mail: "jdoe@corp.local".into(),
            given_name: "John".into(),
            surname: "Doe".into(),
        },
        PASSWORD,
    );
    for name in ["alice", "bob", "loner"] {
        directory.add_user(DirectoryUser::new(name), PASSWORD);
    }
    directory.add_membership("jdoe", "Engineering");
    directory.add_membership("alice", "Engineering");
    directory.add_membership("alice", "Ops");
    directory.add_membership("bob", "Ops");
    directory
}

/// A probe that answers for [`HOST`] only.
pub fn standard_probe() -> MemoryProbe {
    MemoryProbe::new().with_host(HOST, &[ADDRESS], HOST_NAME)
}

/// A service over a store file in a temporary directory.
pub struct TestFixture {
    pub dir: TempDir,
    pub service: AclService<FileStore, MemoryDirectory, MemoryProbe>,
}

impl TestFixture {
    /// Fresh fixture; the store file does not exist yet.
    pub fn new() -> Self {
        Self::with_policy(AuthorizationPolicy::default())
    }

    pub fn with_policy(policy: AuthorizationPolicy) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = AclConfig {
            policy,
            ..AclConfig::in_dir(dir.path())
        };
        let store = config.open_store().expect("resolve store path");
        let service = AclService::new(store, standard_directory(), standard_probe(), config);
        Self { dir, service }
    }

    /// Fixture whose store has already recorded [`HOST`].
    pub fn recorded() -> Self {
        let fixture = Self::new();
        let response = fixture.service.record_server(HOST);
        assert!(response.success, "record_server: {}", response.error_message);
        fixture
    }

    pub fn store_path(&self) -> PathBuf {
        self.service.store().path().to_path_buf()
    }

    /// Raw store text, `None` if the file does not exist.
    pub fn store_text(&self) -> Option<String> {
        fs::read_to_string(self.store_path()).ok()
    }

    /// Upsert rows, panicking on failure.
    pub fn grant(&self, rows: &[(&str, &str, &str)]) {
        for (name, kind, permission) in rows {
            let response = self.service.upsert_permission(name, kind, permission);
            assert!(
                response.success,
                "upsert {name},{kind},{permission}: {}",
                response.error_message
            );
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A service over a memory store, for counting writes.
pub fn memory_service(
    policy: AuthorizationPolicy,
) -> AclService<MemoryStore, MemoryDirectory, MemoryProbe> {
    let config = AclConfig {
        policy,
        ..AclConfig::default()
    };
    AclService::new(MemoryStore::new(), standard_directory(), standard_probe(), config)
}
