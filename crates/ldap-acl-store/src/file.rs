//! File-backed implementation of the store traits.
//!
//! This is the primary backend. Every save writes a temporary file next to
//! the store and renames it over the original, so a reader sees either the
//! old or the new document, never a torn one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;

use crate::document::AclDocument;
use crate::error::{Result, StoreError};
use crate::traits::AclStore;

/// Conventional store file name.
pub const DEFAULT_FILE_NAME: &str = "LDAP.ini";

/// ACL store persisted as a text file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use the store at `path`. Nothing is touched until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `DEFAULT_FILE_NAME` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the store file. Returns whether a file was removed.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Write {
                location: self.location(),
                source,
            }),
        }
    }

    fn write_atomic(&self, contents: &str) -> io::Result<()> {
        let mut file = AtomicWriteFile::open(&self.path)?;
        file.write_all(contents.as_bytes())?;
        file.commit()
    }
}

impl AclStore for FileStore {
    fn load(&self) -> Result<Option<AclDocument>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(AclDocument::parse(&text))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                location: self.location(),
                source,
            }),
        }
    }

    fn save(&self, document: &AclDocument) -> Result<()> {
        self.write_atomic(&document.render()).map_err(|source| {
            tracing::warn!(path = %self.path.display(), error = %source, "ACL store write failed");
            StoreError::Write {
                location: self.location(),
                source,
            }
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{AclStoreExt, RecordOutcome, UpsertOutcome};
    use ldap_acl_core::{AclEntry, ErrorCode, Permission, PrincipalKind, ServerRecord};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn server() -> ServerRecord {
        ServerRecord::new(vec!["192.168.20.228".into()], "dc01.corp.local")
    }

    fn initialized() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.record_server(&server()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_record_server_creates_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(!store.is_initialized().unwrap());

        assert_eq!(store.record_server(&server()).unwrap(), RecordOutcome::Created);

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("# LDAP Configuration File"));
        assert!(content.contains("Server: IPs=192.168.20.228, HostName=dc01.corp.local"));
        assert!(content.contains("# --------- Access Control List ---------"));
        assert!(content.contains("# Columns: name,type,permission"));
        assert!(store.is_initialized().unwrap());
    }

    #[test]
    fn test_record_server_twice_leaves_file_untouched() {
        let (_dir, store) = initialized();
        store.upsert(&AclEntry::user("jdoe", Permission::Admin)).unwrap();
        let before = fs::read(store.path()).unwrap();

        assert_eq!(store.record_server(&server()).unwrap(), RecordOutcome::Unchanged);
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_record_server_changed_host() {
        let (_dir, store) = initialized();
        store.upsert(&AclEntry::user("jdoe", Permission::Admin)).unwrap();

        let other = ServerRecord::new(vec!["10.0.0.2".into()], "dc02");
        assert_eq!(store.record_server(&other).unwrap(), RecordOutcome::Updated);
        assert_eq!(store.server_record().unwrap(), Some(other));
        assert_eq!(
            store.lookup("jdoe", PrincipalKind::User).unwrap(),
            Some(Permission::Admin)
        );
    }

    #[test]
    fn test_record_server_unwritable_medium() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("missing-dir").join(DEFAULT_FILE_NAME));

        let err = store.record_server(&server()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(err.code(), ErrorCode::StoreWriteFailed);
    }

    #[test]
    fn test_operations_require_store() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());

        let err = store
            .upsert(&AclEntry::user("jdoe", Permission::Operator))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::StoreNotFound);
        assert_eq!(
            store.lookup("jdoe", PrincipalKind::User).unwrap_err().code(),
            ErrorCode::StoreNotFound
        );
        assert_eq!(store.clear_entries().unwrap_err().code(), ErrorCode::StoreNotFound);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_upsert_appends_in_store_format() {
        let (_dir, store) = initialized();
        store.upsert(&AclEntry::user("jdoe", Permission::Operator)).unwrap();
        store
            .upsert(&AclEntry::group("TestGroup", Permission::Operator))
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.ends_with("# permission: A = Admin, O = Operator\njdoe,U,O\nTestGroup,G,O\n"));
    }

    #[test]
    fn test_upsert_update_rewrites_single_row() {
        let (_dir, store) = initialized();
        store.upsert(&AclEntry::user("jdoe", Permission::Operator)).unwrap();
        let outcome = store.upsert(&AclEntry::user("jdoe", Permission::Admin)).unwrap();
        assert_eq!(
            outcome,
            UpsertOutcome::Updated {
                previous: Permission::Operator
            }
        );

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("jdoe,U,A"));
        assert!(!content.contains("jdoe,U,O"));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let (_dir, store) = initialized();
        let entry = AclEntry::group("Engineering", Permission::Operator);
        store.upsert(&entry).unwrap();
        let first = fs::read(store.path()).unwrap();

        assert_eq!(store.upsert(&entry).unwrap(), UpsertOutcome::Unchanged);
        assert_eq!(fs::read(store.path()).unwrap(), first);
    }

    #[test]
    fn test_clear_preserves_header_bytes() {
        let (_dir, store) = initialized();
        let pristine = fs::read_to_string(store.path()).unwrap();
        store.upsert(&AclEntry::user("jdoe", Permission::Admin)).unwrap();
        store.upsert(&AclEntry::group("Ops", Permission::Operator)).unwrap();

        assert_eq!(store.clear_entries().unwrap(), 2);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), pristine);
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_hand_edited_file_is_preserved() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        fs::write(
            store.path(),
            "# edited by hand\nServer: IPs=10.0.0.1, HostName=dc\n\n  # indented note\nalice,U,o\n",
        )
        .unwrap();

        store.upsert(&AclEntry::user("bob", Permission::Admin)).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "# edited by hand\nServer: IPs=10.0.0.1, HostName=dc\n\n  # indented note\nalice,U,o\nbob,U,A\n"
        );
        assert_eq!(
            store.lookup("alice", PrincipalKind::User).unwrap(),
            Some(Permission::Operator)
        );
    }

    #[test]
    fn test_remove() {
        let (_dir, store) = initialized();
        assert!(store.remove().unwrap());
        assert!(!store.remove().unwrap());
        assert!(!store.is_initialized().unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn lookup_after_upsert_returns_permission(
            name in "[A-Za-z][A-Za-z0-9._-]{0,15}",
            group in any::<bool>(),
            admin in any::<bool>(),
        ) {
            let (_dir, store) = initialized();
            let kind = if group { PrincipalKind::Group } else { PrincipalKind::User };
            let perm = if admin { Permission::Admin } else { Permission::Operator };

            store.upsert(&AclEntry::new(name.clone(), kind, perm)).unwrap();
            prop_assert_eq!(store.lookup(&name, kind).unwrap(), Some(perm));
        }
    }
}
