//! Store traits: the abstract interface for ACL persistence.
//!
//! Backends implement [`AclStore`], which only moves whole documents in and
//! out. Every ACL operation lives on [`AclStoreExt`] and is shared by all
//! backends, so file and memory stores cannot drift apart semantically.

use ldap_acl_core::{AclEntry, Permission, PrincipalKind, ServerRecord};

use crate::document::{validate_name, AclDocument};
use crate::error::{Result, StoreError};

/// Result of recording the server identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The store did not exist and was created.
    Created,
    /// The server line was replaced or inserted.
    Updated,
    /// The identical line was already present (no write).
    Unchanged,
}

/// Result of upserting an ACL row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was appended.
    Inserted,
    /// An existing row's permission was changed.
    Updated { previous: Permission },
    /// The row already carried this permission (no write).
    Unchanged,
}

/// Whole-document persistence.
///
/// # Design Notes
///
/// - No locking: a read-modify-write from two writers can lose an update.
///   The store assumes a single writer.
/// - `load` returns `None` when the store has never been created.
pub trait AclStore: Send + Sync {
    /// Read the current document.
    fn load(&self) -> Result<Option<AclDocument>>;

    /// Replace the stored document.
    fn save(&self, document: &AclDocument) -> Result<()>;

    /// Human-readable location, used in errors and logs.
    fn location(&self) -> String;
}

/// ACL operations built on [`AclStore`].
pub trait AclStoreExt: AclStore {
    /// Load the document or fail with `NotFound`.
    fn require(&self) -> Result<AclDocument>;

    /// Whether the store exists.
    fn is_initialized(&self) -> Result<bool>;

    /// Write or update the `Server:` line, creating the store if needed.
    fn record_server(&self, record: &ServerRecord) -> Result<RecordOutcome>;

    /// The parsed server line, `None` if missing or unparsable.
    fn server_record(&self) -> Result<Option<ServerRecord>>;

    /// Insert or update the `(name, kind)` row.
    fn upsert(&self, entry: &AclEntry) -> Result<UpsertOutcome>;

    /// First matching row's permission.
    fn lookup(&self, name: &str, kind: PrincipalKind) -> Result<Option<Permission>>;

    /// Drop every row, keeping comments, blanks and the server line.
    fn clear_entries(&self) -> Result<usize>;

    /// All recognised rows, in file order.
    fn entries(&self) -> Result<Vec<AclEntry>>;
}

impl<S: AclStore + ?Sized> AclStoreExt for S {
    fn require(&self) -> Result<AclDocument> {
        self.load()?
            .ok_or_else(|| StoreError::NotFound(self.location()))
    }

    fn is_initialized(&self) -> Result<bool> {
        Ok(self.load()?.is_some())
    }

    fn record_server(&self, record: &ServerRecord) -> Result<RecordOutcome> {
        let Some(mut document) = self.load()? else {
            self.save(&AclDocument::with_server(record))?;
            tracing::info!(location = %self.location(), host = %record.host_name, "created ACL store");
            return Ok(RecordOutcome::Created);
        };

        let outcome = document.set_server(record);
        if outcome == RecordOutcome::Updated {
            self.save(&document)?;
            tracing::info!(location = %self.location(), host = %record.host_name, "updated server record");
        }
        Ok(outcome)
    }

    fn server_record(&self) -> Result<Option<ServerRecord>> {
        Ok(self.require()?.server_record())
    }

    fn upsert(&self, entry: &AclEntry) -> Result<UpsertOutcome> {
        validate_name(&entry.name)?;
        let mut document = self.require()?;

        let outcome = document.upsert(entry)?;
        if outcome != UpsertOutcome::Unchanged {
            self.save(&document)?;
            tracing::debug!(entry = %entry, ?outcome, "saved ACL entry");
        }
        Ok(outcome)
    }

    fn lookup(&self, name: &str, kind: PrincipalKind) -> Result<Option<Permission>> {
        Ok(self.require()?.lookup(name, kind))
    }

    fn clear_entries(&self) -> Result<usize> {
        let mut document = self.require()?;
        let removed = document.clear_entries();
        self.save(&document)?;
        tracing::info!(location = %self.location(), removed, "cleared ACL entries");
        Ok(removed)
    }

    fn entries(&self) -> Result<Vec<AclEntry>> {
        Ok(self.require()?.entries())
    }
}
