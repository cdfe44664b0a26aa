//! Golden store documents.
//!
//! Each vector starts from a known store text, applies one operation and
//! names the exact text that must result. They pin the on-disk format so a
//! hand-edited store keeps working across releases.

use ldap_acl_core::{AclEntry, Permission, ServerRecord};
use ldap_acl_store::{AclStoreExt, MemoryStore};

/// Store text produced by recording `10.0.0.5` / `dc01.corp.local` into an
/// absent store.
pub const FRESH_STORE: &str = "\
# ======================================================
# LDAP Configuration File
# ======================================================

# --------- Server Information ---------
Server: IPs=10.0.0.5, HostName=dc01.corp.local

# --------- Access Control List ---------
# Columns: name,type,permission
# type: U= user, G= group
# permission: A = Admin, O = Operator
";

/// One store operation.
#[derive(Debug, Clone)]
pub enum GoldenOp {
    RecordServer(ServerRecord),
    Upsert(AclEntry),
    Clear,
}

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Store text before the operation, `None` for an absent store.
    pub before: Option<&'static str>,
    pub op: GoldenOp,
    /// Exact store text after the operation.
    pub after: &'static str,
}

fn dc01() -> ServerRecord {
    ServerRecord::new(vec!["10.0.0.5".into()], "dc01.corp.local")
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "record into absent store",
            before: None,
            op: GoldenOp::RecordServer(dc01()),
            after: FRESH_STORE,
        },
        GoldenVector {
            name: "record identical server",
            before: Some(FRESH_STORE),
            op: GoldenOp::RecordServer(dc01()),
            after: FRESH_STORE,
        },
        GoldenVector {
            name: "record other server with several addresses",
            before: Some("# mine\nServer: IPs=10.0.0.5, HostName=dc01.corp.local\njdoe,U,A\n"),
            op: GoldenOp::RecordServer(ServerRecord::new(
                vec!["10.0.0.7".into(), "fe80::7".into()],
                "dc02.corp.local",
            )),
            after: "# mine\nServer: IPs=10.0.0.7, fe80::7, HostName=dc02.corp.local\njdoe,U,A\n",
        },
        GoldenVector {
            name: "record unresolved server",
            before: Some("Server: IPs=10.0.0.5, HostName=dc01\n"),
            op: GoldenOp::RecordServer(ServerRecord::default()),
            after: "Server: IPs=N/A, HostName=N/A\n",
        },
        GoldenVector {
            name: "append user row",
            before: Some(FRESH_STORE),
            op: GoldenOp::Upsert(AclEntry::user("jdoe", Permission::Admin)),
            after: "\
# ======================================================
# LDAP Configuration File
# ======================================================

# --------- Server Information ---------
Server: IPs=10.0.0.5, HostName=dc01.corp.local

# --------- Access Control List ---------
# Columns: name,type,permission
# type: U= user, G= group
# permission: A = Admin, O = Operator
jdoe,U,A
",
        },
        GoldenVector {
            name: "update group row in place",
            before: Some("Server: IPs=10.0.0.5, HostName=dc01\nEngineering,G,O\n# trailing note\n"),
            op: GoldenOp::Upsert(AclEntry::group("Engineering", Permission::Admin)),
            after: "Server: IPs=10.0.0.5, HostName=dc01\nEngineering,G,A\n# trailing note\n",
        },
        GoldenVector {
            name: "update keeps extra columns",
            before: Some("Server: IPs=10.0.0.5, HostName=dc01\njdoe,U,o,added 2024-05-01\n"),
            op: GoldenOp::Upsert(AclEntry::user("jdoe", Permission::Admin)),
            after: "Server: IPs=10.0.0.5, HostName=dc01\njdoe,U,A,added 2024-05-01\n",
        },
        GoldenVector {
            name: "same name as user and group",
            before: Some("Server: IPs=10.0.0.5, HostName=dc01\nops,G,O\n"),
            op: GoldenOp::Upsert(AclEntry::user("ops", Permission::Operator)),
            after: "Server: IPs=10.0.0.5, HostName=dc01\nops,G,O\nops,U,O\n",
        },
        GoldenVector {
            name: "clear keeps comments blanks and server",
            before: Some(
                "# head\n\nServer: IPs=10.0.0.5, HostName=dc01\n  # indented\njdoe,U,A\nstray text\nOps,G,O\n\n",
            ),
            op: GoldenOp::Clear,
            after: "# head\n\nServer: IPs=10.0.0.5, HostName=dc01\n  # indented\n\n",
        },
        GoldenVector {
            name: "crlf input is rewritten with lf",
            before: Some("Server: IPs=10.0.0.5, HostName=dc01\r\njdoe,U,O\r\n"),
            op: GoldenOp::Upsert(AclEntry::user("jdoe", Permission::Admin)),
            after: "Server: IPs=10.0.0.5, HostName=dc01\njdoe,U,A\n",
        },
    ]
}

/// Apply a vector's operation to a memory store and return the resulting text.
pub fn apply_vector(vector: &GoldenVector) -> Result<String, String> {
    let store = match vector.before {
        Some(text) => MemoryStore::with_contents(text),
        None => MemoryStore::new(),
    };
    let result = match &vector.op {
        GoldenOp::RecordServer(record) => store.record_server(record).map(|_| ()),
        GoldenOp::Upsert(entry) => store.upsert(entry).map(|_| ()),
        GoldenOp::Clear => store.clear_entries().map(|_| ()),
    };
    result.map_err(|e| format!("{}: {e}", vector.name))?;
    store
        .contents()
        .ok_or_else(|| format!("{}: store missing after operation", vector.name))
}

/// Verify every vector, reporting the first mismatch.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in all_vectors() {
        let actual = apply_vector(&vector)?;
        if actual != vector.after {
            return Err(format!(
                "{}: expected {:?}, got {:?}",
                vector.name, vector.after, actual
            ));
        }
    }
    Ok(())
}
