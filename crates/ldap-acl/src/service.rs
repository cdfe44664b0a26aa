//! The service: one entry point per capability.
//!
//! Every method answers with an [`AuthResponse`]. Typed errors from the
//! component crates are converted here and nowhere else, and a panic in a
//! collaborator is caught and reported as an unclassified failure.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use ldap_acl_authz::{principal_path, Authorizer};
use ldap_acl_core::{AclEntry, AuthResponse, Permission, PrincipalKind};
use ldap_acl_directory::{DirectoryClient, PrincipalPath, ReachabilityProbe, TcpProbe};
use ldap_acl_store::{AclStore, AclStoreExt, FileStore};

use crate::config::AclConfig;
use crate::error::{AclError, Result};

/// ACL administration and authentication over one store, one directory and
/// one reachability probe.
pub struct AclService<S, D, P> {
    store: S,
    directory: D,
    probe: P,
    config: AclConfig,
}

impl<D: DirectoryClient> AclService<FileStore, D, TcpProbe> {
    /// File store at the configured location and a TCP probe with the
    /// configured timeout.
    pub fn from_config(config: AclConfig, directory: D) -> Result<Self> {
        let store = config.open_store()?;
        let probe = TcpProbe::with_timeout(config.probe_timeout());
        Ok(Self::new(store, directory, probe, config))
    }
}

impl<S, D, P> AclService<S, D, P>
where
    S: AclStore,
    D: DirectoryClient,
    P: ReachabilityProbe,
{
    pub fn new(store: S, directory: D, probe: P, config: AclConfig) -> Self {
        Self {
            store,
            directory,
            probe,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────

    /// Probe `host` and record what it resolved to in the store header.
    ///
    /// Creates the store on first use. An unreachable host is never recorded.
    pub fn record_server(&self, host: &str) -> AuthResponse {
        self.respond(
            "record_server",
            || {
                let record = self.probe.probe(host)?.into_record();
                Ok(self.store.record_server(&record)?)
            },
            |_| AuthResponse::with_bool(true),
        )
    }

    /// Insert or update the row for `(name, kind)`.
    ///
    /// `kind` is `U` or `G`; `permission` is `A` or `O`. Nothing is written
    /// when either is invalid.
    pub fn upsert_permission(&self, name: &str, kind: &str, permission: &str) -> AuthResponse {
        self.respond(
            "upsert_permission",
            || {
                let kind: PrincipalKind = kind.parse()?;
                let permission: Permission = permission.parse()?;
                Ok(self.store.upsert(&AclEntry::new(name, kind, permission))?)
            },
            |_| AuthResponse::with_bool(true),
        )
    }

    /// Drop every ACL row, keeping comments and the server header.
    pub fn clear_all_entries(&self) -> AuthResponse {
        self.respond(
            "clear_all_entries",
            || Ok(self.store.clear_entries()?),
            |_| AuthResponse::with_bool(true),
        )
    }

    /// Every recognised row as `name,kind,permission`.
    pub fn list_entries(&self) -> AuthResponse {
        self.respond(
            "list_entries",
            || Ok(self.store.entries()?),
            |entries| AuthResponse::with_array(entries.iter().map(ToString::to_string).collect()),
        )
    }

    /// Whether the store exists and its header names a bindable address.
    pub fn is_server_recorded(&self) -> bool {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.store
                .require()
                .map(|document| principal_path(&document).is_ok())
                .unwrap_or(false)
        }))
        .unwrap_or(false)
    }

    /// Check that `host` answers. Reports the resolved addresses in
    /// `result_array` and the host name in `result_string`.
    pub fn test_connection(&self, host: &str) -> AuthResponse {
        self.respond(
            "test_connection",
            || Ok(self.probe.probe(host)?),
            |report| AuthResponse {
                result_bool: true,
                result_string: report.host_name,
                result_array: report.addresses,
                ..AuthResponse::ok()
            },
        )
    }

    /// Check that `username` can bind to `host` with `password`.
    pub fn test_credentials(&self, host: &str, username: &str, password: &str) -> AuthResponse {
        self.respond(
            "test_credentials",
            || {
                let path = PrincipalPath::from_host(host);
                Ok(self.directory.bind(&path, username, password)?)
            },
            |_| AuthResponse::with_bool(true),
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Directory browsing
    // ─────────────────────────────────────────────────────────────────────────

    /// First user matching `query`, as an attribute summary string.
    pub fn get_user(&self, host: &str, query: &str, username: &str, password: &str) -> AuthResponse {
        let path = PrincipalPath::from_host(host);
        self.respond(
            "get_user",
            || Ok(self.directory.find_user(&path, query, username, password)?),
            |user| AuthResponse::with_string(user.to_string()),
        )
    }

    pub fn get_group(&self, host: &str, group: &str, username: &str, password: &str) -> AuthResponse {
        let path = PrincipalPath::from_host(host);
        self.respond(
            "get_group",
            || Ok(self.directory.find_group(&path, group, username, password)?),
            |group| AuthResponse::with_string(group.to_string()),
        )
    }

    pub fn get_all_groups(&self, host: &str, username: &str, password: &str) -> AuthResponse {
        let path = PrincipalPath::from_host(host);
        self.respond(
            "get_all_groups",
            || Ok(self.directory.all_groups(&path, username, password)?),
            AuthResponse::with_array,
        )
    }

    pub fn get_users_in_group(
        &self,
        host: &str,
        group: &str,
        username: &str,
        password: &str,
    ) -> AuthResponse {
        let path = PrincipalPath::from_host(host);
        self.respond(
            "get_users_in_group",
            || Ok(self.directory.users_in_group(&path, group, username, password)?),
            AuthResponse::with_array,
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    /// Bind as `username` and check that a user or group row grants
    /// `permission` (`A` or `O`).
    ///
    /// On success `result_bool` is set and `result_string` names the user or
    /// group whose row granted access.
    pub fn authenticate(&self, username: &str, password: &str, permission: &str) -> AuthResponse {
        self.respond(
            "authenticate",
            || {
                let permission: Permission = permission.parse()?;
                let authorizer = Authorizer::new(&self.store, &self.directory, self.config.policy);
                Ok(authorizer.authorize(username, password, permission)?)
            },
            |grant| AuthResponse {
                result_bool: true,
                result_string: grant.principal().to_string(),
                ..AuthResponse::ok()
            },
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    /// Run `op`, converting its error or panic into a failure response.
    fn respond<T>(
        &self,
        name: &'static str,
        op: impl FnOnce() -> Result<T>,
        on_success: impl FnOnce(T) -> AuthResponse,
    ) -> AuthResponse {
        let outcome = panic::catch_unwind(AssertUnwindSafe(op))
            .unwrap_or_else(|payload| Err(AclError::Panic(panic_message(&*payload))));

        match outcome {
            Ok(value) => on_success(value),
            Err(err) => {
                let code = err.code();
                tracing::warn!(op = name, code = code.as_i32(), error = %err, "operation failed");
                AuthResponse::failure(code, err.to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "collaborator panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldap_acl_core::ErrorCode;
    use ldap_acl_directory::client::memory::MemoryDirectory;
    use ldap_acl_directory::probe::memory::MemoryProbe;
    use ldap_acl_store::MemoryStore;

    type TestService = AclService<MemoryStore, MemoryDirectory, MemoryProbe>;

    fn service() -> TestService {
        let directory = MemoryDirectory::new()
            .with_user("jdoe", "pw")
            .with_user("alice", "pw")
            .with_membership("alice", "Engineering");
        let probe = MemoryProbe::new().with_host("dc01", &["10.0.0.5"], "dc01.corp.local");
        AclService::new(MemoryStore::new(), directory, probe, AclConfig::default())
    }

    fn recorded() -> TestService {
        let svc = service();
        assert!(svc.record_server("dc01").success);
        svc
    }

    #[test]
    fn test_record_server() {
        let svc = service();
        assert!(!svc.is_server_recorded());

        let r = svc.record_server("dc01");
        assert!(r.success && r.result_bool);
        assert!(svc.is_server_recorded());

        svc.record_server("dc01");
        assert_eq!(svc.store().writes(), 1);
    }

    #[test]
    fn test_record_unreachable_host() {
        let svc = service();
        let r = svc.record_server("nowhere");
        assert!(!r.success);
        assert_eq!(r.code(), Some(ErrorCode::ReachabilityProbeFailed));
        assert!(svc.store().contents().is_none());
    }

    #[test]
    fn test_record_server_write_failure() {
        let svc = service();
        svc.store().set_read_only(true);
        let r = svc.record_server("dc01");
        assert_eq!(r.error_code, 4008);
        assert!(r.is_consistent());
    }

    #[test]
    fn test_upsert_validation() {
        let svc = recorded();

        let r = svc.upsert_permission("jdoe", "X", "A");
        assert_eq!(r.error_code, 4007);
        let r = svc.upsert_permission("jdoe", "U", "Z");
        assert_eq!(r.error_code, 4006);
        let r = svc.upsert_permission("jdoe", "u", "A");
        assert_eq!(r.error_code, 4007);
        assert_eq!(svc.store().writes(), 1);

        let r = svc.upsert_permission("jdoe", "U", "a");
        assert!(r.success);
        assert!(svc.store().contents().unwrap().ends_with("jdoe,U,A\n"));
    }

    #[test]
    fn test_upsert_requires_store() {
        let svc = service();
        let r = svc.upsert_permission("jdoe", "U", "A");
        assert_eq!(r.error_code, 4002);
        assert!(!r.error_message.is_empty());
    }

    #[test]
    fn test_clear_and_list() {
        let svc = recorded();
        svc.upsert_permission("jdoe", "U", "A");
        svc.upsert_permission("Engineering", "G", "O");
        assert_eq!(
            svc.list_entries().result_array,
            vec!["jdoe,U,A", "Engineering,G,O"]
        );

        assert!(svc.clear_all_entries().success);
        assert!(svc.list_entries().result_array.is_empty());
        assert!(svc.is_server_recorded());
    }

    #[test]
    fn test_authenticate_direct_and_group() {
        let svc = recorded();
        svc.upsert_permission("jdoe", "U", "A");
        svc.upsert_permission("Engineering", "G", "O");

        let r = svc.authenticate("jdoe", "pw", "A");
        assert!(r.success && r.result_bool);
        assert_eq!(r.result_string, "jdoe");
        assert_eq!(svc.directory().group_lookups(), 0);

        let r = svc.authenticate("alice", "pw", "O");
        assert!(r.success);
        assert_eq!(r.result_string, "Engineering");

        let r = svc.authenticate("jdoe", "pw", "O");
        assert_eq!(r.error_code, 4005);
        assert!(!r.result_bool);
    }

    #[test]
    fn test_authenticate_invalid_permission() {
        let svc = recorded();
        let r = svc.authenticate("jdoe", "pw", "Root");
        assert_eq!(r.error_code, 4006);
        assert_eq!(svc.directory().bind_calls(), 0);
    }

    #[test]
    fn test_authenticate_bad_password() {
        let svc = recorded();
        svc.upsert_permission("jdoe", "U", "A");
        let r = svc.authenticate("jdoe", "nope", "A");
        assert_eq!(r.error_code, 4999);
        assert!(r.is_consistent());
    }

    #[test]
    fn test_panic_is_contained() {
        let svc = recorded();
        svc.directory().set_panic_on_bind(true);

        let r = svc.authenticate("jdoe", "pw", "A");
        assert!(!r.success);
        assert_eq!(r.error_code, 4999);
        assert!(r.error_message.contains("crashed during bind"));

        let r = svc.test_credentials("dc01", "jdoe", "pw");
        assert_eq!(r.error_code, 4999);
    }

    #[test]
    fn test_connection_and_credentials() {
        let svc = service();
        let r = svc.test_connection("dc01");
        assert!(r.success);
        assert_eq!(r.result_array, vec!["10.0.0.5"]);
        assert_eq!(r.result_string, "dc01.corp.local");
        assert_eq!(svc.test_connection("dc02").error_code, 4009);

        assert!(svc.test_credentials("10.0.0.5", "jdoe", "pw").result_bool);
        assert_eq!(
            svc.directory().last_path().unwrap().as_str(),
            "LDAP://10.0.0.5"
        );
        assert_eq!(svc.test_credentials("10.0.0.5", "jdoe", "x").error_code, 4999);
    }

    #[test]
    fn test_browsing() {
        let svc = service();
        let r = svc.get_user("dc01", "jdo", "alice", "pw");
        assert!(r.result_string.starts_with("sAMAccountName=jdoe;"));

        let r = svc.get_group("dc01", "Engineering", "alice", "pw");
        assert_eq!(r.result_string, "sAMAccountName=Engineering");

        assert_eq!(
            svc.get_all_groups("dc01", "alice", "pw").result_array,
            vec!["Engineering"]
        );
        assert_eq!(
            svc.get_users_in_group("dc01", "Engineering", "alice", "pw").result_array,
            vec!["alice"]
        );

        let r = svc.get_group("dc01", "Missing", "alice", "pw");
        assert_eq!(r.error_code, 4999);
        assert!(r.result_string.is_empty());
    }
}
