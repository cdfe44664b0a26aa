//! The authorization decision engine.
//!
//! A request is decided in three steps, stopping at the first grant:
//!
//! 1. Bind to the recorded directory server with the caller's credentials.
//!    A failed bind ends the decision; the ACL is not consulted.
//! 2. Look for a direct user row with the requested permission.
//! 3. Ask the directory for the user's groups and look for a group row
//!    with the requested permission.
//!
//! A direct user row always wins over group rows. The whole decision runs
//! against one snapshot of the store, read once up front.

use ldap_acl_core::{Permission, PrincipalKind};
use ldap_acl_directory::{DirectoryClient, PrincipalPath};
use ldap_acl_store::{AclDocument, AclStore, AclStoreExt};

use crate::error::{AuthzError, Result};
use crate::policy::{AuthorizationPolicy, GroupMismatch, UserMismatch};

/// The principal whose row granted access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    User(String),
    Group(String),
}

impl Grant {
    pub fn principal(&self) -> &str {
        match self {
            Grant::User(name) | Grant::Group(name) => name,
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Grant::User(_) => PrincipalKind::User,
            Grant::Group(_) => PrincipalKind::Group,
        }
    }
}

/// Decides requests against a store and a directory.
pub struct Authorizer<'a, S: ?Sized, D: ?Sized> {
    store: &'a S,
    directory: &'a D,
    policy: AuthorizationPolicy,
}

impl<'a, S, D> Authorizer<'a, S, D>
where
    S: AclStore + ?Sized,
    D: DirectoryClient + ?Sized,
{
    pub fn new(store: &'a S, directory: &'a D, policy: AuthorizationPolicy) -> Self {
        Self {
            store,
            directory,
            policy,
        }
    }

    pub fn policy(&self) -> AuthorizationPolicy {
        self.policy
    }

    /// Decide whether `username` may act with `permission`.
    pub fn authorize(&self, username: &str, password: &str, permission: Permission) -> Result<Grant> {
        let document = self.store.require()?;
        let path = principal_path(&document)?;

        self.directory
            .bind(&path, username, password)
            .map_err(|e| {
                tracing::warn!(user = username, path = %path, error = %e, "directory bind failed");
                AuthzError::Bind(e)
            })?;

        match check_user(&document, username, permission) {
            Ok(grant) => {
                tracing::info!(user = username, %permission, "authorized by user entry");
                return Ok(grant);
            }
            Err(err) if err.is_direct_miss() => {
                if self.policy.user_mismatch == UserMismatch::Terminal
                    && matches!(err, AuthzError::PermissionMismatch { .. })
                {
                    return Err(err);
                }
                tracing::debug!(user = username, reason = %err, "checking group entries");
            }
            Err(err) => return Err(err),
        }

        let grant = self.check_groups(&document, &path, username, password, permission)?;
        tracing::info!(user = username, group = grant.principal(), %permission, "authorized by group entry");
        Ok(grant)
    }

    /// The group step on its own: the user's groups against the group rows.
    ///
    /// Membership is queried with the user's own credentials.
    pub fn check_groups(
        &self,
        document: &AclDocument,
        path: &PrincipalPath,
        username: &str,
        password: &str,
        permission: Permission,
    ) -> Result<Grant> {
        let groups = self
            .directory
            .groups_of(path, username, username, password)
            .map_err(|e| {
                tracing::warn!(user = username, error = %e, "group lookup failed");
                AuthzError::NotInAnyGroup {
                    user: username.to_string(),
                    source: Some(e),
                }
            })?;

        if groups.is_empty() {
            return Err(AuthzError::NotInAnyGroup {
                user: username.to_string(),
                source: None,
            });
        }

        for group in &groups {
            match document.lookup(group, PrincipalKind::Group) {
                Some(found) if found == permission => return Ok(Grant::Group(group.clone())),
                Some(found) if self.policy.group_mismatch == GroupMismatch::StopScan => {
                    return Err(AuthzError::PermissionMismatch {
                        principal: format!("Group '{group}'"),
                        expected: permission,
                        found,
                    });
                }
                _ => {}
            }
        }

        Err(AuthzError::NoRegisteredGroup(permission))
    }
}

/// Bind path for the recorded server: `LDAP://<first address>`.
pub fn principal_path(document: &AclDocument) -> Result<PrincipalPath> {
    document
        .server_record()
        .as_ref()
        .and_then(PrincipalPath::from_record)
        .ok_or(AuthzError::ServerAddressNotFound)
}

/// The direct-user step: `UserNotFound` without a row, `PermissionMismatch`
/// when the row carries another permission.
pub fn check_user(document: &AclDocument, username: &str, permission: Permission) -> Result<Grant> {
    match document.lookup(username, PrincipalKind::User) {
        Some(found) if found == permission => Ok(Grant::User(username.to_string())),
        Some(found) => Err(AuthzError::PermissionMismatch {
            principal: "User".to_string(),
            expected: permission,
            found,
        }),
        None => Err(AuthzError::UserNotFound(username.to_string())),
    }
}
