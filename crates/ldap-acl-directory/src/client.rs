//! Directory client abstraction.
//!
//! The engine never speaks a directory protocol itself. It binds and asks
//! for group memberships through [`DirectoryClient`]; the browsing methods
//! back the administrative surface used when building the ACL.

use std::fmt;

use crate::error::Result;
use crate::path::PrincipalPath;

/// A user object returned by a directory search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryUser {
    pub account_name: String,
    pub display_name: String,
    pub mail: String,
    pub given_name: String,
    pub surname: String,
}

impl DirectoryUser {
    pub fn new(account_name: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            ..Self::default()
        }
    }

    /// Whether `query` occurs in any of the searchable name attributes.
    pub fn matches_query(&self, query: &str) -> bool {
        [
            &self.account_name,
            &self.display_name,
            &self.given_name,
            &self.surname,
        ]
        .iter()
        .any(|field| field.contains(query))
    }
}

/// Renders the attribute summary shown to administrators:
/// `sAMAccountName=..;displayName=..;mail=..;givenName=..;sn=..`
impl fmt::Display for DirectoryUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sAMAccountName={};displayName={};mail={};givenName={};sn={}",
            self.account_name, self.display_name, self.mail, self.given_name, self.surname
        )
    }
}

/// A group object returned by a directory search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup {
    pub account_name: String,
}

impl fmt::Display for DirectoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sAMAccountName={}", self.account_name)
    }
}

/// Client for a directory service.
///
/// Implementations must be thread-safe (Send + Sync). Every call carries the
/// credentials it runs under; the client holds no session between calls.
pub trait DirectoryClient: Send + Sync {
    /// Authenticate `username` with `password` against `path`.
    fn bind(&self, path: &PrincipalPath, username: &str, password: &str) -> Result<()>;

    /// Common names of the groups `user_name` is a direct member of, queried
    /// with the bind credentials.
    fn groups_of(
        &self,
        path: &PrincipalPath,
        user_name: &str,
        bind_username: &str,
        bind_password: &str,
    ) -> Result<Vec<String>>;

    /// First user whose account, display, given or surname contains `query`.
    fn find_user(
        &self,
        path: &PrincipalPath,
        query: &str,
        bind_username: &str,
        bind_password: &str,
    ) -> Result<DirectoryUser>;

    /// The group with exactly this account name.
    fn find_group(
        &self,
        path: &PrincipalPath,
        group_name: &str,
        bind_username: &str,
        bind_password: &str,
    ) -> Result<DirectoryGroup>;

    /// Account names of every group.
    fn all_groups(
        &self,
        path: &PrincipalPath,
        bind_username: &str,
        bind_password: &str,
    ) -> Result<Vec<String>>;

    /// Account names of the members of `group_name`.
    fn users_in_group(
        &self,
        path: &PrincipalPath,
        group_name: &str,
        bind_username: &str,
        bind_password: &str,
    ) -> Result<Vec<String>>;
}

/// An in-memory directory for testing.
///
/// Group memberships are held as distinguished names and reduced to common
/// names on lookup, the way a real `memberOf` attribute is read.
pub mod memory {
    use super::*;
    use crate::error::DirectoryError;
    use crate::path::group_name_from_dn;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

    /// Base appended to group names to form member-of DNs.
    pub const GROUP_BASE: &str = "OU=Groups,DC=example,DC=local";

    #[derive(Debug, Clone)]
    struct Account {
        user: DirectoryUser,
        password: String,
        member_of: Vec<String>,
    }

    #[derive(Debug, Default)]
    struct Inner {
        accounts: BTreeMap<String, Account>,
        groups: BTreeSet<String>,
        unreachable: bool,
        fail_group_lookups: bool,
        panic_on_bind: bool,
        last_path: Option<PrincipalPath>,
    }

    /// Directory double with call counters.
    #[derive(Debug, Default)]
    pub struct MemoryDirectory {
        inner: RwLock<Inner>,
        binds: AtomicUsize,
        group_lookups: AtomicUsize,
    }

    impl MemoryDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Builder form of [`add_user`](Self::add_user).
        pub fn with_user(self, name: &str, password: &str) -> Self {
            self.add_user(DirectoryUser::new(name), password);
            self
        }

        /// Builder form of [`add_membership`](Self::add_membership).
        pub fn with_membership(self, user: &str, group: &str) -> Self {
            self.add_membership(user, group);
            self
        }

        pub fn add_user(&self, user: DirectoryUser, password: &str) {
            let name = user.account_name.clone();
            self.write().accounts.insert(
                name,
                Account {
                    user,
                    password: password.to_string(),
                    member_of: Vec::new(),
                },
            );
        }

        /// Declare a group without members.
        pub fn add_group(&self, group: &str) {
            self.write().groups.insert(group.to_string());
        }

        /// Make `user` a member of `group`. Unknown users are ignored.
        pub fn add_membership(&self, user: &str, group: &str) {
            let mut inner = self.write();
            inner.groups.insert(group.to_string());
            if let Some(account) = inner.accounts.get_mut(user) {
                account.member_of.push(format!("CN={group},{GROUP_BASE}"));
            }
        }

        /// Fail every call as if the server were down.
        pub fn set_unreachable(&self, unreachable: bool) {
            self.write().unreachable = unreachable;
        }

        /// Fail membership queries while binds keep working.
        pub fn set_fail_group_lookups(&self, fail: bool) {
            self.write().fail_group_lookups = fail;
        }

        /// Panic inside `bind`, to exercise callers' panic containment.
        pub fn set_panic_on_bind(&self, panic: bool) {
            self.write().panic_on_bind = panic;
        }

        /// Number of `bind` calls so far.
        pub fn bind_calls(&self) -> usize {
            self.binds.load(Ordering::SeqCst)
        }

        /// Number of `groups_of` calls so far.
        pub fn group_lookups(&self) -> usize {
            self.group_lookups.load(Ordering::SeqCst)
        }

        /// Path of the most recent bind.
        pub fn last_path(&self) -> Option<PrincipalPath> {
            self.read().last_path.clone()
        }

        fn read(&self) -> RwLockReadGuard<'_, Inner> {
            self.inner.read().unwrap_or_else(|e| e.into_inner())
        }

        fn write(&self) -> RwLockWriteGuard<'_, Inner> {
            self.inner.write().unwrap_or_else(|e| e.into_inner())
        }

        /// Credential check shared by every operation.
        fn authenticate(&self, path: &PrincipalPath, username: &str, password: &str) -> Result<()> {
            let inner = self.read();
            if inner.unreachable {
                return Err(DirectoryError::Unreachable {
                    path: path.to_string(),
                    reason: "server is not operational".into(),
                });
            }
            match inner.accounts.get(username) {
                Some(account) if account.password == password => Ok(()),
                _ => Err(DirectoryError::BindFailed {
                    username: username.to_string(),
                    reason: "invalid credentials".into(),
                }),
            }
        }
    }

    impl DirectoryClient for MemoryDirectory {
        fn bind(&self, path: &PrincipalPath, username: &str, password: &str) -> Result<()> {
            self.binds.fetch_add(1, Ordering::SeqCst);
            self.write().last_path = Some(path.clone());
            if self.read().panic_on_bind {
                panic!("directory client crashed during bind");
            }
            self.authenticate(path, username, password)
        }

        fn groups_of(
            &self,
            path: &PrincipalPath,
            user_name: &str,
            bind_username: &str,
            bind_password: &str,
        ) -> Result<Vec<String>> {
            self.group_lookups.fetch_add(1, Ordering::SeqCst);
            self.authenticate(path, bind_username, bind_password)?;

            let inner = self.read();
            if inner.fail_group_lookups {
                return Err(anyhow::anyhow!("memberOf query failed").into());
            }
            let account = inner
                .accounts
                .get(user_name)
                .ok_or_else(|| DirectoryError::NotFound {
                    kind: "user",
                    name: user_name.to_string(),
                })?;
            Ok(account
                .member_of
                .iter()
                .filter_map(|dn| group_name_from_dn(dn))
                .map(str::to_string)
                .collect())
        }

        fn find_user(
            &self,
            path: &PrincipalPath,
            query: &str,
            bind_username: &str,
            bind_password: &str,
        ) -> Result<DirectoryUser> {
            self.authenticate(path, bind_username, bind_password)?;
            self.read()
                .accounts
                .values()
                .find(|a| a.user.matches_query(query))
                .map(|a| a.user.clone())
                .ok_or_else(|| DirectoryError::NotFound {
                    kind: "user",
                    name: query.to_string(),
                })
        }

        fn find_group(
            &self,
            path: &PrincipalPath,
            group_name: &str,
            bind_username: &str,
            bind_password: &str,
        ) -> Result<DirectoryGroup> {
            self.authenticate(path, bind_username, bind_password)?;
            if self.read().groups.contains(group_name) {
                Ok(DirectoryGroup {
                    account_name: group_name.to_string(),
                })
            } else {
                Err(DirectoryError::NotFound {
                    kind: "group",
                    name: group_name.to_string(),
                })
            }
        }

        fn all_groups(
            &self,
            path: &PrincipalPath,
            bind_username: &str,
            bind_password: &str,
        ) -> Result<Vec<String>> {
            self.authenticate(path, bind_username, bind_password)?;
            Ok(self.read().groups.iter().cloned().collect())
        }

        fn users_in_group(
            &self,
            path: &PrincipalPath,
            group_name: &str,
            bind_username: &str,
            bind_password: &str,
        ) -> Result<Vec<String>> {
            self.authenticate(path, bind_username, bind_password)?;
            let inner = self.read();
            if !inner.groups.contains(group_name) {
                return Err(DirectoryError::NotFound {
                    kind: "group",
                    name: group_name.to_string(),
                });
            }
            Ok(inner
                .accounts
                .values()
                .filter(|a| {
                    a.member_of
                        .iter()
                        .any(|dn| group_name_from_dn(dn) == Some(group_name))
                })
                .map(|a| a.user.account_name.clone())
                .collect())
        }
    }
}
