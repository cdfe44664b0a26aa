//! Strong type definitions for ACL rows and the server header.
//!
//! The textual forms (`U`/`G`, `A`/`O`) are what the store file carries,
//! so `FromStr` and `Display` here define the on-disk columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Whether an ACL row names a directory user or a directory group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalKind {
    User,
    Group,
}

impl PrincipalKind {
    /// The single-letter column value.
    pub const fn code(self) -> &'static str {
        match self {
            PrincipalKind::User => "U",
            PrincipalKind::Group => "G",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PrincipalKind {
    type Err = CoreError;

    /// Exact match only: `U` or `G`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "U" => Ok(PrincipalKind::User),
            "G" => Ok(PrincipalKind::Group),
            other => Err(CoreError::InvalidKind(other.to_string())),
        }
    }
}

/// One of the two permission ranks.
///
/// Ranks are compared for equality only; Admin does not imply Operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Operator,
    Admin,
}

impl Permission {
    /// The single-letter column value.
    pub const fn code(self) -> &'static str {
        match self {
            Permission::Operator => "O",
            Permission::Admin => "A",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Permission {
    type Err = CoreError;

    /// `A` or `O`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("A") {
            Ok(Permission::Admin)
        } else if s.eq_ignore_ascii_case("O") {
            Ok(Permission::Operator)
        } else {
            Err(CoreError::InvalidPermission(s.to_string()))
        }
    }
}

/// A single `name,kind,permission` row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclEntry {
    pub name: String,
    pub kind: PrincipalKind,
    pub permission: Permission,
}

impl AclEntry {
    pub fn new(name: impl Into<String>, kind: PrincipalKind, permission: Permission) -> Self {
        Self {
            name: name.into(),
            kind,
            permission,
        }
    }

    pub fn user(name: impl Into<String>, permission: Permission) -> Self {
        Self::new(name, PrincipalKind::User, permission)
    }

    pub fn group(name: impl Into<String>, permission: Permission) -> Self {
        Self::new(name, PrincipalKind::Group, permission)
    }
}

impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.name, self.kind, self.permission)
    }
}

/// Identity of the directory server, as resolved by the last successful probe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Every address the host name resolved to, in resolver order.
    pub resolved_addresses: Vec<String>,
    pub host_name: String,
}

impl ServerRecord {
    pub fn new(resolved_addresses: Vec<String>, host_name: impl Into<String>) -> Self {
        Self {
            resolved_addresses,
            host_name: host_name.into(),
        }
    }

    /// The address the engine binds against: the first resolved one.
    pub fn primary_address(&self) -> Option<&str> {
        self.resolved_addresses
            .first()
            .map(String::as_str)
            .filter(|a| !a.is_empty())
    }
}
