//! Principal paths and distinguished-name helpers.

use std::fmt;

use ldap_acl_core::ServerRecord;

/// Scheme prefix of a principal path.
pub const LDAP_SCHEME: &str = "LDAP://";

/// Address a directory client binds against, e.g. `LDAP://10.0.0.5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalPath(String);

impl PrincipalPath {
    /// Build a path from a host or address. An existing scheme prefix is kept
    /// (matched ignoring case); otherwise `LDAP://` is prepended.
    pub fn from_host(host: &str) -> Self {
        let host = host.trim();
        let has_scheme = host
            .get(..LDAP_SCHEME.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(LDAP_SCHEME));
        if has_scheme {
            Self(host.to_string())
        } else {
            Self(format!("{LDAP_SCHEME}{host}"))
        }
    }

    /// Path to the first recorded address, if any.
    pub fn from_record(record: &ServerRecord) -> Option<Self> {
        record.primary_address().map(Self::from_host)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The host part, without the scheme.
    pub fn host(&self) -> &str {
        &self.0[LDAP_SCHEME.len()..]
    }
}

impl fmt::Display for PrincipalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PrincipalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The common name of a distinguished name.
///
/// `CN=Engineering,OU=Groups,DC=corp,DC=local` gives `Engineering`. Returns
/// `None` when the first component is not a `CN=`.
pub fn group_name_from_dn(dn: &str) -> Option<&str> {
    let first = dn.split(',').next()?.trim();
    let (key, value) = first.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case("CN") {
        return None;
    }
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
