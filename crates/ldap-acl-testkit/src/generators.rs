//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ldap_acl_core::{AclEntry, Permission, PrincipalKind, ServerRecord};
use ldap_acl_store::validate_name;

/// Any name the store accepts as a single column.
///
/// Covers plain account names, padded names, arbitrary punctuation and
/// names that carry `#` or `Server:` past their first character.
pub fn principal_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[A-Za-z][A-Za-z0-9 ._-]{0,23}",
        2 => "[ \t]{0,2}[^,\r\n]{1,20}",
        1 => "[ \t]{0,2}[A-Za-z\\$@!.-]{1,4}(#|Server:|server:)[^,\r\n]{0,8}",
    ]
    .prop_filter("name must read back as an ACL row", |name| {
        validate_name(name).is_ok()
    })
}

pub fn principal_kind() -> impl Strategy<Value = PrincipalKind> {
    prop_oneof![Just(PrincipalKind::User), Just(PrincipalKind::Group)]
}

pub fn permission() -> impl Strategy<Value = Permission> {
    prop_oneof![Just(Permission::Operator), Just(Permission::Admin)]
}

pub fn acl_entry() -> impl Strategy<Value = AclEntry> {
    (principal_name(), principal_kind(), permission())
        .prop_map(|(name, kind, permission)| AclEntry::new(name, kind, permission))
}

/// Up to `max` entries, at most one per `(name, kind)`.
pub fn acl_entries(max: usize) -> impl Strategy<Value = Vec<AclEntry>> {
    prop::collection::vec(acl_entry(), 0..=max).prop_map(|entries| {
        let mut unique: Vec<AclEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !unique
                .iter()
                .any(|e| e.name == entry.name && e.kind == entry.kind)
            {
                unique.push(entry);
            }
        }
        unique
    })
}

/// An IPv4 address in dotted form.
pub fn ipv4() -> impl Strategy<Value = String> {
    any::<[u8; 4]>().prop_map(|o| format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3]))
}

pub fn server_record() -> impl Strategy<Value = ServerRecord> {
    (
        prop::collection::vec(ipv4(), 1..=3),
        "[a-z][a-z0-9-]{0,11}(\\.[a-z]{2,6}){0,2}",
    )
        .prop_map(|(addresses, host)| ServerRecord::new(addresses, host))
}

/// A hand-written line that is not an ACL row: a comment, a blank line or
/// free text without separators.
pub fn noise_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "#[ -~]{0,30}",
        "[ \t]{0,4}",
        "[ \t]{0,2}#[ -+.-~]{0,20}",
        "[A-Za-z=]{1,20}",
    ]
}
