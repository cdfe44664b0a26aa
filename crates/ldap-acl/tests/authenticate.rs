//! End-to-end behaviour of the service over a real store file.

use ldap_acl::store::{AclStoreExt, MemoryStore, UpsertOutcome};
use ldap_acl::{AuthorizationPolicy, ErrorCode, GroupMismatch, UserMismatch};
use ldap_acl_testkit::fixtures::{memory_service, TestFixture, ADDRESS, HOST, PASSWORD};
use ldap_acl_testkit::generators::{acl_entries, noise_line, server_record};
use ldap_acl_testkit::vectors::FRESH_STORE;
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Setup
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_record_server_writes_boilerplate() {
    let fixture = TestFixture::new();
    assert!(!fixture.service.is_server_recorded());
    assert!(fixture.store_text().is_none());

    let response = fixture.service.record_server(HOST);
    assert!(response.success);
    assert_eq!(response.error_code, 0);
    assert_eq!(fixture.store_text().unwrap(), FRESH_STORE);
    assert!(fixture.service.is_server_recorded());
}

#[test]
fn test_record_server_twice_performs_no_write() {
    let service = memory_service(AuthorizationPolicy::default());
    assert!(service.record_server(HOST).success);
    assert!(service.record_server(HOST).success);
    assert_eq!(service.store().writes(), 1);
}

#[test]
fn test_unreachable_host_is_not_recorded() {
    let fixture = TestFixture::new();
    let response = fixture.service.record_server("dc99");
    assert!(!response.success);
    assert_eq!(response.error_code, 4009);
    assert!(fixture.store_text().is_none());
}

#[test]
fn test_upsert_before_record_fails() {
    let fixture = TestFixture::new();
    let response = fixture.service.upsert_permission("jdoe", "U", "A");
    assert_eq!(response.error_code, 4002);
    assert_eq!(fixture.service.clear_all_entries().error_code, 4002);
    assert!(fixture.store_text().is_none());
}

#[test]
fn test_invalid_kind_performs_no_write() {
    let fixture = TestFixture::recorded();
    let before = fixture.store_text();

    let response = fixture.service.upsert_permission("jdoe", "X", "A");
    assert!(!response.success);
    assert_eq!(response.code(), Some(ErrorCode::InvalidKindValue));
    assert_eq!(fixture.store_text(), before);

    let response = fixture.service.upsert_permission("jdoe", "U", "Q");
    assert_eq!(response.code(), Some(ErrorCode::InvalidPermissionValue));
    assert_eq!(fixture.store_text(), before);
}

#[test]
fn test_names_that_read_back_as_headers_are_refused() {
    let fixture = TestFixture::recorded();
    let before = fixture.store_text();

    for name in ["#admins", "Server:ops", " #x"] {
        let response = fixture.service.upsert_permission(name, "G", "A");
        assert!(!response.success);
        assert_eq!(response.error_code, 4999);
    }
    assert_eq!(fixture.store_text(), before);
    assert!(fixture.service.list_entries().result_array.is_empty());
}

#[test]
fn test_repeated_upsert_is_byte_identical() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("Engineering", "G", "O")]);
    let first = fixture.store_text();
    fixture.grant(&[("Engineering", "G", "O")]);
    assert_eq!(fixture.store_text(), first);
}

#[test]
fn test_clear_restores_pristine_store() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("jdoe", "U", "A"), ("Engineering", "G", "O"), ("Ops", "G", "A")]);

    assert!(fixture.service.clear_all_entries().success);
    assert_eq!(fixture.store_text().unwrap(), FRESH_STORE);
    assert!(fixture.service.list_entries().result_array.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_direct_entry_skips_group_lookup() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("jdoe", "U", "A")]);

    let response = fixture.service.authenticate("jdoe", PASSWORD, "A");
    assert!(response.success);
    assert!(response.result_bool);
    assert_eq!(response.result_string, "jdoe");
    assert_eq!(fixture.service.directory().group_lookups(), 0);
    assert_eq!(
        fixture.service.directory().last_path().unwrap().as_str(),
        format!("LDAP://{ADDRESS}")
    );
}

#[test]
fn test_user_mismatch_without_group_gives_4005() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("jdoe", "U", "A")]);

    let response = fixture.service.authenticate("jdoe", PASSWORD, "O");
    assert!(!response.success);
    assert_eq!(response.error_code, 4005);
}

#[test]
fn test_user_mismatch_terminal_gives_4001() {
    let fixture = TestFixture::with_policy(AuthorizationPolicy {
        user_mismatch: UserMismatch::Terminal,
        ..Default::default()
    });
    fixture.service.record_server(HOST);
    fixture.grant(&[("jdoe", "U", "A"), ("Engineering", "G", "O")]);

    let response = fixture.service.authenticate("jdoe", PASSWORD, "O");
    assert_eq!(response.error_code, 4001);
}

#[test]
fn test_group_entry_grants() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("Engineering", "G", "O")]);

    let response = fixture.service.authenticate("alice", PASSWORD, "O");
    assert!(response.success);
    assert_eq!(response.result_string, "Engineering");
}

#[test]
fn test_group_mismatch_policies() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("Engineering", "G", "A"), ("Ops", "G", "O")]);
    assert_eq!(
        fixture.service.authenticate("alice", PASSWORD, "O").result_string,
        "Ops"
    );

    let strict = TestFixture::with_policy(AuthorizationPolicy {
        group_mismatch: GroupMismatch::StopScan,
        ..Default::default()
    });
    strict.service.record_server(HOST);
    strict.grant(&[("Engineering", "G", "A"), ("Ops", "G", "O")]);
    assert_eq!(strict.service.authenticate("alice", PASSWORD, "O").error_code, 4001);
}

#[test]
fn test_no_entries_gives_4005_and_no_groups_gives_4004() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("Sales", "G", "A")]);

    assert_eq!(fixture.service.authenticate("bob", PASSWORD, "A").error_code, 4005);
    assert_eq!(fixture.service.authenticate("loner", PASSWORD, "A").error_code, 4004);
}

#[test]
fn test_group_lookup_failure_gives_4004() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("Engineering", "G", "O")]);
    fixture.service.directory().set_fail_group_lookups(true);

    assert_eq!(fixture.service.authenticate("alice", PASSWORD, "O").error_code, 4004);
}

#[test]
fn test_bind_failure_skips_acl() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("jdoe", "U", "A")]);

    let response = fixture.service.authenticate("jdoe", "wrong", "A");
    assert!(!response.success);
    assert_eq!(response.error_code, 4999);
    assert_eq!(fixture.service.directory().group_lookups(), 0);
}

#[test]
fn test_missing_store_and_address() {
    let fixture = TestFixture::new();
    assert_eq!(fixture.service.authenticate("jdoe", PASSWORD, "A").error_code, 4002);

    std::fs::write(fixture.store_path(), "# no server here\njdoe,U,A\n").unwrap();
    assert!(!fixture.service.is_server_recorded());
    assert_eq!(fixture.service.authenticate("jdoe", PASSWORD, "A").error_code, 4003);
    assert_eq!(fixture.service.directory().bind_calls(), 0);
}

#[test]
fn test_every_response_is_consistent() {
    let fixture = TestFixture::recorded();
    fixture.grant(&[("jdoe", "U", "A")]);
    let responses = [
        fixture.service.authenticate("jdoe", PASSWORD, "A"),
        fixture.service.authenticate("jdoe", PASSWORD, "O"),
        fixture.service.authenticate("ghost", PASSWORD, "A"),
        fixture.service.authenticate("jdoe", PASSWORD, "?"),
        fixture.service.upsert_permission("", "U", "A"),
        fixture.service.record_server("nowhere"),
        fixture.service.get_group(HOST, "Nope", "jdoe", PASSWORD),
    ];
    for response in &responses {
        assert!(response.is_consistent(), "{response:?}");
        if !response.success {
            assert!(!response.error_message.is_empty());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lookup_after_upsert(entries in acl_entries(8)) {
        let service = memory_service(AuthorizationPolicy::default());
        service.record_server(HOST);
        for entry in &entries {
            let response = service.upsert_permission(
                &entry.name,
                entry.kind.code(),
                entry.permission.code(),
            );
            prop_assert!(response.success);
        }

        let listed = service.list_entries().result_array;
        let expected: Vec<String> = entries.iter().map(ToString::to_string).collect();
        prop_assert_eq!(listed, expected);

        let store = service.store();
        let settled = store.contents();
        for entry in &entries {
            prop_assert_eq!(
                store.lookup(&entry.name, entry.kind).unwrap(),
                Some(entry.permission)
            );
            prop_assert_eq!(store.upsert(entry).unwrap(), UpsertOutcome::Unchanged);
        }
        prop_assert_eq!(store.contents(), settled);
    }

    #[test]
    fn clear_preserves_non_entry_lines(
        record in server_record(),
        noise in prop::collection::vec(noise_line(), 0..6),
        entries in acl_entries(5),
    ) {

        let store = MemoryStore::new();
        store.record_server(&record).unwrap();
        for entry in &entries {
            store.upsert(entry).unwrap();
        }
        let mut text = store.contents().unwrap();
        for line in &noise {
            text.push_str(line);
            text.push('\n');
        }
        let store = MemoryStore::with_contents(text.clone());

        store.clear_entries().unwrap();
        let cleared = store.contents().unwrap();
        let kept: Vec<&str> = text
            .lines()
            .filter(|l| {
                let t = l.trim();
                t.is_empty() || t.starts_with('#') || t.starts_with("Server:")
            })
            .collect();
        prop_assert_eq!(cleared.lines().collect::<Vec<_>>(), kept);
        prop_assert_eq!(store.server_record().unwrap(), Some(record));
    }
}
