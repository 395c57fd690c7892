// Friend list snapshot tests against a core with failing queries

use std::collections::HashSet;

mod common;
use common::{public_id, setup_logging, three_friend_core, FlakyCore};

use toxbridge::snapshot::{build_snapshot, field_fallback_count, lookup_contacts, snapshot_json};
use toxbridge::{BridgeError, CoreHandle, MemoryCore, PresenceStatus, PUBLIC_ID_SIZE};

#[test]
fn test_full_snapshot() {
    setup_logging();
    let core = three_friend_core();
    let records = build_snapshot(&core).unwrap();

    assert_eq!(records.len(), 3);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);

    assert_eq!(records[0].status, PresenceStatus::Away);
    assert_eq!(records[0].status_msg, "coffee");
    assert!(records[0].online);
    assert_eq!(records[0].public_id, "A1".repeat(PUBLIC_ID_SIZE));

    assert_eq!(records[1].status, PresenceStatus::Busy);
    assert!(!records[1].online);
    assert_eq!(records[2].status, PresenceStatus::None);

    let numbers: HashSet<i32> = records.iter().map(|r| r.number).collect();
    assert_eq!(numbers.len(), 3);
}

#[test]
fn test_failed_name_lookup_keeps_other_records() {
    setup_logging();
    let mut core = FlakyCore::new(three_friend_core());
    core.fail_name_for.insert(1);
    let before = field_fallback_count();

    let records = build_snapshot(&core).unwrap();
    assert_eq!(records.len(), 3);

    let bob = &records[1];
    assert_eq!(bob.number, 1);
    assert_eq!(bob.name, "");
    assert_eq!(bob.public_id, "B2".repeat(PUBLIC_ID_SIZE));
    assert_eq!(bob.status, PresenceStatus::Busy);
    assert_eq!(bob.status_msg, "in a meeting");
    assert!(!bob.online);

    assert_eq!(records[0].name, "alice");
    assert_eq!(records[2].name, "carol");
    assert!(field_fallback_count() > before);
}

#[test]
fn test_lookup_distinguishes_failure_from_empty() {
    setup_logging();
    let mut inner = MemoryCore::new();
    inner.add_friend(public_id(1), "").unwrap();
    inner.add_friend(public_id(2), "dave").unwrap();
    let mut core = FlakyCore::new(inner);
    core.fail_name_for.insert(1);

    let lookups = lookup_contacts(&core).unwrap();
    assert!(lookups[0].unavailable_fields().is_empty());
    assert_eq!(lookups[0].name.value().map(String::as_str), Some(""));
    assert_eq!(lookups[1].unavailable_fields(), vec!["name"]);
}

#[test]
fn test_failed_status_lookup_reads_as_none() {
    setup_logging();
    let mut core = FlakyCore::new(three_friend_core());
    core.fail_status_for.insert(0);
    let records = build_snapshot(&core).unwrap();
    assert_eq!(records[0].status, PresenceStatus::None);
    assert_eq!(records[0].name, "alice");
}

#[test]
fn test_enumeration_failure_aborts_snapshot() {
    setup_logging();
    let mut core = FlakyCore::new(three_friend_core());
    core.fail_enumeration = true;

    let err = build_snapshot(&core).unwrap_err();
    assert!(matches!(err, BridgeError::Enumeration(_)));
    assert_eq!(err.code(), Some("enumeration_failure"));
    assert!(snapshot_json(&core).is_err());
}

#[test]
fn test_snapshot_json_body() {
    setup_logging();
    let core = three_friend_core();
    let body: serde_json::Value = serde_json::from_str(&snapshot_json(&core).unwrap()).unwrap();
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(
        list[1],
        serde_json::json!({
            "number": 1,
            "id": "B2".repeat(PUBLIC_ID_SIZE),
            "chat": [],
            "name": "bob",
            "status": "BUSY",
            "status_msg": "in a meeting",
            "online": false,
        })
    );
}

#[test]
fn test_concurrent_snapshots_through_handle() {
    setup_logging();
    let handle = CoreHandle::new(three_friend_core());
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let handle = handle.clone();
            std::thread::spawn(move || toxbridge::snapshot::build_snapshot_shared(&handle).unwrap().len())
        })
        .collect();

    for worker in workers {
        assert_eq!(worker.join().unwrap(), 3);
    }
}
