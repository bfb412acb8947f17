use super::*;
use crate::model::member::MemberRecord;
use test_utils::builder::STORE_HEADER;

/// Tests loading when no store file exists.
///
/// Verifies that the store seeds a fresh file containing only the header row
/// instead of leaving the file absent.
///
/// Expected: Ok with an empty store, `created` set and a header-only file on disk
#[test]
fn creates_header_only_file_when_absent() -> Result<(), StoreError> {
    let test = TestBuilder::new().build().unwrap();

    let (store, report) = MemberStore::load(test.store_path())?;

    assert!(store.is_empty());
    assert!(report.created);
    assert_eq!(test.read_store().unwrap(), format!("{}\n", STORE_HEADER));

    Ok(())
}

/// Tests loading a file with one malformed row among valid rows.
///
/// Expected: Ok with exactly the valid records loaded and one skipped row reported
#[test]
fn skips_malformed_row() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,0,,,,,")
        .with_row("2,Bob,guest,1,spam,,,,")
        .with_row("3,Carol,member")
        .with_row("4,Dave,,3,a,b,c,,2024-01-01 00:00")
        .build()
        .unwrap();

    let (store, report) = MemberStore::load(test.store_path())?;

    assert_eq!(store.len(), 3);
    assert_eq!(report.loaded, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 4);
    assert!(matches!(store.get(3), Err(StoreError::NotFound(3))));

    Ok(())
}

/// Tests that a persisted table loads back field-for-field.
///
/// Expected: every record read back equals the record that was written
#[test]
fn load_after_persist_reproduces_records() -> Result<(), StoreError> {
    let test = TestBuilder::new().build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    store.observe_member(1, "Alice")?;
    store.observe_member(2, "Bob, the \"Builder\"")?;
    store.observe_member(3, "Carol")?;
    store.set_membership_status(1, MembershipStatus::Member)?;
    store.set_membership_status(2, MembershipStatus::Guest)?;
    let now = at(2024, 3, 1, 18, 45);
    for reason in ["spam", "more spam, again", "flooding"] {
        store.issue_strike(2, reason, now)?;
    }
    for reason in ["a", "b", "c", "d"] {
        store.issue_strike(3, reason, now)?;
    }

    let written: Vec<MemberRecord> = store.records().cloned().collect();
    let (reloaded, report) = MemberStore::load(test.store_path())?;
    let read: Vec<MemberRecord> = reloaded.records().cloned().collect();

    assert!(report.skipped.is_empty());
    assert_eq!(read, written);
    assert_eq!(
        reloaded.get(2)?.ban_expiry,
        BanExpiry::At(at(2024, 3, 8, 18, 45))
    );
    assert_eq!(reloaded.get(3)?.ban_expiry, BanExpiry::Never);

    Ok(())
}

/// Tests that persisting leaves no temporary file behind.
///
/// Expected: only the store file exists in the directory after a write
#[test]
fn persist_replaces_file_atomically() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_empty_store().build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    store.observe_member(7, "Grace")?;

    let entries: Vec<String> = std::fs::read_dir(test.dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["members.csv".to_string()]);
    assert!(test.read_store().unwrap().contains("7,Grace,,0,,,,,"));

    Ok(())
}

/// Tests loading a store whose path cannot be created.
///
/// Expected: Err(StoreError::Persistence) when the fresh file cannot be written
#[test]
fn fails_when_fresh_file_cannot_be_written() {
    let test = TestBuilder::new().build().unwrap();

    let result = MemberStore::load(test.unwritable_store_path());

    assert!(matches!(result, Err(StoreError::Persistence { .. })));
}
