use super::*;

/// Tests setting a member's status.
///
/// Expected: Ok(Change::Updated) and the status persisted
#[test]
fn updates_status() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_row("1,Alice,,0,,,,,").build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let change = store.set_membership_status(1, MembershipStatus::Guest)?;

    assert_eq!(change, Change::Updated);
    assert!(test.read_store().unwrap().contains("1,Alice,guest,0,,,,,"));

    Ok(())
}

/// Tests setting the status a member already has.
///
/// Verifies the call is idempotent even when the store can no longer be written.
///
/// Expected: Ok(Change::Unchanged) without touching the file
#[test]
fn same_status_is_unchanged() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_row("1,Alice,member,0,,,,,").build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    test.break_store_dir().unwrap();

    let change = store.set_membership_status(1, MembershipStatus::Member)?;

    assert_eq!(change, Change::Unchanged);

    Ok(())
}

/// Tests that a failed write keeps the previous status.
///
/// Expected: Err(StoreError::Persistence) and the old status in memory
#[test]
fn rolls_back_on_write_failure() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_row("1,Alice,member,0,,,,,").build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    test.break_store_dir().unwrap();

    let result = store.set_membership_status(1, MembershipStatus::Guest);

    assert!(matches!(result, Err(StoreError::Persistence { .. })));
    assert_eq!(store.get(1)?.status, MembershipStatus::Member);

    Ok(())
}
