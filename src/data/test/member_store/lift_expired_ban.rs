use super::*;

/// Tests which bans are reported as expired.
///
/// Expected: only timed bans strictly before `now`, never permanent bans
#[test]
fn lists_only_expired_timed_bans() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,2024-01-01 00:00")
        .with_row("2,Bob,guest,3,a,b,c,,2024-01-09 00:00")
        .with_row("3,Carol,member,4,a,b,c,d,never")
        .with_row("4,Dave,member,0,,,,,")
        .build()
        .unwrap();
    let (store, _) = MemberStore::load(test.store_path())?;

    let expired = store.expired_bans(at(2024, 1, 2, 0, 0));

    assert_eq!(expired, vec![(1, "Alice".to_string())]);

    Ok(())
}

/// Tests lifting an expired ban.
///
/// Verifies the expiry is cleared in memory only, the strike level is kept, and a
/// second call is a no-op.
///
/// Expected: true then false, expiry cleared, count still 3, file untouched until persist
#[test]
fn lifts_ban_in_memory_once() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,2024-01-01 00:00")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let now = at(2024, 1, 2, 0, 0);

    assert!(store.lift_expired_ban(1, now));
    assert!(!store.lift_expired_ban(1, now));

    let record = store.get(1)?;
    assert_eq!(record.ban_expiry, BanExpiry::None);
    assert_eq!(record.strike_count, 3);
    assert!(test.read_store().unwrap().contains("2024-01-01 00:00"));

    store.persist()?;
    assert!(test
        .read_store()
        .unwrap()
        .contains("1,Alice,member,3,a,b,c,,\n"));

    Ok(())
}

/// Tests lifting a ban that has not expired or a member that is unknown.
///
/// Expected: false and no change
#[test]
fn ignores_active_bans_and_unknown_members() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,2024-01-09 00:00")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let now = at(2024, 1, 2, 0, 0);

    assert!(!store.lift_expired_ban(1, now));
    assert!(!store.lift_expired_ban(42, now));
    assert_eq!(store.get(1)?.ban_expiry, BanExpiry::At(at(2024, 1, 9, 0, 0)));

    Ok(())
}
