use super::*;

/// Tests that a newly observed member gets a default record.
///
/// Expected: Ok(true) with an Unset, strike-free record persisted to disk
#[test]
fn creates_default_record() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_empty_store().build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    assert!(store.observe_member(10, "Newcomer")?);

    let record = store.get(10)?;
    assert_eq!(record.status, MembershipStatus::Unset);
    assert_eq!(record.strike_count, 0);
    assert_eq!(record.ban_expiry, BanExpiry::None);
    assert!(test.read_store().unwrap().contains("10,Newcomer,,0,,,,,"));

    Ok(())
}

/// Tests that a rejoining member keeps their strikes.
///
/// Expected: Ok(false), strikes kept and display name refreshed
#[test]
fn keeps_strikes_for_rejoining_member() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("10,OldName,member,2,spam,flood,,,")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    assert!(!store.observe_member(10, "NewName")?);

    let record = store.get(10)?;
    assert_eq!(record.strike_count, 2);
    assert_eq!(record.display_name, "NewName");
    assert_eq!(record.status, MembershipStatus::Member);

    Ok(())
}
