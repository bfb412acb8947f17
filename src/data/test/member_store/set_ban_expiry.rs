use super::*;

/// Tests that a timed expiry is accepted only at strike level 3.
///
/// Expected: Ok at level 3, Err(StoreError::InvalidBanExpiry) at level 2
#[test]
fn timed_expiry_requires_third_strike() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,")
        .with_row("2,Bob,member,2,a,b,,,")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let until = BanExpiry::At(at(2024, 6, 1, 0, 0));

    store.set_ban_expiry(1, until)?;
    let result = store.set_ban_expiry(2, until);

    assert_eq!(store.get(1)?.ban_expiry, until);
    assert!(matches!(
        result,
        Err(StoreError::InvalidBanExpiry {
            member_id: 2,
            strike_count: 2
        })
    ));
    assert_eq!(store.get(2)?.ban_expiry, BanExpiry::None);

    Ok(())
}

/// Tests that a permanent expiry is accepted only at strike level 4.
///
/// Expected: Err(StoreError::InvalidBanExpiry) at level 3
#[test]
fn permanent_expiry_requires_fourth_strike() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let result = store.set_ban_expiry(1, BanExpiry::Never);

    assert!(matches!(result, Err(StoreError::InvalidBanExpiry { .. })));

    Ok(())
}

/// Tests that clearing an expiry is always allowed.
///
/// Expected: Ok with the expiry cleared and the strike level untouched
#[test]
fn clearing_expiry_is_always_allowed() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,2024-06-01 00:00")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    store.set_ban_expiry(1, BanExpiry::None)?;

    let record = store.get(1)?;
    assert_eq!(record.ban_expiry, BanExpiry::None);
    assert_eq!(record.strike_count, 3);

    Ok(())
}
