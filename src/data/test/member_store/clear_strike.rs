use super::*;
use crate::model::strike::{ClearConsequence, ClearOutcome};

/// Tests clearing a member with no strikes.
///
/// Expected: Ok(ClearOutcome::NoStrikes) and nothing written
#[test]
fn clear_without_strikes_is_no_strikes() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_row("1,Alice,member,0,,,,,").build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let before = test.read_store().unwrap();

    let outcome = store.clear_strike(1)?;

    assert_eq!(outcome, ClearOutcome::NoStrikes);
    assert_eq!(test.read_store().unwrap(), before);

    Ok(())
}

/// Tests clearing the only strike.
///
/// Expected: Ok with level 0 and every tier role removed
#[test]
fn clearing_first_strike_removes_tier() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,1,spam,,,,")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let outcome = store.clear_strike(1)?;

    assert_eq!(
        outcome,
        ClearOutcome::Cleared {
            level: 0,
            consequence: ClearConsequence {
                tier: None,
                lift_ban: false,
            },
        }
    );
    let record = store.get(1)?;
    assert_eq!(record.strike_count, 0);
    assert!(record.strike_reasons[0].is_empty());

    Ok(())
}

/// Tests clearing the third strike while the temporary ban is active.
///
/// Expected: Ok with level 2, tier 2, the ban lifted and the expiry cleared
#[test]
fn clearing_third_strike_lifts_ban() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,2024-05-08 12:30")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let outcome = store.clear_strike(1)?;

    assert_eq!(
        outcome,
        ClearOutcome::Cleared {
            level: 2,
            consequence: ClearConsequence {
                tier: Some(2),
                lift_ban: true,
            },
        }
    );
    let record = store.get(1)?;
    assert_eq!(record.ban_expiry, BanExpiry::None);
    assert_eq!(record.strike_reasons[1], "b");
    assert!(record.strike_reasons[2].is_empty());
    assert!(test
        .read_store()
        .unwrap()
        .contains("1,Alice,member,2,a,b,,,"));

    Ok(())
}

/// Tests clearing a permanent ban.
///
/// Expected: Ok(ClearOutcome::PermanentBanLocked) and the record unchanged
#[test]
fn permanent_ban_is_locked() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,4,a,b,c,d,never")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let outcome = store.clear_strike(1)?;

    assert_eq!(outcome, ClearOutcome::PermanentBanLocked);
    assert_eq!(store.get(1)?.strike_count, 4);
    assert_eq!(store.get(1)?.ban_expiry, BanExpiry::Never);

    Ok(())
}

/// Tests clearing the third strike after the sweep already lifted its ban.
///
/// Expected: Ok with level 2 and tier 2, but no ban to lift
#[test]
fn clearing_swept_third_strike_keeps_member_unbanned() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let outcome = store.clear_strike(1)?;

    assert_eq!(
        outcome,
        ClearOutcome::Cleared {
            level: 2,
            consequence: ClearConsequence {
                tier: Some(2),
                lift_ban: false,
            },
        }
    );
    assert_eq!(store.get(1)?.ban_expiry, BanExpiry::None);

    Ok(())
}
