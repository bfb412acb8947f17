use super::*;
use crate::model::strike::{StrikeConsequence, StrikeOutcome};

/// Tests issuing a first strike to a clean member.
///
/// Expected: Ok with level 1, a tier consequence and the reason in slot 1
#[test]
fn first_strike_assigns_tier() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_row("1,Alice,member,0,,,,,").build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let outcome = store.issue_strike(1, "spam", at(2024, 5, 1, 12, 0))?;

    assert_eq!(
        outcome,
        StrikeOutcome::Issued {
            level: 1,
            consequence: StrikeConsequence::Tier(1),
        }
    );
    let record = store.get(1)?;
    assert_eq!(record.strike_count, 1);
    assert_eq!(record.strike_reasons[0], "spam");
    assert_eq!(record.ban_expiry, BanExpiry::None);

    Ok(())
}

/// Tests the third strike and its temporary ban.
///
/// Verifies that the expiry is seven days after the strike truncated to the minute,
/// and that the new state is on disk before the outcome is returned.
///
/// Expected: Ok with level 3 and a temporary ban until seven days later
#[test]
fn third_strike_bans_for_seven_days() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,2,spam,flood,,,")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let now = at(2024, 5, 1, 12, 30) + chrono::Duration::seconds(42);

    let outcome = store.issue_strike(1, "slurs", now)?;

    let until = at(2024, 5, 8, 12, 30);
    assert_eq!(
        outcome,
        StrikeOutcome::Issued {
            level: 3,
            consequence: StrikeConsequence::TemporaryBan { until },
        }
    );
    assert_eq!(store.get(1)?.ban_expiry, BanExpiry::At(until));
    assert!(test
        .read_store()
        .unwrap()
        .contains("1,Alice,member,3,spam,flood,slurs,,2024-05-08 12:30"));

    Ok(())
}

/// Tests the fourth strike and its permanent ban.
///
/// Expected: Ok with level 4, a permanent ban consequence and expiry `never`
#[test]
fn fourth_strike_bans_permanently() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,3,a,b,c,,2024-05-08 12:30")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let outcome = store.issue_strike(1, "d", at(2024, 5, 2, 9, 0))?;

    assert_eq!(
        outcome,
        StrikeOutcome::Issued {
            level: 4,
            consequence: StrikeConsequence::PermanentBan,
        }
    );
    assert_eq!(store.get(1)?.ban_expiry, BanExpiry::Never);

    Ok(())
}

/// Tests striking a member who is already permanently banned.
///
/// Expected: Ok(StrikeOutcome::AlreadyMaximal) and the record unchanged
#[test]
fn strike_at_maximum_changes_nothing() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,4,a,b,c,d,never")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let before = store.get(1)?.clone();

    let outcome = store.issue_strike(1, "again", at(2024, 5, 2, 9, 0))?;

    assert_eq!(outcome, StrikeOutcome::AlreadyMaximal);
    assert_eq!(store.get(1)?, &before);

    Ok(())
}

/// Tests striking an unknown member.
///
/// Expected: Err(StoreError::NotFound) with the member ID
#[test]
fn strike_unknown_member_fails() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_empty_store().build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    let result = store.issue_strike(99, "spam", at(2024, 5, 2, 9, 0));

    assert!(matches!(result, Err(StoreError::NotFound(99))));

    Ok(())
}

/// Tests that the strike count stays within bounds over any mix of operations.
///
/// Expected: the count never leaves `0..=4` and a set expiry always sits on level 3 or 4
#[test]
fn strike_count_stays_in_bounds() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_row("1,Alice,member,0,,,,,").build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let now = at(2024, 5, 1, 12, 0);

    // s = strike, c = clear
    for op in "cssccsssssscccsc".chars() {
        match op {
            's' => {
                store.issue_strike(1, "reason", now)?;
            }
            _ => {
                store.clear_strike(1)?;
            }
        }

        let record = store.get(1)?;
        assert!(record.strike_count <= 4);
        if record.ban_expiry != BanExpiry::None {
            assert!(record.strike_count >= 3);
        }
    }

    assert_eq!(store.get(1)?.strike_count, 4);

    Ok(())
}

/// Tests that a failed write leaves the record at its previous level.
///
/// Expected: Err(StoreError::Persistence) and the strike count unchanged in memory
#[test]
fn rolls_back_on_write_failure() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,2,spam,flood,,,")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    test.break_store_dir().unwrap();

    let result = store.issue_strike(1, "slurs", at(2024, 5, 1, 12, 0));

    assert!(matches!(result, Err(StoreError::Persistence { .. })));
    let record = store.get(1)?;
    assert_eq!(record.strike_count, 2);
    assert_eq!(record.ban_expiry, BanExpiry::None);
    assert!(record.strike_reasons[2].is_empty());

    Ok(())
}

/// Tests that a strike needs a reason.
///
/// Expected: Err(StoreError::MissingReason) and nothing written
#[test]
fn blank_reason_is_rejected() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_row("1,Alice,member,0,,,,,").build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let before = test.read_store().unwrap();

    let result = store.issue_strike(1, "   ", at(2024, 5, 1, 12, 0));

    assert!(matches!(result, Err(StoreError::MissingReason(1))));
    assert_eq!(store.get(1)?.strike_count, 0);
    assert_eq!(test.read_store().unwrap(), before);

    Ok(())
}
