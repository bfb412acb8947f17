use super::*;
use crate::model::guild::GuildMemberSnapshot;

fn snapshot(id: u64, name: &str, roles: &[u64]) -> GuildMemberSnapshot {
    GuildMemberSnapshot {
        id,
        display_name: name.to_string(),
        roles: roles.to_vec(),
        bot: false,
    }
}

/// Tests that unknown guild members get records with status inferred from roles.
///
/// Expected: Ok with Member, Guest and Unset records created and reported as added
#[test]
fn adds_unknown_members_with_inferred_status() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_empty_store().build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let roles = test_roles();

    let report = store.reconcile(
        &[
            snapshot(1, "Alice", &[roles.member]),
            snapshot(2, "Bob", &[roles.guest, 999]),
            snapshot(3, "Carol", &[]),
        ],
        &roles,
    )?;

    assert_eq!(report.added, vec![1, 2, 3]);
    assert_eq!(store.get(1)?.status, MembershipStatus::Member);
    assert_eq!(store.get(2)?.status, MembershipStatus::Guest);
    assert_eq!(store.get(3)?.status, MembershipStatus::Unset);

    let (reloaded, _) = MemberStore::load(test.store_path())?;
    assert_eq!(reloaded.len(), 3);

    Ok(())
}

/// Tests reconciling members that already have records.
///
/// Verifies that display names are refreshed, a stored status is kept even when the
/// roles disagree, and an Unset status is filled in from the roles.
///
/// Expected: Ok with names refreshed, stored status authoritative, strikes untouched
#[test]
fn refreshes_known_members() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,1,spam,,,,")
        .with_row("2,Bob,,0,,,,,")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let roles = test_roles();

    let report = store.reconcile(
        &[
            snapshot(1, "Alice Renamed", &[roles.guest]),
            snapshot(2, "Bob", &[roles.member]),
        ],
        &roles,
    )?;

    assert!(report.added.is_empty());
    assert_eq!(report.renamed, vec![1]);

    let alice = store.get(1)?;
    assert_eq!(alice.display_name, "Alice Renamed");
    assert_eq!(alice.status, MembershipStatus::Member);
    assert_eq!(alice.strike_count, 1);

    assert_eq!(store.get(2)?.status, MembershipStatus::Member);

    Ok(())
}

/// Tests that members who left the guild keep their records.
///
/// Expected: Ok with the absent member's record unchanged
#[test]
fn keeps_records_of_departed_members() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_row("1,Alice,member,0,,,,,")
        .with_row("2,Gone,guest,3,a,b,c,,2024-01-01 00:00")
        .build()
        .unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;

    store.reconcile(&[snapshot(1, "Alice", &[100])], &test_roles())?;

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(2)?.strike_count, 3);

    Ok(())
}

/// Tests which members are reported as needing the onboarding prompt.
///
/// Expected: only non-bot members holding neither self-service role are reported
#[test]
fn reports_members_needing_onboarding() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_empty_store().build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    let roles = test_roles();

    let mut bot = snapshot(4, "SocietyBot", &[]);
    bot.bot = true;

    let report = store.reconcile(
        &[
            snapshot(1, "Alice", &[roles.member]),
            snapshot(2, "Bob", &[]),
            snapshot(3, "Carol", &[roles.committee]),
            bot,
        ],
        &roles,
    )?;

    assert_eq!(report.needs_onboarding, vec![2, 3]);

    Ok(())
}

/// Tests that a failed write rolls the whole reconcile back.
///
/// Expected: Err(StoreError::Persistence) and no new records in memory
#[test]
fn rolls_back_on_write_failure() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_row("1,Alice,member,0,,,,,").build().unwrap();
    let (mut store, _) = MemberStore::load(test.store_path())?;
    test.break_store_dir().unwrap();

    let result = store.reconcile(&[snapshot(2, "Bob", &[])], &test_roles());

    assert!(matches!(result, Err(StoreError::Persistence { .. })));
    assert_eq!(store.len(), 1);

    Ok(())
}
