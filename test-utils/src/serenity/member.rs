//! Test factory for creating Serenity Member objects.
//!
//! Members are what the gateway hands the bot on join and update events and what the
//! REST member list returns, so these objects back the conversion and role sync tests.

use serenity::all::{GuildMemberUpdateEvent, Member};

use crate::serenity::user::user_json;

/// Creates a test Serenity Member with the given roles.
///
/// The member has no nickname, so their display name is `username`.
///
/// # Arguments
/// - `guild_id` - Guild the member belongs to
/// - `user_id` - Discord user ID (snowflake)
/// - `username` - Username of the underlying user
/// - `roles` - Role IDs assigned to the member
///
/// # Panics
/// - If the JSON cannot be deserialized into a Member (indicates invalid test data)
///
/// # Examples
///
/// ```rust,ignore
/// let member = create_test_member(1, 42, "Alice", &[100, 200]);
/// assert_eq!(member.roles.len(), 2);
/// ```
pub fn create_test_member(guild_id: u64, user_id: u64, username: &str, roles: &[u64]) -> Member {
    create_test_member_with_nick(guild_id, user_id, username, None, roles)
}

/// Creates a test Serenity Member with an optional guild nickname.
pub fn create_test_member_with_nick(
    guild_id: u64,
    user_id: u64,
    username: &str,
    nick: Option<&str>,
    roles: &[u64],
) -> Member {
    let roles: Vec<String> = roles.iter().map(|id| id.to_string()).collect();

    serde_json::from_value(serde_json::json!({
        "guild_id": guild_id.to_string(),
        "user": user_json(user_id, username, false),
        "nick": nick,
        "avatar": null,
        "roles": roles,
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "premium_since": null,
        "deaf": false,
        "mute": false,
        "flags": 0,
        "pending": false,
        "permissions": null,
        "communication_disabled_until": null,
    }))
    .expect("Failed to create test member - invalid JSON structure")
}

/// Creates a test member update payload, as sent by the gateway when a member's
/// nickname or roles change.
///
/// # Panics
/// - If the JSON cannot be deserialized into the event (indicates invalid test data)
pub fn create_test_member_update(
    guild_id: u64,
    user_id: u64,
    username: &str,
    nick: Option<&str>,
    roles: &[u64],
) -> GuildMemberUpdateEvent {
    let roles: Vec<String> = roles.iter().map(|id| id.to_string()).collect();

    serde_json::from_value(serde_json::json!({
        "guild_id": guild_id.to_string(),
        "user": user_json(user_id, username, false),
        "nick": nick,
        "avatar": null,
        "roles": roles,
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "premium_since": null,
        "deaf": false,
        "mute": false,
        "flags": 0,
        "pending": false,
        "communication_disabled_until": null,
    }))
    .expect("Failed to create test member update - invalid JSON structure")
}
