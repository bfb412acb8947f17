use serenity::all::{Context, GuildMemberUpdateEvent, Member};

use crate::data::member_store::Change;
use crate::model::guild::GuildMemberSnapshot;
use crate::service::discord::snapshot_from_member;
use crate::service::member::MemberService;
use crate::state::BotState;

/// Handles the guild_member_addition event when a member joins the guild.
///
/// Creates a record for a first-time member, or restores the roles of a returning one,
/// and sends the welcome and onboarding messages.
pub async fn handle_guild_member_addition(state: &BotState, ctx: Context, new_member: Member) {
    if new_member.guild_id.get() != state.config.guild_id || new_member.user.bot {
        return;
    }

    let snapshot = snapshot_from_member(&new_member);
    let moderation = state.moderation(ctx.http.clone());
    let service = MemberService::new(
        &state.store,
        &moderation,
        &state.config.roles,
        &state.config.society_name,
    );

    match service.handle_join(&snapshot).await {
        Ok(report) if report.is_clean() => {
            tracing::info!("{} joined the guild", snapshot.display_name)
        }
        Ok(report) => tracing::warn!(
            "{} joined the guild, but these actions failed: {}",
            snapshot.display_name,
            report.failed_actions().join(", ")
        ),
        Err(e) => tracing::error!(
            "Failed to record join of {} ({}): {:?}",
            snapshot.display_name,
            snapshot.id,
            e
        ),
    }
}

/// Handles the guild_member_update event when a member is updated (roles, nickname, etc.)
///
/// Keeps the stored display name and membership status in line with the member's
/// profile. Uses the cached member when available and falls back to the event payload.
pub async fn handle_guild_member_update(
    state: &BotState,
    ctx: Context,
    _old: Option<Member>,
    new: Option<Member>,
    event: GuildMemberUpdateEvent,
) {
    if event.guild_id.get() != state.config.guild_id || event.user.bot {
        return;
    }

    let snapshot = match new {
        Some(member) => snapshot_from_member(&member),
        None => snapshot_from_update(&event),
    };

    let moderation = state.moderation(ctx.http.clone());
    let service = MemberService::new(
        &state.store,
        &moderation,
        &state.config.roles,
        &state.config.society_name,
    );

    match service.sync_member(&snapshot).await {
        Ok(Change::Updated) => tracing::info!(
            "{} is now a {}",
            snapshot.display_name,
            snapshot.membership_status(&state.config.roles)
        ),
        Ok(Change::Unchanged) => {
            tracing::debug!("Synced profile of {}", snapshot.display_name)
        }
        Err(e) => tracing::error!(
            "Failed to sync member {} ({}): {:?}",
            snapshot.display_name,
            snapshot.id,
            e
        ),
    }
}

/// Builds a snapshot from a member update payload.
///
/// The display name follows Discord's precedence: guild nickname, then global name,
/// then username.
pub fn snapshot_from_update(event: &GuildMemberUpdateEvent) -> GuildMemberSnapshot {
    let display_name = event
        .nick
        .clone()
        .or_else(|| event.user.global_name.clone())
        .unwrap_or_else(|| event.user.name.clone());

    GuildMemberSnapshot {
        id: event.user.id.get(),
        display_name,
        roles: event.roles.iter().map(|role| role.get()).collect(),
        bot: event.user.bot,
    }
}
