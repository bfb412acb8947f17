use serenity::all::{Context, Guild};

use crate::service::member::MemberService;
use crate::state::BotState;

/// Handles the guild_create event by reconciling the member store against the guild.
///
/// Only the configured guild is reconciled. The event fires again after every
/// reconnect, which keeps records fresh without a separate startup step.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `ctx` - Discord context with the HTTP client
/// - `guild` - Guild that became available
/// - `_is_new` - Whether the bot just joined this guild (unused)
pub async fn handle_guild_create(
    state: &BotState,
    ctx: Context,
    guild: Guild,
    _is_new: Option<bool>,
) {
    if guild.id.get() != state.config.guild_id {
        tracing::debug!("Ignoring guild_create for unconfigured guild {}", guild.id);
        return;
    }

    tracing::info!("Guild available: {} (ID: {})", guild.name, guild.id);

    let moderation = state.moderation(ctx.http.clone());
    let service = MemberService::new(
        &state.store,
        &moderation,
        &state.config.roles,
        &state.config.society_name,
    );

    match service.reconcile(&moderation).await {
        Ok(report) => tracing::info!(
            "Reconciled guild {}: {} added, {} renamed, {} awaiting onboarding",
            guild.name,
            report.added.len(),
            report.renamed.len(),
            report.needs_onboarding.len()
        ),
        Err(e) => tracing::error!("Failed to reconcile guild {}: {:?}", guild.name, e),
    }
}
