//! Ready event handler.
//!
//! Fired once per gateway session after the initial handshake. Logs the connection
//! and sets the bot's presence, which points members at the help command.

use serenity::all::{ActivityData, Context, Ready};

use crate::state::BotState;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared bot state, used for the command prefix
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::playing(presence_text(
        &state.config.command_prefix,
    ))));
}

pub fn presence_text(prefix: &str) -> String {
    format!("type {}help for the list of commands", prefix)
}
