use std::sync::Arc;

use serenity::all::{Client, GatewayIntents, ShardManager};
use serenity::prelude::TypeMapKey;

use crate::bot::handler::Handler;
use crate::error::AppError;
use crate::state::BotState;

/// Type map key for the shard manager, used by the `restart` command.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

/// Builds the Discord client without connecting to the gateway.
///
/// The client's HTTP handle is available as soon as this returns, which lets the unban
/// scheduler start before the gateway session does.
///
/// # Arguments
/// - `state` - Shared bot state handed to the event handler
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started with [`start_bot`]
/// - `Err(AppError::DiscordErr)` - The client could not be built
pub async fn init_bot(state: &BotState) -> Result<Client, AppError> {
    // GUILD_MEMBERS and MESSAGE_CONTENT are privileged intents
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler::new(state.clone());

    let client = Client::builder(&state.config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    client
        .data
        .write()
        .await
        .insert::<ShardManagerContainer>(client.shard_manager.clone());

    Ok(client)
}

/// Runs the gateway session until every shard has shut down.
///
/// # Returns
/// - `Ok(())` - The shards were shut down, normally by the `restart` command
/// - `Err(AppError::DiscordErr)` - The gateway connection failed
pub async fn start_bot(client: &mut Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    // Blocks until shutdown
    client.start().await?;

    Ok(())
}
