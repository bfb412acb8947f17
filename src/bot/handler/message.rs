use serenity::all::{Context, GuildId, Message};

use crate::bot::command;
use crate::service::member::MemberService;
use crate::state::BotState;

/// Handles the message event.
///
/// Direct messages are treated as replies to the onboarding prompt. Messages in the
/// configured guild that start with the command prefix are dispatched as commands.
/// Messages from bots, including this one, are ignored.
pub async fn handle_message(state: &BotState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    match message.guild_id {
        None => handle_direct_message(state, &ctx, &message).await,
        Some(guild_id) if guild_id.get() == state.config.guild_id => {
            if message
                .content
                .trim_start()
                .starts_with(state.config.command_prefix.as_str())
            {
                command::dispatch(state, &ctx, &message).await;
            }
        }
        Some(_) => {}
    }
}

async fn handle_direct_message(state: &BotState, ctx: &Context, message: &Message) {
    // Roles are looked up fresh since a DM carries no member data.
    let member = match GuildId::new(state.config.guild_id)
        .member(ctx, message.author.id)
        .await
    {
        Ok(member) => member,
        Err(e) => {
            tracing::debug!(
                "Ignoring direct message from {} who is not in the guild: {:?}",
                message.author.name,
                e
            );
            return;
        }
    };
    let roles: Vec<u64> = member.roles.iter().map(|role| role.get()).collect();

    let moderation = state.moderation(ctx.http.clone());
    let service = MemberService::new(
        &state.store,
        &moderation,
        &state.config.roles,
        &state.config.society_name,
    );

    match service
        .accept_terms(message.author.id.get(), &roles, &message.content)
        .await
    {
        Ok(_) => {}
        Err(e) => tracing::error!(
            "Failed to store onboarding reply from {}: {:?}",
            message.author.name,
            e
        ),
    }
}
