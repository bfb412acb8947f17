//! Text command dispatch.
//!
//! A guild message starting with the command prefix is parsed into a command name and
//! arguments, routed through the [`registry::CommandRegistry`] and run inside
//! [`guard::run_guarded`], which logs the invocation and turns any error into a reply.

use serenity::all::{ChannelId, Context, Message};

use crate::bot::command::registry::{ChannelScope, CommandKind, Route};
use crate::error::AppError;
use crate::service::discord::DiscordModeration;
use crate::state::BotState;

pub mod admin;
pub mod confirm;
pub mod game_role;
pub mod guard;
pub mod help;
pub mod membership;
pub mod moderation;
pub mod registry;

/// A parsed command message.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation<'a> {
    /// Lowercased command name without the prefix.
    pub name: String,
    pub args: Vec<&'a str>,
}

/// Splits a message into command name and whitespace-separated arguments.
///
/// Returns `None` when the message does not start with `prefix` or has no name after it.
pub fn parse_invocation<'a>(prefix: &str, content: &'a str) -> Option<Invocation<'a>> {
    let mut words = content.trim().strip_prefix(prefix)?.split_whitespace();
    let name = words.next()?.to_lowercase();

    Some(Invocation {
        name,
        args: words.collect(),
    })
}

/// Everything a command handler needs about the message that invoked it.
pub struct CommandContext<'a> {
    pub state: &'a BotState,
    pub ctx: &'a Context,
    pub msg: &'a Message,
    pub scope: ChannelScope,
    pub moderation: DiscordModeration,
}

impl<'a> CommandContext<'a> {
    pub fn new(state: &'a BotState, ctx: &'a Context, msg: &'a Message, scope: ChannelScope) -> Self {
        Self {
            state,
            ctx,
            msg,
            scope,
            moderation: state.moderation(ctx.http.clone()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.state.config.command_prefix
    }

    pub fn author_id(&self) -> u64 {
        self.msg.author.id.get()
    }

    /// Guild roles of the invoker at the time the message was sent.
    pub fn author_roles(&self) -> Vec<u64> {
        author_roles(self.msg)
    }

    /// Replies in the channel the command was sent in.
    pub async fn reply(&self, text: impl Into<String>) -> Result<(), AppError> {
        self.msg.channel_id.say(&self.ctx.http, text).await?;
        Ok(())
    }
}

/// Parses and routes a guild message that starts with the command prefix.
pub async fn dispatch(state: &BotState, ctx: &Context, msg: &Message) {
    let Some(invocation) = parse_invocation(&state.config.command_prefix, &msg.content) else {
        return;
    };

    let scope = ChannelScope::of(msg.channel_id.get(), &state.config.channels);
    let is_committee = author_roles(msg).contains(&state.config.roles.committee);
    let prefix = &state.config.command_prefix;

    let result = match state.registry.route(&invocation.name, scope, is_committee) {
        Route::Run(command) => {
            let cx = CommandContext::new(state, ctx, msg, scope);
            guard::run_guarded(&cx, command, run(command.kind, &cx, &invocation.args)).await;
            Ok(())
        }
        Route::Redirect { moderation } => redirect(state, ctx, msg, moderation).await,
        Route::NotFound { committee_hint } => {
            let reply = format!(
                "Command `{0}{1}` not found. Use `{0}help` to get the list of commands",
                prefix, invocation.name
            );
            match msg.channel_id.say(&ctx.http, reply).await {
                Ok(_) if committee_hint => redirect_notice(state, ctx, msg, true).await,
                Ok(_) => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
        Route::Forbidden => msg
            .channel_id
            .say(&ctx.http, "That command is for committee members only.")
            .await
            .map(|_| ())
            .map_err(AppError::from),
    };

    if let Err(e) = result {
        tracing::error!(
            "Failed to route {}{} from {}: {:?}",
            prefix,
            invocation.name,
            msg.author.name,
            e
        );
    }
}

async fn run(kind: CommandKind, cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    match kind {
        CommandKind::Help => help::help(cx, args).await,
        CommandKind::Strike => moderation::strike(cx, args).await,
        CommandKind::Destrike => moderation::destrike(cx, args).await,
        CommandKind::Strikes => membership::strikes(cx, args).await,
        CommandKind::ChangeRole => membership::change_role(cx, args).await,
        CommandKind::AddRole => game_role::add_role(cx, args).await,
        CommandKind::RemoveRole => game_role::remove_role(cx, args).await,
        CommandKind::ListRole => game_role::list_role(cx, args).await,
        CommandKind::CreateRole => game_role::create_role(cx, args).await,
        CommandKind::ChangePresence => admin::change_presence(cx, args).await,
        CommandKind::Restart => admin::restart(cx, args).await,
    }
}

/// Deletes a command sent outside the bot channels and points the author elsewhere.
async fn redirect(
    state: &BotState,
    ctx: &Context,
    msg: &Message,
    moderation: bool,
) -> Result<(), AppError> {
    if let Err(e) = msg.delete(ctx).await {
        tracing::warn!("Failed to delete misplaced command from {}: {:?}", msg.author.name, e);
    }

    redirect_notice(state, ctx, msg, moderation).await
}

async fn redirect_notice(
    state: &BotState,
    ctx: &Context,
    msg: &Message,
    moderation: bool,
) -> Result<(), AppError> {
    let (channel_id, text) = if moderation {
        (
            state.config.channels.moderation,
            format!("<@{}> use committee commands here.", msg.author.id),
        )
    } else {
        (
            state.config.channels.command,
            format!("<@{}> use commands here.", msg.author.id),
        )
    };

    ChannelId::new(channel_id).say(&ctx.http, text).await?;
    Ok(())
}

fn author_roles(msg: &Message) -> Vec<u64> {
    msg.member
        .as_ref()
        .map(|member| member.roles.iter().map(|role| role.get()).collect())
        .unwrap_or_default()
}
