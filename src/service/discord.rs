//! Discord implementation of the moderation collaborators.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serenity::all::{ChannelId, GuildId, Member, RoleId, UserId};
use serenity::async_trait;
use serenity::http::Http;

use crate::error::action::ActionError;
use crate::model::guild::GuildMemberSnapshot;
use crate::service::actions::{GuildDirectory, ModerationActions};

/// Upper bound for a single Discord request, after which it counts as a transport failure.
static ACTION_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum number of members to fetch per API request.
///
/// Discord's API supports up to 1000 members per request.
static MEMBERS_PER_REQUEST: u64 = 1000;

/// Carries out moderation actions in one guild through the bot's HTTP client.
#[derive(Clone)]
pub struct DiscordModeration {
    http: Arc<Http>,
    guild_id: GuildId,
    moderation_channel: ChannelId,
}

impl DiscordModeration {
    pub fn new(http: Arc<Http>, guild_id: u64, moderation_channel: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
            moderation_channel: ChannelId::new(moderation_channel),
        }
    }
}

#[async_trait]
impl ModerationActions for DiscordModeration {
    async fn ban(&self, member_id: u64, reason: &str) -> Result<(), ActionError> {
        bounded(
            "ban member",
            self.guild_id
                .ban_with_reason(&self.http, UserId::new(member_id), 0, reason),
        )
        .await
    }

    async fn unban(&self, member_id: u64) -> Result<(), ActionError> {
        bounded(
            "unban member",
            self.guild_id.unban(&self.http, UserId::new(member_id)),
        )
        .await
    }

    async fn add_role(&self, member_id: u64, role_id: u64) -> Result<(), ActionError> {
        bounded(
            "add role",
            self.http.add_member_role(
                self.guild_id,
                UserId::new(member_id),
                RoleId::new(role_id),
                None,
            ),
        )
        .await
    }

    async fn remove_role(&self, member_id: u64, role_id: u64) -> Result<(), ActionError> {
        bounded(
            "remove role",
            self.http.remove_member_role(
                self.guild_id,
                UserId::new(member_id),
                RoleId::new(role_id),
                None,
            ),
        )
        .await
    }

    async fn send_direct_message(&self, member_id: u64, text: &str) -> Result<(), ActionError> {
        let channel = bounded(
            "open direct message",
            UserId::new(member_id).create_dm_channel(&self.http),
        )
        .await?;

        bounded("send direct message", channel.id.say(&self.http, text)).await?;
        Ok(())
    }

    async fn notify_moderators(&self, text: &str) -> Result<(), ActionError> {
        bounded(
            "notify moderators",
            self.moderation_channel.say(&self.http, text),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl GuildDirectory for DiscordModeration {
    /// Fetches every guild member, paging through the member list.
    ///
    /// Requires the `GUILD_MEMBERS` privileged intent.
    async fn list_members(&self) -> Result<Vec<GuildMemberSnapshot>, ActionError> {
        let mut snapshots = Vec::new();
        let mut after: Option<u64> = None;

        loop {
            let members = bounded(
                "list guild members",
                self.http
                    .get_guild_members(self.guild_id, Some(MEMBERS_PER_REQUEST), after),
            )
            .await?;

            let fetched_count = members.len();
            after = members.last().map(|m| m.user.id.get());
            snapshots.extend(members.iter().map(snapshot_from_member));

            if fetched_count < MEMBERS_PER_REQUEST as usize {
                break;
            }
        }

        tracing::debug!(
            "Fetched {} members for guild {}",
            snapshots.len(),
            self.guild_id
        );

        Ok(snapshots)
    }
}

/// Converts a Serenity guild member into the snapshot the member store works with.
pub fn snapshot_from_member(member: &Member) -> GuildMemberSnapshot {
    GuildMemberSnapshot {
        id: member.user.id.get(),
        display_name: member.display_name().to_string(),
        roles: member.roles.iter().map(|role| role.get()).collect(),
        bot: member.user.bot,
    }
}

/// Runs a Discord request with [`ACTION_TIMEOUT`] and maps its error.
async fn bounded<T, F>(action: &str, request: F) -> Result<T, ActionError>
where
    F: Future<Output = Result<T, serenity::Error>>,
{
    match tokio::time::timeout(ACTION_TIMEOUT, request).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(map_error(action, err)),
        Err(_) => Err(ActionError::Transport(format!(
            "{} timed out after {}s",
            action,
            ACTION_TIMEOUT.as_secs()
        ))),
    }
}

/// Maps a 404 from Discord to `NotFound`; everything else is a transport failure.
fn map_error(action: &str, err: serenity::Error) -> ActionError {
    let not_found = match &err {
        serenity::Error::Http(http_err) => {
            http_err.status_code().map(|status| status.as_u16()) == Some(404)
        }
        _ => false,
    };

    if not_found {
        ActionError::NotFound(format!("Failed to {}: {}", action, err))
    } else {
        ActionError::Transport(format!("{}: {}", action, err))
    }
}
