use serenity::all::ActivityData;

use crate::bot::command::CommandContext;
use crate::bot::start::ShardManagerContainer;
use crate::error::AppError;

/// `restart`
///
/// Shuts down every shard after flagging the restart; `main` then reloads the member
/// store and reconnects. The store is flushed on every mutation, so nothing is lost.
pub async fn restart(cx: &CommandContext<'_>, _args: &[&str]) -> Result<(), AppError> {
    let shard_manager = {
        let data = cx.ctx.data.read().await;
        data.get::<ShardManagerContainer>().cloned()
    };
    let Some(shard_manager) = shard_manager else {
        return Err(AppError::NotFound(
            "Restart is unavailable: shard manager not registered".to_string(),
        ));
    };

    cx.reply("Restarting.").await?;
    tracing::info!("Restart requested by {}", cx.msg.author.name);

    cx.state.request_restart();
    shard_manager.shutdown_all().await;

    Ok(())
}

/// `changepresence <presence>`
///
/// Lasts until the next reconnect, when the ready handler sets the help presence again.
pub async fn change_presence(cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    let Some(presence) = presence_from_args(args) else {
        return Err(AppError::Usage);
    };

    cx.ctx
        .set_activity(Some(ActivityData::playing(presence.clone())));
    tracing::info!("Presence changed to {:?} by {}", presence, cx.msg.author.name);

    cx.reply(format!("Changed presence to `{}`.", presence)).await
}

pub fn presence_from_args(args: &[&str]) -> Option<String> {
    (!args.is_empty()).then(|| args.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_joins_arguments() {
        assert_eq!(
            presence_from_args(&["Rocket", "League", "finals"]).as_deref(),
            Some("Rocket League finals")
        );
        assert_eq!(presence_from_args(&[]), None);
    }
}
