use serenity::all::MessageCollector;

use crate::bot::command::CommandContext;
use crate::error::AppError;

/// Asks the invoker to confirm an action by direct message.
///
/// Waits for a `yes` or `no` reply from the invoker in the DM channel. Other replies are
/// ignored. A timeout counts as `no`.
///
/// # Returns
/// - `Ok(true)` - The invoker answered `yes`
/// - `Ok(false)` - The invoker answered `no` or did not answer in time
/// - `Err(AppError::DiscordErr)` - The prompt could not be sent
pub async fn confirm(cx: &CommandContext<'_>, prompt: &str) -> Result<bool, AppError> {
    let author = cx.msg.author.id;
    let channel = author.create_dm_channel(&cx.ctx.http).await?;
    channel
        .id
        .say(&cx.ctx.http, format!("Confirm: `{}` (`yes` or `no`)", prompt))
        .await?;

    let reply = MessageCollector::new(&cx.ctx.shard)
        .author_id(author)
        .channel_id(channel.id)
        .timeout(cx.state.config.confirm_timeout)
        .filter(|message| parse_answer(&message.content).is_some())
        .next()
        .await;

    match reply.and_then(|message| parse_answer(&message.content)) {
        Some(answer) => Ok(answer),
        None => {
            tracing::info!("Confirmation of `{}` by {} timed out", prompt, cx.msg.author.name);
            Ok(false)
        }
    }
}

/// `Some(true)` for `yes`, `Some(false)` for `no`, ignoring case and surrounding space.
pub fn parse_answer(content: &str) -> Option<bool> {
    match content.trim().to_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
