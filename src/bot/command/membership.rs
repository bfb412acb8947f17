use serenity::all::UserId;

use crate::bot::command::CommandContext;
use crate::error::AppError;
use crate::model::member::MembershipStatus;
use crate::service::member::{MemberService, RoleChange};
use crate::service::strike::StrikeService;

/// `strikes`
///
/// Sends the invoker their issued strikes by direct message.
pub async fn strikes(cx: &CommandContext<'_>, _args: &[&str]) -> Result<(), AppError> {
    let service = StrikeService::new(&cx.state.store, &cx.moderation, &cx.state.config.roles);
    let summary = service.strike_summary(cx.author_id()).await?;

    let channel = UserId::new(cx.author_id())
        .create_dm_channel(&cx.ctx.http)
        .await?;
    channel.id.say(&cx.ctx.http, summary).await?;

    cx.reply("PM'd.").await
}

/// `changerole member | guest`
pub async fn change_role(cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    let [wanted] = args else {
        return Err(AppError::Usage);
    };

    let status = match wanted.to_lowercase().parse::<MembershipStatus>() {
        Ok(status @ (MembershipStatus::Member | MembershipStatus::Guest)) => status,
        _ => return cx.reply(format!("Didn't recognise `{}` role", wanted)).await,
    };

    let service = MemberService::new(
        &cx.state.store,
        &cx.moderation,
        &cx.state.config.roles,
        &cx.state.config.society_name,
    );

    match service
        .change_role(cx.author_id(), &cx.author_roles(), status)
        .await?
    {
        RoleChange::AlreadyHeld => {
            cx.reply(format!("You already have the `{}` role", status))
                .await
        }
        RoleChange::Changed(report) if report.is_clean() => {
            cx.reply(format!("You now have the `{}` role", status)).await
        }
        RoleChange::Changed(report) => {
            cx.reply(format!(
                "You are now stored as a {}, but these actions failed: {}",
                status,
                report.failed_actions().join(", ")
            ))
            .await
        }
    }
}
