//! Committee strike commands.

use chrono::Utc;
use serenity::all::User;

use crate::bot::command::confirm::confirm;
use crate::bot::command::CommandContext;
use crate::error::AppError;
use crate::model::strike::{ClearOutcome, StrikeOutcome};
use crate::service::actions::ActionReport;
use crate::service::strike::{confirmation_prompt, requires_confirmation, StrikeService};

/// `strike @user reason`
///
/// Strikes every mentioned user with the same reason. Strikes that ban ask the invoker
/// for confirmation first; a declined or unanswered confirmation skips that user.
pub async fn strike(cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    let reason = reason_from_args(args);
    if cx.msg.mentions.is_empty() || reason.is_empty() {
        return Err(AppError::Usage);
    }

    let service = StrikeService::new(&cx.state.store, &cx.moderation, &cx.state.config.roles);

    for user in &cx.msg.mentions {
        let member_id = user.id.get();

        if let Some(level) = service.next_level(member_id).await? {
            if requires_confirmation(level)
                && !confirm(cx, &confirmation_prompt(level, &user.name)).await?
            {
                cx.reply(format!("Cancelled strike for {}.", user.name)).await?;
                continue;
            }
        }

        let report = service
            .strike(member_id, &reason, Utc::now().naive_utc())
            .await?;

        match report.outcome {
            StrikeOutcome::AlreadyMaximal => {
                cx.reply(format!("{} is already permanently banned.", report.display_name))
                    .await?
            }
            StrikeOutcome::Issued { .. } => {
                report_failures(cx, user, &report.display_name, &report.actions).await?
            }
        }
    }

    Ok(())
}

/// `destrike @user`
pub async fn destrike(cx: &CommandContext<'_>, _args: &[&str]) -> Result<(), AppError> {
    if cx.msg.mentions.is_empty() {
        return Err(AppError::Usage);
    }

    let service = StrikeService::new(&cx.state.store, &cx.moderation, &cx.state.config.roles);

    for user in &cx.msg.mentions {
        let report = service.destrike(user.id.get()).await?;

        match report.outcome {
            ClearOutcome::NoStrikes => {
                cx.reply(format!("{} has no strikes.", report.display_name))
                    .await?
            }
            ClearOutcome::PermanentBanLocked => {
                cx.reply(format!(
                    "{} is permanently banned. A fourth strike cannot be removed.",
                    report.display_name
                ))
                .await?
            }
            ClearOutcome::Cleared { .. } => {
                report_failures(cx, user, &report.display_name, &report.actions).await?
            }
        }
    }

    Ok(())
}

/// Words of the command that are not user mentions, joined back together.
pub fn reason_from_args(args: &[&str]) -> String {
    args.iter()
        .filter(|arg| !(arg.starts_with("<@") && arg.ends_with('>')))
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tells the moderators which Discord actions failed after a committed strike change.
async fn report_failures(
    cx: &CommandContext<'_>,
    user: &User,
    display_name: &str,
    actions: &ActionReport,
) -> Result<(), AppError> {
    if actions.is_clean() {
        return Ok(());
    }

    tracing::warn!(
        "Strike change for {} ({}) stored, but Discord actions failed",
        display_name,
        user.id
    );

    cx.reply(format!(
        "Recorded for {}, but these actions failed: {}",
        display_name,
        actions.failed_actions().join(", ")
    ))
    .await
}
