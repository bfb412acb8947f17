use std::future::Future;

use crate::bot::command::registry::{usage_line, CommandDescriptor};
use crate::bot::command::CommandContext;
use crate::error::AppError;

static GENERIC_FAILURE: &str = "Sorry, that failed. The error has been logged.";

/// Runs a command handler, logging the invocation and reporting any error.
///
/// A usage error is answered with the command's usage line, an error caused by the
/// invoker with its message, and anything else with a generic failure reply plus an
/// error log. Nothing escapes to the event loop.
///
/// # Arguments
/// - `cx` - Invocation context, used for logging and the failure reply
/// - `command` - Descriptor of the command being run
/// - `handler` - The command's future, not yet polled
pub async fn run_guarded<F>(cx: &CommandContext<'_>, command: &CommandDescriptor, handler: F)
where
    F: Future<Output = Result<(), AppError>>,
{
    let channel = cx
        .msg
        .channel_id
        .name(cx.ctx)
        .await
        .unwrap_or_else(|_| cx.msg.channel_id.to_string());
    tracing::info!(
        "{}{} in #{} by {}",
        cx.prefix(),
        command.name,
        channel,
        cx.msg.author.name
    );

    let Err(err) = handler.await else {
        return;
    };

    if err.user_message().is_none() && !matches!(err, AppError::Usage) {
        tracing::error!(
            "{}{} by {} failed: {:?}",
            cx.prefix(),
            command.name,
            cx.msg.author.name,
            err
        );
    }

    if let Err(e) = cx.reply(failure_reply(cx.prefix(), command, &err)).await {
        tracing::error!("Failed to report command failure: {:?}", e);
    }
}

/// Reply sent when a command handler returns an error.
pub fn failure_reply(prefix: &str, command: &CommandDescriptor, err: &AppError) -> String {
    match err {
        AppError::Usage => format!("Correct usage is `{}`", usage_line(prefix, command)),
        _ => err
            .user_message()
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
    }
}
