use crate::bot::command::CommandContext;
use crate::error::AppError;

/// `help [command(s)]`
pub async fn help(cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    let text = cx.state.registry.help_text(
        cx.prefix(),
        &cx.state.config.bot_name,
        cx.scope,
        args,
    );

    cx.reply(text).await
}
