//! Self-assignable game roles.
//!
//! A game role is any guild role whose name starts with a zero-width space. Members add
//! and remove these themselves; the marker keeps them apart from roles the committee
//! manages. Names are matched case-insensitively without the marker.

use std::collections::BTreeMap;

use serenity::all::{EditRole, GuildId, Permissions, RoleId};

use crate::bot::command::CommandContext;
use crate::error::AppError;
use crate::model::guild::GuildMemberSnapshot;
use crate::service::actions::{ActionReport, GuildDirectory, ModerationActions};

/// Prefix marking a role as self-assignable.
pub const GAME_ROLE_MARKER: char = '\u{200b}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRole {
    pub id: u64,
    /// Role name without the marker.
    pub name: String,
}

/// Game roles keyed by lowercased name.
pub type GameRoles = BTreeMap<String, GameRole>;

/// Picks the game roles out of a guild's roles.
pub fn game_roles<'a>(roles: impl IntoIterator<Item = (u64, &'a str)>) -> GameRoles {
    roles
        .into_iter()
        .filter_map(|(id, name)| {
            let name = name.strip_prefix(GAME_ROLE_MARKER)?;
            Some((
                name.to_lowercase(),
                GameRole {
                    id,
                    name: name.to_string(),
                },
            ))
        })
        .collect()
}

/// Role edits to carry out and the reply lines describing them.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RolePlan {
    pub roles: Vec<u64>,
    pub lines: Vec<String>,
}

/// Plans adding the named game roles to a member holding `held`.
pub fn plan_add(games: &GameRoles, held: &[u64], args: &[&str]) -> RolePlan {
    let mut plan = RolePlan::default();

    for arg in args {
        match games.get(&arg.to_lowercase()) {
            Some(role) if held.contains(&role.id) || plan.roles.contains(&role.id) => plan
                .lines
                .push(format!("You already have `{}` role", role.name)),
            Some(role) => {
                plan.roles.push(role.id);
                plan.lines.push(format!("Added `{}` role", role.name));
            }
            None => plan.lines.push(format!("Didn't recognise `{}` role", arg)),
        }
    }

    plan
}

/// Plans removing the named game roles from a member holding `held`.
pub fn plan_remove(games: &GameRoles, held: &[u64], args: &[&str]) -> RolePlan {
    let mut plan = RolePlan::default();

    for arg in args {
        match games.get(&arg.to_lowercase()) {
            Some(role) if held.contains(&role.id) && !plan.roles.contains(&role.id) => {
                plan.roles.push(role.id);
                plan.lines.push(format!("Removed `{}` role", role.name));
            }
            Some(role) => plan
                .lines
                .push(format!("You don't have `{}` role", role.name)),
            None => plan.lines.push(format!("Didn't recognise `{}` role", arg)),
        }
    }

    plan
}

/// Plans removing every game role the member holds.
pub fn plan_remove_all(games: &GameRoles, held: &[u64]) -> RolePlan {
    let mut plan = RolePlan::default();

    for role in games.values().filter(|role| held.contains(&role.id)) {
        plan.roles.push(role.id);
        plan.lines.push(format!("Removed `{}` role", role.name));
    }

    plan
}

/// What `createrole` should do with a requested name.
#[derive(Debug, PartialEq, Eq)]
pub enum CreatePlan {
    /// Create a role with this full name, marker included.
    Create(String),
    /// A game role with that name exists already; holds its name.
    Exists(String),
}

pub fn plan_create(games: &GameRoles, name: &str) -> CreatePlan {
    match games.get(&name.to_lowercase()) {
        Some(role) => CreatePlan::Exists(role.name.clone()),
        None => CreatePlan::Create(format!("{}{}", GAME_ROLE_MARKER, name)),
    }
}

fn quoted_names<'a>(roles: impl Iterator<Item = &'a GameRole>) -> Vec<String> {
    roles.map(|role| format!("`{}`", role.name)).collect()
}

fn no_game_roles(role_word: &str, prefix: &str) -> String {
    format!(
        "You currently have no {} roles. Add them using the `{}addrole` command.",
        role_word, prefix
    )
}

/// Reply to `listrole`: everyone holding the role, sorted case-insensitively.
pub fn member_list(role: &GameRole, members: &[GuildMemberSnapshot], prefix: &str) -> String {
    let mut names: Vec<&str> = members
        .iter()
        .filter(|member| member.has_role(role.id))
        .map(|member| member.display_name.as_str())
        .collect();

    if names.is_empty() {
        return format!(
            "There are currently no members with `{0}` role. Add it using `{1}addrole {0}`",
            role.name, prefix
        );
    }

    names.sort_by_key(|name| name.to_lowercase());
    format!(
        "List of {} members with `{}` role:\n```\n{}\n```",
        names.len(),
        role.name,
        names.join(", ")
    )
}

/// `addrole <game(s)> | list`
pub async fn add_role(cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    let Some(first) = args.first() else {
        return Err(AppError::Usage);
    };
    let games = fetch_game_roles(cx).await?;
    let role_word = &cx.state.config.game_role_name;

    if first.eq_ignore_ascii_case("list") {
        return cx
            .reply(format!(
                "The possible {} roles are: {}",
                role_word,
                quoted_names(games.values()).join(", ")
            ))
            .await;
    }

    let plan = plan_add(&games, &cx.author_roles(), args);
    let mut report = ActionReport::default();
    for role_id in &plan.roles {
        report.record(
            "add role",
            cx.author_id(),
            cx.moderation.add_role(cx.author_id(), *role_id).await,
        );
    }

    reply_with_plan(cx, plan, &report).await
}

/// `removerole <game(s)> | list | all`
pub async fn remove_role(cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    let Some(first) = args.first() else {
        return Err(AppError::Usage);
    };
    let games = fetch_game_roles(cx).await?;
    let role_word = &cx.state.config.game_role_name;
    let held = cx.author_roles();

    if first.eq_ignore_ascii_case("list") {
        let names = quoted_names(games.values().filter(|role| held.contains(&role.id)));
        if names.is_empty() {
            return cx.reply(no_game_roles(role_word, cx.prefix())).await;
        }
        return cx
            .reply(format!(
                "Your current {} roles are: {}",
                role_word,
                names.join(", ")
            ))
            .await;
    }

    let plan = if first.eq_ignore_ascii_case("all") {
        let plan = plan_remove_all(&games, &held);
        if plan.roles.is_empty() {
            return cx.reply(no_game_roles(role_word, cx.prefix())).await;
        }
        plan
    } else {
        plan_remove(&games, &held, args)
    };

    let mut report = ActionReport::default();
    for role_id in &plan.roles {
        report.record(
            "remove role",
            cx.author_id(),
            cx.moderation.remove_role(cx.author_id(), *role_id).await,
        );
    }

    reply_with_plan(cx, plan, &report).await
}

/// `listrole <game>`
pub async fn list_role(cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    let [name] = args else {
        return Err(AppError::Usage);
    };
    let games = fetch_game_roles(cx).await?;

    let Some(role) = games.get(&name.to_lowercase()) else {
        return cx
            .reply(format!("Didn't recognise `{}` role.", name.to_lowercase()))
            .await;
    };

    let members = cx.moderation.list_members().await?;
    cx.reply(member_list(role, &members, cx.prefix())).await
}

/// `createrole <game>`
///
/// Creates a mentionable game role with the permissions of `@everyone`.
pub async fn create_role(cx: &CommandContext<'_>, args: &[&str]) -> Result<(), AppError> {
    let [name] = args else {
        return Err(AppError::Usage);
    };
    let guild_id = GuildId::new(cx.state.config.guild_id);
    let roles = guild_id.roles(&cx.ctx.http).await?;
    let games = game_roles(
        roles
            .values()
            .map(|role| (role.id.get(), role.name.as_str())),
    );
    let role_word = &cx.state.config.game_role_name;

    match plan_create(&games, name) {
        CreatePlan::Exists(existing) => {
            cx.reply(format!("`{}` {} role already exists", existing, role_word))
                .await
        }
        CreatePlan::Create(role_name) => {
            // The @everyone role shares the guild's ID.
            let permissions = roles
                .get(&RoleId::new(guild_id.get()))
                .map(|everyone| everyone.permissions)
                .unwrap_or_else(Permissions::empty);

            let builder = EditRole::new()
                .name(role_name)
                .mentionable(true)
                .permissions(permissions);
            let role = guild_id.create_role(&cx.ctx.http, builder).await?;
            tracing::info!(
                "Created {} role {} ({}) for {}",
                role_word,
                name,
                role.id,
                cx.msg.author.name
            );

            cx.reply(format!("Created `{}` {} role", name, role_word))
                .await
        }
    }
}

async fn fetch_game_roles(cx: &CommandContext<'_>) -> Result<GameRoles, AppError> {
    let roles = GuildId::new(cx.state.config.guild_id)
        .roles(&cx.ctx.http)
        .await?;

    Ok(game_roles(
        roles
            .values()
            .map(|role| (role.id.get(), role.name.as_str())),
    ))
}

async fn reply_with_plan(
    cx: &CommandContext<'_>,
    plan: RolePlan,
    report: &ActionReport,
) -> Result<(), AppError> {
    let mut lines = plan.lines;
    if !report.is_clean() {
        lines.push(format!(
            "Some role changes failed: {}",
            report.failed_actions().join(", ")
        ));
    }

    cx.reply(lines.join("\n")).await
}
