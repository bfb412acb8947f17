//! Explicit command registry.
//!
//! Every command the bot answers is registered here by name, with its usage text and
//! the permission it needs. Dispatch looks commands up by name and decides from the
//! channel and the invoker's roles whether to run, redirect or refuse them.

use crate::config::ChannelConfig;

/// Who may run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Everyone,
    /// Committee role required; only accepted in the moderation channel.
    Committee,
}

/// Which handler a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Strike,
    Destrike,
    Strikes,
    ChangeRole,
    AddRole,
    RemoveRole,
    ListRole,
    CreateRole,
    ChangePresence,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    /// Argument synopsis shown by `help` and after a usage error. May be empty.
    pub usage: String,
    pub permission: Permission,
    pub kind: CommandKind,
}

/// Channel category a command was sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelScope {
    Command,
    Moderation,
    Other,
}

impl ChannelScope {
    pub fn of(channel_id: u64, channels: &ChannelConfig) -> Self {
        if channel_id == channels.command {
            Self::Command
        } else if channel_id == channels.moderation {
            Self::Moderation
        } else {
            Self::Other
        }
    }
}

/// Where a command invocation should go.
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    Run(&'a CommandDescriptor),
    /// Sent outside the bot channels. The message is deleted and the author pointed
    /// at the moderation channel (committee commands from committee members) or the
    /// command channel (everything else).
    Redirect { moderation: bool },
    /// Unknown in this channel. `committee_hint` is set when a committee member used a
    /// committee command in the command channel.
    NotFound { committee_hint: bool },
    /// A committee command from someone without the committee role.
    Forbidden,
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry with every command the bot ships with.
    ///
    /// # Arguments
    /// - `game_role_name` - Word used for self-assignable roles in usage texts
    pub fn standard(game_role_name: &str) -> Self {
        let mut registry = Self::new();

        registry.register("help", "[command(s)]", Permission::Everyone, CommandKind::Help);
        registry.register("strikes", "", Permission::Everyone, CommandKind::Strikes);
        registry.register(
            "changerole",
            "member | guest",
            Permission::Everyone,
            CommandKind::ChangeRole,
        );
        registry.register(
            "addrole",
            &format!("{}(s) | list", game_role_name),
            Permission::Everyone,
            CommandKind::AddRole,
        );
        registry.register(
            "removerole",
            &format!("{}(s) | list | all", game_role_name),
            Permission::Everyone,
            CommandKind::RemoveRole,
        );
        registry.register(
            "listrole",
            game_role_name,
            Permission::Everyone,
            CommandKind::ListRole,
        );

        registry.register(
            "strike",
            "@user reason",
            Permission::Committee,
            CommandKind::Strike,
        );
        registry.register("destrike", "@user", Permission::Committee, CommandKind::Destrike);
        registry.register(
            "createrole",
            game_role_name,
            Permission::Committee,
            CommandKind::CreateRole,
        );
        registry.register(
            "changepresence",
            "presence",
            Permission::Committee,
            CommandKind::ChangePresence,
        );
        registry.register("restart", "", Permission::Committee, CommandKind::Restart);

        registry
    }

    /// Adds a command. A later registration under the same name replaces the earlier one.
    pub fn register(
        &mut self,
        name: &'static str,
        usage: &str,
        permission: Permission,
        kind: CommandKind,
    ) {
        self.commands.retain(|command| command.name != name);
        self.commands.push(CommandDescriptor {
            name,
            usage: usage.to_string(),
            permission,
            kind,
        });
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// Commands with the given permission, in registration order.
    pub fn with_permission(&self, permission: Permission) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands
            .iter()
            .filter(move |command| command.permission == permission)
    }

    /// Looks up a command visible in `scope`.
    ///
    /// Everyone commands are visible in both bot channels, committee commands only in
    /// the moderation channel.
    pub fn visible(&self, name: &str, scope: ChannelScope) -> Option<&CommandDescriptor> {
        self.get(name).filter(|command| match scope {
            ChannelScope::Command => command.permission == Permission::Everyone,
            ChannelScope::Moderation => true,
            ChannelScope::Other => false,
        })
    }

    /// Decides what to do with an invocation of `name`.
    ///
    /// # Arguments
    /// - `name` - Lowercased command name without prefix
    /// - `scope` - Channel the command was sent in
    /// - `is_committee` - Whether the invoker holds the committee role
    pub fn route(&self, name: &str, scope: ChannelScope, is_committee: bool) -> Route<'_> {
        let is_committee_command = self
            .get(name)
            .is_some_and(|command| command.permission == Permission::Committee);

        match scope {
            ChannelScope::Other => Route::Redirect {
                moderation: is_committee_command && is_committee,
            },
            ChannelScope::Moderation if is_committee_command && !is_committee => Route::Forbidden,
            _ => match self.visible(name, scope) {
                Some(command) => Route::Run(command),
                None => Route::NotFound {
                    committee_hint: is_committee_command && is_committee,
                },
            },
        }
    }

    /// Text of the `help` command.
    ///
    /// Without arguments lists the commands visible in `scope`; with arguments gives the
    /// usage of each named command.
    pub fn help_text(&self, prefix: &str, bot_name: &str, scope: ChannelScope, args: &[&str]) -> String {
        if args.is_empty() {
            let mut response = format!(
                "**{} commands**\n```\n{}",
                bot_name,
                self.command_list(prefix, Permission::Everyone)
            );
            if scope == ChannelScope::Moderation {
                response.push_str(&format!(
                    "\n```\n**Committee-only commands**\n```\n{}",
                    self.command_list(prefix, Permission::Committee)
                ));
            }
            response.push_str(&format!(
                "\n```\nType `{}help command` to get the usage of a command.",
                prefix
            ));
            return response;
        }

        args.iter()
            .map(|arg| match self.visible(&arg.to_lowercase(), scope) {
                Some(command) => format!("Usage is `{}`.", usage_line(prefix, command)),
                None => format!("Command `{}{}` not found.", prefix, arg),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn command_list(&self, prefix: &str, permission: Permission) -> String {
        self.with_permission(permission)
            .map(|command| format!("{}{}", prefix, command.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `!name usage`, without a trailing space for commands that take no arguments.
pub fn usage_line(prefix: &str, command: &CommandDescriptor) -> String {
    if command.usage.is_empty() {
        format!("{}{}", prefix, command.name)
    } else {
        format!("{}{} {}", prefix, command.name, command.usage)
    }
}
