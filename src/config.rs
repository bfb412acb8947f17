//! Environment-based bot configuration.
//!
//! All configuration is read once at startup. Discord snowflakes are parsed into `u64`
//! up front so a typo in an ID surfaces as a startup error instead of a failed API call
//! hours later.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{config::ConfigError, AppError};
use crate::model::member::MembershipStatus;

const DEFAULT_COMMAND_PREFIX: &str = "!";
const DEFAULT_BOT_NAME: &str = "SocietyBot";
const DEFAULT_SOCIETY_NAME: &str = "society";
const DEFAULT_GAME_ROLE_NAME: &str = "game";
const DEFAULT_UNBAN_SWEEP_INTERVAL_SECS: u64 = 3600;
const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;

/// Role IDs the bot manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    pub member: u64,
    pub guest: u64,
    pub committee: u64,
    /// Strike tier roles, index 0 is the first strike.
    pub strikes: [u64; 3],
}

impl RoleConfig {
    /// Returns the strike tier role for a strike level, if that level carries one.
    ///
    /// Levels 1 through 3 map to the three tier roles. Level 0 and level 4 (permanent
    /// ban) have no tier role.
    pub fn strike_role(&self, level: u8) -> Option<u64> {
        match level {
            1..=3 => Some(self.strikes[usize::from(level) - 1]),
            _ => None,
        }
    }

    /// Returns the self-service role that grants a membership status.
    pub fn membership_role(&self, status: MembershipStatus) -> Option<u64> {
        match status {
            MembershipStatus::Member => Some(self.member),
            MembershipStatus::Guest => Some(self.guest),
            MembershipStatus::Unset => None,
        }
    }
}

/// Channel IDs commands are accepted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub command: u64,
    pub moderation: u64,
}

pub struct Config {
    pub discord_bot_token: String,
    pub guild_id: u64,

    pub roles: RoleConfig,
    pub channels: ChannelConfig,

    pub command_prefix: String,
    pub bot_name: String,
    pub society_name: String,
    pub game_role_name: String,

    pub member_store_path: PathBuf,
    pub unban_sweep_interval: Duration,
    pub confirm_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let bot_name = optional_var("BOT_NAME").unwrap_or_else(|| DEFAULT_BOT_NAME.to_string());
        let member_store_path = optional_var("MEMBER_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{}.csv", bot_name)));

        Ok(Self {
            discord_bot_token: required_var("DISCORD_BOT_TOKEN")?,
            guild_id: required_id("DISCORD_GUILD_ID")?,
            roles: RoleConfig {
                member: required_id("ROLE_MEMBER_ID")?,
                guest: required_id("ROLE_GUEST_ID")?,
                committee: required_id("ROLE_COMMITTEE_ID")?,
                strikes: [
                    required_id("ROLE_FIRST_STRIKE_ID")?,
                    required_id("ROLE_SECOND_STRIKE_ID")?,
                    required_id("ROLE_THIRD_STRIKE_ID")?,
                ],
            },
            channels: ChannelConfig {
                command: required_id("CHANNEL_COMMAND_ID")?,
                moderation: required_id("CHANNEL_MODERATION_ID")?,
            },
            command_prefix: optional_var("COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            society_name: optional_var("SOCIETY_NAME")
                .unwrap_or_else(|| DEFAULT_SOCIETY_NAME.to_string()),
            game_role_name: optional_var("GAME_ROLE_NAME")
                .unwrap_or_else(|| DEFAULT_GAME_ROLE_NAME.to_string()),
            bot_name,
            member_store_path,
            unban_sweep_interval: Duration::from_secs(optional_secs(
                "UNBAN_SWEEP_INTERVAL_SECS",
                DEFAULT_UNBAN_SWEEP_INTERVAL_SECS,
            )?),
            confirm_timeout: Duration::from_secs(optional_secs(
                "CONFIRM_TIMEOUT_SECS",
                DEFAULT_CONFIRM_TIMEOUT_SECS,
            )?),
        })
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required_id(name: &str) -> Result<u64, ConfigError> {
    parse_var(name, required_var(name)?)
}

fn optional_secs(name: &str, default: u64) -> Result<u64, ConfigError> {
    match optional_var(name) {
        Some(value) => parse_var(name, value),
        None => Ok(default),
    }
}

fn parse_var(name: &str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|source| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            reason: source.to_string(),
            value,
        })
}
