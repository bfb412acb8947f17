//! Discord gateway integration.
//!
//! The bot reacts to guild events (startup reconcile, member joins, member updates)
//! and to prefixed text commands in the command and moderation channels. Direct
//! messages to the bot are treated as replies to the onboarding prompt.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive the guild create event that triggers the startup reconcile
//! - `GUILD_MESSAGES` - Receive text commands in guild channels
//! - `GUILD_MEMBERS` - Receive member joins and updates (privileged intent)
//! - `DIRECT_MESSAGES` - Receive onboarding replies and strike confirmations
//! - `MESSAGE_CONTENT` - Read the text of commands and replies (privileged intent)
//!
//! Note: `GUILD_MEMBERS` and `MESSAGE_CONTENT` are privileged intents and must be
//! explicitly enabled in the Discord Developer Portal for the bot application.

pub mod command;
pub mod handler;
pub mod start;
