//! Bot state shared by every event handler.
//!
//! `BotState` is built once per gateway session and cloned into the event handler.
//! All fields are reference counted, so clones share the same member store, registry
//! and restart flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serenity::http::Http;

use crate::bot::command::registry::CommandRegistry;
use crate::config::Config;
use crate::data::member_store::SharedMemberStore;
use crate::service::discord::DiscordModeration;

#[derive(Clone)]
pub struct BotState {
    pub config: Arc<Config>,

    /// Member store, locked for one store call at a time.
    pub store: SharedMemberStore,

    /// Commands the bot answers, built once at startup.
    pub registry: Arc<CommandRegistry>,

    /// Set by the `restart` command before it shuts the shards down.
    restart_requested: Arc<AtomicBool>,
}

impl BotState {
    pub fn new(config: Arc<Config>, store: SharedMemberStore) -> Self {
        let registry = CommandRegistry::standard(&config.game_role_name);

        Self {
            config,
            store,
            registry: Arc::new(registry),
            restart_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Moderation actions bound to the configured guild and moderation channel.
    pub fn moderation(&self, http: Arc<Http>) -> DiscordModeration {
        DiscordModeration::new(
            http,
            self.config.guild_id,
            self.config.channels.moderation,
        )
    }

    pub fn request_restart(&self) {
        self.restart_requested.store(true, Ordering::SeqCst);
    }

    /// Returns whether a restart was requested and clears the request.
    pub fn take_restart_request(&self) -> bool {
        self.restart_requested.swap(false, Ordering::SeqCst)
    }
}
