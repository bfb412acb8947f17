//! Error types for the bot.
//!
//! `AppError` is the top-level error that command and event handlers return. It wraps
//! the domain errors from the member store, the moderation actions and configuration
//! loading. Handlers never let an `AppError` escape the event loop: they log it and
//! report a short failure message to whoever triggered the work.

pub mod action;
pub mod config;
pub mod store;

use thiserror::Error;

use crate::error::{action::ActionError, config::ConfigError, store::StoreError};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Member store failed to read, write or find a record.
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// A moderation action against the chat platform failed.
    #[error(transparent)]
    ActionErr(#[from] ActionError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// A command was invoked with the wrong arguments.
    ///
    /// The command guard answers this with the command's usage text.
    #[error("incorrect command usage")]
    Usage,

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what was not found, shown to the invoking user
    #[error("{0}")]
    NotFound(String),

    /// Invalid request error.
    ///
    /// # Fields
    /// - Message describing what was invalid, shown to the invoking user
    #[error("{0}")]
    BadRequest(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Message safe to show in a Discord channel, if the error has one.
    ///
    /// Errors caused by the invoking user (unknown member, bad arguments) carry a message
    /// meant for them. Infrastructure errors return `None`; the caller replies with a
    /// generic failure and logs the details.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::NotFound(msg) | Self::BadRequest(msg) => Some(msg.clone()),
            Self::StoreErr(StoreError::NotFound(id)) => {
                Some(format!("<@{}> is not a known member.", id))
            }
            Self::StoreErr(StoreError::InvalidBanExpiry { .. }) => Some(self.to_string()),
            Self::StoreErr(StoreError::MissingReason(_)) => {
                Some("A strike needs a reason.".to_string())
            }
            Self::ActionErr(ActionError::NotFound(msg)) => Some(msg.clone()),
            _ => None,
        }
    }
}
