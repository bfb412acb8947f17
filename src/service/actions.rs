//! Collaborator traits for side effects against the chat platform.
//!
//! Services and the unban scheduler only talk to Discord through these traits, so they
//! can be exercised in tests with a recording double instead of a live connection.

use serenity::async_trait;

use crate::error::action::ActionError;
use crate::model::guild::GuildMemberSnapshot;

/// Moderation side effects against the guild.
#[async_trait]
pub trait ModerationActions: Send + Sync {
    async fn ban(&self, member_id: u64, reason: &str) -> Result<(), ActionError>;

    /// Lifts a ban. Returns `ActionError::NotFound` if the member was not banned.
    async fn unban(&self, member_id: u64) -> Result<(), ActionError>;

    async fn add_role(&self, member_id: u64, role_id: u64) -> Result<(), ActionError>;

    async fn remove_role(&self, member_id: u64, role_id: u64) -> Result<(), ActionError>;

    async fn send_direct_message(&self, member_id: u64, text: &str) -> Result<(), ActionError>;

    /// Posts a notice to the moderation channel.
    async fn notify_moderators(&self, text: &str) -> Result<(), ActionError>;
}

/// Source of the current guild member list.
#[async_trait]
pub trait GuildDirectory: Send + Sync {
    async fn list_members(&self) -> Result<Vec<GuildMemberSnapshot>, ActionError>;
}

/// One side effect that failed after the store change was committed.
#[derive(Debug)]
pub struct ActionFailure {
    /// Short name of the action, e.g. `ban` or `add role`.
    pub action: &'static str,
    pub error: ActionError,
}

/// Side effects that failed while carrying out a committed change.
///
/// The store change stands regardless; the report tells the invoker which parts did
/// not reach Discord so they can be fixed by hand.
#[derive(Debug, Default)]
pub struct ActionReport {
    pub failures: Vec<ActionFailure>,
}

impl ActionReport {
    /// Records the result of one side effect, logging it if it failed.
    pub fn record(&mut self, action: &'static str, member_id: u64, result: Result<(), ActionError>) {
        if let Err(error) = result {
            tracing::warn!("Failed to {} for member {}: {}", action, member_id, error);
            self.failures.push(ActionFailure { action, error });
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Names of the failed actions, deduplicated, in the order they first failed.
    pub fn failed_actions(&self) -> Vec<&'static str> {
        let mut actions: Vec<&'static str> = Vec::new();
        for failure in &self.failures {
            if !actions.contains(&failure.action) {
                actions.push(failure.action);
            }
        }
        actions
    }
}
