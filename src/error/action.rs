use thiserror::Error;

/// Failure of a moderation action against the chat platform.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The platform does not know the target.
    ///
    /// The member left the guild, was never banned, or the role no longer exists.
    /// Callers treat this as drift between local state and the platform, not as a
    /// hard failure.
    #[error("{0}")]
    NotFound(String),

    /// The request failed or timed out.
    #[error("Discord request failed: {0}")]
    Transport(String),
}
