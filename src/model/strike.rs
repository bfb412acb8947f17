//! Results of strike and destrike operations.
//!
//! The member store decides what a strike or destrike means for a member and hands
//! the consequence back to the caller, which carries it out against Discord only
//! after the new state has been persisted.

use chrono::NaiveDateTime;

/// What must happen on Discord after a strike is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeConsequence {
    /// Swap the member's strike tier role to the tier for this level.
    Tier(u8),
    /// Ban the member until the given time.
    TemporaryBan { until: NaiveDateTime },
    /// Ban the member with no scheduled unban.
    PermanentBan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    Issued {
        /// Strike level after the strike.
        level: u8,
        consequence: StrikeConsequence,
    },
    /// The member is already permanently banned. Nothing changed.
    AlreadyMaximal,
}

/// What must happen on Discord after a strike is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearConsequence {
    /// Tier role the member should hold afterwards, `None` removes every tier role.
    pub tier: Option<u8>,
    /// Whether the temporary ban from the cleared strike must be lifted.
    pub lift_ban: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared {
        /// Strike level after the clear.
        level: u8,
        consequence: ClearConsequence,
    },
    /// The member has no strikes. Nothing changed.
    NoStrikes,
    /// The member is permanently banned; clearing that strike is not supported.
    PermanentBanLocked,
}
