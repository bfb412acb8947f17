//! Member record domain model.
//!
//! One `MemberRecord` exists per guild member the bot has ever observed. Records are
//! never deleted, so strikes follow a member who leaves and rejoins.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};

/// Highest strike level. A member at this level is permanently banned.
pub const MAX_STRIKES: u8 = 4;

/// Length of the temporary ban issued with the third strike.
pub const TEMPORARY_BAN_DAYS: i64 = 7;

/// Persisted format of a timed ban expiry.
pub const BAN_EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M";

const BAN_NEVER: &str = "never";

/// Self-declared membership category, answered through the onboarding prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembershipStatus {
    /// The member has not answered the onboarding prompt yet.
    #[default]
    Unset,
    Member,
    Guest,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Member => "member",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" => Ok(Self::Unset),
            "member" => Ok(Self::Member),
            "guest" => Ok(Self::Guest),
            other => Err(other.to_string()),
        }
    }
}

/// When a member's ban ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BanExpiry {
    /// Not banned.
    #[default]
    None,
    /// Temporarily banned until the given UTC time.
    At(NaiveDateTime),
    /// Permanently banned.
    Never,
}

impl BanExpiry {
    /// Creates a timed expiry, truncated to the minute precision the store persists.
    pub fn at(time: NaiveDateTime) -> Self {
        Self::At(truncate_to_minute(time))
    }

    /// Whether a timed ban has run out at `now`. Permanent bans never expire.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        match self {
            Self::At(until) => now > *until,
            Self::None | Self::Never => false,
        }
    }
}

impl fmt::Display for BanExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::At(until) => write!(f, "{}", until.format(BAN_EXPIRY_FORMAT)),
            Self::Never => f.write_str(BAN_NEVER),
        }
    }
}

impl FromStr for BanExpiry {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" => Ok(Self::None),
            BAN_NEVER => Ok(Self::Never),
            other => NaiveDateTime::parse_from_str(other, BAN_EXPIRY_FORMAT)
                .map(Self::At)
                .map_err(|_| other.to_string()),
        }
    }
}

/// Drops seconds and below, matching [`BAN_EXPIRY_FORMAT`].
pub fn truncate_to_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Moderation and membership state of one guild member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Discord ID of the member.
    pub id: u64,
    /// Display name, refreshed whenever Discord reports a change.
    pub display_name: String,
    pub status: MembershipStatus,
    /// Current strike level in `0..=MAX_STRIKES`.
    pub strike_count: u8,
    /// Reason for each strike level, empty when that level is not issued.
    pub strike_reasons: [String; 4],
    pub ban_expiry: BanExpiry,
}

impl MemberRecord {
    /// Creates a clean record for a newly observed member.
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            status: MembershipStatus::Unset,
            strike_count: 0,
            strike_reasons: Default::default(),
            ban_expiry: BanExpiry::None,
        }
    }

    /// Issued strikes as `(level, reason)` pairs in level order.
    pub fn issued_strikes(&self) -> Vec<(u8, &str)> {
        self.strike_reasons
            .iter()
            .zip(1u8..)
            .filter(|(reason, _)| !reason.is_empty())
            .map(|(reason, level)| (level, reason.as_str()))
            .collect()
    }
}

/// English ordinal used in strike messages.
pub fn ordinal(level: u8) -> &'static str {
    match level {
        1 => "first",
        2 => "second",
        3 => "third",
        4 => "fourth",
        _ => "unknown",
    }
}
