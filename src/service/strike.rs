//! Strike ladder service.
//!
//! Turns a strike or destrike command into a store mutation followed by the Discord
//! side effects its consequence calls for. Side effects are only attempted once the
//! store has persisted the new level.

use chrono::NaiveDateTime;

use crate::config::RoleConfig;
use crate::data::member_store::SharedMemberStore;
use crate::error::{action::ActionError, AppError};
use crate::model::member::{ordinal, BAN_EXPIRY_FORMAT, TEMPORARY_BAN_DAYS};
use crate::model::strike::{ClearOutcome, StrikeConsequence, StrikeOutcome};
use crate::service::actions::{ActionReport, ModerationActions};

/// Result of [`StrikeService::strike`].
#[derive(Debug)]
pub struct StrikeReport {
    /// Stored display name of the struck member.
    pub display_name: String,
    pub outcome: StrikeOutcome,
    pub actions: ActionReport,
}

/// Result of [`StrikeService::destrike`].
#[derive(Debug)]
pub struct DestrikeReport {
    /// Stored display name of the member.
    pub display_name: String,
    pub outcome: ClearOutcome,
    pub actions: ActionReport,
}

pub struct StrikeService<'a> {
    store: &'a SharedMemberStore,
    actions: &'a dyn ModerationActions,
    roles: &'a RoleConfig,
}

impl<'a> StrikeService<'a> {
    pub fn new(
        store: &'a SharedMemberStore,
        actions: &'a dyn ModerationActions,
        roles: &'a RoleConfig,
    ) -> Self {
        Self {
            store,
            actions,
            roles,
        }
    }

    /// Returns the level the next strike would bring a member to.
    ///
    /// Used to ask for confirmation before a strike that bans.
    ///
    /// # Returns
    /// - `Ok(Some(level))` - Level after the next strike
    /// - `Ok(None)` - Member is already permanently banned
    /// - `Err(AppError::StoreErr)` - Member is unknown
    pub async fn next_level(&self, member_id: u64) -> Result<Option<u8>, AppError> {
        let store = self.store.lock().await;
        Ok(store.next_strike_level(member_id)?)
    }

    /// Issues one strike and carries out its consequence.
    ///
    /// The member is messaged, the moderation channel is notified, and then either the
    /// strike tier role is swapped (levels 1 and 2) or the member is banned (levels 3
    /// and 4). The messages go out before the ban since a banned member can no longer
    /// be reached by direct message.
    ///
    /// # Arguments
    /// - `member_id` - Member receiving the strike
    /// - `reason` - Reason stored against the new level and quoted in messages
    /// - `now` - Current UTC time
    ///
    /// # Returns
    /// - `Ok(StrikeReport)` - Strike committed; `actions` lists side effects that failed
    /// - `Err(AppError::StoreErr)` - Member is unknown or the write failed; nothing was
    ///   sent to Discord
    pub async fn strike(
        &self,
        member_id: u64,
        reason: &str,
        now: NaiveDateTime,
    ) -> Result<StrikeReport, AppError> {
        let (display_name, outcome) = {
            let mut store = self.store.lock().await;
            let outcome = store.issue_strike(member_id, reason, now)?;
            (store.get(member_id)?.display_name.clone(), outcome)
        };

        let mut actions = ActionReport::default();

        if let StrikeOutcome::Issued { level, consequence } = outcome {
            tracing::info!(
                "Member {} ({}) is now at strike level {}",
                display_name,
                member_id,
                level
            );

            actions.record(
                "send direct message",
                member_id,
                self.actions
                    .send_direct_message(member_id, &strike_direct_message(level, reason, &consequence))
                    .await,
            );
            actions.record(
                "notify moderators",
                member_id,
                self.actions
                    .notify_moderators(&strike_notice(&display_name, level, reason, &consequence))
                    .await,
            );

            match consequence {
                StrikeConsequence::Tier(tier) => {
                    self.apply_tier(member_id, Some(tier), false, &mut actions)
                        .await;
                }
                StrikeConsequence::TemporaryBan { .. } | StrikeConsequence::PermanentBan => {
                    let ban_reason = format!("{} strike: {}", ordinal(level), reason);
                    actions.record(
                        "ban",
                        member_id,
                        self.actions.ban(member_id, &ban_reason).await,
                    );
                }
            }
        }

        Ok(StrikeReport {
            display_name,
            outcome,
            actions,
        })
    }

    /// Clears one strike and reverses its consequence.
    ///
    /// Clearing a third strike whose ban is still running lifts the ban. The tier roles
    /// are brought in line with the new level either way; when the ban was lifted, a
    /// member missing from the guild is not a failure since the join handler applies
    /// the stored level on rejoin. A member with no strikes or a permanent ban gets no
    /// Discord calls at all.
    pub async fn destrike(&self, member_id: u64) -> Result<DestrikeReport, AppError> {
        let (display_name, outcome) = {
            let mut store = self.store.lock().await;
            let outcome = store.clear_strike(member_id)?;
            (store.get(member_id)?.display_name.clone(), outcome)
        };

        let mut actions = ActionReport::default();

        if let ClearOutcome::Cleared { level, consequence } = outcome {
            if consequence.lift_ban {
                match self.actions.unban(member_id).await {
                    Err(ActionError::NotFound(msg)) => {
                        tracing::info!("Member {} was not banned on Discord: {}", member_id, msg)
                    }
                    result => actions.record("unban", member_id, result),
                }
            }

            // A member whose ban was just lifted is usually not back in the guild yet.
            self.apply_tier(member_id, consequence.tier, consequence.lift_ban, &mut actions)
                .await;

            actions.record(
                "notify moderators",
                member_id,
                self.actions
                    .notify_moderators(&format!(
                        "{}'s {} strike has been removed.",
                        display_name,
                        ordinal(level + 1)
                    ))
                    .await,
            );
        }

        Ok(DestrikeReport {
            display_name,
            outcome,
            actions,
        })
    }

    /// Lists a member's issued strikes as a direct message text.
    pub async fn strike_summary(&self, member_id: u64) -> Result<String, AppError> {
        let store = self.store.lock().await;
        let strikes = store.get(member_id)?.issued_strikes();

        if strikes.is_empty() {
            return Ok("You currently have no strikes.".to_string());
        }

        let lines: Vec<String> = strikes
            .iter()
            .map(|(level, reason)| format!("Strike {}: `{}`", level, reason))
            .collect();

        Ok(format!(
            "You have the following {} strikes:\n{}",
            strikes.len(),
            lines.join("\n")
        ))
    }

    /// Leaves the member holding exactly the tier role for `tier`, or none.
    ///
    /// With `allow_absent`, role edits answered with `NotFound` are logged instead of
    /// reported as failures.
    async fn apply_tier(
        &self,
        member_id: u64,
        tier: Option<u8>,
        allow_absent: bool,
        report: &mut ActionReport,
    ) {
        for level in 1..=3u8 {
            let Some(role_id) = self.roles.strike_role(level) else {
                continue;
            };

            let (action, result) = if tier == Some(level) {
                ("add role", self.actions.add_role(member_id, role_id).await)
            } else {
                ("remove role", self.actions.remove_role(member_id, role_id).await)
            };

            match result {
                Err(ActionError::NotFound(msg)) if allow_absent => {
                    tracing::debug!("Skipped {} for absent member {}: {}", action, member_id, msg)
                }
                result => report.record(action, member_id, result),
            }
        }
    }
}

/// Whether a strike to `level` needs the invoker's confirmation first.
pub fn requires_confirmation(level: u8) -> bool {
    level >= 3
}

/// Text of the confirmation prompt for a banning strike.
pub fn confirmation_prompt(level: u8, display_name: &str) -> String {
    if level >= 4 {
        format!("Permanently ban {}", display_name)
    } else {
        format!("Give {}-day ban to {}", TEMPORARY_BAN_DAYS, display_name)
    }
}

fn strike_direct_message(level: u8, reason: &str, consequence: &StrikeConsequence) -> String {
    match consequence {
        StrikeConsequence::Tier(2) => format!(
            "You have been given a {} strike for `{}`. 1 more strike and you will be given a {}-day ban from the server. Please follow the rules.",
            ordinal(level),
            reason,
            TEMPORARY_BAN_DAYS
        ),
        StrikeConsequence::Tier(_) => format!(
            "You have been given a {} strike for `{}`. Please follow the rules.",
            ordinal(level),
            reason
        ),
        StrikeConsequence::TemporaryBan { until } => format!(
            "You have been given a {} day ban for `{}`. Your ban will expire at `{} UTC`",
            TEMPORARY_BAN_DAYS,
            reason,
            until.format(BAN_EXPIRY_FORMAT)
        ),
        StrikeConsequence::PermanentBan => {
            format!("You have been permanently banned for `{}`.", reason)
        }
    }
}

fn strike_notice(
    display_name: &str,
    level: u8,
    reason: &str,
    consequence: &StrikeConsequence,
) -> String {
    match consequence {
        StrikeConsequence::Tier(_) => format!(
            "{} has been given a {} strike for `{}`.",
            display_name,
            ordinal(level),
            reason
        ),
        StrikeConsequence::TemporaryBan { .. } => format!(
            "{} has been given a {} day ban for `{}`.",
            display_name, TEMPORARY_BAN_DAYS, reason
        ),
        StrikeConsequence::PermanentBan => {
            format!("{} has been permanently banned for `{}`.", display_name, reason)
        }
    }
}
