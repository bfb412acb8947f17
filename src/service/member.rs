//! Membership service: onboarding, self-service status changes and role sync.

use crate::config::RoleConfig;
use crate::data::member_store::{Change, ReconcileReport, SharedMemberStore};
use crate::error::AppError;
use crate::model::guild::{status_from_roles, GuildMemberSnapshot};
use crate::model::member::{BanExpiry, MembershipStatus};
use crate::service::actions::{ActionReport, GuildDirectory, ModerationActions};

/// Result of [`MemberService::change_role`].
#[derive(Debug)]
pub enum RoleChange {
    /// The member already holds the requested role. Nothing was written.
    AlreadyHeld,
    /// The status was stored and the roles swapped; `ActionReport` lists failed swaps.
    Changed(ActionReport),
}

pub struct MemberService<'a> {
    store: &'a SharedMemberStore,
    actions: &'a dyn ModerationActions,
    roles: &'a RoleConfig,
    society_name: &'a str,
}

impl<'a> MemberService<'a> {
    pub fn new(
        store: &'a SharedMemberStore,
        actions: &'a dyn ModerationActions,
        roles: &'a RoleConfig,
        society_name: &'a str,
    ) -> Self {
        Self {
            store,
            actions,
            roles,
            society_name,
        }
    }

    /// Welcomes a member who joined the guild.
    ///
    /// A new member gets a default record and the onboarding prompt. A returning member
    /// keeps their record: their stored membership role and strike tier role are given
    /// back, and they are prompted only if they never answered. A timed ban still on
    /// record is cleared since the member could not have rejoined while banned. The
    /// record is persisted before any message or role change is sent.
    ///
    /// # Arguments
    /// - `member` - The member as reported by the join event
    ///
    /// # Returns
    /// - `Ok(ActionReport)` - Record stored; lists side effects that failed
    /// - `Err(AppError::StoreErr)` - Writing the new record failed
    pub async fn handle_join(&self, member: &GuildMemberSnapshot) -> Result<ActionReport, AppError> {
        let record = {
            let mut store = self.store.lock().await;
            let created = store.observe_member(member.id, &member.display_name)?;
            if created {
                tracing::info!("Created member record for {} ({})", member.display_name, member.id);
            }
            // Rejoining means the ban was already lifted on Discord.
            if let BanExpiry::At(until) = store.get(member.id)?.ban_expiry {
                store.set_ban_expiry(member.id, BanExpiry::None)?;
                tracing::info!(
                    "Cleared ban expiry {} of rejoined member {}",
                    until,
                    member.display_name
                );
            }
            store.get(member.id)?.clone()
        };

        let mut actions = ActionReport::default();

        actions.record(
            "send welcome",
            member.id,
            self.actions
                .send_direct_message(member.id, &welcome_message(self.society_name))
                .await,
        );

        // Status role first so the role sync callback sees it before any tier role.
        match self.roles.membership_role(record.status) {
            Some(role_id) => actions.record(
                "add role",
                member.id,
                self.actions.add_role(member.id, role_id).await,
            ),
            None => actions.record(
                "send onboarding prompt",
                member.id,
                self.actions
                    .send_direct_message(member.id, &onboarding_prompt(self.society_name))
                    .await,
            ),
        }

        if let Some(role_id) = self.roles.strike_role(record.strike_count) {
            actions.record(
                "add role",
                member.id,
                self.actions.add_role(member.id, role_id).await,
            );

            if record.strike_count == 3 {
                actions.record(
                    "send direct message",
                    member.id,
                    self.actions
                        .send_direct_message(
                            member.id,
                            "You are now on your third strike. 1 more strike and you will be permanently banned from the server. Please follow the rules.",
                        )
                        .await,
                );
            }
        }

        Ok(actions)
    }

    /// Handles a direct-message reply to the onboarding prompt.
    ///
    /// Replies starting with `yes` make the member a Member, replies starting with `no`
    /// a Guest. Anything else, and any reply from someone already holding the member
    /// or guest role, is ignored. Committee members answer confirmation prompts by
    /// direct message, so their replies are never read as onboarding answers.
    ///
    /// # Arguments
    /// - `member_id` - Author of the reply
    /// - `current_roles` - Roles the author currently holds in the guild
    /// - `reply` - Message text
    ///
    /// # Returns
    /// - `Ok(Some(status))` - Status stored and role granted
    /// - `Ok(None)` - Reply ignored
    /// - `Err(AppError)` - Unknown member or the write failed
    pub async fn accept_terms(
        &self,
        member_id: u64,
        current_roles: &[u64],
        reply: &str,
    ) -> Result<Option<MembershipStatus>, AppError> {
        if current_roles.contains(&self.roles.committee) {
            return Ok(None);
        }
        if status_from_roles(current_roles, self.roles) != MembershipStatus::Unset {
            return Ok(None);
        }

        let reply = reply.trim().to_lowercase();
        let status = if reply.starts_with("yes") {
            MembershipStatus::Member
        } else if reply.starts_with("no") {
            MembershipStatus::Guest
        } else {
            return Ok(None);
        };
        let Some(role_id) = self.roles.membership_role(status) else {
            return Ok(None);
        };

        {
            let mut store = self.store.lock().await;
            store.set_membership_status(member_id, status)?;
        }
        tracing::info!("Member {} is now a {}", member_id, status);

        let mut actions = ActionReport::default();
        actions.record(
            "add role",
            member_id,
            self.actions.add_role(member_id, role_id).await,
        );
        let confirmation = match status {
            MembershipStatus::Member => "Member role has been added",
            _ => "Guest role has been added",
        };
        actions.record(
            "send direct message",
            member_id,
            self.actions.send_direct_message(member_id, confirmation).await,
        );

        Ok(Some(status))
    }

    /// Switches a member between the member and guest roles on request.
    pub async fn change_role(
        &self,
        member_id: u64,
        current_roles: &[u64],
        wanted: MembershipStatus,
    ) -> Result<RoleChange, AppError> {
        let (wanted_role, other_role) = match wanted {
            MembershipStatus::Member => (self.roles.member, self.roles.guest),
            MembershipStatus::Guest => (self.roles.guest, self.roles.member),
            MembershipStatus::Unset => {
                return Err(AppError::BadRequest(
                    "Membership status can only be changed to `member` or `guest`".to_string(),
                ))
            }
        };

        if current_roles.contains(&wanted_role) {
            return Ok(RoleChange::AlreadyHeld);
        }

        {
            let mut store = self.store.lock().await;
            store.set_membership_status(member_id, wanted)?;
        }

        let mut actions = ActionReport::default();
        actions.record(
            "add role",
            member_id,
            self.actions.add_role(member_id, wanted_role).await,
        );
        actions.record(
            "remove role",
            member_id,
            self.actions.remove_role(member_id, other_role).await,
        );

        Ok(RoleChange::Changed(actions))
    }

    /// Keeps a member's record in line with their profile after a member update.
    ///
    /// Refreshes the display name and recomputes the membership status from the member
    /// and guest roles. A member without a record gets one. Values that did not change
    /// are not written.
    ///
    /// # Returns
    /// - `Ok(Change::Updated)` - The membership status changed
    /// - `Ok(Change::Unchanged)` - The status already matched the roles
    /// - `Err(AppError::StoreErr)` - A write failed
    pub async fn sync_member(&self, member: &GuildMemberSnapshot) -> Result<Change, AppError> {
        let mut store = self.store.lock().await;
        store.observe_member(member.id, &member.display_name)?;
        let change = store.set_membership_status(member.id, member.membership_status(self.roles))?;
        Ok(change)
    }

    /// Reconciles the store against the guild and prompts members still undecided.
    ///
    /// # Returns
    /// - `Ok(ReconcileReport)` - Store reconciled and prompts sent
    /// - `Err(AppError::ActionErr)` - The member list could not be fetched
    /// - `Err(AppError::StoreErr)` - Persisting the reconciled table failed
    pub async fn reconcile(
        &self,
        directory: &dyn GuildDirectory,
    ) -> Result<ReconcileReport, AppError> {
        let members = directory.list_members().await?;

        let report = {
            let mut store = self.store.lock().await;
            store.reconcile(&members, self.roles)?
        };

        let prompt = onboarding_prompt(self.society_name);
        let mut actions = ActionReport::default();
        for member_id in &report.needs_onboarding {
            actions.record(
                "send onboarding prompt",
                *member_id,
                self.actions.send_direct_message(*member_id, &prompt).await,
            );
        }

        tracing::info!(
            "Sent onboarding prompt to {} member(s)",
            report
                .needs_onboarding
                .len()
                .saturating_sub(actions.failures.len())
        );

        Ok(report)
    }
}

pub fn welcome_message(society_name: &str) -> String {
    format!("Welcome to the {} discord server!", society_name)
}

pub fn onboarding_prompt(society_name: &str) -> String {
    format!(
        "Are you a member of the {}? (`yes` or `no`) You can be in this server without being a member as a guest.",
        society_name
    )
}
