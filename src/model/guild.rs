//! Snapshot of a guild member as reported by Discord.

use crate::config::RoleConfig;
use crate::model::member::MembershipStatus;

/// A guild member with the fields the member store reconciles against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMemberSnapshot {
    pub id: u64,
    pub display_name: String,
    /// IDs of the roles currently assigned to the member.
    pub roles: Vec<u64>,
    pub bot: bool,
}

impl GuildMemberSnapshot {
    pub fn has_role(&self, role_id: u64) -> bool {
        self.roles.contains(&role_id)
    }

    /// Membership status implied by the self-service role the member holds.
    ///
    /// The member role wins when both are assigned.
    pub fn membership_status(&self, roles: &RoleConfig) -> MembershipStatus {
        status_from_roles(&self.roles, roles)
    }
}

/// Membership status implied by a set of assigned role IDs.
pub fn status_from_roles(assigned: &[u64], roles: &RoleConfig) -> MembershipStatus {
    if assigned.contains(&roles.member) {
        MembershipStatus::Member
    } else if assigned.contains(&roles.guest) {
        MembershipStatus::Guest
    } else {
        MembershipStatus::Unset
    }
}
