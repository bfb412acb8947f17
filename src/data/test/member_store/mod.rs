use crate::data::member_store::{Change, MemberStore};
use crate::error::store::StoreError;
use crate::model::member::{BanExpiry, MembershipStatus};
use test_utils::builder::TestBuilder;

use super::{at, test_roles};

mod clear_strike;
mod issue_strike;
mod lift_expired_ban;
mod load;
mod observe_member;
mod reconcile;
mod set_ban_expiry;
mod set_membership_status;
