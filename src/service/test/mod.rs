//! Test doubles shared by the service and scheduler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use serenity::async_trait;
use test_utils::context::TestContext;

use crate::data::member_store::{MemberStore, SharedMemberStore};
use crate::error::action::ActionError;
use crate::model::guild::GuildMemberSnapshot;
use crate::service::actions::{GuildDirectory, ModerationActions};


/// A side effect requested from [`RecordingActions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Ban(u64, String),
    Unban(u64),
    AddRole(u64, u64),
    RemoveRole(u64, u64),
    DirectMessage(u64, String),
    NotifyModerators(String),
}

/// How a scripted action fails.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    NotFound,
    Transport,
}

impl Failure {
    fn to_error(self) -> ActionError {
        match self {
            Self::NotFound => ActionError::NotFound("Unknown Member".to_string()),
            Self::Transport => ActionError::Transport("connection reset".to_string()),
        }
    }
}

/// Moderation actions double that records every call.
///
/// Failures are scripted per action name and member ID and persist until cleared.
/// Action names are `ban`, `unban`, `add_role`, `remove_role`, `dm` and `notify`;
/// `notify` failures are keyed on member ID `0`.
#[derive(Default)]
pub(crate) struct RecordingActions {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<(&'static str, u64), Failure>>,
}

impl RecordingActions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(self, action: &'static str, member_id: u64, failure: Failure) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert((action, member_id), failure);
        self
    }

    pub(crate) fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than messages and notices.
    pub(crate) fn moderation_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, Call::DirectMessage(..) | Call::NotifyModerators(_)))
            .collect()
    }

    pub(crate) fn direct_messages(&self, member_id: u64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DirectMessage(id, text) if id == member_id => Some(text),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn notices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::NotifyModerators(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn respond(&self, action: &'static str, member_id: u64, call: Call) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(&(action, member_id)) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ModerationActions for RecordingActions {
    async fn ban(&self, member_id: u64, reason: &str) -> Result<(), ActionError> {
        self.respond("ban", member_id, Call::Ban(member_id, reason.to_string()))
    }

    async fn unban(&self, member_id: u64) -> Result<(), ActionError> {
        self.respond("unban", member_id, Call::Unban(member_id))
    }

    async fn add_role(&self, member_id: u64, role_id: u64) -> Result<(), ActionError> {
        self.respond("add_role", member_id, Call::AddRole(member_id, role_id))
    }

    async fn remove_role(&self, member_id: u64, role_id: u64) -> Result<(), ActionError> {
        self.respond("remove_role", member_id, Call::RemoveRole(member_id, role_id))
    }

    async fn send_direct_message(&self, member_id: u64, text: &str) -> Result<(), ActionError> {
        self.respond(
            "dm",
            member_id,
            Call::DirectMessage(member_id, text.to_string()),
        )
    }

    async fn notify_moderators(&self, text: &str) -> Result<(), ActionError> {
        self.respond("notify", 0, Call::NotifyModerators(text.to_string()))
    }
}

/// Guild directory double returning a fixed member list.
pub(crate) struct StaticDirectory(pub Vec<GuildMemberSnapshot>);

#[async_trait]
impl GuildDirectory for StaticDirectory {
    async fn list_members(&self) -> Result<Vec<GuildMemberSnapshot>, ActionError> {
        Ok(self.0.clone())
    }
}

/// Loads the store file of `test` into a shared store.
pub(crate) fn shared_store(test: &TestContext) -> SharedMemberStore {
    let (store, _) = MemberStore::load(test.store_path()).unwrap();
    store.into_shared()
}

pub(crate) fn snapshot(id: u64, name: &str, roles: &[u64]) -> GuildMemberSnapshot {
    GuildMemberSnapshot {
        id,
        display_name: name.to_string(),
        roles: roles.to_vec(),
        bot: false,
    }
}
