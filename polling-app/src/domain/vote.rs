use super::{OptionId, PollId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Local, non-authoritative record of the votes cast from this client.
///
/// Used to keep the vote control disabled for polls the user already
/// answered; counts shown to the user still come from the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteRecord(BTreeMap<PollId, BTreeMap<UserId, OptionId>>);

impl VoteRecord {
    pub fn record(&mut self, poll_id: PollId, user_id: UserId, option_id: OptionId) {
        self.0.entry(poll_id).or_default().insert(user_id, option_id);
    }

    pub fn voted_option(&self, poll_id: PollId, user_id: UserId) -> Option<OptionId> {
        self.0.get(&poll_id)?.get(&user_id).copied()
    }

    pub fn has_voted(&self, poll_id: PollId, user_id: UserId) -> bool {
        self.voted_option(poll_id, user_id).is_some()
    }

    /// Drops every entry for a poll that no longer exists.
    pub fn forget_poll(&mut self, poll_id: PollId) -> bool {
        self.0.remove(&poll_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub poll_id: PollId,
    pub option_id: OptionId,
}
