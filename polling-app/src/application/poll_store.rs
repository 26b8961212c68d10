use crate::domain::{
    OptionId, PaginatedCollection, Poll, PollId, PollOption, PollResults, UserId, VoteRecord,
};
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::security::FormValidator;
use crate::infrastructure::storage::{load_json, save_json, SharedStorage, VOTES_KEY};
use polling_errors::AppError;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;

struct PollState {
    polls: PaginatedCollection<Poll>,
    current_details: Option<Poll>,
    votes: VoteRecord,
}

/// Accumulated poll pages plus the locally cached votes of this client.
///
/// Page fetches are serialized: a second `fetch_polls` waits for the first
/// to complete, so pages land in dispatch order.
pub struct PollStore {
    api: ApiClient,
    storage: SharedStorage,
    fetch_gate: Mutex<()>,
    state: RwLock<PollState>,
}

impl PollStore {
    pub fn new(api: ApiClient, storage: SharedStorage, page_size: u32) -> Self {
        let votes = match load_json::<VoteRecord>(storage.as_ref(), VOTES_KEY) {
            Ok(votes) => votes.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Discarding unreadable vote record: {}", e);
                VoteRecord::default()
            }
        };

        Self {
            api,
            storage,
            fetch_gate: Mutex::new(()),
            state: RwLock::new(PollState {
                polls: PaginatedCollection::new(page_size),
                current_details: None,
                votes,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PollState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PollState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn fetch_polls(&self, page_no: u32) -> Result<(), AppError> {
        let _gate = self.fetch_gate.lock().await;

        let (ticket, limit) = {
            let mut state = self.write();
            (state.polls.begin_fetch(page_no), state.polls.page_size())
        };

        match self.api.list_polls(ticket.page, limit).await {
            Ok(page) => {
                let mut state = self.write();
                if state.polls.apply_page(ticket, page) {
                    tracing::debug!(
                        page = ticket.page,
                        total = state.polls.len(),
                        has_more = state.polls.has_more(),
                        "Poll page loaded"
                    );
                } else {
                    tracing::debug!(page = ticket.page, "Discarding stale poll page");
                }
                Ok(())
            }
            Err(e) => {
                self.write().polls.fail(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Fetches the next page unless one is in flight or the list is complete.
    pub async fn load_more(&self) -> Result<bool, AppError> {
        let next = {
            let state = self.read();
            if state.polls.is_loading() || !state.polls.has_more() {
                return Ok(false);
            }
            state.polls.next_page()
        };
        self.fetch_polls(next).await?;
        Ok(true)
    }

    pub async fn fetch_poll_details(&self, poll_id: PollId) -> Result<Poll, AppError> {
        let poll = self.api.get_poll(poll_id).await?;
        self.write().current_details = Some(poll.clone());
        Ok(poll)
    }

    pub async fn add_poll(&self, title: &str, options: &[String]) -> Result<Poll, AppError> {
        FormValidator::validate_poll_form(title, options)?;
        let poll = self.api.add_poll(title, options).await?;
        tracing::info!("Created poll {}", poll.id);
        self.write().polls.prepend(poll.clone());
        Ok(poll)
    }

    pub async fn update_poll(&self, poll_id: PollId, title: &str) -> Result<Poll, AppError> {
        let updated = self.api.update_poll(poll_id, title).await?;
        let mut state = self.write();
        if let Some(poll) = state.polls.find_mut(poll_id) {
            poll.title = updated.title.clone();
        }
        if let Some(details) = state.current_details.as_mut().filter(|d| d.id == poll_id) {
            details.title = updated.title.clone();
        }
        Ok(updated)
    }

    pub async fn update_option(
        &self,
        option_id: OptionId,
        option_title: &str,
    ) -> Result<PollOption, AppError> {
        let updated = self.api.update_option(option_id, option_title).await?;
        self.for_each_local_poll(|poll| {
            if let Some(option) = poll.option_mut(option_id) {
                option.option_title = updated.option_title.clone();
            }
        });
        Ok(updated)
    }

    pub async fn delete_option(&self, option_id: OptionId) -> Result<(), AppError> {
        self.api.delete_option(option_id).await?;
        self.for_each_local_poll(|poll| poll.option_list.retain(|o| o.id != option_id));
        Ok(())
    }

    pub async fn add_poll_option(
        &self,
        poll_id: PollId,
        option_title: &str,
    ) -> Result<PollOption, AppError> {
        let option = self.api.add_poll_option(poll_id, option_title).await?;
        self.for_each_local_poll(|poll| {
            if poll.id == poll_id && poll.option(option.id).is_none() {
                poll.option_list.push(option.clone());
            }
        });
        Ok(option)
    }

    pub async fn delete_poll(&self, poll_id: PollId) -> Result<(), AppError> {
        self.api.delete_poll(poll_id).await?;
        tracing::info!("Deleted poll {}", poll_id);
        let mut state = self.write();
        state.polls.remove(poll_id);
        if state.current_details.as_ref().is_some_and(|d| d.id == poll_id) {
            state.current_details = None;
        }
        if state.votes.forget_poll(poll_id) {
            self.persist_votes(&state.votes);
        }
        Ok(())
    }

    /// Records the vote locally and counts it in the cached poll once the
    /// server accepted it. The local count is not reconciled until the
    /// poll is re-fetched with [`PollStore::refresh_poll`].
    pub async fn save_vote(
        &self,
        poll_id: PollId,
        option_id: OptionId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        if let Err(e) = self.api.cast_vote(poll_id, option_id).await {
            tracing::warn!("Vote on poll {} failed: {}", poll_id, e);
            return Err(e);
        }

        let mut state = self.write();
        let previous = state
            .votes
            .voted_option(poll_id, user_id)
            .filter(|&previous| previous != option_id);
        state.votes.record(poll_id, user_id, option_id);
        self.persist_votes(&state.votes);

        // Single choice: a changed vote leaves the previous option.
        if let Some(poll) = state.polls.find_mut(poll_id) {
            if let Some(old) = previous.and_then(|id| poll.option_mut(id)) {
                old.vote_count.retain(|&voter| voter != user_id);
            }
            if let Some(option) = poll.option_mut(option_id) {
                option.record_voter(user_id);
            }
        }
        Ok(())
    }

    /// Replaces the cached copy with the server's authoritative poll.
    pub async fn refresh_poll(&self, poll_id: PollId) -> Result<Poll, AppError> {
        let fresh = self.api.get_poll(poll_id).await?;
        let mut state = self.write();
        if let Some(poll) = state.polls.find_mut(poll_id) {
            *poll = fresh.clone();
        }
        if state.current_details.as_ref().is_some_and(|d| d.id == poll_id) {
            state.current_details = Some(fresh.clone());
        }
        Ok(fresh)
    }

    /// Results are always computed from a fresh fetch.
    pub async fn poll_results(&self, poll_id: PollId) -> Result<PollResults, AppError> {
        let poll = self.refresh_poll(poll_id).await?;
        Ok(PollResults::from(&poll))
    }

    fn for_each_local_poll(&self, mut apply: impl FnMut(&mut Poll)) {
        let mut state = self.write();
        state.polls.items_mut().for_each(&mut apply);
        if let Some(details) = state.current_details.as_mut() {
            apply(details);
        }
    }

    fn persist_votes(&self, votes: &VoteRecord) {
        if let Err(e) = save_json(self.storage.as_ref(), VOTES_KEY, votes) {
            tracing::warn!("Failed to persist vote record: {}", e);
        }
    }

    pub fn polls(&self) -> Vec<Poll> {
        self.read().polls.items().to_vec()
    }

    pub fn poll(&self, poll_id: PollId) -> Option<Poll> {
        self.read().polls.find(poll_id).cloned()
    }

    pub fn current_details(&self) -> Option<Poll> {
        self.read().current_details.clone()
    }

    pub fn has_more(&self) -> bool {
        self.read().polls.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.read().polls.is_loading()
    }

    pub fn current_page(&self) -> u32 {
        self.read().polls.current_page()
    }

    pub fn error(&self) -> Option<String> {
        self.read().polls.error().map(str::to_string)
    }

    pub fn has_voted(&self, poll_id: PollId, user_id: UserId) -> bool {
        self.read().votes.has_voted(poll_id, user_id)
    }

    pub fn voted_option(&self, poll_id: PollId, user_id: UserId) -> Option<OptionId> {
        self.read().votes.voted_option(poll_id, user_id)
    }

    pub fn votes(&self) -> VoteRecord {
        self.read().votes.clone()
    }
}
