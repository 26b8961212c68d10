use super::PollStore;
use crate::domain::{OptionDraft, OptionId, Poll, PollId};
use crate::infrastructure::security::FormValidator;
use polling_errors::AppError;
use std::sync::Arc;

/// Working copy of a poll in the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollEdit {
    original: Poll,
    pub title: String,
    pub options: Vec<OptionDraft>,
    removed: Vec<OptionId>,
}

impl PollEdit {
    pub fn from_poll(poll: &Poll) -> Self {
        Self {
            original: poll.clone(),
            title: poll.title.clone(),
            options: poll.option_list.iter().map(OptionDraft::from).collect(),
            removed: Vec::new(),
        }
    }

    pub fn poll_id(&self) -> PollId {
        self.original.id
    }

    pub fn add_option(&mut self, title: impl Into<String>) {
        self.options.push(OptionDraft::new_draft(title));
    }

    /// Persisted options are remembered so the server copy gets deleted.
    pub fn remove_option(&mut self, index: usize) -> Option<OptionDraft> {
        if index >= self.options.len() {
            return None;
        }
        let removed = self.options.remove(index);
        if let Some(id) = removed.persisted_id() {
            self.removed.push(id);
        }
        Some(removed)
    }

    pub fn set_option_title(&mut self, index: usize, title: impl Into<String>) -> bool {
        match self.options.get_mut(index) {
            Some(option) => {
                option.set_title(title);
                true
            }
            None => false,
        }
    }

    pub fn removed(&self) -> &[OptionId] {
        &self.removed
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let titles: Vec<&str> = self.options.iter().map(OptionDraft::title).collect();
        FormValidator::validate_poll_form(&self.title, &titles)
    }
}

/// A step already applied on the server, with what is needed to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Applied {
    DeletedOption { title: String },
    AddedOption { id: OptionId },
    RenamedOption { id: OptionId, previous: String },
    Retitled { previous: String },
}

impl Applied {
    fn describe(&self) -> String {
        match self {
            Self::DeletedOption { title } => format!("re-add deleted option \"{title}\""),
            Self::AddedOption { id } => format!("remove added option {id}"),
            Self::RenamedOption { id, previous } => {
                format!("restore option {id} title \"{previous}\"")
            }
            Self::Retitled { previous } => format!("restore poll title \"{previous}\""),
        }
    }
}

/// Applies an edit as a sequence of calls and undoes the applied calls
/// when one of them fails.
///
/// Order: delete removed options, add new options, rename changed options,
/// retitle the poll. A deleted option is restored as a new option, so its
/// votes are not recovered.
pub struct PollEditor {
    store: Arc<PollStore>,
}

impl PollEditor {
    pub fn new(store: Arc<PollStore>) -> Self {
        Self { store }
    }

    /// Loads the poll from the server into a fresh working copy.
    pub async fn begin(&self, poll_id: PollId) -> Result<PollEdit, AppError> {
        let poll = self.store.fetch_poll_details(poll_id).await?;
        Ok(PollEdit::from_poll(&poll))
    }

    pub async fn apply(&self, edit: &PollEdit) -> Result<Poll, AppError> {
        edit.validate()?;
        let poll_id = edit.poll_id();
        let mut journal = Vec::new();

        if let Err(e) = self.run_steps(edit, &mut journal).await {
            tracing::warn!(
                "Editing poll {} failed after {} step(s): {}",
                poll_id,
                journal.len(),
                e
            );
            let failed = self.compensate(poll_id, journal, &e).await;
            if let Err(refresh) = self.store.refresh_poll(poll_id).await {
                tracing::warn!("Could not reload poll {} after rollback: {}", poll_id, refresh);
            }
            return Err(if failed.is_empty() {
                AppError::EditRolledBack(e.user_message().to_string())
            } else {
                AppError::EditInconsistent(failed)
            });
        }

        tracing::info!("Updated poll {} in {} step(s)", poll_id, journal.len());
        self.store.refresh_poll(poll_id).await
    }

    async fn run_steps(&self, edit: &PollEdit, journal: &mut Vec<Applied>) -> Result<(), AppError> {
        let poll_id = edit.poll_id();

        for &option_id in edit.removed() {
            let title = edit
                .original
                .option(option_id)
                .map(|o| o.option_title.clone())
                .unwrap_or_default();
            self.store.delete_option(option_id).await?;
            journal.push(Applied::DeletedOption { title });
        }

        let filled = || {
            edit.options
                .iter()
                .map(|option| (option, option.title().trim()))
                .filter(|(_, title)| !title.is_empty())
        };

        for (_, title) in filled().filter(|(o, _)| o.persisted_id().is_none()) {
            let added = self.store.add_poll_option(poll_id, title).await?;
            journal.push(Applied::AddedOption { id: added.id });
        }

        for (option, title) in filled() {
            let Some(id) = option.persisted_id() else {
                continue;
            };
            let previous = edit
                .original
                .option(id)
                .map(|o| o.option_title.clone())
                .unwrap_or_default();
            if previous != title {
                self.store.update_option(id, title).await?;
                journal.push(Applied::RenamedOption { id, previous });
            }
        }

        let title = edit.title.trim();
        if title != edit.original.title {
            self.store.update_poll(poll_id, title).await?;
            journal.push(Applied::Retitled {
                previous: edit.original.title.clone(),
            });
        }
        Ok(())
    }

    /// Undoes applied steps newest first; returns the ones that could not be undone.
    async fn compensate(
        &self,
        poll_id: PollId,
        journal: Vec<Applied>,
        cause: &AppError,
    ) -> Vec<String> {
        if cause.is_forbidden() {
            // The session is gone, every undo call would be rejected as well.
            return journal.iter().rev().map(Applied::describe).collect();
        }

        let mut failed = Vec::new();
        for step in journal.into_iter().rev() {
            let result = match &step {
                Applied::DeletedOption { title } => self
                    .store
                    .add_poll_option(poll_id, title)
                    .await
                    .map(|_| ()),
                Applied::AddedOption { id } => self.store.delete_option(*id).await,
                Applied::RenamedOption { id, previous } => {
                    self.store.update_option(*id, previous).await.map(|_| ())
                }
                Applied::Retitled { previous } => {
                    self.store.update_poll(poll_id, previous).await.map(|_| ())
                }
            };
            if let Err(e) = result {
                tracing::error!("Rollback step failed ({}): {}", step.describe(), e);
                failed.push(step.describe());
            }
        }
        failed
    }
}
