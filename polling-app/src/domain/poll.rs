use super::{OptionId, PollId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: PollId,
    pub title: String,
    #[serde(default)]
    pub option_list: Vec<PollOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: OptionId,
    pub option_title: String,
    /// One entry per voter; its length is the option's vote count.
    #[serde(default)]
    pub vote_count: Vec<UserId>,
}

impl Poll {
    pub fn option(&self, option_id: OptionId) -> Option<&PollOption> {
        self.option_list.iter().find(|o| o.id == option_id)
    }

    pub fn option_mut(&mut self, option_id: OptionId) -> Option<&mut PollOption> {
        self.option_list.iter_mut().find(|o| o.id == option_id)
    }

    pub fn total_votes(&self) -> usize {
        self.option_list.iter().map(PollOption::votes).sum()
    }
}

impl PollOption {
    pub fn votes(&self) -> usize {
        self.vote_count.len()
    }

    /// Appends the voter unless already counted.
    pub fn record_voter(&mut self, user_id: UserId) -> bool {
        if self.vote_count.contains(&user_id) {
            return false;
        }
        self.vote_count.push(user_id);
        true
    }
}

/// An option row in the poll editor.
///
/// Options that exist on the server carry their id; options typed into the
/// editor but not yet saved carry a client-side temporary id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionDraft {
    Persisted { id: OptionId, title: String },
    Draft { temp_id: uuid::Uuid, title: String },
}

impl OptionDraft {
    pub fn new_draft(title: impl Into<String>) -> Self {
        Self::Draft {
            temp_id: uuid::Uuid::new_v4(),
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Persisted { title, .. } | Self::Draft { title, .. } => title,
        }
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        match self {
            Self::Persisted { title, .. } | Self::Draft { title, .. } => *title = value.into(),
        }
    }

    pub fn persisted_id(&self) -> Option<OptionId> {
        match self {
            Self::Persisted { id, .. } => Some(*id),
            Self::Draft { .. } => None,
        }
    }
}

impl From<&PollOption> for OptionDraft {
    fn from(option: &PollOption) -> Self {
        Self::Persisted {
            id: option.id,
            title: option.option_title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionResult {
    pub option_id: OptionId,
    pub title: String,
    pub votes: usize,
}

/// Authoritative per-option counts for the results view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResults {
    pub poll_id: PollId,
    pub title: String,
    pub options: Vec<OptionResult>,
}

impl PollResults {
    pub fn total_votes(&self) -> usize {
        self.options.iter().map(|o| o.votes).sum()
    }
}

impl From<&Poll> for PollResults {
    fn from(poll: &Poll) -> Self {
        Self {
            poll_id: poll.id,
            title: poll.title.clone(),
            options: poll
                .option_list
                .iter()
                .map(|o| OptionResult {
                    option_id: o.id,
                    title: o.option_title.clone(),
                    votes: o.votes(),
                })
                .collect(),
        }
    }
}
