use super::PollId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only reachable while signed out.
    PublicOnly,
    Protected,
    AdminOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Polls,
    AddPoll,
    EditPoll(PollId),
    CreateUser,
    ListUsers,
    /// Any path outside the route table.
    Unknown(String),
}

impl Route {
    /// Where authenticated users land.
    pub const LANDING: Route = Route::Polls;

    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["polls"] => Self::Polls,
            ["addPoll"] => Self::AddPoll,
            ["createUser"] => Self::CreateUser,
            ["listUsers"] => Self::ListUsers,
            ["poll", "edit", id] => match id.parse::<i64>() {
                Ok(id) => Self::EditPoll(PollId(id)),
                Err(_) => Self::Unknown(path.to_string()),
            },
            _ => Self::Unknown(path.to_string()),
        }
    }

    /// `None` for paths outside the route table.
    pub fn access(&self) -> Option<Access> {
        match self {
            Self::Login | Self::Signup => Some(Access::PublicOnly),
            Self::Polls => Some(Access::Protected),
            Self::AddPoll | Self::EditPoll(_) | Self::CreateUser | Self::ListUsers => {
                Some(Access::AdminOnly)
            }
            Self::Unknown(_) => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Polls => "/polls".to_string(),
            Self::AddPoll => "/addPoll".to_string(),
            Self::EditPoll(id) => format!("/poll/edit/{id}"),
            Self::CreateUser => "/createUser".to_string(),
            Self::ListUsers => "/listUsers".to_string(),
            Self::Unknown(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
