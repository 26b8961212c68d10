use crate::domain::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub user: User,
}

/// Error bodies returned by the server; `message` is shown verbatim.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOption {
    pub option_title: String,
}

#[derive(Debug, Serialize)]
pub struct NewPollRequest {
    pub title: String,
    pub options: Vec<NewOption>,
}

impl NewPollRequest {
    pub fn new(title: &str, options: &[String]) -> Self {
        Self {
            title: title.trim().to_string(),
            options: options
                .iter()
                .map(|o| NewOption {
                    option_title: o.trim().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatePollRequest<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionTitleRequest<'a> {
    pub option_title: &'a str,
}
