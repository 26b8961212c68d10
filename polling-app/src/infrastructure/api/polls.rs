use super::client::{ApiClient, Auth};
use super::types::{NewPollRequest, OptionTitleRequest, UpdatePollRequest};
use crate::domain::{OptionId, Page, Poll, PollId, PollOption, VoteRequest};
use polling_errors::AppError;
use reqwest::Method;

impl ApiClient {
    pub async fn list_polls(&self, page_no: u32, limit: u32) -> Result<Page<Poll>, AppError> {
        let builder = self
            .request(Method::GET, &format!("poll/list/{page_no}"), Auth::Session)?
            .query(&[("limit", limit)]);
        self.send_json(builder, "GET /poll/list", Auth::Session).await
    }

    pub async fn get_poll(&self, poll_id: PollId) -> Result<Poll, AppError> {
        let builder = self.request(Method::GET, &format!("poll/{poll_id}"), Auth::Session)?;
        self.send_json(builder, "GET /poll/{pollId}", Auth::Session)
            .await
    }

    pub async fn add_poll(&self, title: &str, options: &[String]) -> Result<Poll, AppError> {
        let builder = self
            .request(Method::POST, "poll/add", Auth::Session)?
            .json(&NewPollRequest::new(title, options));
        self.send_json(builder, "POST /poll/add", Auth::Session).await
    }

    pub async fn update_poll(&self, poll_id: PollId, title: &str) -> Result<Poll, AppError> {
        let builder = self
            .request(Method::PUT, &format!("poll/{poll_id}"), Auth::Session)?
            .json(&UpdatePollRequest { title });
        self.send_json(builder, "PUT /poll/{pollId}", Auth::Session)
            .await
    }

    pub async fn delete_poll(&self, poll_id: PollId) -> Result<(), AppError> {
        let builder = self.request(Method::DELETE, &format!("poll/{poll_id}"), Auth::Session)?;
        self.send_unit(builder, "DELETE /poll/{pollId}", Auth::Session)
            .await
    }

    pub async fn update_option(
        &self,
        option_id: OptionId,
        option_title: &str,
    ) -> Result<PollOption, AppError> {
        let builder = self
            .request(Method::PUT, &format!("option/edit/{option_id}"), Auth::Session)?
            .json(&OptionTitleRequest { option_title });
        self.send_json(builder, "PUT /option/edit/{optionId}", Auth::Session)
            .await
    }

    pub async fn delete_option(&self, option_id: OptionId) -> Result<(), AppError> {
        let builder = self.request(
            Method::DELETE,
            &format!("option/delete/{option_id}"),
            Auth::Session,
        )?;
        self.send_unit(builder, "DELETE /option/delete/{optionId}", Auth::Session)
            .await
    }

    pub async fn add_poll_option(
        &self,
        poll_id: PollId,
        option_title: &str,
    ) -> Result<PollOption, AppError> {
        let builder = self
            .request(
                Method::POST,
                &format!("poll/addPollOption/{poll_id}"),
                Auth::Session,
            )?
            .json(&OptionTitleRequest { option_title });
        self.send_json(builder, "POST /poll/addPollOption/{pollId}", Auth::Session)
            .await
    }

    /// The confirmation body is not interpreted; counts come from re-fetching.
    pub async fn cast_vote(&self, poll_id: PollId, option_id: OptionId) -> Result<(), AppError> {
        let builder = self
            .request(Method::POST, "vote/count", Auth::Session)?
            .json(&VoteRequest { poll_id, option_id });
        self.send_unit(builder, "POST /vote/count", Auth::Session).await
    }
}
