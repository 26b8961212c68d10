use super::client::{decode, ApiClient, Auth};
use super::types::{LoginResponse, RegisterResponse};
use crate::domain::{Credentials, NewUser, Page, Role, User};
use polling_errors::AppError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

pub const EMAIL_TAKEN_MESSAGE: &str =
    "Email is already registered. Please use a different email.";

impl ApiClient {
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AppError> {
        let builder = self
            .request(Method::POST, "user/login", Auth::Anonymous)?
            .json(credentials);
        self.send_json(builder, "POST /user/login", Auth::Anonymous)
            .await
    }

    /// The server answers a duplicate email with a non-JSON success body.
    pub async fn register(&self, user: &NewUser) -> Result<User, AppError> {
        let endpoint = "POST /user/register";
        let builder = self
            .request(Method::POST, "user/register", Auth::Anonymous)?
            .json(user);
        let response = self.dispatch(builder, endpoint, Auth::Anonymous).await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        if !is_json {
            return Err(AppError::Api {
                status: response.status().as_u16(),
                message: EMAIL_TAKEN_MESSAGE.to_string(),
            });
        }

        let body: RegisterResponse = decode(response, endpoint).await?;
        Ok(body.user)
    }

    /// Needed on the signup form, so it is sent like the credential calls.
    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let builder = self.request(Method::GET, "role/list", Auth::Anonymous)?;
        self.send_json(builder, "GET /role/list", Auth::Anonymous)
            .await
    }

    pub async fn list_users(&self, page_no: u32, limit: u32) -> Result<Page<User>, AppError> {
        let builder = self
            .request(Method::GET, &format!("user/list/{page_no}"), Auth::Session)?
            .query(&[("limit", limit)]);
        self.send_json(builder, "GET /user/list", Auth::Session).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let builder = self
            .request(Method::POST, "user/create", Auth::Session)?
            .json(user);
        self.send_json(builder, "POST /user/create", Auth::Session)
            .await
    }
}
