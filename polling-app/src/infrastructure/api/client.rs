use super::types::ErrorBody;
use crate::infrastructure::navigation::Navigator;
use crate::infrastructure::storage::SessionVault;
use polling_errors::AppError;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// Header carrying the session token on authenticated requests.
pub const TOKEN_HEADER: &str = "token";

/// Whether a request goes through the session interceptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// Token attached when a session exists; 403 ends the session.
    Session,
    /// Login, register and the role list bypass both interceptors.
    Anonymous,
}

/// REST client for the poll backend.
///
/// Reads the persisted session before each authenticated request and
/// revokes it when the server answers 403. Nothing is retried.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    vault: SessionVault,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(base_url: Url, vault: SessionVault, navigator: Navigator) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, vault, navigator)
    }

    pub fn with_http_client(
        http_client: reqwest::Client,
        mut base_url: Url,
        vault: SessionVault,
        navigator: Navigator,
    ) -> Self {
        // `Url::join` drops the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http_client,
            base_url,
            vault,
            navigator,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
    ) -> Result<RequestBuilder, AppError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::Config(format!("invalid request path {path}: {e}")))?;

        let mut builder = self.http_client.request(method, url);
        if auth == Auth::Session {
            if let Some(token) = self.vault.token() {
                builder = builder.header(TOKEN_HEADER, token);
            }
        }
        Ok(builder)
    }

    /// Sends the request and turns every failure into an [`AppError`].
    pub(crate) async fn dispatch(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
        auth: Auth,
    ) -> Result<Response, AppError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!("Request to {} got no response: {}", endpoint, e);
            AppError::NoResponse
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("{} -> {}", endpoint, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = normalize_error(status, &body);

        if status == StatusCode::FORBIDDEN && auth == Auth::Session {
            self.revoke_session(endpoint);
            return Err(AppError::Forbidden(error.user_message().to_string()));
        }

        tracing::error!("{} failed: {} - {}", endpoint, status, body);
        Err(error)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
        auth: Auth,
    ) -> Result<T, AppError> {
        let response = self.dispatch(builder, endpoint, auth).await?;
        decode(response, endpoint).await
    }

    /// For endpoints whose success body is not used.
    pub(crate) async fn send_unit(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
        auth: Auth,
    ) -> Result<(), AppError> {
        self.dispatch(builder, endpoint, auth).await.map(|_| ())
    }

    fn revoke_session(&self, endpoint: &str) {
        tracing::warn!("{} answered 403, ending the session", endpoint);
        if let Err(e) = self.vault.clear() {
            tracing::error!("Failed to clear the persisted session: {}", e);
        }
        self.navigator.force_login();
    }
}

pub(crate) async fn decode<T: DeserializeOwned>(
    response: Response,
    endpoint: &str,
) -> Result<T, AppError> {
    response.json::<T>().await.map_err(|e| {
        tracing::error!("Could not decode response from {}: {}", endpoint, e);
        AppError::Decode(e.to_string())
    })
}

/// Server message verbatim when the body carries one, generic otherwise.
pub fn normalize_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    match message {
        Some(message) => AppError::Api {
            status: status.as_u16(),
            message,
        },
        None => AppError::Unexpected {
            status: status.as_u16(),
        },
    }
}
