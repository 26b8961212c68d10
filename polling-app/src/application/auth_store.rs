use crate::domain::{Credentials, Registration, Role, RoleId, Route, Session};
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::navigation::Navigator;
use crate::infrastructure::security::FormValidator;
use crate::infrastructure::storage::SessionVault;
use polling_errors::AppError;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct AuthState {
    is_loading: bool,
    error: Option<String>,
    roles: Vec<Role>,
    roles_loading: bool,
}

/// What the route guard needs to know about the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub role_id: Option<RoleId>,
}

/// Session lifecycle: login, signup, logout.
///
/// The session itself lives in storage, so a 403 seen by any store ends it
/// here too.
pub struct AuthStore {
    api: ApiClient,
    vault: SessionVault,
    navigator: Navigator,
    state: RwLock<AuthState>,
}

impl AuthStore {
    pub fn new(api: ApiClient, vault: SessionVault, navigator: Navigator) -> Self {
        Self {
            api,
            vault,
            navigator,
            state: RwLock::new(AuthState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        self.begin();
        let result = self.authenticate(email, password).await;
        self.finish(&result);

        if let Ok(session) = &result {
            tracing::info!("Signed in as {}", session.email);
            let landing = self.navigator.take_return_to().unwrap_or(Route::LANDING);
            self.navigator.go(landing);
        }
        result
    }

    /// Registers the account, then signs in with the same credentials since
    /// registration does not hand out a token.
    pub async fn signup(&self, form: &Registration) -> Result<Session, AppError> {
        self.begin();
        let result = self.register_and_authenticate(form).await;
        self.finish(&result);

        if let Ok(session) = &result {
            tracing::info!("Registered and signed in as {}", session.email);
            self.navigator.go(Route::LANDING);
        }
        result
    }

    /// Always succeeds; a storage failure is only logged.
    pub fn logout(&self) {
        if let Err(e) = self.vault.clear() {
            tracing::error!("Failed to clear the persisted session: {}", e);
        }
        {
            let mut state = self.write();
            state.error = None;
            state.is_loading = false;
        }
        tracing::info!("Logged out");
        self.navigator.go(Route::Login);
    }

    pub async fn fetch_roles(&self) -> Result<Vec<Role>, AppError> {
        {
            let mut state = self.write();
            state.roles_loading = true;
            state.error = None;
        }
        let result = self.api.list_roles().await;
        let mut state = self.write();
        state.roles_loading = false;
        match result {
            Ok(roles) => {
                state.roles = roles.clone();
                Ok(roles)
            }
            Err(e) => {
                state.error = Some(e.user_message().to_string());
                Err(e)
            }
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AppError> {
        FormValidator::validate_email(email)?;
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }

        let response = self
            .api
            .login(&Credentials::new(email.trim(), password))
            .await?;
        let session = Session::new(response.user, response.token);
        self.vault.save(&session)?;
        Ok(session)
    }

    async fn register_and_authenticate(&self, form: &Registration) -> Result<Session, AppError> {
        FormValidator::validate_registration(form)?;
        let new_user = form
            .to_new_user()
            .ok_or_else(|| AppError::Validation("Role is required".to_string()))?;
        let user = self.api.register(&new_user).await?;
        tracing::debug!("Registered user {}", user.id);
        self.authenticate(&new_user.email, &new_user.password).await
    }

    fn begin(&self) {
        let mut state = self.write();
        state.is_loading = true;
        state.error = None;
    }

    fn finish(&self, result: &Result<Session, AppError>) {
        let mut state = self.write();
        state.is_loading = false;
        if let Err(e) = result {
            tracing::warn!("Authentication failed: {}", e);
            state.error = Some(e.user_message().to_string());
        }
    }

    pub fn reset_error(&self) {
        self.write().error = None;
    }

    pub fn session(&self) -> Option<Session> {
        self.vault.load()
    }

    pub fn is_authenticated(&self) -> bool {
        self.vault.load().is_some()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        let session = self.vault.load();
        AuthSnapshot {
            is_authenticated: session.is_some(),
            role_id: session.map(|s| s.role_id),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.read().roles.clone()
    }

    pub fn roles_loading(&self) -> bool {
        self.read().roles_loading
    }
}
