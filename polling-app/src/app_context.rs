use crate::application::{AuthStore, PollEditor, PollStore, RouteGuard, UserStore};
use crate::domain::Route;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::config::ClientConfig;
use crate::infrastructure::navigation::Navigator;
use crate::infrastructure::storage::{FileStorage, MemoryStorage, SessionVault, SharedStorage};
use polling_errors::AppError;
use std::sync::Arc;

/// Every store of one client, wired to the same storage, HTTP client and
/// navigator.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub navigator: Navigator,
    pub api: ApiClient,
    pub auth: Arc<AuthStore>,
    pub polls: Arc<PollStore>,
    pub users: Arc<UserStore>,
    pub guard: RouteGuard,
}

impl AppContext {
    pub fn new(config: ClientConfig, storage: SharedStorage) -> Self {
        let navigator = Navigator::new(Route::Login);
        let vault = SessionVault::new(storage.clone());
        let api = ApiClient::new(config.base_url.clone(), vault.clone(), navigator.clone());

        let auth = Arc::new(AuthStore::new(api.clone(), vault, navigator.clone()));
        let polls = Arc::new(PollStore::new(
            api.clone(),
            storage,
            config.poll_page_size,
        ));
        let users = Arc::new(UserStore::new(api.clone(), config.user_page_size));
        let guard = RouteGuard::new(auth.clone(), navigator.clone());

        Self {
            config: Arc::new(config),
            navigator,
            api,
            auth,
            polls,
            users,
            guard,
        }
    }

    pub fn in_memory(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(MemoryStorage::new()))
    }

    pub fn from_env() -> Result<Self, AppError> {
        let config = ClientConfig::from_env()?;
        tracing::info!(
            "Using backend {} with storage in {}",
            config.base_url,
            config.storage_dir.display()
        );
        let storage = Arc::new(FileStorage::new(config.storage_dir.clone()));
        Ok(Self::new(config, storage))
    }

    pub fn poll_editor(&self) -> PollEditor {
        PollEditor::new(self.polls.clone())
    }
}
