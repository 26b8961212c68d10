use crate::domain::{PaginatedCollection, Registration, Role, User, UserWithRole};
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::security::FormValidator;
use polling_errors::AppError;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;

struct UserState {
    users: PaginatedCollection<User>,
    roles: Vec<Role>,
    roles_error: Option<String>,
}

/// Paginated user listing for administrators.
pub struct UserStore {
    api: ApiClient,
    fetch_gate: Mutex<()>,
    state: RwLock<UserState>,
}

impl UserStore {
    pub fn new(api: ApiClient, page_size: u32) -> Self {
        Self {
            api,
            fetch_gate: Mutex::new(()),
            state: RwLock::new(UserState {
                users: PaginatedCollection::new(page_size),
                roles: Vec::new(),
                roles_error: None,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, UserState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// A page size different from the current one restarts at page 1.
    pub async fn fetch_users(&self, page_no: u32, page_size: u32) -> Result<(), AppError> {
        let _gate = self.fetch_gate.lock().await;

        let (ticket, limit) = {
            let mut state = self.write();
            let page_no = if page_size.max(1) != state.users.page_size() {
                tracing::debug!(
                    from = state.users.page_size(),
                    to = page_size,
                    "User page size changed, restarting at page 1"
                );
                state.users.set_page_size(page_size);
                1
            } else {
                page_no
            };
            (state.users.begin_fetch(page_no), state.users.page_size())
        };

        match self.api.list_users(ticket.page, limit).await {
            Ok(page) => {
                if !self.write().users.apply_page(ticket, page) {
                    tracing::debug!(page = ticket.page, "Discarding stale user page");
                }
                Ok(())
            }
            Err(e) => {
                self.write().users.fail(ticket, e.user_message());
                Err(e)
            }
        }
    }

    pub async fn set_page_size(&self, page_size: u32) -> Result<(), AppError> {
        self.fetch_users(1, page_size).await
    }

    pub async fn load_more(&self) -> Result<bool, AppError> {
        let (next, size) = {
            let state = self.read();
            if state.users.is_loading() || !state.users.has_more() {
                return Ok(false);
            }
            (state.users.next_page(), state.users.page_size())
        };
        self.fetch_users(next, size).await?;
        Ok(true)
    }

    pub async fn fetch_roles(&self) -> Result<Vec<Role>, AppError> {
        match self.api.list_roles().await {
            Ok(roles) => {
                let mut state = self.write();
                state.roles = roles.clone();
                state.roles_error = None;
                Ok(roles)
            }
            Err(e) => {
                self.write().roles_error = Some(e.user_message().to_string());
                Err(e)
            }
        }
    }

    /// The listing is not updated; fetch again to see the new row.
    pub async fn create_user(&self, form: &Registration) -> Result<User, AppError> {
        FormValidator::validate_registration(form)?;
        let new_user = form
            .to_new_user()
            .ok_or_else(|| AppError::Validation("Role is required".to_string()))?;
        let user = self.api.create_user(&new_user).await?;
        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    pub fn users(&self) -> Vec<User> {
        self.read().users.items().to_vec()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.read().roles.clone()
    }

    /// Joins the listed users with the fetched roles by `roleId`.
    pub fn rows_with_roles(&self) -> Vec<UserWithRole> {
        let state = self.read();
        state
            .users
            .items()
            .iter()
            .map(|user| UserWithRole {
                user: user.clone(),
                role_name: state
                    .roles
                    .iter()
                    .find(|r| r.id == user.role_id)
                    .map(|r| r.name.clone()),
            })
            .collect()
    }

    pub fn page_size(&self) -> u32 {
        self.read().users.page_size()
    }

    pub fn current_page(&self) -> u32 {
        self.read().users.current_page()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.read().users.total_count()
    }

    pub fn total_pages(&self) -> Option<u64> {
        self.read().users.total_pages()
    }

    pub fn has_more(&self) -> bool {
        self.read().users.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.read().users.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        let state = self.read();
        state
            .users
            .error()
            .map(str::to_string)
            .or_else(|| state.roles_error.clone())
    }
}
