use super::{load_json, save_json, SharedStorage, StorageError};
use crate::domain::Session;

pub const SESSION_KEY: &str = "user";

/// Owns the persisted [`Session`] under its fixed storage key.
#[derive(Clone)]
pub struct SessionVault {
    storage: SharedStorage,
}

impl SessionVault {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// A missing or unreadable session both count as signed out.
    pub fn load(&self) -> Option<Session> {
        match load_json::<Session>(self.storage.as_ref(), SESSION_KEY) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session: {}", e);
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.load().map(|s| s.token)
    }

    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        save_json(self.storage.as_ref(), SESSION_KEY, session)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_KEY)
    }
}
