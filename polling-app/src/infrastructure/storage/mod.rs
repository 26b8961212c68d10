mod local_storage;
mod session_vault;

pub use local_storage::{
    load_json, save_json, FileStorage, LocalStorage, MemoryStorage, SharedStorage, StorageError,
};
pub use session_vault::{SessionVault, SESSION_KEY};

pub const VOTES_KEY: &str = "votes";
