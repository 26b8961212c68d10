mod client;
mod polls;
pub mod types;
mod users;

pub use client::{normalize_error, ApiClient, TOKEN_HEADER};
pub use users::EMAIL_TAKEN_MESSAGE;
