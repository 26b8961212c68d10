mod auth_store;
mod poll_editor;
mod poll_store;
mod route_guard;
mod user_store;

pub use auth_store::{AuthSnapshot, AuthStore};
pub use poll_editor::{PollEdit, PollEditor};
pub use poll_store::PollStore;
pub use route_guard::{evaluate, GuardDecision, RouteGuard};
pub use user_store::UserStore;
