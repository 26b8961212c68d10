mod ids;
mod pagination;
mod poll;
mod route;
mod session;
mod user;
mod vote;

pub use ids::{OptionId, PollId, RoleId, UserId, ROLE_ADMIN, ROLE_USER};
pub use pagination::{FetchTicket, Identified, LoadState, Page, PaginatedCollection};
pub use poll::{OptionDraft, OptionResult, Poll, PollOption, PollResults};
pub use route::{Access, Route};
pub use session::{Credentials, Session};
pub use user::{NewUser, Registration, Role, User, UserWithRole};
pub use vote::{VoteRecord, VoteRequest};
