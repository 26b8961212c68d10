use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(PollId);
id_type!(OptionId);
id_type!(
    /// Also used as the voter identifier inside an option's `voteCount`.
    UserId
);
id_type!(RoleId);

/// Fixed by convention with the server.
pub const ROLE_ADMIN: RoleId = RoleId(1);
pub const ROLE_USER: RoleId = RoleId(2);
