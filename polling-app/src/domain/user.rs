use super::{RoleId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role_id: RoleId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// Body shared by `/user/register` and `/user/create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role_id: RoleId,
}

/// A listed user joined with its role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithRole {
    pub user: User,
    pub role_name: Option<String>,
}

/// Sign-up / create-user form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role_id: Option<RoleId>,
}

impl Registration {
    /// `None` until a role has been picked.
    pub fn to_new_user(&self) -> Option<NewUser> {
        Some(NewUser {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role_id: self.role_id?,
        })
    }
}
