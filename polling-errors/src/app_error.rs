use serde::{Deserialize, Serialize};

pub const NO_RESPONSE_MESSAGE: &str = "No response from server";
pub const FALLBACK_MESSAGE: &str = "An error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("{}", NO_RESPONSE_MESSAGE)]
    NoResponse,

    /// The server answered with an error body carrying a `message` field.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The server answered with an error but no usable body.
    #[error("{} (status {status})", FALLBACK_MESSAGE)]
    Unexpected { status: u16 },

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Invalid response from server: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Local storage failure: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to update poll, changes were rolled back: {0}")]
    EditRolledBack(String),

    #[error("Failed to update poll, could not undo: {}", .0.join("; "))]
    EditInconsistent(Vec<String>),
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::NoResponse => NO_RESPONSE_MESSAGE,
            Self::Api { message, .. } => message,
            Self::Unexpected { .. } | Self::Decode(_) => FALLBACK_MESSAGE,
            Self::Forbidden(_) => "Your session has expired. Please log in again.",
            Self::Validation(msg) => msg,
            Self::Storage(_) => "Could not access local storage.",
            Self::Config(msg) => msg,
            Self::EditRolledBack(_) => "Failed to update poll. Please try again.",
            Self::EditInconsistent(_) => {
                "Failed to update poll. Some changes could not be undone, reload the poll."
            }
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Unexpected { status } => Some(*status),
            Self::Forbidden(_) => Some(403),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_surfaced_verbatim() {
        let err = AppError::Api {
            status: 401,
            message: "Invalid email or password".to_string(),
        };
        assert_eq!(err.user_message(), "Invalid email or password");
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(AppError::NoResponse.user_message(), "No response from server");
        assert_eq!(
            AppError::Unexpected { status: 500 }.user_message(),
            "An error occurred"
        );
        assert_eq!(
            AppError::Decode("missing field `rows`".into()).user_message(),
            "An error occurred"
        );
    }

    #[test]
    fn test_status() {
        assert_eq!(AppError::Forbidden("x".into()).status(), Some(403));
        assert_eq!(AppError::NoResponse.status(), None);
        assert!(AppError::Forbidden("x".into()).is_forbidden());
    }

    #[test]
    fn test_inconsistent_edit_lists_steps() {
        let err = AppError::EditInconsistent(vec![
            "restore option 4".to_string(),
            "restore title".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Failed to update poll, could not undo: restore option 4; restore title"
        );
    }
}
