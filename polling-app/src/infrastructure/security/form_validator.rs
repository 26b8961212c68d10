use crate::domain::Registration;
use polling_errors::AppError;
use regex_lite::Regex;
use std::sync::LazyLock;

const MIN_TITLE_LENGTH: usize = 10;
const MIN_OPTIONS: usize = 2;
const MIN_PASSWORD_LENGTH: usize = 8;
const PASSWORD_SPECIALS: &str = "!@#$%^&*";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());
static PASSWORD_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\d!@#$%^&*]{8,}$").unwrap());

/// Client-side checks run before any request leaves the client.
pub struct FormValidator;

impl FormValidator {
    pub fn validate_email(email: &str) -> Result<(), AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }
        if !EMAIL_RE.is_match(email) {
            return Err(AppError::Validation("Enter a valid email".to_string()));
        }
        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<(), AppError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
        if !has_upper || !has_special || !PASSWORD_CHARSET_RE.is_match(password) {
            return Err(AppError::Validation(
                "Password must contain at least one uppercase letter and one special character"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Title and option rules shared by the add and edit flows.
    pub fn validate_poll_form<S: AsRef<str>>(title: &str, options: &[S]) -> Result<(), AppError> {
        let mut problems = Vec::new();

        if title.trim().chars().count() < MIN_TITLE_LENGTH {
            problems.push("Poll title must be at least 10 characters long.");
        }

        let filled = options
            .iter()
            .filter(|o| !o.as_ref().trim().is_empty())
            .count();
        if filled < MIN_OPTIONS {
            problems.push("At least 2 valid options are required.");
        } else if filled < options.len() {
            problems.push("Empty option not added.");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems.join(" ")))
        }
    }

    /// Reports the first failing field, in form order.
    pub fn validate_registration(form: &Registration) -> Result<(), AppError> {
        let required = [
            ("First Name", &form.first_name),
            ("Last Name", &form.last_name),
            ("Email", &form.email),
            ("Password", &form.password),
            ("Confirm Password", &form.confirm_password),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{label} is required")));
            }
        }

        if Self::validate_email(&form.email).is_err() {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }
        Self::validate_password(&form.password)?;
        if form.confirm_password != form.password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        if form.role_id.is_none() {
            return Err(AppError::Validation("Role is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ROLE_USER;

    fn registration() -> Registration {
        Registration {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "Engine#1843".into(),
            confirm_password: "Engine#1843".into(),
            role_id: Some(ROLE_USER),
        }
    }

    fn message(result: Result<(), AppError>) -> String {
        result.unwrap_err().user_message().to_string()
    }

    #[test]
    fn test_email() {
        assert!(FormValidator::validate_email("a@b.co").is_ok());
        assert_eq!(message(FormValidator::validate_email(" ")), "Email is required");
        assert_eq!(
            message(FormValidator::validate_email("ada.example.com")),
            "Enter a valid email"
        );
    }

    #[test]
    fn test_poll_form() {
        assert!(FormValidator::validate_poll_form("Best editor ever?", &["vim", "emacs"]).is_ok());
        assert_eq!(
            message(FormValidator::validate_poll_form("Short", &["a", "b"])),
            "Poll title must be at least 10 characters long."
        );
        assert_eq!(
            message(FormValidator::validate_poll_form("Long enough title", &["a", " "])),
            "At least 2 valid options are required."
        );
        assert_eq!(
            message(FormValidator::validate_poll_form("Long enough title", &["a", "b", ""])),
            "Empty option not added."
        );
        assert_eq!(
            message(FormValidator::validate_poll_form("Tiny", &["a"])),
            "Poll title must be at least 10 characters long. At least 2 valid options are required."
        );
    }

    #[test]
    fn test_registration_ok() {
        assert!(FormValidator::validate_registration(&registration()).is_ok());
    }

    #[test]
    fn test_registration_failures() {
        let mut form = registration();
        form.last_name = " ".into();
        assert_eq!(
            message(FormValidator::validate_registration(&form)),
            "Last Name is required"
        );

        let mut form = registration();
        form.email = "nope".into();
        assert_eq!(
            message(FormValidator::validate_registration(&form)),
            "Invalid email address"
        );

        let mut form = registration();
        form.password = "short".into();
        form.confirm_password = "short".into();
        assert_eq!(
            message(FormValidator::validate_registration(&form)),
            "Password must be at least 8 characters"
        );

        let mut form = registration();
        form.password = "alllowercase1!".into();
        form.confirm_password = form.password.clone();
        assert!(message(FormValidator::validate_registration(&form)).contains("uppercase"));

        let mut form = registration();
        form.confirm_password = "Engine#1844".into();
        assert_eq!(
            message(FormValidator::validate_registration(&form)),
            "Passwords do not match"
        );

        let mut form = registration();
        form.role_id = None;
        assert_eq!(
            message(FormValidator::validate_registration(&form)),
            "Role is required"
        );
    }
}
