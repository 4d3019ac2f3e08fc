//! Form checks that run before any request leaves the client.

use std::sync::OnceLock;

use regex::Regex;

use crate::api::models::{LoginCredentials, Registration};
use crate::api::ClientError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_COMMENT_LEN: usize = 500;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn invalid(message: &str) -> ClientError {
    ClientError::Validation(message.to_string())
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn validate_credentials(credentials: &LoginCredentials) -> Result<(), ClientError> {
    if credentials.email.trim().is_empty() || credentials.password.trim().is_empty() {
        return Err(invalid("Please enter your email and password"));
    }
    Ok(())
}

pub fn validate_registration(registration: &Registration) -> Result<(), ClientError> {
    if registration.username.trim().is_empty()
        || registration.email.trim().is_empty()
        || registration.password.trim().is_empty()
    {
        return Err(invalid("Please fill in all fields"));
    }
    if !is_valid_email(registration.email.trim()) {
        return Err(invalid("Please enter a valid email address"));
    }
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Checks an upload form and returns the trimmed `(image_url, description)`.
pub fn validate_post(image_url: &str, description: &str) -> Result<(String, String), ClientError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(invalid("Please enter a description"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ClientError::Validation(format!(
            "Description must be {} characters or less",
            MAX_DESCRIPTION_LEN
        )));
    }

    let image_url = image_url.trim();
    if image_url.is_empty() {
        return Err(invalid("Please enter an image URL"));
    }
    match url::Url::parse(image_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => return Err(invalid("Please enter a valid image URL")),
    }

    Ok((image_url.to_string(), description.to_string()))
}

pub fn validate_comment(text: &str) -> Result<String, ClientError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid("Comment cannot be empty"));
    }
    if text.chars().count() > MAX_COMMENT_LEN {
        return Err(ClientError::Validation(format!(
            "Comment must be {} characters or less",
            MAX_COMMENT_LEN
        )));
    }
    Ok(text.to_string())
}
