//! Identity-provider sign-in. The API redirects back to the client with the
//! session fields in the URL fragment.

use std::fmt;

use crate::db::models::{Session, SessionUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Facebook,
}

impl Provider {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "google" => Some(Provider::Google),
            "facebook" => Some(Provider::Facebook),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }

    /// API path that starts the provider's redirect flow.
    pub fn start_path(self) -> String {
        format!("/auth/{}", self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    MissingField(&'static str),
    InvalidUserId,
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackError::MissingField(name) => write!(f, "OAuth callback is missing {}", name),
            CallbackError::InvalidUserId => write!(f, "OAuth callback carried an invalid user_id"),
        }
    }
}

/// Parses `accessToken=..&refreshToken=..&user_id=..&username=..&email=..`.
/// A leading `#` is ignored; `email` may be absent.
pub fn parse_fragment(fragment: &str) -> Result<Session, CallbackError> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let mut access_token = None;
    let mut refresh_token = None;
    let mut user_id = None;
    let mut username = None;
    let mut email = None;

    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        let value = value.into_owned();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "accessToken" => access_token = Some(value),
            "refreshToken" => refresh_token = Some(value),
            "user_id" => user_id = Some(value),
            "username" => username = Some(value),
            "email" => email = Some(value),
            _ => {}
        }
    }

    let access_token = access_token.ok_or(CallbackError::MissingField("accessToken"))?;
    let refresh_token = refresh_token.ok_or(CallbackError::MissingField("refreshToken"))?;
    let user_id = user_id.ok_or(CallbackError::MissingField("user_id"))?;
    let username = username.ok_or(CallbackError::MissingField("username"))?;
    let id = user_id
        .trim()
        .parse::<i64>()
        .map_err(|_| CallbackError::InvalidUserId)?;

    Ok(Session::new(
        SessionUser {
            id,
            username,
            email: email.unwrap_or_default(),
        },
        access_token,
        refresh_token,
    ))
}
