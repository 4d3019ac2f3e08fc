use serde::{Deserialize, Serialize};

/// The signed-in user as the client knows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Client-held record of the current authenticated user and tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    pub fn new(user: SessionUser, access_token: String, refresh_token: String) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
            access_token,
            refresh_token,
        }
    }

    /// An authenticated session must carry a user and an access token.
    pub fn is_consistent(&self) -> bool {
        if !self.authenticated {
            return true;
        }
        let has_user = self
            .user
            .as_ref()
            .map(|u| !u.username.is_empty())
            .unwrap_or(false);
        has_user && !self.access_token.is_empty()
    }

    pub fn bearer(&self) -> Option<&str> {
        if self.authenticated && !self.access_token.is_empty() {
            Some(&self.access_token)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub image_url: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
    /// Created in this client and never sent to the API.
    pub local: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> SessionUser {
        SessionUser {
            id: 7,
            username: "alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn default_session_is_logged_out_and_consistent() {
        let session = Session::default();
        assert!(!session.authenticated);
        assert!(session.is_consistent());
        assert!(session.bearer().is_none());
    }

    #[test]
    fn authenticated_without_token_is_inconsistent() {
        let session = Session::new(alice(), String::new(), "r".into());
        assert!(!session.is_consistent());
    }

    #[test]
    fn authenticated_without_user_is_inconsistent() {
        let session = Session {
            authenticated: true,
            user: None,
            access_token: "a".into(),
            refresh_token: "r".into(),
        };
        assert!(!session.is_consistent());
    }

    #[test]
    fn bearer_returns_access_token() {
        let session = Session::new(alice(), "tok".into(), "r".into());
        assert!(session.is_consistent());
        assert_eq!(session.bearer(), Some("tok"));
    }
}
