//! Request and response bodies of the remote feed API.

use serde::{Deserialize, Deserializer, Serialize};

use crate::db::models::{Comment, Post, Session, SessionUser};

/// Ids arrive as JSON numbers from some endpoints and strings from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    /// `None` for floats that do not name a representable id.
    fn into_string(self) -> Option<String> {
        match self {
            RawId::Int(n) => Some(n.to_string()),
            RawId::Float(f) if !f.is_finite() => None,
            RawId::Float(f) if f.fract() == 0.0 => {
                // i64::MAX is not exactly representable; 2^63 itself overflows.
                (f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| (f as i64).to_string())
            }
            RawId::Float(f) => Some(f.to_string()),
            RawId::Text(s) => Some(s),
        }
    }
}

fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer)?
        .into_string()
        .ok_or_else(|| serde::de::Error::custom("id is out of range"))
}

fn flexible_user_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw
        .and_then(RawId::into_string)
        .and_then(|id| id.trim().parse().ok()))
}

// --- Auth ---

#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
    #[serde(default, deserialize_with = "flexible_user_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// A session only exists when the token, user id and username all came back.
    pub fn into_session(self) -> Option<Session> {
        let access_token = self.access_token.filter(|t| !t.is_empty())?;
        let id = self.user_id?;
        let username = self.username.filter(|u| !u.is_empty())?;

        Some(Session::new(
            SessionUser {
                id,
                username,
                email: self.email.unwrap_or_default(),
            },
            access_token,
            self.refresh_token.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredUser {
    #[serde(deserialize_with = "flexible_id")]
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

// --- Posts ---

#[derive(Debug, Deserialize)]
pub(crate) struct PostDto {
    #[serde(alias = "_id", alias = "post_id", deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(deserialize_with = "flexible_id")]
    pub user_id: String,
    #[serde(alias = "image_url", default)]
    pub url_image: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<PostDto> for Post {
    fn from(dto: PostDto) -> Self {
        Post {
            id: dto.id,
            author_id: dto.user_id,
            image_url: dto.url_image,
            description: dto.description.filter(|d| !d.trim().is_empty()),
            created_at: dto.created_at,
            local: false,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct CreatePostRequest<'a> {
    pub user_id: i64,
    pub url_image: &'a str,
    pub description: &'a str,
}

// --- Comments ---

#[derive(Debug, Deserialize)]
pub(crate) struct CommentDto {
    #[serde(alias = "_id", alias = "id", deserialize_with = "flexible_id")]
    pub comment_id: String,
    #[serde(deserialize_with = "flexible_id")]
    pub post_id: String,
    #[serde(deserialize_with = "flexible_id")]
    pub user_id: String,
    #[serde(alias = "text")]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<CommentDto> for Comment {
    fn from(dto: CommentDto) -> Self {
        Comment {
            id: dto.comment_id,
            post_id: dto.post_id,
            author_id: dto.user_id,
            text: dto.comment,
            created_at: dto.created_at,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct AddCommentRequest<'a> {
    pub post_id: &'a str,
    pub comment: &'a str,
    pub user_id: i64,
}
