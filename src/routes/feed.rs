use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::future::join_all;
use serde::Deserialize;

use crate::api::ClientError;
use crate::config::CreateMode;
use crate::db::drafts;
use crate::db::models::{Comment, Post};
use crate::error::AppResult;
use crate::extractors::{CurrentUser, MaybeUser};
use crate::routes::home::{redirect_with, Html};
use crate::state::AppState;
use crate::validation;

// --- View structs ---

pub struct PostView {
    pub id: String,
    pub author_id: String,
    pub author_initial: String,
    pub image_url: String,
    pub description: Option<String>,
    pub created_at: String,
    pub local: bool,
    pub comments: Vec<CommentView>,
    /// Set when this post's comments could not be loaded.
    pub comments_error: Option<String>,
}

pub struct CommentView {
    pub author_id: String,
    pub author_initial: String,
    pub text: String,
    pub created_at: String,
}

pub enum FeedState {
    Error(String),
    Empty,
    Loaded(Vec<PostView>),
}

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/feed.html")]
pub struct FeedTemplate {
    pub username: Option<String>,
    pub state: FeedState,
    pub notice: Option<String>,
    pub error: Option<String>,
}

// --- Forms ---

#[derive(Deserialize, Default)]
pub struct FeedQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct CommentForm {
    pub comment: String,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed_page))
        .route("/feed/posts/{id}/comments", post(create_comment))
}

// --- Handlers ---

async fn feed_page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<FeedQuery>,
) -> AppResult<Response> {
    if user.is_none() && state.config.app.require_login {
        return Ok(Redirect::to("/login").into_response());
    }

    let feed = load_feed(&state).await?;

    Ok(Html(FeedTemplate {
        username: user.map(|u| u.user.username),
        state: feed,
        notice: query.notice,
        error: query.error,
    })
    .into_response())
}

/// Remote posts with local drafts in front, each with its comments.
async fn load_feed(state: &AppState) -> AppResult<FeedState> {
    let remote = match state.api.list_posts().await {
        Ok(posts) => posts,
        Err(err) => return Ok(FeedState::Error(err.to_string())),
    };

    let mut posts = drafts::list_posts(&state.db)?;
    posts.extend(remote);
    if posts.is_empty() {
        return Ok(FeedState::Empty);
    }

    let remote_comments = join_all(posts.iter().map(|post| async move {
        if post.local {
            Ok(Vec::new())
        } else {
            state.api.list_comments(&post.id).await
        }
    }))
    .await;

    let mut views = Vec::with_capacity(posts.len());
    for (post, comments) in posts.into_iter().zip(remote_comments) {
        let local = drafts::list_comments(&state.db, &post.id)?;
        views.push(post_view(post, comments, local));
    }

    Ok(FeedState::Loaded(views))
}

async fn create_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> AppResult<Redirect> {
    let text = match validation::validate_comment(&form.comment) {
        Ok(text) => text,
        Err(err) => return Ok(redirect_with("/feed", "error", &err.to_string())),
    };

    let keep_local = state.config.comments.create_mode == CreateMode::Local
        || drafts::post_exists(&state.db, &post_id)?;

    if keep_local {
        drafts::insert_comment(&state.db, &post_id, &user.user.id.to_string(), &text)?;
    } else if let Err(err) = state
        .api
        .add_comment(Some(&user.access_token), &post_id, &text, user.user.id)
        .await
    {
        return Ok(redirect_with("/feed", "error", &err.to_string()));
    }

    tracing::debug!("Comment added to post {}", post_id);
    Ok(Redirect::to("/feed"))
}

// --- View helpers ---

pub fn post_view(
    post: Post,
    remote_comments: Result<Vec<Comment>, ClientError>,
    local_comments: Vec<Comment>,
) -> PostView {
    let (mut comments, comments_error) = match remote_comments {
        Ok(comments) => (comments, None),
        Err(err) => {
            tracing::warn!("Comments for post {} failed to load: {}", post.id, err);
            (Vec::new(), Some("Could not load comments".to_string()))
        }
    };
    comments.extend(local_comments);

    PostView {
        author_initial: initial(&post.author_id),
        author_id: post.author_id,
        image_url: post.image_url,
        description: post.description,
        created_at: post
            .created_at
            .as_deref()
            .map(parse_and_format_time)
            .unwrap_or_default(),
        local: post.local,
        comments: comments.into_iter().map(comment_view).collect(),
        comments_error,
        id: post.id,
    }
}

fn comment_view(comment: Comment) -> CommentView {
    CommentView {
        author_initial: initial(&comment.author_id),
        author_id: comment.author_id,
        text: comment.text,
        created_at: comment
            .created_at
            .as_deref()
            .map(parse_and_format_time)
            .unwrap_or_default(),
    }
}

fn initial(author_id: &str) -> String {
    author_id
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

// --- Time formatting ---

/// Accepts RFC 3339 (the API) and SQLite's `datetime('now')` (local drafts).
fn parse_and_format_time(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return format_relative_time(&dt.with_timezone(&Utc).naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| format_relative_time(&dt))
        .unwrap_or_else(|_| raw.to_string())
}

pub fn format_relative_time(dt: &NaiveDateTime) -> String {
    let now = Utc::now().naive_utc();
    let diff = now.signed_duration_since(*dt);

    let seconds = diff.num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = diff.num_minutes();
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = diff.num_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = diff.num_days();
    if days < 7 {
        return format!("{}d ago", days);
    }

    dt.format("%b %-d, %Y").to_string()
}

// --- Tests ---
