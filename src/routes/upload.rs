use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::config::CreateMode;
use crate::db::drafts;
use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::routes::home::Html;
use crate::state::AppState;
use crate::validation::{self, MAX_DESCRIPTION_LEN};

#[derive(Template)]
#[template(path = "pages/upload.html")]
pub struct UploadTemplate {
    pub image_url: String,
    pub description: String,
    pub error: Option<String>,
    pub max_len: usize,
}

impl UploadTemplate {
    fn blank() -> Self {
        Self {
            image_url: String::new(),
            description: String::new(),
            error: None,
            max_len: MAX_DESCRIPTION_LEN,
        }
    }
}

#[derive(Deserialize)]
pub struct UploadForm {
    pub image_url: String,
    pub description: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/upload", get(upload_page).post(upload_submit))
}

async fn upload_page(_user: CurrentUser) -> Html<UploadTemplate> {
    Html(UploadTemplate::blank())
}

async fn upload_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<UploadForm>,
) -> AppResult<Response> {
    let retry = |error: String| {
        Html(UploadTemplate {
            image_url: form.image_url.clone(),
            description: form.description.clone(),
            error: Some(error),
            max_len: MAX_DESCRIPTION_LEN,
        })
        .into_response()
    };

    let (image_url, description) = match validation::validate_post(&form.image_url, &form.description) {
        Ok(fields) => fields,
        Err(err) => return Ok(retry(err.to_string())),
    };

    match state.config.posts.create_mode {
        CreateMode::Local => {
            let post = drafts::insert_post(
                &state.db,
                &user.user.id.to_string(),
                &image_url,
                &description,
            )?;
            tracing::info!("Saved local post {}", post.id);
        }
        CreateMode::Remote => {
            match state
                .api
                .create_post(Some(&user.access_token), user.user.id, &image_url, &description)
                .await
            {
                Ok(post) => tracing::info!("Created post {}", post.id),
                Err(err) => return Ok(retry(err.to_string())),
            }
        }
    }

    Ok(Redirect::to("/feed").into_response())
}
