use askama::Template;
use axum::extract::{Path, Query, RawQuery, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::api::models::{LoginCredentials, Registration};
use crate::error::{AppError, AppResult};
use crate::routes::home::Html;
use crate::session::oauth::{self, Provider};
use crate::state::AppState;
use crate::validation::MIN_PASSWORD_LEN;

pub const REGISTERED_NOTICE: &str = "Registration successful! Please login.";
pub const OAUTH_FAILED: &str = "OAuth login failed.";

// -- Templates --

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub is_loading: bool,
}

#[derive(Template)]
#[template(path = "pages/register.html")]
pub struct RegisterTemplate {
    pub username: String,
    pub email: String,
    pub error: Option<String>,
    pub min_password_len: usize,
}

#[derive(Template)]
#[template(path = "pages/oauth_callback.html")]
pub struct OAuthCallbackTemplate;

// -- Forms --

#[derive(Deserialize, Default)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub registered: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/register", get(register_page).post(register_submit))
        .route("/logout", post(logout))
        .route("/auth/{provider}", get(oauth_start))
        .route("/oauth-callback", get(oauth_callback_page))
        .route("/oauth-callback/complete", get(oauth_callback_complete))
}

// -- Login --

async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Response {
    let snapshot = state.session.snapshot().await;
    if snapshot.is_authenticated {
        return Redirect::to("/feed").into_response();
    }

    let error = match query.error.as_deref() {
        Some("oauth") => Some(OAUTH_FAILED.to_string()),
        _ => snapshot.error,
    };
    let notice = query
        .registered
        .is_some()
        .then(|| REGISTERED_NOTICE.to_string());

    Html(LoginTemplate {
        email: String::new(),
        error,
        notice,
        is_loading: snapshot.is_loading,
    })
    .into_response()
}

async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if state.session.snapshot().await.is_authenticated {
        return Redirect::to("/feed").into_response();
    }
    state.session.clear_error().await;

    let outcome = state
        .session
        .login(LoginCredentials {
            email: form.email.clone(),
            password: form.password,
        })
        .await;

    if outcome.success {
        return Redirect::to("/feed").into_response();
    }

    Html(LoginTemplate {
        email: form.email,
        error: outcome.error,
        notice: None,
        is_loading: false,
    })
    .into_response()
}

async fn logout(State(state): State<AppState>) -> Redirect {
    state.session.logout().await;
    Redirect::to("/login")
}

// -- Register --

async fn register_page() -> Html<RegisterTemplate> {
    Html(RegisterTemplate {
        username: String::new(),
        email: String::new(),
        error: None,
        min_password_len: MIN_PASSWORD_LEN,
    })
}

async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let result = state
        .session
        .register(Registration {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password,
        })
        .await;

    match result {
        Ok(_) => Redirect::to("/login?registered=1").into_response(),
        Err(err) => Html(RegisterTemplate {
            username: form.username,
            email: form.email,
            error: Some(err.to_string()),
            min_password_len: MIN_PASSWORD_LEN,
        })
        .into_response(),
    }
}

// -- OAuth --

/// `GET /auth/{provider}`: hand the browser to the API's provider flow.
async fn oauth_start(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> AppResult<Redirect> {
    let provider = Provider::from_slug(&provider).ok_or(AppError::NotFound)?;
    Ok(Redirect::to(&state.api.url(&provider.start_path())))
}

/// Fragments never reach the server, so this page forwards it as a query.
async fn oauth_callback_page() -> Html<OAuthCallbackTemplate> {
    Html(OAuthCallbackTemplate)
}

async fn oauth_callback_complete(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Redirect> {
    let session = match oauth::parse_fragment(query.as_deref().unwrap_or("")) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("{}", e);
            return Ok(Redirect::to("/login?error=oauth"));
        }
    };

    state.session.adopt(session).await?;
    tracing::info!("Signed in through OAuth");
    Ok(Redirect::to("/feed"))
}
