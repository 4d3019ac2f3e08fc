use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

use crate::session::AuthSnapshot;
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// `GET /` and unknown paths.
pub async fn index(State(state): State<AppState>) -> Redirect {
    Redirect::to(state.config.app.default_route.path())
}

/// `GET /session`, the controller snapshot as JSON.
pub async fn session_status(State(state): State<AppState>) -> Json<AuthSnapshot> {
    Json(state.session.snapshot().await)
}

/// Redirect to `path` carrying one `key=value` query pair.
pub fn redirect_with(path: &str, key: &str, value: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    Redirect::to(&format!("{}?{}", path, query))
}
