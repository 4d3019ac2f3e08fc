pub mod assets;
pub mod auth;
pub mod feed;
pub mod home;
pub mod upload;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Every screen of the client plus its static assets.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/session", get(home::session_status))
        .route("/assets/{*path}", get(assets::serve))
        .merge(auth::router())
        .merge(feed::router())
        .merge(upload::router())
        .fallback(home::index)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
