use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;

use crate::db::models::SessionUser;
use crate::state::AppState;

/// The signed-in user plus the token to forward to the API.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: SessionUser,
    pub access_token: String,
}

/// Route guard: redirects to `/login` when nobody is signed in.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.session.session().await;
        match session.user {
            Some(user) if session.authenticated => Ok(CurrentUser {
                user,
                access_token: session.access_token,
            }),
            _ => Err(Redirect::to("/login")),
        }
    }
}

/// Optional user extractor, `None` for guests.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            CurrentUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
