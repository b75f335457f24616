// Request-scoped identity. Resolved once per request from the session cookie;
// handlers receive the user and its capability flags explicitly.

pub mod cookie;

use crate::models::User;
use crate::routes::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};

pub struct CurrentUser {
    pub user: User,
    /// Session token, used for flash notices and logout.
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let to_login = || Redirect::to("/login").into_response();

        let Some(token) = cookie::read_cookie(&parts.headers, &state.config.auth.cookie_name)
        else {
            return Err(to_login());
        };
        let user_id = match state.sessions.user_id_for(&token).await {
            Ok(Some(id)) => id,
            Ok(None) => return Err(to_login()),
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed");
                return Err(to_login());
            }
        };
        match state.users.get(user_id).await {
            Ok(Some(user)) => Ok(CurrentUser { user, token }),
            Ok(None) => Err(to_login()),
            Err(e) => {
                tracing::error!(error = %e, "user lookup failed");
                Err(to_login())
            }
        }
    }
}
