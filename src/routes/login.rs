// GET/POST /login, GET /logout

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{AppError, AppState};
use crate::auth::cookie;
use crate::forms::LoginForm;
use crate::views;

pub(super) async fn login_form() -> Html<String> {
    Html(views::login_page(None))
}

/// Success starts a session and redirects home; failure re-renders the form without a cookie.
pub(super) async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let (username, password) = match form.validate() {
        Ok(creds) => creds,
        Err(e) => return Ok(Html(views::login_page(Some(&e.to_string()))).into_response()),
    };
    let Some(user) = state.users.verify_credentials(&username, &password).await? else {
        tracing::info!(username = %username, "login failed");
        return Ok(Html(views::login_page(Some("Invalid username or password"))).into_response());
    };

    let token = state.sessions.create(user.id).await?;
    tracing::info!(username = %user.username, "login succeeded");
    let set_cookie = cookie::session_cookie(
        &state.config.auth.cookie_name,
        &token,
        state.config.auth.session_ttl_secs,
    );
    Ok(([(header::SET_COOKIE, set_cookie)], Redirect::to("/")).into_response())
}

pub(super) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let name = &state.config.auth.cookie_name;
    if let Some(token) = cookie::read_cookie(&headers, name) {
        state.sessions.delete(&token).await?;
    }
    Ok((
        [(header::SET_COOKIE, cookie::expired_cookie(name))],
        Redirect::to("/login"),
    )
        .into_response())
}
