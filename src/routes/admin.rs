// GET/POST /admin (admin only)

use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{AppError, AppState};
use crate::auth::CurrentUser;
use crate::forms::UserForm;
use crate::user_repo::UserRepoError;
use crate::views;

async fn deny(state: &AppState, current: &CurrentUser) -> Result<Response, AppError> {
    tracing::warn!(user = %current.user.username, "admin access denied");
    state
        .sessions
        .set_flash(&current.token, "Admin access required")
        .await?;
    Ok(Redirect::to("/").into_response())
}

pub(super) async fn admin_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, AppError> {
    if !current.user.capabilities.is_admin {
        return deny(&state, &current).await;
    }
    let users = state.users.list().await?;
    let flash = state.sessions.take_flash(&current.token).await?;
    Ok(Html(views::admin_page(&current.user, &users, flash.as_deref())).into_response())
}

pub(super) async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    if !current.user.capabilities.is_admin {
        return deny(&state, &current).await;
    }
    let notice = match form.validate() {
        Err(e) => e.to_string(),
        Ok(new_user) => match state.users.create(&new_user).await {
            Ok(user) => {
                tracing::info!(username = %user.username, by = %current.user.username, "user created");
                format!("User {} created", user.username)
            }
            Err(e @ UserRepoError::UsernameTaken(_)) => e.to_string(),
            Err(UserRepoError::Other(e)) => return Err(e.into()),
        },
    };
    state.sessions.set_flash(&current.token, &notice).await?;
    Ok(Redirect::to("/admin").into_response())
}
