// GET /wake/{device_id}

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use super::{AppError, AppState};
use crate::auth::CurrentUser;

/// Always redirects home; the outcome is reported as a flash notice.
pub(super) async fn wake(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(device_id): Path<i64>,
) -> Result<Redirect, AppError> {
    let outcome = state.wake.wake(&current.user, device_id).await?;
    state
        .sessions
        .set_flash(&current.token, &outcome.notice())
        .await?;
    Ok(Redirect::to("/"))
}
