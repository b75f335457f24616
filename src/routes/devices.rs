// GET / and POST /add

use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};

use super::{AppError, AppState};
use crate::auth::CurrentUser;
use crate::forms::DeviceForm;
use crate::views::{self, IndexView};

/// Device list, interface table and (capability permitting) the add form.
pub(super) async fn index(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Html<String>, AppError> {
    let devices = state.devices.list().await?;
    let interfaces = state.interfaces.list().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "interface enumeration failed");
        Vec::new()
    });
    let flash = state.sessions.take_flash(&current.token).await?;
    Ok(Html(views::index_page(&IndexView {
        user: &current.user,
        devices: &devices,
        interfaces: &interfaces,
        flash: flash.as_deref(),
        admin_panel: state.config.features.admin_panel,
    })))
}

pub(super) async fn add(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<DeviceForm>,
) -> Result<Redirect, AppError> {
    if !current.user.capabilities.can_add_devices {
        tracing::warn!(user = %current.user.username, "add device denied: missing can_add_devices");
        state
            .sessions
            .set_flash(&current.token, "You are not allowed to add devices")
            .await?;
        return Ok(Redirect::to("/"));
    }
    let new_device = match form.validate() {
        Ok(d) => d,
        Err(e) => {
            state.sessions.set_flash(&current.token, &e.to_string()).await?;
            return Ok(Redirect::to("/"));
        }
    };
    let device = state.devices.add(&new_device).await?;
    tracing::info!(id = device.id, name = %device.name, user = %current.user.username, "device added");
    state
        .sessions
        .set_flash(&current.token, &format!("Device {} added", device.name))
        .await?;
    Ok(Redirect::to("/"))
}
