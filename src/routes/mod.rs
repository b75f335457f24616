// HTTP routes

mod admin;
mod devices;
mod http;
mod login;
mod wake;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::device_repo::DeviceRepo;
use crate::interfaces::InterfaceSource;
use crate::session_repo::SessionRepo;
use crate::user_repo::UserRepo;
use crate::wol::{MagicPacketSender, WakeService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserRepo>,
    pub devices: Arc<DeviceRepo>,
    pub sessions: Arc<SessionRepo>,
    pub interfaces: Arc<dyn InterfaceSource>,
    pub wake: Arc<WakeService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        interfaces: Arc<dyn InterfaceSource>,
        sender: Arc<dyn MagicPacketSender>,
        config: AppConfig,
    ) -> Self {
        let devices = Arc::new(DeviceRepo::new(pool.clone()));
        let wake = Arc::new(WakeService::new(
            devices.clone(),
            interfaces.clone(),
            sender,
            config.wol.unresolved_interface,
        ));
        Self {
            users: Arc::new(UserRepo::new(pool.clone())),
            sessions: Arc::new(SessionRepo::new(pool, config.auth.session_ttl_secs)),
            devices,
            interfaces,
            wake,
            config,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(devices::index)) // GET /
        .route("/add", post(devices::add)) // POST /add
        .route("/wake/{device_id}", get(wake::wake)) // GET /wake/<id>
        .route("/login", get(login::login_form).post(login::login)) // GET/POST /login
        .route("/logout", get(login::logout)) // GET /logout
        .route("/version", get(http::version_handler)); // GET /version
    if state.config.features.admin_panel {
        router = router.route("/admin", get(admin::admin_page).post(admin::create_user)); // GET/POST /admin
    }
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Storage failure inside a handler. Logged and answered with a bare 500.
pub(crate) struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        AppError(e.into())
    }
}
