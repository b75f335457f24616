// One-time seeding at startup: create the configured admin when no user exists yet.

use crate::config::BootstrapAdmin;
use crate::models::{Capabilities, NewUser};
use crate::user_repo::UserRepo;
use tracing::info;

/// Returns true when an admin was created.
pub async fn seed_admin(users: &UserRepo, admin: Option<&BootstrapAdmin>) -> anyhow::Result<bool> {
    let Some(admin) = admin else {
        return Ok(false);
    };
    if users.count().await? > 0 {
        return Ok(false);
    }
    users
        .create(&NewUser {
            username: admin.username.trim().to_string(),
            password: admin.password.clone(),
            capabilities: Capabilities::all(),
        })
        .await?;
    info!(username = %admin.username, "bootstrap admin created");
    Ok(true)
}
