// User accounts and their capability flags

/// Per-user permission flags. Each gates exactly one action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub is_admin: bool,
    pub can_add_devices: bool,
    pub can_send_wol: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            is_admin: true,
            can_add_devices: true,
            can_send_wol: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub capabilities: Capabilities,
}

/// A user to be created. `password` is plaintext and only lives until hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub capabilities: Capabilities,
}
