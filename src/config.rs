use serde::Deserialize;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub wol: WolConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// How often expired sessions are purged from the store.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Seeded once when the users table is empty.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            session_ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            bootstrap_admin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

fn default_cookie_name() -> String {
    "wol_session".into()
}

fn default_session_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct WolConfig {
    #[serde(default = "default_broadcast_address")]
    pub broadcast_address: Ipv4Addr,
    #[serde(default = "default_wol_port")]
    pub port: u16,
    #[serde(default)]
    pub unresolved_interface: UnresolvedInterfacePolicy,
}

impl Default for WolConfig {
    fn default() -> Self {
        Self {
            broadcast_address: default_broadcast_address(),
            port: default_wol_port(),
            unresolved_interface: UnresolvedInterfacePolicy::default(),
        }
    }
}

fn default_broadcast_address() -> Ipv4Addr {
    Ipv4Addr::BROADCAST
}

fn default_wol_port() -> u16 {
    9
}

/// What to do when a device's interface has no IPv4 address at send time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedInterfacePolicy {
    /// Report and send nothing.
    #[default]
    Skip,
    /// Send anyway without binding a source address.
    Broadcast,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_true")]
    pub admin_panel: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self { admin_panel: true }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            !self.auth.cookie_name.is_empty()
                && self
                    .auth
                    .cookie_name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
            "auth.cookie_name must be a non-empty token of [A-Za-z0-9_-], got {:?}",
            self.auth.cookie_name
        );
        anyhow::ensure!(
            self.auth.session_ttl_secs > 0,
            "auth.session_ttl_secs must be > 0, got {}",
            self.auth.session_ttl_secs
        );
        anyhow::ensure!(
            self.auth.sweep_interval_secs > 0,
            "auth.sweep_interval_secs must be > 0, got {}",
            self.auth.sweep_interval_secs
        );
        if let Some(admin) = &self.auth.bootstrap_admin {
            anyhow::ensure!(
                !admin.username.trim().is_empty(),
                "auth.bootstrap_admin.username must be non-empty"
            );
            anyhow::ensure!(
                !admin.password.is_empty(),
                "auth.bootstrap_admin.password must be non-empty"
            );
        }
        anyhow::ensure!(
            self.wol.port > 0,
            "wol.port must be between 1 and 65535, got {}",
            self.wol.port
        );
        Ok(())
    }
}
