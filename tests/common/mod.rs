// Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wolconsole::config::AppConfig;
use wolconsole::interfaces::StaticInterfaces;
use wolconsole::models::{Capabilities, NetworkInterface, NewUser, User};
use wolconsole::routes::{self, AppState};
use wolconsole::wol::{MAGIC_PACKET_LEN, MagicPacketSender, WolError};

pub const TEST_CONFIG: &str = r#"
[server]
port = 5000
host = "127.0.0.1"

[database]
path = "data/test.db"
max_pool_size = 4

[auth]
cookie_name = "wol_session"
session_ttl_secs = 3600
sweep_interval_secs = 60
"#;

pub fn test_app_config() -> AppConfig {
    AppConfig::load_from_str(TEST_CONFIG).unwrap()
}

pub const ETH0_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 10);

/// eth0 with an address, docker0 without.
pub fn test_interfaces() -> StaticInterfaces {
    StaticInterfaces::new(vec![
        NetworkInterface {
            name: "eth0".into(),
            ipv4: Some(ETH0_IP),
        },
        NetworkInterface {
            name: "docker0".into(),
            ipv4: None,
        },
    ])
}

/// Records packets instead of touching the network. Fails every send when `fail` is set.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<([u8; MAGIC_PACKET_LEN], Option<Ipv4Addr>)>>,
    pub fail: bool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MagicPacketSender for RecordingSender {
    async fn send(
        &self,
        packet: &[u8; MAGIC_PACKET_LEN],
        source: Option<Ipv4Addr>,
    ) -> Result<(), WolError> {
        if self.fail {
            return Err(WolError::Transport(std::io::Error::new(
                std::io::ErrorKind::NetworkUnreachable,
                "no route to host",
            )));
        }
        self.sent.lock().unwrap().push((*packet, source));
        Ok(())
    }
}

pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub sender: Arc<RecordingSender>,
    pub router: axum::Router,
}

pub async fn test_app_with(config: AppConfig) -> TestApp {
    test_app_with_sender(config, Arc::new(RecordingSender::default())).await
}

pub async fn test_app_with_sender(config: AppConfig, sender: Arc<RecordingSender>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("devices.db");
    let pool = wolconsole::db::connect(path.to_str().unwrap(), config.database.max_pool_size)
        .await
        .unwrap();
    wolconsole::db::init(&pool).await.unwrap();
    let state = AppState::new(pool, Arc::new(test_interfaces()), sender.clone(), config);
    let router = routes::app(state.clone());
    TestApp {
        dir,
        state,
        sender,
        router,
    }
}

pub async fn test_app() -> TestApp {
    test_app_with(test_app_config()).await
}

impl TestApp {
    pub async fn create_user(&self, username: &str, password: &str, caps: Capabilities) -> User {
        self.state
            .users
            .create(&NewUser {
                username: username.into(),
                password: password.into(),
                capabilities: caps,
            })
            .await
            .unwrap()
    }

    /// A server with its own cookie jar (one per simulated browser).
    pub fn server(&self) -> TestServer {
        TestServer::builder()
            .save_cookies()
            .build(self.router.clone())
    }

    /// A server whose cookie jar holds a session for `username`.
    pub async fn logged_in(&self, username: &str, password: &str) -> TestServer {
        let server = self.server();
        let response = server
            .post("/login")
            .form(&[("username", username), ("password", password)])
            .await;
        assert_eq!(response.status_code(), axum::http::StatusCode::SEE_OTHER);
        server
    }
}
