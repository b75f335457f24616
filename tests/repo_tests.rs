// UserRepo, DeviceRepo and SessionRepo against a throw-away SQLite file

use std::sync::Arc;
use tempfile::TempDir;
use wolconsole::bootstrap;
use wolconsole::config::BootstrapAdmin;
use wolconsole::device_repo::DeviceRepo;
use wolconsole::models::{Capabilities, NewDevice, NewUser};
use wolconsole::session_repo::SessionRepo;
use wolconsole::user_repo::{UserRepo, UserRepoError};

async fn test_pool(dir: &TempDir) -> sqlx::SqlitePool {
    let path = dir.path().join("devices.db");
    let pool = wolconsole::db::connect(path.to_str().unwrap(), 4).await.unwrap();
    wolconsole::db::init(&pool).await.unwrap();
    pool
}

async fn expire_session(pool: &sqlx::SqlitePool, token: &str) {
    sqlx::query("UPDATE sessions SET expires_at = 0 WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await
        .unwrap();
}

fn new_user(username: &str, password: &str) -> NewUser {
    NewUser {
        username: username.into(),
        password: password.into(),
        capabilities: Capabilities {
            is_admin: false,
            can_add_devices: true,
            can_send_wol: false,
        },
    }
}

#[tokio::test]
async fn db_init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir).await;
    wolconsole::db::init(&pool).await.unwrap();
}

#[tokio::test]
async fn db_connect_creates_parent_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/devices.db");
    let pool = wolconsole::db::connect(path.to_str().unwrap(), 1).await.unwrap();
    wolconsole::db::init(&pool).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn user_create_stores_hash_not_plaintext() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir).await;
    let users = UserRepo::new(pool.clone());

    let user = users.create(&new_user("alice", "s3cret")).await.unwrap();
    assert!(user.id > 0);
    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(stored, "s3cret");
    assert!(stored.starts_with("$argon2"));

    let loaded = users.get(user.id).await.unwrap().unwrap();
    assert_eq!(loaded.username, "alice");
    assert!(loaded.capabilities.can_add_devices);
    assert!(!loaded.capabilities.can_send_wol);
}

#[tokio::test]
async fn user_verify_credentials() {
    let dir = TempDir::new().unwrap();
    let users = UserRepo::new(test_pool(&dir).await);
    users.create(&new_user("alice", "s3cret")).await.unwrap();

    let ok = users.verify_credentials("alice", "s3cret").await.unwrap();
    assert_eq!(ok.map(|u| u.username).as_deref(), Some("alice"));
    assert!(users.verify_credentials("alice", "wrong").await.unwrap().is_none());
    assert!(users.verify_credentials("bob", "s3cret").await.unwrap().is_none());
    assert!(users.verify_credentials("ALICE", "s3cret").await.unwrap().is_none());
}

#[tokio::test]
async fn user_unknown_name_rejected_even_with_dummy_password() {
    let dir = TempDir::new().unwrap();
    let users = UserRepo::new(test_pool(&dir).await);
    assert!(
        users
            .verify_credentials("ghost", "wolconsole-dummy-password")
            .await
            .unwrap()
            .is_none()
    );
    assert!(users.verify_credentials("ghost", "").await.unwrap().is_none());
}

#[tokio::test]
async fn user_duplicate_username_rejected() {
    let dir = TempDir::new().unwrap();
    let users = UserRepo::new(test_pool(&dir).await);
    users.create(&new_user("alice", "a")).await.unwrap();
    let err = users.create(&new_user("alice", "b")).await.unwrap_err();
    assert!(matches!(err, UserRepoError::UsernameTaken(ref name) if name == "alice"));
    assert_eq!(users.count().await.unwrap(), 1);
    // The first password still works.
    assert!(users.verify_credentials("alice", "a").await.unwrap().is_some());
}

#[tokio::test]
async fn user_list_in_creation_order() {
    let dir = TempDir::new().unwrap();
    let users = UserRepo::new(test_pool(&dir).await);
    users.create(&new_user("zed", "x")).await.unwrap();
    users.create(&new_user("amy", "x")).await.unwrap();
    let names: Vec<String> = users.list().await.unwrap().into_iter().map(|u| u.username).collect();
    assert_eq!(names, vec!["zed", "amy"]);
}

#[tokio::test]
async fn device_add_then_list_returns_row() {
    let dir = TempDir::new().unwrap();
    let devices = DeviceRepo::new(test_pool(&dir).await);
    assert!(devices.list().await.unwrap().is_empty());

    let added = devices
        .add(&NewDevice {
            name: "NAS".into(),
            mac: "00:11:22:33:44:55".into(),
            interface: "eth0".into(),
        })
        .await
        .unwrap();

    let list = devices.list().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0], added);
    assert_eq!(list[0].name, "NAS");
    assert_eq!(list[0].mac, "00:11:22:33:44:55");
    assert_eq!(list[0].interface, "eth0");
    assert_eq!(devices.get(added.id).await.unwrap(), Some(added));
    assert_eq!(devices.get(9999).await.unwrap(), None);
}

#[tokio::test]
async fn device_concurrent_adds_get_distinct_ids() {
    let dir = TempDir::new().unwrap();
    let devices = Arc::new(DeviceRepo::new(test_pool(&dir).await));

    let mut handles = Vec::new();
    for i in 0..8 {
        let devices = devices.clone();
        handles.push(tokio::spawn(async move {
            devices
                .add(&NewDevice {
                    name: format!("host{i}"),
                    mac: format!("00:11:22:33:44:{i:02X}"),
                    interface: "eth0".into(),
                })
                .await
                .unwrap()
                .id
        }));
    }
    let mut ids = Vec::new();
    for h in handles {
        ids.push(h.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(devices.list().await.unwrap().len(), 8);
}

#[tokio::test]
async fn session_create_lookup_delete() {
    let dir = TempDir::new().unwrap();
    let sessions = SessionRepo::new(test_pool(&dir).await, 3600);

    let token = sessions.create(42).await.unwrap();
    assert!(!token.is_empty());
    assert_eq!(sessions.user_id_for(&token).await.unwrap(), Some(42));
    assert_eq!(sessions.user_id_for("nope").await.unwrap(), None);

    let other = sessions.create(42).await.unwrap();
    assert_ne!(token, other);

    sessions.delete(&token).await.unwrap();
    assert_eq!(sessions.user_id_for(&token).await.unwrap(), None);
    assert_eq!(sessions.user_id_for(&other).await.unwrap(), Some(42));
}

#[tokio::test]
async fn session_flash_is_one_shot() {
    let dir = TempDir::new().unwrap();
    let sessions = SessionRepo::new(test_pool(&dir).await, 3600);
    let token = sessions.create(1).await.unwrap();

    assert_eq!(sessions.take_flash(&token).await.unwrap(), None);
    sessions.set_flash(&token, "first").await.unwrap();
    sessions.set_flash(&token, "second").await.unwrap();
    assert_eq!(sessions.take_flash(&token).await.unwrap().as_deref(), Some("second"));
    assert_eq!(sessions.take_flash(&token).await.unwrap(), None);

    sessions.set_flash(&token, "hello").await.unwrap();
    assert_eq!(sessions.take_flash(&token).await.unwrap().as_deref(), Some("hello"));
    assert_eq!(sessions.take_flash("unknown").await.unwrap(), None);
}

#[tokio::test]
async fn session_expired_not_honoured_and_purged() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir).await;
    let sessions = SessionRepo::new(pool.clone(), 3600);
    let live = sessions.create(1).await.unwrap();
    let stale = sessions.create(2).await.unwrap();
    expire_session(&pool, &stale).await;

    assert_eq!(sessions.user_id_for(&stale).await.unwrap(), None);
    assert_eq!(sessions.purge_expired().await.unwrap(), 1);
    assert_eq!(sessions.purge_expired().await.unwrap(), 0);
    assert_eq!(sessions.user_id_for(&live).await.unwrap(), Some(1));
}

#[tokio::test]
async fn bootstrap_seeds_admin_once() {
    let dir = TempDir::new().unwrap();
    let users = UserRepo::new(test_pool(&dir).await);
    let admin = BootstrapAdmin {
        username: "admin".into(),
        password: "change-me".into(),
    };

    assert!(!bootstrap::seed_admin(&users, None).await.unwrap());
    assert!(bootstrap::seed_admin(&users, Some(&admin)).await.unwrap());
    assert!(!bootstrap::seed_admin(&users, Some(&admin)).await.unwrap());
    assert_eq!(users.count().await.unwrap(), 1);

    let user = users
        .verify_credentials("admin", "change-me")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.capabilities, Capabilities::all());
}

#[tokio::test]
async fn bootstrap_skipped_when_users_exist() {
    let dir = TempDir::new().unwrap();
    let users = UserRepo::new(test_pool(&dir).await);
    users.create(&new_user("alice", "pw")).await.unwrap();
    let admin = BootstrapAdmin {
        username: "admin".into(),
        password: "change-me".into(),
    };
    assert!(!bootstrap::seed_admin(&users, Some(&admin)).await.unwrap());
    assert!(users.verify_credentials("admin", "change-me").await.unwrap().is_none());
}

#[tokio::test]
async fn session_sweeper_purges_and_stops() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir).await;
    let sessions = Arc::new(SessionRepo::new(pool.clone(), 3600));
    let live = sessions.create(1).await.unwrap();
    let stale = sessions.create(2).await.unwrap();
    expire_session(&pool, &stale).await;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = wolconsole::session_sweeper::spawn(sessions.clone(), 3600, shutdown_rx);
    // The first interval tick fires immediately.
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(3);
    loop {
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
        if remaining == 1 {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline, "sweeper did not run");
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(sessions.user_id_for(&live).await.unwrap(), Some(1));

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(3), handle)
        .await
        .expect("sweeper stops on shutdown")
        .unwrap();
}
