// Argon2id password hashing (PHC string format, random salt per hash).

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use once_cell::sync::Lazy;

/// Hash checked when the username is unknown, so a miss costs the same as a wrong password.
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password("wolconsole-dummy-password").unwrap_or_default());

pub fn dummy_hash() -> &'static str {
    &DUMMY_HASH
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("argon2 hash: {}", e))
}

/// False for a wrong password and for a stored hash that does not parse.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
