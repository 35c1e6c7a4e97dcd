//! Password hashing and in-memory sessions.
//!
//! Hashes are salted SHA-256 stored as `salt:hex`. Sessions are opaque
//! UUID tokens carried in the `session` cookie and kept in process
//! memory, so a restart logs everyone out.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

const SESSION_COOKIE: &str = "session";

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);

    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{}:{}", salt, hex::encode(hasher.finalize()))
}

/// Check a password against a stored `salt:hash` value.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Some((salt, expected)) = password_hash.split_once(':') else {
        return false;
    };
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize()) == expected
}

/// In-memory session store: token → user id.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, i64>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return its token.
    pub async fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), user_id);
        token
    }

    /// Look up the user behind a token.
    pub async fn get(&self, token: &str) -> Option<i64> {
        self.sessions.read().await.get(token).copied()
    }

    /// Delete a session (logout).
    pub async fn delete(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}

/// Extract the session token from the Cookie header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("session=").map(str::to_string))
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session.
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

/// The logged-in user, when the request carries a live session.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<i64> {
    let token = session_token(headers)?;
    state.sessions.get(&token).await
}

/// The logged-in user, or 401.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<i64, AppError> {
    current_user(state, headers)
        .await
        .ok_or(AppError::Unauthorized)
}
