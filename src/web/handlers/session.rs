//! Cookie-backed server-side sessions.
//!
//! The cookie carries a random token; only its SHA-256 hash is stored, and the
//! hash is what a presented cookie is looked up by.

use anyhow::{Context, Result};
use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use std::time::SystemTime;

use crate::store::{Role, SessionRecord, UserStore};
use crate::web::WebConfig;

pub const SESSION_COOKIE_NAME: &str = "acceso_session";

/// The session attached to the current request. The role recorded at login
/// stays in the store; pages read the role from the user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token_hash: Vec<u8>,
    pub usuario: String,
}

impl Session {
    pub(crate) fn token_hash(&self) -> &[u8] {
        &self.token_hash
    }
}

/// Resolve the request's session cookie, if present and not expired.
///
/// # Errors
/// Returns an error if the store lookup fails.
pub async fn current_session(
    headers: &HeaderMap,
    store: &dyn UserStore,
) -> Result<Option<Session>> {
    let Some(token) = extract_session_token(headers) else {
        return Ok(None);
    };
    let token_hash = hash_session_token(&token);
    let record = store
        .lookup_session(&token_hash, now_unix_seconds())
        .await?;

    Ok(record.map(|record| Session {
        token_hash,
        usuario: record.usuario,
    }))
}

/// Persist a new session for `usuario` and return the raw cookie token.
///
/// # Errors
/// Returns an error if the token cannot be generated or stored.
pub async fn start_session(
    store: &dyn UserStore,
    usuario: &str,
    rol: Role,
    ttl_seconds: i64,
) -> Result<String> {
    let token = generate_session_token()?;
    let record = SessionRecord {
        usuario: usuario.to_string(),
        rol,
        expires_at_unix: now_unix_seconds().saturating_add(ttl_seconds),
    };
    store
        .insert_session(&hash_session_token(&token), &record)
        .await?;
    Ok(token)
}

/// Build the `HttpOnly` cookie for a session token.
pub fn session_cookie(config: &WebConfig, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_session_cookie(config: &WebConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            let val = val.trim();
            if key.trim() == SESSION_COOKIE_NAME && !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

pub(crate) fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

pub(crate) fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
