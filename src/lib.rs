//! # Acceso
//!
//! `acceso` is a small credential login service: users register with a
//! username, password and role, log in to get a server-side session, and land
//! on a page that shows administrators the full list of users.
//!
//! ## Storage
//!
//! Users live in the `usuarios` table and sessions in `sesiones`. The backend
//! is picked from the DSN scheme (`postgres://` or `sqlite:`), and the schema is
//! created on startup when missing.
//!
//! ## Sessions
//!
//! A login issues a random token in the `acceso_session` cookie. Only the
//! SHA-256 hash of the token is stored, together with the username, the role
//! at login time and an absolute expiry.
//!
//! ## Passwords
//!
//! Passwords are stored as Argon2id PHC strings and verified in constant time.

pub mod accounts;
pub mod cli;
pub mod store;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
