//! Registration and credential checks over a [`UserStore`].

pub mod password;

use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::store::{InsertOutcome, NewUser, Role, UserRecord, UserStore};

pub use self::password::PasswordHasher;

#[derive(Debug)]
pub enum RegisterOutcome {
    Created(UserRecord),
    Duplicate,
}

#[derive(Clone)]
pub struct Accounts {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    // Verified against when the username is unknown so both failure paths do
    // the same amount of work.
    decoy_hash: Option<String>,
}

impl Accounts {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        let decoy_hash = hasher
            .hash(&SecretString::from("acceso-decoy".to_string()))
            .ok();
        Self {
            store,
            hasher,
            decoy_hash,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Create a user unless the username is taken.
    ///
    /// # Errors
    /// Returns an error if hashing or the store fails.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<RegisterOutcome> {
        if self.store.find_by_username(username).await?.is_some() {
            debug!("username already registered");
            return Ok(RegisterOutcome::Duplicate);
        }

        let password_hash = self.hasher.hash(password)?;

        // A concurrent registration can still win between the check above and
        // this insert; the unique constraint settles it.
        match self
            .store
            .insert_user(NewUser {
                username,
                password_hash: &password_hash,
                role,
            })
            .await?
        {
            InsertOutcome::Created(record) => Ok(RegisterOutcome::Created(record)),
            InsertOutcome::Duplicate => Ok(RegisterOutcome::Duplicate),
        }
    }

    /// # Errors
    /// Returns an error if the store fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        self.store.find_by_username(username).await
    }

    /// Returns the user only when both username and password match.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<UserRecord>> {
        let Some(record) = self.store.find_by_username(username).await? else {
            if let Some(decoy) = &self.decoy_hash {
                let _ = self.hasher.verify(password, decoy);
            }
            return Ok(None);
        };

        if self.hasher.verify(password, &record.password_hash) {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// # Errors
    /// Returns an error if the store fails.
    pub async fn list_all(&self) -> Result<Vec<UserRecord>> {
        self.store.list_users().await
    }
}
