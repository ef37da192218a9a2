//! SQLite backend, used for single-node deployments and the test suite.

use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use std::str::FromStr;

use super::{PoolOptions, UserStore, queries::impl_user_store, schema::SQLITE_SCHEMA_SQL};

#[derive(Clone, Debug)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Open (creating if missing) the database named by `dsn`.
    ///
    /// An in-memory database lives inside a single connection, so `:memory:`
    /// DSNs get a pool of one connection that is never recycled.
    ///
    /// # Errors
    /// Returns an error if the DSN is invalid or the pool cannot connect.
    pub async fn connect(dsn: &str, options: PoolOptions) -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(dsn)
            .context("invalid SQLite DSN")?
            .create_if_missing(true);

        let pool_options = if dsn.contains(":memory:") {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(options.max_connections)
                .max_lifetime(options.max_lifetime)
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    /// Fresh in-memory store with the schema applied.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn in_memory() -> Result<Self> {
        let store = Self::connect("sqlite::memory:", PoolOptions::default()).await?;
        store.ensure_schema().await?;
        Ok(store)
    }
}

impl_user_store!(SqliteUserStore, SqliteRow, system = "sqlite", schema = SQLITE_SCHEMA_SQL);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InsertOutcome, NewUser, Role, SessionRecord};

    fn new_user<'a>(username: &'a str, role: Role) -> NewUser<'a> {
        NewUser {
            username,
            password_hash: "hash",
            role,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() -> Result<()> {
        let store = SqliteUserStore::in_memory().await?;

        let InsertOutcome::Created(alice) = store.insert_user(new_user("alice", Role::User)).await?
        else {
            panic!("alice should be created");
        };
        let InsertOutcome::Created(bob) = store.insert_user(new_user("bob", Role::Admin)).await?
        else {
            panic!("bob should be created");
        };

        assert!(bob.id > alice.id);
        assert_eq!(alice.role, Role::User);
        assert_eq!(bob.role, Role::Admin);
        Ok(())
    }

    #[tokio::test]
    async fn unique_constraint_reports_duplicate() -> Result<()> {
        let store = SqliteUserStore::in_memory().await?;
        store.insert_user(new_user("alice", Role::User)).await?;

        // No pre-check here: the constraint alone must reject the row.
        let outcome = store.insert_user(new_user("alice", Role::Admin)).await?;
        assert!(matches!(outcome, InsertOutcome::Duplicate));

        let users = store.list_users().await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::User);
        Ok(())
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() -> Result<()> {
        let store = SqliteUserStore::in_memory().await?;
        store.insert_user(new_user("alice", Role::User)).await?;

        let outcome = store.insert_user(new_user("Alice", Role::User)).await?;
        assert!(matches!(outcome, InsertOutcome::Created(_)));
        assert!(store.find_by_username("ALICE").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn list_users_in_insertion_order() -> Result<()> {
        let store = SqliteUserStore::in_memory().await?;
        for name in ["carol", "alice", "bob"] {
            store.insert_user(new_user(name, Role::User)).await?;
        }

        let names: Vec<String> = store
            .list_users()
            .await?
            .into_iter()
            .map(|record| record.username)
            .collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
        Ok(())
    }

    #[tokio::test]
    async fn legacy_role_default_reads_as_user() -> Result<()> {
        let store = SqliteUserStore::in_memory().await?;
        sqlx::query(
            "INSERT INTO usuarios (username, password, role) VALUES ('old', 'x', 'usuario')",
        )
        .execute(&store.pool)
        .await?;

        let record = store.find_by_username("old").await?;
        assert_eq!(record.map(|record| record.role), Some(Role::User));
        Ok(())
    }

    #[tokio::test]
    async fn sessions_expire_and_purge() -> Result<()> {
        let store = SqliteUserStore::in_memory().await?;
        store.insert_user(new_user("alice", Role::User)).await?;

        let live = SessionRecord {
            usuario: "alice".to_string(),
            rol: Role::User,
            expires_at_unix: 2_000,
        };
        let stale = SessionRecord {
            expires_at_unix: 500,
            ..live.clone()
        };
        store.insert_session(b"live", &live).await?;
        store.insert_session(b"stale", &stale).await?;

        assert_eq!(store.lookup_session(b"live", 1_000).await?, Some(live));
        assert_eq!(store.lookup_session(b"stale", 1_000).await?, None);

        assert_eq!(store.purge_expired_sessions(1_000).await?, 1);
        assert!(store.lookup_session(b"live", 1_000).await?.is_some());

        store.delete_session(b"live").await?;
        assert_eq!(store.lookup_session(b"live", 1_000).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn ping_succeeds() -> Result<()> {
        let store = SqliteUserStore::in_memory().await?;
        store.ping().await
    }
}
