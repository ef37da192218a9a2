//! Statements and the `UserStore` body shared by both backends.
//!
//! sqlx binds `$N` placeholders on SQLite as well as PostgreSQL, so a single
//! set of statements serves both engines.

pub(super) const INSERT_USER: &str = r"
    INSERT INTO usuarios (username, password, role)
    VALUES ($1, $2, $3)
    RETURNING id, username, password, role
";
pub(super) const FIND_USER: &str =
    "SELECT id, username, password, role FROM usuarios WHERE username = $1";
pub(super) const LIST_USERS: &str = "SELECT id, username, password, role FROM usuarios ORDER BY id";
pub(super) const INSERT_SESSION: &str = r"
    INSERT INTO sesiones (token_hash, usuario, rol, expires_at)
    VALUES ($1, $2, $3, $4)
";
pub(super) const LOOKUP_SESSION: &str = r"
    SELECT usuario, rol, expires_at
    FROM sesiones
    WHERE token_hash = $1 AND expires_at > $2
";
pub(super) const DELETE_SESSION: &str = "DELETE FROM sesiones WHERE token_hash = $1";
pub(super) const PURGE_SESSIONS: &str = "DELETE FROM sesiones WHERE expires_at <= $1";

pub(super) fn db_span(
    system: &'static str,
    operation: &'static str,
    statement: &'static str,
) -> tracing::Span {
    tracing::info_span!(
        "db.query",
        db.system = system,
        db.operation = operation,
        db.statement = statement
    )
}

/// Implement [`UserStore`](super::UserStore) for a store wrapping a sqlx
/// `pool` of the given row type.
macro_rules! impl_user_store {
    ($store:ty, $row:ty, system = $system:literal, schema = $schema:expr) => {
        const _: () = {
            use $crate::store::{
                InsertOutcome, NewUser, SessionRecord, UserRecord, UserStore,
                is_unique_violation, parse_role,
                queries::{self, db_span},
                schema::split_sql_statements,
            };
            use ::anyhow::{Context, Result};
            use ::sqlx::{Connection, Row};
            use ::tracing::{Instrument, info_span};

            fn user_from_row(row: &$row) -> Result<UserRecord> {
                let role: String = row.get("role");
                Ok(UserRecord {
                    id: row.get("id"),
                    username: row.get("username"),
                    password_hash: row.get("password"),
                    role: parse_role(&role)?,
                })
            }

            #[::async_trait::async_trait]
            impl UserStore for $store {
                async fn ensure_schema(&self) -> Result<()> {
                    for (index, statement) in split_sql_statements($schema).iter().enumerate() {
                        sqlx::query(statement)
                            .execute(&self.pool)
                            .await
                            .with_context(|| {
                                format!("failed to execute schema statement {}", index + 1)
                            })?;
                    }
                    Ok(())
                }

                async fn ping(&self) -> Result<()> {
                    let mut conn = self
                        .pool
                        .acquire()
                        .instrument(info_span!(
                            "db.acquire",
                            db.system = $system,
                            db.operation = "ACQUIRE"
                        ))
                        .await
                        .context("failed to acquire database connection")?;
                    conn.ping()
                        .instrument(info_span!(
                            "db.ping",
                            db.system = $system,
                            db.operation = "PING"
                        ))
                        .await
                        .context("failed to ping database")
                }

                async fn insert_user(&self, user: NewUser<'_>) -> Result<InsertOutcome> {
                    let row = sqlx::query(queries::INSERT_USER)
                        .bind(user.username)
                        .bind(user.password_hash)
                        .bind(user.role.as_str())
                        .fetch_one(&self.pool)
                        .instrument(db_span($system, "INSERT", queries::INSERT_USER))
                        .await;

                    match row {
                        Ok(row) => Ok(InsertOutcome::Created(user_from_row(&row)?)),
                        Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
                        Err(err) => Err(err).context("failed to insert user"),
                    }
                }

                async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
                    let row = sqlx::query(queries::FIND_USER)
                        .bind(username)
                        .fetch_optional(&self.pool)
                        .instrument(db_span($system, "SELECT", queries::FIND_USER))
                        .await
                        .context("failed to lookup user")?;

                    row.as_ref().map(user_from_row).transpose()
                }

                async fn list_users(&self) -> Result<Vec<UserRecord>> {
                    let rows = sqlx::query(queries::LIST_USERS)
                        .fetch_all(&self.pool)
                        .instrument(db_span($system, "SELECT", queries::LIST_USERS))
                        .await
                        .context("failed to list users")?;

                    rows.iter().map(user_from_row).collect()
                }

                async fn insert_session(
                    &self,
                    token_hash: &[u8],
                    session: &SessionRecord,
                ) -> Result<()> {
                    sqlx::query(queries::INSERT_SESSION)
                        .bind(token_hash)
                        .bind(&session.usuario)
                        .bind(session.rol.as_str())
                        .bind(session.expires_at_unix)
                        .execute(&self.pool)
                        .instrument(db_span($system, "INSERT", queries::INSERT_SESSION))
                        .await
                        .context("failed to insert session")?;
                    Ok(())
                }

                async fn lookup_session(
                    &self,
                    token_hash: &[u8],
                    now_unix: i64,
                ) -> Result<Option<SessionRecord>> {
                    let row = sqlx::query(queries::LOOKUP_SESSION)
                        .bind(token_hash)
                        .bind(now_unix)
                        .fetch_optional(&self.pool)
                        .instrument(db_span($system, "SELECT", queries::LOOKUP_SESSION))
                        .await
                        .context("failed to lookup session")?;

                    row.map(|row| -> Result<SessionRecord> {
                        let rol: String = row.get("rol");
                        Ok(SessionRecord {
                            usuario: row.get("usuario"),
                            rol: parse_role(&rol)?,
                            expires_at_unix: row.get("expires_at"),
                        })
                    })
                    .transpose()
                }

                async fn delete_session(&self, token_hash: &[u8]) -> Result<()> {
                    sqlx::query(queries::DELETE_SESSION)
                        .bind(token_hash)
                        .execute(&self.pool)
                        .instrument(db_span($system, "DELETE", queries::DELETE_SESSION))
                        .await
                        .context("failed to delete session")?;
                    Ok(())
                }

                async fn purge_expired_sessions(&self, now_unix: i64) -> Result<u64> {
                    let result = sqlx::query(queries::PURGE_SESSIONS)
                        .bind(now_unix)
                        .execute(&self.pool)
                        .instrument(db_span($system, "DELETE", queries::PURGE_SESSIONS))
                        .await
                        .context("failed to purge expired sessions")?;
                    Ok(result.rows_affected())
                }
            }
        };
    };
}

pub(super) use impl_user_store;
