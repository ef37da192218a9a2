use crate::{
    accounts::PasswordHasher,
    store::{self, PoolOptions},
    web::{self, WebConfig},
};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub max_connections: u32,
    pub session_ttl_seconds: i64,
    pub cookie_secure: bool,
    pub hasher: PasswordHasher,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!(
        port = args.port,
        dsn = %store::redact_dsn(&args.dsn),
        max_connections = args.max_connections,
        session_ttl_seconds = args.session_ttl_seconds,
        cookie_secure = args.cookie_secure,
        "starting server"
    );

    let pool_options = PoolOptions {
        max_connections: args.max_connections,
        ..PoolOptions::default()
    };

    let config = WebConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_cookie_secure(args.cookie_secure);

    web::new(args.port, &args.dsn, pool_options, args.hasher, config).await
}
