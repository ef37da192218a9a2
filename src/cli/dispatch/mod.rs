//! Map validated command-line arguments to the action that runs them.

use crate::accounts::PasswordHasher;
use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_DSN, ARG_MAX_CONNECTIONS, ARG_PORT, password, session};
use anyhow::{Context, Result, anyhow};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or out of range.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;
    let max_connections = matches
        .get_one::<u32>(ARG_MAX_CONNECTIONS)
        .copied()
        .unwrap_or(5);

    let session_opts = session::Options::parse(matches).map_err(|e| anyhow!(e))?;

    let password_opts = password::Options::parse(matches);
    let hasher = PasswordHasher::with_params(
        password_opts.memory_kib,
        password_opts.iterations,
        password_opts.parallelism,
    )
    .context("invalid --argon2-* arguments")?;

    Ok(Action::Server(Args {
        port,
        dsn,
        max_connections,
        session_ttl_seconds: session_opts.ttl_seconds,
        cookie_secure: session_opts.cookie_secure,
        hasher,
    }))
}
