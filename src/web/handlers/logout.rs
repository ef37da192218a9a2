use crate::{
    accounts::Accounts,
    web::{
        WebConfig,
        handlers::{
            found,
            session::{clear_session_cookie, extract_session_token, hash_session_token},
        },
    },
};
use axum::{
    extract::Extension,
    http::{HeaderMap, header::SET_COOKIE},
    response::Response,
};
use std::sync::Arc;
use tracing::{error, instrument};

#[utoipa::path(
    get,
    path= "/logout",
    responses (
        (status = 302, description = "Session cleared, redirect to /login"),
    ),
    tag= "login"
)]
// axum handler for logout
#[instrument(skip_all)]
pub async fn logout(
    headers: HeaderMap,
    accounts: Extension<Accounts>,
    config: Extension<Arc<WebConfig>>,
) -> Response {
    if let Some(token) = extract_session_token(&headers) {
        if let Err(e) = accounts
            .store()
            .delete_session(&hash_session_token(&token))
            .await
        {
            error!("Failed to delete session: {e:#}");
        }
    }

    // Always clear the cookie, even if the session record was missing.
    let mut response = found("/login");
    if let Ok(cookie) = clear_session_cookie(&config) {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}
