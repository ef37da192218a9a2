use crate::{
    accounts::Accounts,
    web::{
        WebConfig,
        handlers::{
            found, internal_error,
            session::{clear_session_cookie, current_session},
        },
        views,
    },
};
use axum::{
    extract::Extension,
    http::{HeaderMap, header::SET_COOKIE},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

#[utoipa::path(
    get,
    path= "/welcome",
    responses (
        (status = 200, description = "Welcome page; admins also get the user listing", body = String, content_type = "text/html"),
        (status = 302, description = "No session, redirect to /login"),
    ),
    tag= "welcome"
)]
// axum handler for the gated landing page
#[instrument(skip_all)]
pub async fn welcome(
    headers: HeaderMap,
    accounts: Extension<Accounts>,
    config: Extension<Arc<WebConfig>>,
) -> Response {
    let session = match current_session(&headers, &**accounts.store()).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            debug!("No session, redirecting to login");
            return found("/login");
        }
        Err(e) => {
            error!("Error loading session: {e:#}");
            return internal_error();
        }
    };

    // The stored record is authoritative for the role, not the cached copy.
    let user = match accounts.find_by_username(&session.usuario).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Session refers to a missing user");
            if let Err(e) = accounts.store().delete_session(session.token_hash()).await {
                warn!("Failed to delete orphaned session: {e:#}");
            }
            let mut response = found("/login");
            if let Ok(cookie) = clear_session_cookie(&config) {
                response.headers_mut().insert(SET_COOKIE, cookie);
            }
            return response;
        }
        Err(e) => {
            error!("Error loading user: {e:#}");
            return internal_error();
        }
    };

    let users = if user.role.is_admin() {
        match accounts.list_all().await {
            Ok(users) => Some(users),
            Err(e) => {
                error!("Error listing users: {e:#}");
                return internal_error();
            }
        }
    } else {
        None
    };

    Html(views::welcome_page(&user.username, user.role, users.as_deref())).into_response()
}
