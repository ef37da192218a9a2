use crate::{
    accounts::Accounts,
    web::{
        WebConfig,
        handlers::{
            MSG_INVALID_CREDENTIALS, form_body, found, internal_error,
            session::{
                extract_session_token, hash_session_token, now_unix_seconds, session_cookie,
                start_session,
            },
            validate_credentials,
        },
        views,
    },
};
use axum::{
    Form,
    extract::{Extension, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct UserLogin {
    #[serde(default)]
    username: String,
    #[serde(default)]
    #[schema(value_type = String, format = Password)]
    password: SecretString,
}

#[utoipa::path(
    get,
    path= "/login",
    responses (
        (status = 200, description = "Login form", body = String, content_type = "text/html"),
    ),
    tag= "login"
)]
pub async fn login_form() -> Html<String> {
    Html(views::login_page())
}

#[utoipa::path(
    post,
    path= "/login",
    request_body(content = UserLogin, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 302, description = "Login successful, session cookie set, redirect to /welcome"),
        (status = 200, description = "Invalid credentials", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing fields, malformed form or invalid username", body = String, content_type = "text/plain"),
    ),
    tag= "login"
)]
// axum handler for login
#[instrument(skip(headers, accounts, config))]
pub async fn login(
    headers: HeaderMap,
    accounts: Extension<Accounts>,
    config: Extension<Arc<WebConfig>>,
    form: Result<Form<UserLogin>, FormRejection>,
) -> Response {
    let user = match form_body(form) {
        Ok(user) => user,
        Err(response) => return response,
    };

    if let Err(response) = validate_credentials(&user.username, &user.password) {
        debug!("Rejected login form");
        return response;
    }

    let record = match accounts.authenticate(&user.username, &user.password).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("Unauthorized");
            return (StatusCode::OK, MSG_INVALID_CREDENTIALS).into_response();
        }
        Err(e) => {
            error!("Error authenticating user: {e:#}");
            return internal_error();
        }
    };

    let store = accounts.store();

    match store.purge_expired_sessions(now_unix_seconds()).await {
        Ok(0) => (),
        Ok(purged) => debug!("Purged {purged} expired sessions"),
        Err(e) => warn!("Failed to purge expired sessions: {e:#}"),
    }

    // Never keep a session id that existed before authentication.
    if let Some(previous) = extract_session_token(&headers) {
        if let Err(e) = store.delete_session(&hash_session_token(&previous)).await {
            warn!("Failed to delete previous session: {e:#}");
        }
    }

    let token = match start_session(
        &**store,
        &record.username,
        record.role,
        config.session_ttl_seconds(),
    )
    .await
    {
        Ok(token) => token,
        Err(e) => {
            error!("Error creating session: {e:#}");
            return internal_error();
        }
    };

    let cookie = match session_cookie(&config, &token) {
        Ok(cookie) => cookie,
        Err(e) => {
            error!("Error building session cookie: {e}");
            return internal_error();
        }
    };

    info!(user_id = record.id, "Login successful");

    let mut response = found("/welcome");
    response.headers_mut().insert(SET_COOKIE, cookie);
    response
}
