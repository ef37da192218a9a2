use crate::{
    accounts::{Accounts, RegisterOutcome},
    store::Role,
    web::{
        handlers::{
            MSG_DUPLICATE_USER, MSG_INVALID_ROLE, form_body, found, internal_error,
            validate_credentials,
        },
        views,
    },
};
use axum::{
    Form,
    extract::{Extension, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct UserRegister {
    #[serde(default)]
    username: String,
    #[serde(default)]
    #[schema(value_type = String, format = Password)]
    password: SecretString,
    /// `user` (default) or `admin`; also accepted as `rol`.
    #[serde(default, alias = "rol")]
    role: Option<String>,
}

#[utoipa::path(
    get,
    path= "/register",
    responses (
        (status = 200, description = "Registration form", body = String, content_type = "text/html"),
    ),
    tag= "register"
)]
pub async fn register_form() -> Html<String> {
    Html(views::register_page())
}

#[utoipa::path(
    post,
    path= "/register",
    request_body(content = UserRegister, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 302, description = "Registration successful, redirect to /login"),
        (status = 200, description = "Username already registered", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing fields, malformed form, invalid username or role", body = String, content_type = "text/plain"),
    ),
    tag= "register"
)]
// axum handler for registration
#[instrument(skip(accounts))]
pub async fn register(
    accounts: Extension<Accounts>,
    form: Result<Form<UserRegister>, FormRejection>,
) -> Response {
    let user = match form_body(form) {
        Ok(user) => user,
        Err(response) => return response,
    };

    if let Err(response) = validate_credentials(&user.username, &user.password) {
        debug!("Rejected registration form");
        return response;
    }

    let role = match user.role.as_deref().map(str::trim) {
        None | Some("") => Role::default(),
        Some(value) => match value.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                debug!("{e}");
                return (StatusCode::BAD_REQUEST, MSG_INVALID_ROLE).into_response();
            }
        },
    };

    match accounts.register(&user.username, &user.password, role).await {
        Ok(RegisterOutcome::Created(record)) => {
            info!(user_id = record.id, role = %record.role, "User registered");
            found("/login")
        }
        Ok(RegisterOutcome::Duplicate) => {
            debug!("User already exists");
            (StatusCode::OK, MSG_DUPLICATE_USER).into_response()
        }
        Err(e) => {
            error!("Error registering user: {e:#}");
            internal_error()
        }
    }
}
