pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::{login, login_form};

pub mod logout;
pub use self::logout::logout;

pub mod register;
pub use self::register::{register, register_form};

pub mod session;

pub mod welcome;
pub use self::welcome::welcome;


// common functions for the handlers
use axum::{
    Form,
    extract::rejection::FormRejection,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

pub const MSG_DUPLICATE_USER: &str = "Usuario ya registrado.";
pub const MSG_INVALID_CREDENTIALS: &str = "Credenciales incorrectas";
pub const MSG_MISSING_FIELDS: &str = "Usuario y contraseña son obligatorios.";
pub const MSG_INVALID_ROLE: &str = "Rol no válido.";
pub const MSG_USERNAME_TOO_LONG: &str = "El nombre de usuario es demasiado largo.";
pub const MSG_INVALID_USERNAME: &str = "Nombre de usuario no válido.";
pub const MSG_INTERNAL_ERROR: &str = "Error interno del servidor.";

pub const MAX_USERNAME_LEN: usize = 64;

/// `302 Found` to `location`.
#[must_use]
pub fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

pub(crate) fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR).into_response()
}

/// Unwrap a form body; one that cannot be decoded counts as missing fields.
pub(crate) fn form_body<T>(form: Result<Form<T>, FormRejection>) -> Result<T, Response> {
    match form {
        Ok(Form(value)) => Ok(value),
        Err(rejection) => {
            debug!("Rejected form body: {rejection}");
            Err((StatusCode::BAD_REQUEST, MSG_MISSING_FIELDS).into_response())
        }
    }
}

/// Check the credential fields shared by the register and login forms.
pub(crate) fn validate_credentials(
    username: &str,
    password: &SecretString,
) -> Result<(), Response> {
    if username.is_empty() || password.expose_secret().is_empty() {
        return Err((StatusCode::BAD_REQUEST, MSG_MISSING_FIELDS).into_response());
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err((StatusCode::BAD_REQUEST, MSG_USERNAME_TOO_LONG).into_response());
    }
    // Form decoding turns invalid UTF-8 into U+FFFD.
    if username.contains(char::REPLACEMENT_CHARACTER) {
        return Err((StatusCode::BAD_REQUEST, MSG_INVALID_USERNAME).into_response());
    }
    Ok(())
}

// axum handler for /
pub async fn root() -> Response {
    found("/login")
}
