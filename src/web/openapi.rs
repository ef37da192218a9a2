#![allow(clippy::needless_for_each)]

use super::handlers::{health, login, logout, register, welcome};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        register::register_form,
        register::register,
        login::login_form,
        login::login,
        welcome::welcome,
        logout::logout,
    ),
    components(schemas(health::Health, register::UserRegister, login::UserLogin)),
    tags(
        (name = "register", description = "User registration"),
        (name = "login", description = "Session login and logout"),
        (name = "welcome", description = "Session-gated landing page"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = openapi();
        for path in ["/health", "/register", "/login", "/welcome", "/logout"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let register = doc.paths.paths.get("/register");
        assert!(register.is_some_and(|item| item.get.is_some() && item.post.is_some()));
    }
}
