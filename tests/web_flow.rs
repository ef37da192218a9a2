//! End-to-end walk through the public router: register, log in, browse as
//! user and admin, log out.

use acceso::{
    accounts::{Accounts, PasswordHasher},
    store::SqliteUserStore,
    web::{WebConfig, router},
};
use anyhow::{Context, Result};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> Result<Router> {
    let store = SqliteUserStore::in_memory().await?;
    let accounts = Accounts::new(Arc::new(store), PasswordHasher::insecure_fast());
    Ok(router(accounts, WebConfig::new().with_cookie_secure(true)))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
    cookie: Option<&str>,
) -> Result<Response> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = builder.body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))?;
    app.clone()
        .oneshot(request)
        .await
        .context("router call failed")
}

async fn text(response: Response) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn cookie(response: &Response) -> Result<String> {
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing set-cookie")?
        .to_str()?;
    assert!(set_cookie.ends_with("; Secure"));
    set_cookie
        .split(';')
        .next()
        .map(str::to_string)
        .context("empty set-cookie")
}

#[tokio::test]
async fn register_login_and_browse() -> Result<()> {
    let app = app().await?;

    // Registration
    let response = call(
        &app,
        "POST",
        "/register",
        Some("username=alice&password=pw1&role=user"),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/login"));

    let response = call(
        &app,
        "POST",
        "/register",
        Some("username=root&password=pw2&role=admin"),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = call(
        &app,
        "POST",
        "/register",
        Some("username=alice&password=x&role=user"),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await?, "Usuario ya registrado.");

    // A regular user sees only their own role
    let response = call(&app, "POST", "/login", Some("username=alice&password=pw1"), None).await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/welcome"));
    let alice = cookie(&response)?;

    let body = text(call(&app, "GET", "/welcome", None, Some(&alice)).await?).await?;
    assert!(body.contains("Bienvenido, alice"));
    assert!(body.contains("Tu rol es: user"));
    assert!(!body.contains("Usuarios registrados"));

    // An admin sees the listing in id order
    let response = call(&app, "POST", "/login", Some("username=root&password=pw2"), None).await?;
    let root = cookie(&response)?;
    let body = text(call(&app, "GET", "/welcome", None, Some(&root)).await?).await?;
    assert!(body.contains("Tu rol es: admin"));
    assert!(body.contains("Usuarios registrados"));
    let alice_row = body.find("<td>alice</td>").context("alice row")?;
    let root_row = body.find("<td>root</td>").context("root row")?;
    assert!(alice_row < root_row);

    // Wrong password
    let response = call(&app, "POST", "/login", Some("username=alice&password=nope"), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await?, "Credenciales incorrectas");

    // Logout invalidates only that session
    let response = call(&app, "GET", "/logout", None, Some(&alice)).await?;
    assert_eq!(response.status(), StatusCode::FOUND);
    let response = call(&app, "GET", "/welcome", None, Some(&alice)).await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));
    let response = call(&app, "GET", "/welcome", None, Some(&root)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[test]
fn openapi_lists_the_routes() {
    let doc = acceso::web::openapi();
    assert!(doc.paths.paths.contains_key("/login"));
    assert!(doc.paths.paths.contains_key("/health"));
}
