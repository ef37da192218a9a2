//! HTML pages.

use crate::store::{Role, UserRecord};
use std::fmt::Write as _;

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

#[must_use]
pub fn login_page() -> String {
    layout(
        "Login",
        r#"<h1>Login</h1>
<form method="post" action="/login">
<label>Usuario <input type="text" name="username" required></label>
<label>Contraseña <input type="password" name="password" required></label>
<button type="submit">Entrar</button>
</form>
<p>¿No tienes cuenta? <a href="/register">Registro</a></p>"#,
    )
}

#[must_use]
pub fn register_page() -> String {
    layout(
        "Registro",
        r#"<h1>Registro</h1>
<form method="post" action="/register">
<label>Usuario <input type="text" name="username" required></label>
<label>Contraseña <input type="password" name="password" required></label>
<label>Rol
<select name="role">
<option value="user" selected>user</option>
<option value="admin">admin</option>
</select>
</label>
<button type="submit">Registrarse</button>
</form>
<p>¿Ya tienes cuenta? <a href="/login">Login</a></p>"#,
    )
}

/// Landing page; `users` is only `Some` for admins.
#[must_use]
pub fn welcome_page(username: &str, role: Role, users: Option<&[UserRecord]>) -> String {
    let mut body = format!(
        "<h1>Bienvenido, {}</h1>\n<p>Tu rol es: {}</p>\n",
        escape_html(username),
        role
    );

    if let Some(users) = users {
        body.push_str("<h2>Usuarios registrados</h2>\n<table>\n");
        body.push_str("<tr><th>ID</th><th>Usuario</th><th>Rol</th></tr>\n");
        for user in users {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                user.id,
                escape_html(&user.username),
                user.role
            );
        }
        body.push_str("</table>\n");
    }

    body.push_str(r#"<p><a href="/logout">Cerrar sesión</a></p>"#);

    layout("Bienvenido", &body)
}
