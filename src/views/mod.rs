//! Server-rendered HTML pages.
//!
//! Pages are small enough to be built as strings. Every interpolated value goes
//! through [`escape`].

use axum::response::Html;

pub const LOGIN_PROMPT: &str = "Please log in to continue";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";

/// Escape text for inclusion in HTML element content or quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared layout
fn layout(title: &str, content: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/css/style.css">
</head>
<body>
  <main>
{content}
  </main>
</body>
</html>
"#,
        title = escape(title),
        content = content,
    ))
}

pub fn home_page(user_email: Option<&str>) -> Html<String> {
    let session_block = match user_email {
        Some(email) => format!(
            r#"    <p>Signed in as {}</p>
    <form method="post" action="/logout"><button type="submit">Log out</button></form>"#,
            escape(email)
        ),
        None => r#"    <p><a href="/login">Log in</a></p>"#.to_string(),
    };

    layout(
        "Home",
        &format!(
            "    <h1>Home</h1>\n    <p>{}</p>\n{}",
            escape("Welcome to Pocket Gateway!"),
            session_block
        ),
    )
}

pub fn login_page(message: &str) -> Html<String> {
    layout(
        "Login",
        &format!(
            r#"    <h1>Login</h1>
    <p class="message">{}</p>
    <form method="post" action="/login">
      <label>Email <input type="email" name="email" required></label>
      <label>Password <input type="password" name="password" required></label>
      <button type="submit">Log in</button>
    </form>"#,
            escape(message)
        ),
    )
}

pub fn not_found_page() -> Html<String> {
    layout("404", "    <h1>404</h1>\n    <p>Page not found</p>")
}

pub fn error_page(message: &str) -> Html<String> {
    let message = if message.is_empty() { "Internal Server Error" } else { message };
    layout(
        "Error",
        &format!("    <h1>Error</h1>\n    <p>{}</p>", escape(message)),
    )
}
