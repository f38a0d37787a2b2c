//! Placeholder pages and the application router
//!
//! The real UI is served elsewhere; these pages only make the gate's
//! behaviour visible.

use auth::domain::repository::{AccountRepository, LoginSessionRepository};
use auth::{SessionClaims, SessionState, auth_router, session_gate};
use axum::extract::Extension;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router, middleware};
use kernel::error::app_error::AppError;
use serde_json::{Value, json};

/// Every route of the server, wrapped in the session gate
pub fn app_router<R>(repo: R, session: SessionState) -> Router
where
    R: AccountRepository + LoginSessionRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/health", get(health))
        .nest("/api/auth", auth_router(repo, session.clone()))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(session, session_gate))
}

/// GET /
async fn home(Extension(claims): Extension<SessionClaims>) -> Html<String> {
    Html(format!(
        concat!(
            "<!doctype html><html><head><title>Doctrack</title></head><body>",
            "<h1>Doctrack</h1><p>Signed in as <strong>{}</strong> ({})</p>",
            "<form method=\"post\" action=\"/api/auth/logout\"",
            " onsubmit=\"event.preventDefault();fetch(this.action,{{method:'POST'}})",
            ".then(()=>location.assign('/login'))\">",
            "<button type=\"submit\">Sign out</button></form></body></html>"
        ),
        escape_html(&claims.username),
        escape_html(&claims.division),
    ))
}

/// GET /login
async fn login() -> Html<&'static str> {
    Html(concat!(
        "<!doctype html><html><head><title>Sign in - Doctrack</title></head><body>",
        "<h1>Sign in</h1>",
        "<form id=\"login\"><input name=\"username\" autocomplete=\"username\" required>",
        "<input name=\"password\" type=\"password\" autocomplete=\"current-password\" required>",
        "<button type=\"submit\">Sign in</button></form><p id=\"error\"></p>",
        "<script>document.getElementById('login').addEventListener('submit',async e=>{",
        "e.preventDefault();const f=new FormData(e.target);",
        "const r=await fetch('/api/auth/login',{method:'POST',",
        "headers:{'Content-Type':'application/json'},",
        "body:JSON.stringify({username:f.get('username'),password:f.get('password')})});",
        "if(r.ok){location.assign('/')}else{",
        "document.getElementById('error').textContent=(await r.json()).message}});",
        "</script></body></html>"
    ))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> AppError {
    AppError::not_found("Page not found")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
