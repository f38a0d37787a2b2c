//! Session Gate Middleware
//!
//! Runs in front of every route and decides, from the session cookie alone,
//! whether a page request may proceed.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::config::AuthConfig;
use crate::presentation::extractor::SessionState;

/// Prefix of JSON API routes
const API_PREFIX: &str = "/api/";

/// How the gate treats a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Assets: passed through untouched
    Static,
    /// Reachable without a session; signed-in users are sent home
    Public,
    /// JSON API. Not redirected: a JSON client cannot follow a login page,
    /// so the `AuthenticatedUser` extractor answers 401 instead (see "API
    /// paths at the gate" in DESIGN.md)
    Api,
    /// Everything else: a valid session is required
    Protected,
}

/// Classify a request path
pub fn classify_path(config: &AuthConfig, path: &str) -> PathClass {
    let is_asset = config.static_paths.iter().any(|p| p == path)
        || config
            .static_prefixes
            .iter()
            .any(|prefix| prefix.ends_with('/') && path.starts_with(prefix.as_str()));
    if is_asset {
        return PathClass::Static;
    }

    let normalized = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    if config.public_paths.iter().any(|p| p == normalized) {
        return PathClass::Public;
    }

    if path.starts_with(API_PREFIX) {
        return PathClass::Api;
    }

    PathClass::Protected
}

/// Session gate
///
/// - public path with a valid session: 302 to the home page
/// - protected path without a cookie: 302 to the login page
/// - protected path with a cookie that fails verification: cookie cleared,
///   302 to the login page
/// - otherwise the request proceeds; verified claims are placed in the
///   request extensions
pub async fn session_gate(
    State(state): State<SessionState>,
    mut req: Request,
    next: Next,
) -> Response {
    let class = classify_path(&state.config, req.uri().path());
    if class == PathClass::Static {
        return next.run(req).await;
    }

    let token = state.token_from(req.headers());

    if let Some(claims) = token.as_deref().and_then(|t| state.codec.verify(t)) {
        if class == PathClass::Public {
            tracing::debug!(
                path = %req.uri().path(),
                username = %claims.username,
                "Signed-in user sent away from public page"
            );
            return redirect(&state.config.home_path);
        }

        req.extensions_mut().insert(claims);
        return next.run(req).await;
    }

    match (class, token) {
        (PathClass::Protected, None) => {
            tracing::warn!(path = %req.uri().path(), "Unauthenticated request redirected to login");
            redirect(&state.config.login_path)
        }
        (PathClass::Protected, Some(_)) => {
            tracing::warn!(path = %req.uri().path(), "Invalid session token; cookie cleared");
            let mut response = redirect(&state.config.login_path);
            match state.config.cookie().delete_header() {
                Ok(cookie) => {
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
                Err(e) => tracing::error!(error = %e, "Failed to build cookie deletion header"),
            }
            response
        }
        _ => next.run(req).await,
    }
}

fn redirect(location: &str) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(e) => tracing::error!(error = %e, location, "Invalid redirect location"),
    }
    response
}
