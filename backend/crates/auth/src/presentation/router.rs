//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::domain::repository::{AccountRepository, LoginSessionRepository};
use crate::presentation::extractor::SessionState;
use crate::presentation::handlers::{self, AuthAppState};

/// Auth API routes, meant to be nested under `/api/auth`
///
/// The session gate is installed by the application around the whole
/// router, not here.
pub fn auth_router<R>(repo: R, session: SessionState) -> Router
where
    R: AccountRepository + LoginSessionRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        session,
    };

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .route("/accounts", post(handlers::create_account::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::{AuthConfig, StaticSecret};
    use crate::application::token::TokenCodec;
    use crate::infra::memory::InMemoryAuthRepository;
    use crate::presentation::middleware::session_gate;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode, header};
    use axum::middleware;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const USERNAME: &str = "validuser1";
    const PASSWORD: &str = "CorrectPass1";

    struct TestApp {
        router: Router,
        repo: InMemoryAuthRepository,
    }

    async fn test_app(config: AuthConfig) -> TestApp {
        let repo = InMemoryAuthRepository::new();
        repo.seed_account(USERNAME, PASSWORD, "Records", config.pepper())
            .await
            .unwrap();

        let config = Arc::new(config);
        let codec = Arc::new(TokenCodec::new(
            Arc::new(StaticSecret::new("router-test-secret")),
            config.session_ttl,
        ));
        let session = SessionState::new(codec, config);

        let router = Router::new()
            .route("/", get(|| async { "home" }))
            .route("/login", get(|| async { "login page" }))
            .route("/assets/app.css", get(|| async { "body {}" }))
            .route("/health", get(|| async { "ok" }))
            .route("/healthcare-records", get(|| async { "records" }))
            .route("/health-admin/x", get(|| async { "admin" }))
            .route("/documents/a.txt", get(|| async { "minutes" }))
            .nest("/api/auth", auth_router(repo.clone(), session.clone()))
            .layer(middleware::from_fn_with_state(session, session_gate));

        TestApp { router, repo }
    }

    impl TestApp {
        async fn send(&self, req: Request<Body>) -> Response<Body> {
            self.router.clone().oneshot(req).await.unwrap()
        }

        async fn login(&self, username: &str, password: &str) -> Response<Body> {
            self.send(json_post(
                "/api/auth/login",
                json!({ "username": username, "password": password }),
                None,
            ))
            .await
        }

        /// Log in and return the raw token from Set-Cookie
        async fn token(&self) -> String {
            let response = self.login(USERNAME, PASSWORD).await;
            assert_eq!(response.status(), StatusCode::OK);
            let cookie = set_cookie(&response).unwrap();
            cookie
                .strip_prefix("token=")
                .and_then(|rest| rest.split(';').next())
                .unwrap()
                .to_string()
        }
    }

    fn json_post(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_with(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn set_cookie(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    fn location(response: &Response<Body>) -> Option<&str> {
        response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap())
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ------------------------------------------------------------------
    // Login
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_success() {
        let app = test_app(AuthConfig::development()).await;

        let response = app.login(USERNAME, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));

        let body = json_body(response).await;
        assert_eq!(body["code"], "AUTHENTICATION_SUCCESS");
        assert_eq!(body["user"]["username"], USERNAME);
        assert_eq!(body["user"]["division"], "Records");
        assert!(body["device"]["browser"].is_string());
        assert!(!body.to_string().contains("argon2"));

        assert_eq!(app.repo.login_sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_identical() {
        let app = test_app(AuthConfig::development()).await;

        let wrong = app.login(USERNAME, "WrongPass1").await;
        let unknown = app.login("ghostuser", PASSWORD).await;

        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&wrong).is_none());

        let wrong = json_body(wrong).await;
        let unknown = json_body(unknown).await;
        assert_eq!(wrong["code"], "INVALID_CREDENTIALS");
        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn test_login_validation_errors() {
        let app = test_app(AuthConfig::development()).await;

        let empty = app.login("", PASSWORD).await;
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(empty).await["code"], "VALIDATION_ERROR");

        let missing = app
            .send(json_post("/api/auth/login", json!({ "username": USERNAME }), None))
            .await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let malformed = app
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await;
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(malformed).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_strict_audit_failure() {
        let app = test_app(AuthConfig {
            audit_strict: true,
            ..AuthConfig::development()
        })
        .await;
        app.repo.fail_login_records(true);

        let response = app.login(USERNAME, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(set_cookie(&response).is_none());
        assert_eq!(json_body(response).await["code"], "TRANSACTION_ERROR");
    }

    #[tokio::test]
    async fn test_best_effort_audit_failure_still_logs_in() {
        let app = test_app(AuthConfig::development()).await;
        app.repo.fail_login_records(true);

        let response = app.login(USERNAME, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_some());
    }

    // ------------------------------------------------------------------
    // Logout
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_logout_expires_cookie() {
        let app = test_app(AuthConfig::development()).await;
        let token = app.token().await;

        let response = app
            .send(json_post("/api/auth/logout", json!({}), Some(&token)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert_eq!(json_body(response).await["code"], "LOGOUT_SUCCESS");

        // The browser now sends the cleared value
        let cleared = cookie
            .strip_prefix("token=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        assert_eq!(cleared, "");

        let next = app.send(get_with("/", Some(cleared))).await;
        assert_eq!(next.status(), StatusCode::FOUND);
        assert_eq!(location(&next), Some("/login"));
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let app = test_app(AuthConfig::development()).await;

        let response = app
            .send(Request::builder().method("POST").uri("/api/auth/logout").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    }

    // ------------------------------------------------------------------
    // Session gate
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_protected_page_without_cookie_redirects() {
        let app = test_app(AuthConfig::development()).await;

        let response = app.send(get_with("/", None)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), Some("/login"));
        assert!(set_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_protected_page_with_valid_cookie() {
        let app = test_app(AuthConfig::development()).await;
        let token = app.token().await;

        let response = app.send(get_with("/", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_cookie_is_cleared() {
        let app = test_app(AuthConfig::development()).await;

        let response = app.send(get_with("/", Some("forged.token.value"))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), Some("/login"));
        assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_login_page_with_valid_cookie_redirects_home() {
        let app = test_app(AuthConfig::development()).await;
        let token = app.token().await;

        let response = app.send(get_with("/login", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), Some("/"));

        let anonymous = app.send(get_with("/login", None)).await;
        assert_eq!(anonymous.status(), StatusCode::OK);

        let stale = app.send(get_with("/login", Some("stale"))).await;
        assert_eq!(stale.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_static_assets_bypass_gate() {
        let app = test_app(AuthConfig::development()).await;

        let response = app.send(get_with("/assets/app.css", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.send(get_with("/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_asset_lookalike_paths_require_session() {
        let app = test_app(AuthConfig::development()).await;

        for path in ["/healthcare-records", "/health-admin/x", "/documents/a.txt"] {
            let response = app.send(get_with(path, None)).await;
            assert_eq!(response.status(), StatusCode::FOUND, "{path}");
            assert_eq!(location(&response), Some("/login"), "{path}");
        }

        let token = app.token().await;
        let response = app.send(get_with("/documents/a.txt", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // ------------------------------------------------------------------
    // API session checks
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_me() {
        let app = test_app(AuthConfig::development()).await;

        let missing = app.send(get_with("/api/auth/me", None)).await;
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(missing).await["code"], "UNAUTHORIZED");

        let invalid = app.send(get_with("/api/auth/me", Some("garbage"))).await;
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(invalid).await["code"], "INVALID_TOKEN");

        let token = app.token().await;
        let ok = app.send(get_with("/api/auth/me", Some(&token))).await;
        assert_eq!(ok.status(), StatusCode::OK);
        let body = json_body(ok).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["username"], USERNAME);
        assert!(body["expires_at"].is_string());
    }

    #[tokio::test]
    async fn test_create_account() {
        let app = test_app(AuthConfig::development()).await;
        let new_account = json!({
            "username": "newhire",
            "password": "Fresh-Start-9",
            "division": "Archive",
        });

        let anonymous = app
            .send(json_post("/api/auth/accounts", new_account.clone(), None))
            .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let token = app.token().await;
        let created = app
            .send(json_post("/api/auth/accounts", new_account.clone(), Some(&token)))
            .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = json_body(created).await;
        assert_eq!(body["code"], "ACCOUNT_CREATED");
        assert_eq!(body["user"]["username"], "newhire");

        let duplicate = app
            .send(json_post("/api/auth/accounts", new_account, Some(&token)))
            .await;
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(duplicate).await["code"], "USERNAME_TAKEN");

        // The new account can sign in
        let response = app.login("newhire", "Fresh-Start-9").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
