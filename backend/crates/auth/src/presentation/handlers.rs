//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::{
    CreateAccountInput, CreateAccountUseCase, SignInInput, SignInUseCase, SignOutUseCase,
};
use crate::domain::repository::{AccountRepository, LoginSessionRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CreateAccountRequest, CreateAccountResponse, DeviceDto, LoginRequest, LoginResponse,
    LogoutResponse, SessionResponse, UserDto,
};
use crate::presentation::extractor::{AuthenticatedUser, ClientInfo, SessionState};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + LoginSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub session: SessionState,
}

impl<R> FromRef<AuthAppState<R>> for SessionState
where
    R: AccountRepository + LoginSessionRepository + Clone + Send + Sync + 'static,
{
    fn from_ref(state: &AuthAppState<R>) -> Self {
        state.session.clone()
    }
}

/// Body errors become a plain validation error instead of axum's text reply
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload.map(|Json(body)| body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AuthError::Validation("Request body must be a valid JSON object".to_string())
    })
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ClientInfo(client): ClientInfo,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    R: AccountRepository + LoginSessionRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.session.codec.clone(),
        state.session.config.clone(),
    );

    let output = use_case
        .execute(
            SignInInput {
                username: req.username,
                password: req.password,
            },
            client,
        )
        .await?;

    let cookie = state
        .session
        .config
        .cookie()
        .set_header(&output.token)
        .map_err(|e| AuthError::Internal(format!("Invalid session cookie: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            code: "AUTHENTICATION_SUCCESS",
            message: "Signed in successfully".to_string(),
            user: UserDto::from(&output.account),
            device: DeviceDto::from(&output.device),
        }),
    )
        .into_response())
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout(
    State(session): State<SessionState>,
    headers: HeaderMap,
) -> AuthResult<Response> {
    let token = session.token_from(&headers);
    SignOutUseCase::new(session.codec.clone()).execute(token.as_deref());

    let cookie = session
        .config
        .cookie()
        .delete_header()
        .map_err(|e| AuthError::Internal(format!("Invalid session cookie: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse {
            code: "LOGOUT_SUCCESS",
            message: "Signed out successfully".to_string(),
        }),
    )
        .into_response())
}

// ============================================================================
// Current Session
// ============================================================================

/// GET /api/auth/me
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: true,
        user: UserDto::from(&claims),
        expires_at: claims.expires_at().map(|at| at.to_rfc3339()),
    })
}

// ============================================================================
// Account Creation (requires authentication)
// ============================================================================

/// POST /api/auth/accounts
pub async fn create_account<R>(
    State(state): State<AuthAppState<R>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + LoginSessionRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;

    let use_case = CreateAccountUseCase::new(state.repo.clone(), state.session.config.clone());
    let account = use_case
        .execute(CreateAccountInput {
            username: req.username,
            password: req.password,
            division: req.division,
        })
        .await?;

    tracing::info!(
        created_by = %actor.username,
        username = %account.user_name,
        "Account provisioned"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse {
            code: "ACCOUNT_CREATED",
            message: "Account created".to_string(),
            user: UserDto::from(&account),
        }),
    ))
}
