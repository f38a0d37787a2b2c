//! Auth Error Types
//!
//! Auth-specific error variants that render through the unified
//! `kernel::error::AppError` JSON body.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Generic message for every 5xx; internals stay in the logs
const GENERIC_FAILURE: &str = "An unexpected error occurred during authentication";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown username or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No session cookie on a protected API route
    #[error("Authentication required")]
    Unauthorized,

    /// Session cookie present but the token does not verify
    #[error("Invalid or expired session token")]
    InvalidToken,

    /// Account creation with a username that already exists
    #[error("Username is already taken")]
    UserNameTaken,

    /// Signing secret missing from configuration
    #[error("Token signing secret is unavailable")]
    SecretUnavailable,

    /// Database round trip exceeded the configured bound
    #[error("Database operation timed out: {0}")]
    Timeout(&'static str),

    /// Failure inside the login transaction (rolled back)
    #[error("Transaction failed: {0}")]
    Transaction(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Machine-readable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::UserNameTaken => "USERNAME_TAKEN",
            AuthError::Transaction(_) => "TRANSACTION_ERROR",
            AuthError::SecretUnavailable
            | AuthError::Timeout(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => "AUTHENTICATION_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::Unauthorized | AuthError::InvalidToken => {
                ErrorKind::Unauthorized
            }
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::SecretUnavailable
            | AuthError::Timeout(_)
            | AuthError::Transaction(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Text shown to the client
    fn public_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::InvalidCredentials => "Invalid username or password".to_string(),
            AuthError::Unauthorized => "Authentication required".to_string(),
            AuthError::InvalidToken => "Your session is invalid or has expired".to_string(),
            AuthError::UserNameTaken => "Username is already taken".to_string(),
            AuthError::Transaction(_) => {
                "Could not complete sign-in, please try again".to_string()
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.public_message()).with_code(self.code());
        match self {
            AuthError::InvalidToken | AuthError::Unauthorized => err.with_action("Please sign in"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Transaction(e) => {
                tracing::error!(error = %e, "Login transaction rolled back");
            }
            AuthError::Timeout(op) => {
                tracing::error!(operation = op, "Auth database operation timed out");
            }
            AuthError::SecretUnavailable => {
                tracing::error!("Token signing secret is not configured");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
