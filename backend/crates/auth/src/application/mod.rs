//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod create_account;
pub mod sign_in;
pub mod sign_out;
pub mod token;

use std::future::Future;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::{AuthConfig, SecretProvider, StaticSecret};
pub use create_account::{CreateAccountInput, CreateAccountUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use token::{IssuedToken, SessionClaims, TokenCodec, TokenSubject};

/// Run a repository call with an upper time bound
pub(crate) async fn bounded<T>(
    limit: Duration,
    operation: &'static str,
    fut: impl Future<Output = AuthResult<T>>,
) -> AuthResult<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| AuthError::Timeout(operation))?
}

/// Run CPU-heavy password work off the async workers
pub(crate) async fn blocking<T, F>(f: F) -> AuthResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("Password task failed: {}", e)))
}
