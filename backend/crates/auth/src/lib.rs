//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token codec, configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, extractors, session gate
//!
//! ## Session Model
//! - Sign in with username + password (Argon2id)
//! - The session is a signed HS256 JWT in an HttpOnly cookie, valid 24 hours
//! - Verification is purely cryptographic; the database only keeps an audit
//!   trail of logins
//! - Logout clears the cookie; issued tokens are not revoked

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, SecretProvider, StaticSecret};
pub use application::token::{SessionClaims, TokenCodec};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::extractor::{AuthenticatedUser, SessionState};
pub use presentation::middleware::session_gate;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
