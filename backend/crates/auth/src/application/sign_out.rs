//! Sign Out Use Case
//!
//! Logout is purely client-side: the cookie is cleared and nothing is
//! revoked. A copied token stays valid until its `exp`.

use std::sync::Arc;

use crate::application::token::{SessionClaims, TokenCodec};

/// Sign out use case
#[derive(Clone)]
pub struct SignOutUseCase {
    codec: Arc<TokenCodec>,
}

impl SignOutUseCase {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Never fails. Returns whose session ended, when that can be told.
    pub fn execute(&self, token: Option<&str>) -> Option<SessionClaims> {
        let claims = token.and_then(|t| self.codec.verify(t));

        match &claims {
            Some(claims) => tracing::info!(
                account_id = %claims.sub,
                username = %claims.username,
                "User signed out"
            ),
            None => tracing::debug!("Sign out without a valid session"),
        }

        claims
    }
}
