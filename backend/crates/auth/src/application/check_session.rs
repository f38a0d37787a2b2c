//! Check Session Use Case
//!
//! Turns the cookie value of a request into verified claims. Purely local:
//! no database access.

use std::sync::Arc;

use crate::application::token::{SessionClaims, TokenCodec};
use crate::error::{AuthError, AuthResult};

/// Check session use case
#[derive(Clone)]
pub struct CheckSessionUseCase {
    codec: Arc<TokenCodec>,
}

impl CheckSessionUseCase {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// `Unauthorized` without a token, `InvalidToken` if it does not verify
    pub fn execute(&self, token: Option<&str>) -> AuthResult<SessionClaims> {
        let token = token.ok_or(AuthError::Unauthorized)?;
        self.codec.verify(token).ok_or(AuthError::InvalidToken)
    }
}
