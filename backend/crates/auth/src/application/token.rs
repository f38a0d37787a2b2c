//! Session Token Codec
//!
//! Issues and verifies the HS256 JWT carried in the session cookie. The token
//! is the whole session: nothing is looked up server-side to accept it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::SecretProvider;
use crate::domain::entity::account::Account;
use crate::error::{AuthError, AuthResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by a session token
///
/// Unknown fields are rejected, so a token minted for some other purpose
/// with the same key does not verify as a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionClaims {
    /// Account ID
    pub sub: Uuid,
    pub username: String,
    pub division: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    pub fn account_id(&self) -> AccountId {
        AccountId::from_uuid(self.sub)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Identity a token is issued for
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub account_id: AccountId,
    pub username: String,
    pub division: String,
}

impl From<&Account> for TokenSubject {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id,
            username: account.user_name.as_str().to_string(),
            division: account.division.as_str().to_string(),
        }
    }
}

/// Freshly signed token with the claims inside it
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenCodec {
    secret: Arc<dyn SecretProvider>,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: Arc<dyn SecretProvider>, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Sign a token valid from now for the configured TTL
    pub fn issue(&self, subject: &TokenSubject) -> AuthResult<IssuedToken> {
        self.issue_at(subject, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        subject: &TokenSubject,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let secret = self
            .secret
            .signing_secret()
            .ok_or(AuthError::SecretUnavailable)?;

        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {}", e)))?;

        let claims = SessionClaims {
            sub: *subject.account_id.as_uuid(),
            username: subject.username.clone(),
            division: subject.division.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to sign session token: {}", e)))?;

        tracing::debug!(
            account_id = %subject.account_id,
            exp = claims.exp,
            "Session token issued"
        );

        Ok(IssuedToken { token, claims })
    }

    /// Verify signature, algorithm, shape and expiry
    ///
    /// Every failure collapses to `None`; the reason is only logged.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let Some(secret) = self.secret.signing_secret() else {
            tracing::warn!("Token verification attempted without a signing secret");
            return None;
        };

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let claims = match decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret),
            &validation,
        ) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                return None;
            }
        };

        if claims.username.is_empty() || claims.iat > claims.exp {
            tracing::debug!("Session token rejected: inconsistent claims");
            return None;
        }

        Some(claims)
    }
}
