//! Request Extractors

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRef, FromRequestParts};
use axum::http::request::Parts;
use platform::client::ClientMetadata;
use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::token::{SessionClaims, TokenCodec};
use crate::application::CheckSessionUseCase;
use crate::error::AuthError;

/// What the session gate and the extractors need
#[derive(Clone)]
pub struct SessionState {
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
}

impl SessionState {
    pub fn new(codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self { codec, config }
    }

    /// Session cookie of a request, if any
    pub fn token_from(&self, headers: &axum::http::HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.config.session_cookie_name)
    }
}

/// Verified session of an API request
///
/// Rejects with `401 UNAUTHORIZED` when there is no cookie and
/// `401 INVALID_TOKEN` when it does not verify.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionClaims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    SessionState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionState::from_ref(state);
        let token = session.token_from(&parts.headers);

        let claims = CheckSessionUseCase::new(session.codec).execute(token.as_deref())?;

        Ok(Self(claims))
    }
}

/// Client IP / User-Agent / device of the request
///
/// The socket address is only known when the server runs with
/// `into_make_service_with_connect_info`.
#[derive(Debug, Clone)]
pub struct ClientInfo(pub ClientMetadata);

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(Self(ClientMetadata::from_headers(&parts.headers, direct_ip)))
    }
}
