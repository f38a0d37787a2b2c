//! Login Session Entity
//!
//! Audit record of one successful login. Written once, never read back to
//! authorize anything: the signed token alone decides whether a request is
//! authenticated. The token itself is not stored, only its digest.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, LoginSessionId};
use platform::client::ClientMetadata;
use platform::crypto::token_digest;

#[derive(Debug, Clone)]
pub struct LoginSession {
    pub session_id: LoginSessionId,
    pub account_id: AccountId,
    /// base64url SHA-256 of the issued token
    pub token_digest: String,
    pub browser: String,
    pub os: String,
    pub device_type: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Same instant as the token's `exp`
    pub expires_at: DateTime<Utc>,
}

impl LoginSession {
    pub fn new(
        account_id: AccountId,
        token: &str,
        client: &ClientMetadata,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: LoginSessionId::new(),
            account_id,
            token_digest: token_digest(token),
            browser: client.device.browser.clone(),
            os: client.device.os.clone(),
            device_type: client.device.device_type.as_str().to_string(),
            client_ip: client.ip_string(),
            user_agent: client.user_agent.clone(),
            created_at,
            expires_at,
        }
    }
}
