//! Application Configuration
//!
//! Configuration for the Auth application layer and the source of the token
//! signing secret.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Length of a generated development secret
const RANDOM_SECRET_LEN: usize = 32;

// ============================================================================
// Signing secret
// ============================================================================

/// Supplies the HMAC key used to sign and verify session tokens
///
/// Read on every call so a provider may rotate or lose the secret at
/// runtime. `None` (or an empty key) means no token can be issued or
/// accepted.
pub trait SecretProvider: Send + Sync {
    fn signing_secret(&self) -> Option<&[u8]>;
}

/// Fixed secret held in memory
#[derive(Clone)]
pub struct StaticSecret(Option<Vec<u8>>);

impl StaticSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(Some(secret.into()))
    }

    /// Provider with no secret; issuing fails and nothing verifies
    pub fn missing() -> Self {
        Self(None)
    }

    /// Random secret for development; tokens die with the process
    pub fn random() -> Self {
        Self(Some(platform::crypto::random_bytes(RANDOM_SECRET_LEN)))
    }

    /// Secret from an environment variable, `missing()` if unset or empty
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => Self::new(value.into_bytes()),
            _ => Self::missing(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.signing_secret().is_some()
    }
}

impl SecretProvider for StaticSecret {
    fn signing_secret(&self) -> Option<&[u8]> {
        self.0.as_deref().filter(|s| !s.is_empty())
    }
}

impl fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_present() { "[REDACTED]" } else { "[MISSING]" };
        f.debug_tuple("StaticSecret").field(&state).finish()
    }
}

// ============================================================================
// Auth configuration
// ============================================================================

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Token and cookie lifetime
    pub session_ttl: Duration,
    /// Whether to set the Secure cookie attribute
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Upper bound for a single database round trip
    pub db_timeout: Duration,
    /// Fail the login when the audit write fails (default: log and continue)
    pub audit_strict: bool,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Where unauthenticated page requests are sent
    pub login_path: String,
    /// Where an authenticated visit to the login page is sent
    pub home_path: String,
    /// Exact paths reachable without a session
    pub public_paths: Vec<String>,
    /// Asset directories served without any session check; each ends in `/`
    pub static_prefixes: Vec<String>,
    /// Exact paths served without any session check
    pub static_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "token".to_string(),
            session_ttl: Duration::from_secs(24 * 3600), // 24 hours
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            db_timeout: Duration::from_secs(5),
            audit_strict: false,
            password_pepper: None,
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            public_paths: ["/login", "/api/auth/login"]
                .map(String::from)
                .to_vec(),
            static_prefixes: ["/static/", "/assets/", "/_next/"]
                .map(String::from)
                .to_vec(),
            static_paths: ["/favicon.ico", "/health"].map(String::from).to_vec(),
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Session TTL in whole seconds
    pub fn session_ttl_secs(&self) -> u64 {
        self.session_ttl.as_secs()
    }

    /// Cookie settings; Max-Age always equals the token lifetime
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl_secs()),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
