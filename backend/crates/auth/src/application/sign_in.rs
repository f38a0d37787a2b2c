//! Sign In Use Case
//!
//! Checks a username / password pair, issues a session token and records the
//! login for audit.

use std::sync::Arc;

use platform::client::{ClientMetadata, DeviceInfo};

use crate::application::config::AuthConfig;
use crate::application::token::{SessionClaims, TokenCodec, TokenSubject};
use crate::application::{blocking, bounded};
use crate::domain::entity::{account::Account, login_session::LoginSession};
use crate::domain::repository::{AccountRepository, LoginSessionRepository};
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    /// Session token for the cookie
    pub token: String,
    pub claims: SessionClaims,
    pub account: Account,
    pub device: DeviceInfo,
    /// False when the audit write failed and was tolerated
    pub audit_recorded: bool,
}

/// Sign in use case
pub struct SignInUseCase<A, S>
where
    A: AccountRepository,
    S: LoginSessionRepository,
{
    account_repo: Arc<A>,
    session_repo: Arc<S>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<A, S> SignInUseCase<A, S>
where
    A: AccountRepository,
    S: LoginSessionRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        session_repo: Arc<S>,
        codec: Arc<TokenCodec>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            account_repo,
            session_repo,
            codec,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        client: ClientMetadata,
    ) -> AuthResult<SignInOutput> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let password = RawPassword::for_sign_in(input.password)?;

        // A name that could never have been created cannot exist; skip the
        // query but still pay for one hash below.
        let account = match UserName::new(&input.username) {
            Ok(user_name) => {
                bounded(
                    self.config.db_timeout,
                    "find account",
                    self.account_repo.find_by_user_name(&user_name),
                )
                .await?
            }
            Err(_) => None,
        };

        let pepper = self.config.password_pepper.clone();
        let stored_hash = account.as_ref().map(|a| a.password_hash.clone());
        let password_valid = blocking(move || match stored_hash {
            Some(hash) => hash.verify(&password, pepper.as_deref()),
            None => password.verify_against_dummy(pepper.as_deref()),
        })
        .await?;

        let account = match account {
            Some(account) if password_valid => account,
            _ => {
                tracing::warn!(username = %input.username, "Sign in rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let issued = self.codec.issue(&TokenSubject::from(&account))?;

        let created_at = issued.claims.issued_at().unwrap_or_else(chrono::Utc::now);
        let expires_at = issued
            .claims
            .expires_at()
            .ok_or_else(|| AuthError::Internal("Token expiry out of range".to_string()))?;
        let session = LoginSession::new(
            account.account_id,
            &issued.token,
            &client,
            created_at,
            expires_at,
        );

        let audit_recorded = match bounded(
            self.config.db_timeout,
            "record login",
            self.session_repo.record_login(&session),
        )
        .await
        {
            Ok(()) => true,
            Err(e) if self.config.audit_strict => return Err(e),
            Err(e) => {
                tracing::warn!(
                    account_id = %account.account_id,
                    error = %e,
                    "Login audit not recorded; continuing"
                );
                false
            }
        };

        tracing::info!(
            account_id = %account.account_id,
            username = %account.user_name,
            session_id = %session.session_id,
            browser = %client.device.browser,
            os = %client.device.os,
            "User signed in"
        );

        Ok(SignInOutput {
            token: issued.token,
            claims: issued.claims,
            account,
            device: client.device,
            audit_recorded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::StaticSecret;
    use crate::infra::memory::InMemoryAuthRepository;
    use axum::http::HeaderMap;
    use platform::crypto::token_digest;
    use std::time::Duration;

    const PASSWORD: &str = "Quiet-River-42";

    struct Fixture {
        repo: InMemoryAuthRepository,
        codec: Arc<TokenCodec>,
        use_case: SignInUseCase<InMemoryAuthRepository, InMemoryAuthRepository>,
    }

    async fn fixture(config: AuthConfig) -> Fixture {
        let repo = InMemoryAuthRepository::new();
        repo.seed_account("alice", PASSWORD, "Records", config.pepper())
            .await
            .unwrap();

        let codec = Arc::new(TokenCodec::new(
            Arc::new(StaticSecret::new("sign-in-secret")),
            config.session_ttl,
        ));
        let use_case = SignInUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            codec.clone(),
            Arc::new(config),
        );

        Fixture {
            repo,
            codec,
            use_case,
        }
    }

    fn input(username: &str, password: &str) -> SignInInput {
        SignInInput {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn client() -> ClientMetadata {
        ClientMetadata::from_headers(&HeaderMap::new(), None)
    }

    #[tokio::test]
    async fn test_sign_in_success_records_audit() {
        let f = fixture(AuthConfig::development()).await;

        let out = f
            .use_case
            .execute(input("alice", PASSWORD), client())
            .await
            .unwrap();

        assert!(out.audit_recorded);
        assert_eq!(out.account.user_name.as_str(), "alice");
        assert_eq!(f.codec.verify(&out.token), Some(out.claims.clone()));

        let sessions = f.repo.login_sessions().await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].token_digest, token_digest(&out.token));
        assert_eq!(sessions[0].expires_at.timestamp(), out.claims.exp);

        let stored = f.repo.account("alice").await.unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let f = fixture(AuthConfig::development()).await;

        let unknown = f
            .use_case
            .execute(input("nobody", PASSWORD), client())
            .await;
        let wrong = f
            .use_case
            .execute(input("alice", "Quiet-River-43"), client())
            .await;
        let unusable_name = f
            .use_case
            .execute(input("not a name", PASSWORD), client())
            .await;

        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unusable_name, Err(AuthError::InvalidCredentials)));
        assert!(f.repo.login_sessions().await.is_empty());
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let f = fixture(AuthConfig::development()).await;

        let result = f.use_case.execute(input("Alice", PASSWORD), client()).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_empty_fields_are_validation_errors() {
        let f = fixture(AuthConfig::development()).await;

        for (username, password) in [("", PASSWORD), ("alice", ""), ("", "")] {
            let result = f.use_case.execute(input(username, password), client()).await;
            assert!(matches!(result, Err(AuthError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_blank_but_present_fields_are_checked_as_credentials() {
        let f = fixture(AuthConfig::development()).await;

        for (username, password) in [("alice", "   "), ("   ", PASSWORD), ("  ", "  ")] {
            let result = f.use_case.execute(input(username, password), client()).await;
            assert!(
                matches!(result, Err(AuthError::InvalidCredentials)),
                "{username:?}/{password:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_audit_failure_is_tolerated_by_default() {
        let f = fixture(AuthConfig::development()).await;
        f.repo.fail_login_records(true);

        let out = f
            .use_case
            .execute(input("alice", PASSWORD), client())
            .await
            .unwrap();

        assert!(!out.audit_recorded);
        assert!(f.codec.verify(&out.token).is_some());
        // Rolled back as a unit
        assert!(f.repo.login_sessions().await.is_empty());
        assert!(f.repo.account("alice").await.unwrap().last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_audit_failure_fails_login_in_strict_mode() {
        let f = fixture(AuthConfig {
            audit_strict: true,
            ..AuthConfig::development()
        })
        .await;
        f.repo.fail_login_records(true);

        let result = f.use_case.execute(input("alice", PASSWORD), client()).await;
        assert!(matches!(result, Err(AuthError::Transaction(_))));
    }

    #[tokio::test]
    async fn test_missing_secret_fails_after_password_check() {
        let repo = InMemoryAuthRepository::new();
        repo.seed_account("alice", PASSWORD, "Records", None)
            .await
            .unwrap();
        let config = Arc::new(AuthConfig::development());
        let codec = Arc::new(TokenCodec::new(
            Arc::new(StaticSecret::missing()),
            config.session_ttl,
        ));
        let use_case =
            SignInUseCase::new(Arc::new(repo.clone()), Arc::new(repo.clone()), codec, config);

        let result = use_case.execute(input("alice", PASSWORD), client()).await;
        assert!(matches!(result, Err(AuthError::SecretUnavailable)));
        assert!(repo.login_sessions().await.is_empty());
    }

    #[tokio::test]
    async fn test_slow_lookup_times_out() {
        let f = fixture(AuthConfig {
            db_timeout: Duration::from_millis(50),
            ..AuthConfig::development()
        })
        .await;
        f.repo.set_latency(Duration::from_secs(5));

        let result = f.use_case.execute(input("alice", PASSWORD), client()).await;
        assert!(matches!(result, Err(AuthError::Timeout(_))));
    }
}
