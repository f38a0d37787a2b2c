//! In-Memory Repository Implementation
//!
//! Process-local stand-in for PostgreSQL. Used by tests and by the API when
//! it runs without a database. Failure and latency can be injected.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::entity::{account::Account, login_session::LoginSession};
use crate::domain::repository::{AccountRepository, LoginSessionRepository};
use crate::domain::value_object::{
    division::Division,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    /// Keyed by exact user name
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    login_sessions: Arc<RwLock<Vec<LoginSession>>>,
    fail_login_records: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password and store an account directly
    pub async fn seed_account(
        &self,
        user_name: &str,
        password: &str,
        division: &str,
        pepper: Option<&[u8]>,
    ) -> AuthResult<Account> {
        let user_name =
            UserName::new(user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let division = Division::new(division).map_err(AuthError::Validation)?;
        let raw = RawPassword::new(password.to_string())?;
        let account = Account::new(user_name, UserPassword::from_raw(&raw, pepper)?, division);

        self.create(&account).await?;
        Ok(account)
    }

    pub async fn account(&self, user_name: &str) -> Option<Account> {
        self.accounts.read().await.get(user_name).cloned()
    }

    pub async fn login_sessions(&self) -> Vec<LoginSession> {
        self.login_sessions.read().await.clone()
    }

    /// Make every `record_login` fail without writing anything
    pub fn fail_login_records(&self, fail: bool) {
        self.fail_login_records.store(fail, Ordering::SeqCst);
    }

    /// Delay every repository call
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    async fn simulate_latency(&self) {
        let millis = self.latency_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

impl AccountRepository for InMemoryAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        self.simulate_latency().await;

        let mut accounts = self.accounts.write().await;
        let key = account.user_name.as_str().to_string();
        if accounts.contains_key(&key) {
            return Err(AuthError::UserNameTaken);
        }
        accounts.insert(key, account.clone());

        Ok(())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<Account>> {
        self.simulate_latency().await;

        Ok(self.accounts.read().await.get(user_name.as_str()).cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        self.simulate_latency().await;

        Ok(self.accounts.read().await.contains_key(user_name.as_str()))
    }
}

impl LoginSessionRepository for InMemoryAuthRepository {
    async fn record_login(&self, session: &LoginSession) -> AuthResult<()> {
        self.simulate_latency().await;

        // Both locks held: the two writes are visible together or not at all
        let mut accounts = self.accounts.write().await;
        let mut sessions = self.login_sessions.write().await;

        if self.fail_login_records.load(Ordering::SeqCst) {
            return Err(AuthError::Transaction(sqlx::Error::Protocol(
                "injected audit failure".to_string(),
            )));
        }

        let account = accounts
            .values_mut()
            .find(|a| a.account_id == session.account_id)
            .ok_or(AuthError::Transaction(sqlx::Error::RowNotFound))?;

        account.record_login(session.created_at);
        sessions.push(session.clone());

        Ok(())
    }
}
