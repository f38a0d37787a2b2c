//! Create Account Use Case
//!
//! Provisions a new account. Only reachable by an already signed-in user.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{blocking, bounded};
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    division::Division,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Create account input
pub struct CreateAccountInput {
    pub username: String,
    pub password: String,
    pub division: String,
}

/// Create account use case
pub struct CreateAccountUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> CreateAccountUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub async fn execute(&self, input: CreateAccountInput) -> AuthResult<Account> {
        let user_name =
            UserName::new(&input.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        let division = Division::new(&input.division).map_err(AuthError::Validation)?;
        let raw_password = RawPassword::new(input.password)?;

        let taken = bounded(
            self.config.db_timeout,
            "check user name",
            self.account_repo.exists_by_user_name(&user_name),
        )
        .await?;
        if taken {
            return Err(AuthError::UserNameTaken);
        }

        let pepper = self.config.password_pepper.clone();
        let password_hash =
            blocking(move || UserPassword::from_raw(&raw_password, pepper.as_deref())).await??;

        let account = Account::new(user_name, password_hash, division);

        // A concurrent insert of the same name still surfaces as UserNameTaken
        bounded(
            self.config.db_timeout,
            "create account",
            self.account_repo.create(&account),
        )
        .await?;

        tracing::info!(
            account_id = %account.account_id,
            username = %account.user_name,
            division = %account.division,
            "Account created"
        );

        Ok(account)
    }
}
