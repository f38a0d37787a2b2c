//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use crate::domain::entity::{account::Account, login_session::LoginSession};
use crate::domain::value_object::user_name::UserName;
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account; `AuthError::UserNameTaken` on a duplicate name
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Exact, case-sensitive lookup
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<Account>>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;
}

/// Login audit repository trait
#[trait_variant::make(LoginSessionRepository: Send)]
pub trait LocalLoginSessionRepository {
    /// Insert the audit record and stamp the account's `last_login_at`
    ///
    /// Both writes commit together or not at all. Failures are reported as
    /// `AuthError::Transaction`.
    async fn record_login(&self, session: &LoginSession) -> AuthResult<()>;
}
