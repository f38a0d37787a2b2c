//! Account Entity
//!
//! A person who can sign in. Accounts are provisioned by an authenticated
//! operator; there is no self-service sign-up.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{
    division::Division, user_name::UserName, user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub user_name: UserName,
    pub password_hash: UserPassword,
    pub division: Division,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(user_name: UserName, password_hash: UserPassword, division: Division) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            user_name,
            password_hash,
            division,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamp a successful login
    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn sample() -> Account {
        let raw = RawPassword::new("Quiet-River-42".to_string()).unwrap();
        Account::new(
            UserName::new("alice").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
            Division::new("Records").unwrap(),
        )
    }

    #[test]
    fn test_new_account_has_no_login() {
        let account = sample();
        assert!(account.last_login_at.is_none());
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn test_record_login() {
        let mut account = sample();
        let at = Utc::now();
        account.record_login(at);
        assert_eq!(account.last_login_at, Some(at));
        assert_eq!(account.updated_at, at);
    }
}
