//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{account::Account, login_session::LoginSession};
use crate::domain::repository::{AccountRepository, LoginSessionRepository};
use crate::domain::value_object::{
    division::Division, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                user_name,
                password_hash,
                division,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.user_name.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.division.as_str())
        .bind(account.last_login_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UserNameTaken,
            _ => AuthError::Database(e),
        })?;

        Ok(())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<Account>> {
        // Plain `=` on TEXT: exact, case-sensitive match
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                user_name,
                password_hash,
                division,
                last_login_at,
                created_at,
                updated_at
            FROM accounts
            WHERE user_name = $1
            "#,
        )
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE user_name = $1)")
                .bind(user_name.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Login Session Repository Implementation
// ============================================================================

impl LoginSessionRepository for PgAuthRepository {
    async fn record_login(&self, session: &LoginSession) -> AuthResult<()> {
        let mut tx = self.pool.begin().await.map_err(AuthError::Transaction)?;

        sqlx::query(
            r#"
            INSERT INTO login_sessions (
                session_id,
                account_id,
                token_digest,
                browser,
                os,
                device_type,
                client_ip,
                user_agent,
                created_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.account_id.as_uuid())
        .bind(&session.token_digest)
        .bind(&session.browser)
        .bind(&session.os)
        .bind(&session.device_type)
        .bind(&session.client_ip)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(AuthError::Transaction)?;

        let updated = sqlx::query(
            r#"
            UPDATE accounts
            SET last_login_at = $2, updated_at = $2
            WHERE account_id = $1
            "#,
        )
        .bind(session.account_id.as_uuid())
        .bind(session.created_at)
        .execute(&mut *tx)
        .await
        .map_err(AuthError::Transaction)?
        .rows_affected();

        if updated != 1 {
            // Dropping `tx` rolls back the insert
            return Err(AuthError::Transaction(sqlx::Error::RowNotFound));
        }

        tx.commit().await.map_err(AuthError::Transaction)?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    user_name: String,
    password_hash: String,
    division: String,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            user_name: UserName::from_db(self.user_name),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            division: Division::from_db(self.division),
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
