//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::token::SessionClaims;
use crate::domain::entity::account::Account;
use platform::client::DeviceInfo;

// ============================================================================
// Shared
// ============================================================================

/// Public view of an account; never includes the password hash
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub division: String,
}

impl From<&Account> for UserDto {
    fn from(account: &Account) -> Self {
        Self {
            id: account.account_id.to_string(),
            username: account.user_name.as_str().to_string(),
            division: account.division.as_str().to_string(),
        }
    }
}

impl From<&SessionClaims> for UserDto {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            id: claims.sub.to_string(),
            username: claims.username.clone(),
            division: claims.division.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceDto {
    pub browser: String,
    pub os: String,
    pub device_type: String,
}

impl From<&DeviceInfo> for DeviceDto {
    fn from(device: &DeviceInfo) -> Self {
        Self {
            browser: device.browser.clone(),
            os: device.os.clone(),
            device_type: device.device_type.as_str().to_string(),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request; missing fields read as empty and fail validation
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub code: &'static str,
    pub message: String,
    pub user: UserDto,
    pub device: DeviceDto,
}

// ============================================================================
// Logout
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub code: &'static str,
    pub message: String,
}

// ============================================================================
// Current Session
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: UserDto,
    /// RFC 3339
    pub expires_at: Option<String>,
}

// ============================================================================
// Account Creation
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub division: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountResponse {
    pub code: &'static str,
    pub message: String,
    pub user: UserDto,
}
