//! User Name Value Object
//!
//! Login handle of an account. Usernames are compared exactly: no case
//! folding, no trimming, no Unicode normalization. `Alice` and `alice` are
//! different accounts.
//!
//! ## Invariants (account creation)
//! - Length: 3 to 32 characters
//! - Characters: ASCII letters, digits, `_`, `.`, `-`

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 32;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

// ============================================================================
// Error Types
// ============================================================================

/// Why a user name was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Username is required")]
    Empty,

    #[error("Username is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("Username is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    /// Anything outside `[A-Za-z0-9_.-]`, whitespace included
    #[error(
        "Invalid character {char:?} at position {position}. Only letters, digits, _, . and - are allowed"
    )]
    InvalidCharacter { char: char, position: usize },
}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated user name, stored exactly as entered
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate a user name for a new account
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let input = input.as_ref();

        if input.is_empty() {
            return Err(UserNameError::Empty);
        }

        for (position, ch) in input.chars().enumerate() {
            if !(ch.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(&ch)) {
                return Err(UserNameError::InvalidCharacter { char: ch, position });
            }
        }

        // ASCII only from here, so bytes == chars
        let length = input.len();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        Ok(Self(input.to_string()))
    }

    /// Restore from a database row without validation
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

// ============================================================================
// Tests
// ============================================================================
