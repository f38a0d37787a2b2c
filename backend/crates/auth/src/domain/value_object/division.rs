//! Division Value Object
//!
//! Organizational unit an account belongs to. Carried in the session token
//! and shown in the UI; it grants nothing by itself.

use derive_more::Display;
use serde::Serialize;

/// Maximum length of a division label (in characters)
pub const DIVISION_MAX_LENGTH: usize = 64;

#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Division(String);

impl Division {
    /// Validate a division label: trimmed, non-empty, bounded
    pub fn new(input: impl AsRef<str>) -> Result<Self, String> {
        let trimmed = input.as_ref().trim();

        if trimmed.is_empty() {
            return Err("Division is required".to_string());
        }
        if trimmed.chars().count() > DIVISION_MAX_LENGTH {
            return Err(format!(
                "Division must be at most {} characters",
                DIVISION_MAX_LENGTH
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err("Division contains invalid characters".to_string());
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Restore from a database row without validation
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
