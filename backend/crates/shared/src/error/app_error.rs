//! Application Error
//!
//! [`AppError`] is what finally reaches an HTTP client. Crate-local error
//! enums (e.g. `auth::AuthError`) decide kind, code and wording, then hand
//! over an `AppError` for rendering.

use std::borrow::Cow;
use std::fmt;

use super::kind::ErrorKind;

type Text = Cow<'static, str>;

/// Client-facing error
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Unauthorized, "Invalid username or password")
///     .with_code("INVALID_CREDENTIALS");
/// assert_eq!(err.code(), "INVALID_CREDENTIALS");
/// assert_eq!(err.status_code(), 401);
/// ```
#[derive(Debug, Clone)]
pub struct AppError {
    kind: ErrorKind,
    code: Option<Text>,
    message: Text,
    action: Option<Text>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Text>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            action: None,
        }
    }

    pub fn not_found(message: impl Into<Text>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Replace the kind's default code
    pub fn with_code(self, code: impl Into<Text>) -> Self {
        Self {
            code: Some(code.into()),
            ..self
        }
    }

    /// Hint shown next to the message, e.g. "Please sign in"
    pub fn with_action(self, action: impl Into<Text>) -> Self {
        Self {
            action: Some(action.into()),
            ..self
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        match &self.code {
            Some(code) => code,
            None => self.kind.default_code(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.status_code(), self.message, self.code())
    }
}

impl std::error::Error for AppError {}
