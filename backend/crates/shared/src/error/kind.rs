//! Error Kind
//!
//! Coarse classification of an [`AppError`](super::app_error::AppError).
//! Each kind owns an HTTP status, a reason phrase and a fallback code.

use serde::Serialize;

/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Conflict.status_code(), 409);
/// assert_eq!(ErrorKind::Conflict.default_code(), "CONFLICT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Missing or malformed input
    BadRequest,
    /// Missing, wrong or unverifiable credentials
    Unauthorized,
    NotFound,
    /// e.g. a username that is already taken
    Conflict,
    /// Anything the client cannot fix; the message stays generic
    InternalServerError,
}

impl ErrorKind {
    pub const fn status_code(&self) -> u16 {
        self.parts().0
    }

    /// Reason phrase, used as the `title` of the JSON body
    pub const fn as_str(&self) -> &'static str {
        self.parts().1
    }

    /// Code sent when the error does not carry a more specific one
    pub const fn default_code(&self) -> &'static str {
        self.parts().2
    }

    const fn parts(&self) -> (u16, &'static str, &'static str) {
        match self {
            ErrorKind::BadRequest => (400, "Bad Request", "VALIDATION_ERROR"),
            ErrorKind::Unauthorized => (401, "Unauthorized", "UNAUTHORIZED"),
            ErrorKind::NotFound => (404, "Not Found", "NOT_FOUND"),
            ErrorKind::Conflict => (409, "Conflict", "CONFLICT"),
            ErrorKind::InternalServerError => (500, "Internal Server Error", "INTERNAL_ERROR"),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
