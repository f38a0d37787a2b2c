//! Argon2id password hashing
//!
//! Clear text lives in [`ClearTextPassword`], which is NFKC-normalized on
//! construction and wiped on drop. Stored hashes are PHC strings wrapped in
//! [`HashedPassword`]. An optional server-side pepper is appended before
//! hashing.
//!
//! The policy (length, control characters, guessable patterns) applies to
//! newly chosen passwords only. Login input is accepted as long as it is not
//! blank, so accounts created under an older policy keep working.

use std::fmt;
use std::sync::LazyLock;

use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto;

/// Code points
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Code points
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Guessable passwords refused regardless of length
const DENYLIST: &[&str] = &[
    "password",
    "password1",
    "password123",
    "abcdefgh",
    "iloveyou",
    "letmein1",
    "welcome1",
    "admin123",
    "trustno1",
    "doctrack",
    "doctrack1",
];

/// Keyboard walks refused anywhere in the password
const KEYBOARD_WALKS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];

/// Verified against when the username is unknown, so a miss costs the same
/// Argon2 run as a wrong password. Built by [`prepare_dummy_hash`] at startup.
static DUMMY_HASH: LazyLock<Option<HashedPassword>> = LazyLock::new(|| {
    let filler = crypto::to_base64_url(&crypto::random_bytes(24));
    ClearTextPassword(filler).hash(None).ok()
});

/// Build the unknown-user hash now instead of on the first miss
///
/// Returns `false` if hashing failed; unknown-user logins then skip the
/// dummy verification.
pub fn prepare_dummy_hash() -> bool {
    LazyLock::force(&DUMMY_HASH).is_some()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    TooShort,

    #[error("Password must be at most {} characters", MAX_PASSWORD_LENGTH)]
    TooLong,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too easy to guess")]
    Guessable,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    Hashing(password_hash::Error),

    #[error("Stored password hash is not a valid PHC string")]
    Malformed,
}

/// Clear text password; never `Clone`, redacted in `Debug`
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// A newly chosen password, checked against the policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw)?;
        if password.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        check_policy(&password.0)?;
        Ok(password)
    }

    /// A password typed at login; anything but the empty string is accepted
    pub fn for_verification(mut raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self(raw.nfkc().collect());
        raw.zeroize();

        if password.0.is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }
        Ok(password)
    }

    fn with_pepper(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(Vec::with_capacity(
            self.0.len() + pepper.map_or(0, <[u8]>::len),
        ));
        bytes.extend_from_slice(self.0.as_bytes());
        bytes.extend_from_slice(pepper.unwrap_or_default());
        bytes
    }

    /// Argon2id with default (OWASP baseline) parameters and a random salt
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(&self.with_pepper(pepper), &salt)
            .map_err(PasswordHashError::Hashing)?
            .to_string();

        Ok(HashedPassword(phc))
    }

    /// Run one verification against a throwaway hash; always `false`
    pub fn verify_against_dummy(&self, pepper: Option<&[u8]>) -> bool {
        if let Some(dummy) = DUMMY_HASH.as_ref() {
            dummy.verify(self, pepper);
        }
        false
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// PHC string of an Argon2 hash
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::Malformed)?;
        Ok(Self(phc))
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison inside `argon2`; `false` for an unparsable hash
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(&password.with_pepper(pepper), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}

fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong);
    }
    if password
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\t' | '\n'))
    {
        return Err(PasswordPolicyError::InvalidCharacter);
    }
    if is_guessable(password) {
        return Err(PasswordPolicyError::Guessable);
    }
    Ok(())
}

fn is_guessable(password: &str) -> bool {
    let lower = password.to_lowercase();

    DENYLIST.contains(&lower.as_str())
        || KEYBOARD_WALKS.iter().any(|walk| lower.contains(walk))
        || is_single_repeated_char(&lower)
        || is_digit_run(&lower)
}

fn is_single_repeated_char(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|first| chars.all(|c| c == first))
}

/// "1234...", "9876...", wrapping between 9 and 0
fn is_digit_run(s: &str) -> bool {
    let Some(digits) = s
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };

    digits.len() >= 4
        && (digits.windows(2).all(|w| w[1] == (w[0] + 1) % 10)
            || digits.windows(2).all(|w| w[0] == (w[1] + 1) % 10))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chosen(s: &str) -> Result<ClearTextPassword, PasswordPolicyError> {
        ClearTextPassword::new(s.to_string())
    }

    fn typed(s: &str) -> ClearTextPassword {
        ClearTextPassword::for_verification(s.to_string()).unwrap()
    }

    #[test]
    fn test_policy_rejections() {
        let cases = [
            ("Short1!", PasswordPolicyError::TooShort),
            ("          ", PasswordPolicyError::EmptyOrWhitespace),
            ("Correct\u{0007}Pass1", PasswordPolicyError::InvalidCharacter),
            ("password123", PasswordPolicyError::Guessable),
            ("myqwertykeys", PasswordPolicyError::Guessable),
            ("12345678", PasswordPolicyError::Guessable),
            ("98765432", PasswordPolicyError::Guessable),
            ("zzzzzzzz", PasswordPolicyError::Guessable),
        ];

        for (input, expected) in cases {
            assert_eq!(chosen(input).unwrap_err(), expected, "{input:?}");
        }
        assert_eq!(
            chosen(&"aB3".repeat(50)).unwrap_err(),
            PasswordPolicyError::TooLong
        );
    }

    #[test]
    fn test_policy_accepts() {
        for input in ["CorrectPass1", "パスワード安全です!", "20240317", "tab\tinside ok"] {
            assert!(chosen(input).is_ok(), "{input:?}");
        }
    }

    #[test]
    fn test_login_input_skips_policy() {
        assert!(ClearTextPassword::for_verification("x".to_string()).is_ok());
        assert!(ClearTextPassword::for_verification(" \t ".to_string()).is_ok());
        assert!(ClearTextPassword::for_verification(String::new()).is_err());
    }

    #[test]
    fn test_hash_then_verify() {
        let hashed = chosen("CorrectPass1").unwrap().hash(None).unwrap();

        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashed.verify(&typed("CorrectPass1"), None));
        assert!(!hashed.verify(&typed("CorrectPass2"), None));
    }

    #[test]
    fn test_normalization_applies_on_both_sides() {
        let hashed = chosen("ＣｏｒｒｅｃｔＰａｓｓ１").unwrap().hash(None).unwrap();
        assert!(hashed.verify(&typed("CorrectPass1"), None));
    }

    #[test]
    fn test_pepper_must_match() {
        let pepper: &[u8] = b"server_side_pepper";
        let hashed = chosen("CorrectPass1").unwrap().hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&typed("CorrectPass1"), Some(pepper)));
        assert!(!hashed.verify(&typed("CorrectPass1"), None));
        assert!(!hashed.verify(&typed("CorrectPass1"), Some(b"other")));
    }

    #[test]
    fn test_stored_hash_parsing() {
        let hashed = chosen("CorrectPass1").unwrap().hash(None).unwrap();
        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&typed("CorrectPass1"), None));

        assert!(matches!(
            HashedPassword::from_phc_string("not_a_valid_hash"),
            Err(PasswordHashError::Malformed)
        ));
    }

    #[test]
    fn test_dummy_never_matches() {
        assert!(prepare_dummy_hash());
        assert!(!typed("anything").verify_against_dummy(None));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = typed("secret-value");
        assert!(!format!("{password:?}").contains("secret-value"));

        let hashed = password.hash(None).unwrap();
        assert!(!format!("{hashed:?}").contains("argon2"));
    }
}
