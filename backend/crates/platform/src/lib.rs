//! Platform Crate - Technical Infrastructure
//!
//! Technical building blocks shared by the Doctrack backend:
//! - Session cookie adapter (`Set-Cookie` building, `Cookie` parsing)
//! - Password hashing (Argon2id) and password policy
//! - Client metadata (IP, browser/OS/device from User-Agent)
//! - Small cryptographic helpers

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
