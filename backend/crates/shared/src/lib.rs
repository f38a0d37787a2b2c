//! Shared Kernel
//!
//! The smallest cross-crate vocabulary of Doctrack:
//! - the unified error type and its HTTP classification
//! - typed UUID identifiers
//!
//! Nothing here knows about sessions, cookies or passwords.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
