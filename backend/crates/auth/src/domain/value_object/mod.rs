//! Value Object Module

pub mod division;
pub mod user_name;
pub mod user_password;
