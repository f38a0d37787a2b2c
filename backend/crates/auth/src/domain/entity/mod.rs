//! Entity Module

pub mod account;
pub mod login_session;
