//! Server Configuration
//!
//! Everything is read from the environment (after `.env` is loaded) once at
//! startup and passed down explicitly.

use anyhow::{Context, bail};
use auth::{AuthConfig, StaticSecret};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_DB_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_BOOTSTRAP_DIVISION: &str = "Administration";

/// First account, created at startup when it does not exist yet
pub struct BootstrapAccount {
    pub username: String,
    pub password: String,
    pub division: String,
}

pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub secret: StaticSecret,
    pub bootstrap: Option<BootstrapAccount>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:3000")?;

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let db_timeout_ms = match env::var("DB_TIMEOUT_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("DB_TIMEOUT_MS must be a whole number of milliseconds")?,
            Err(_) => DEFAULT_DB_TIMEOUT_MS,
        };

        let auth = AuthConfig {
            cookie_secure: env_flag("COOKIE_SECURE")?,
            audit_strict: env_flag("AUDIT_STRICT")?,
            db_timeout: Duration::from_millis(db_timeout_ms),
            password_pepper: env::var("PASSWORD_PEPPER")
                .ok()
                .filter(|p| !p.is_empty())
                .map(String::into_bytes),
            ..AuthConfig::default()
        };

        Ok(Self {
            bind_addr,
            database_url,
            frontend_origins,
            auth,
            secret: signing_secret()?,
            bootstrap: bootstrap_account(),
        })
    }
}

/// `JWT_SECRET`, or a per-process random secret in debug builds
fn signing_secret() -> anyhow::Result<StaticSecret> {
    let secret = StaticSecret::from_env("JWT_SECRET");
    if secret.is_present() {
        return Ok(secret);
    }

    if cfg!(debug_assertions) {
        tracing::warn!("JWT_SECRET not set; using a random secret, sessions end on restart");
        Ok(StaticSecret::random())
    } else {
        bail!("JWT_SECRET must be set in release builds")
    }
}

fn bootstrap_account() -> Option<BootstrapAccount> {
    let username = env::var("BOOTSTRAP_USERNAME").ok().filter(|v| !v.is_empty())?;
    let password = env::var("BOOTSTRAP_PASSWORD").ok().filter(|v| !v.is_empty())?;
    let division = env::var("BOOTSTRAP_DIVISION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BOOTSTRAP_DIVISION.to_string());

    Some(BootstrapAccount {
        username,
        password,
        division,
    })
}

fn env_flag(name: &str) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw).with_context(|| format!("{name} must be true or false")),
        Err(_) => Ok(false),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
