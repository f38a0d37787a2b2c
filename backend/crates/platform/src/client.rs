//! Client identification utilities
//!
//! Reads the client IP and a coarse device description from request headers.
//! The result is informational (audit records, login responses) and is never
//! used to make an authentication decision.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Longest User-Agent kept for storage
const MAX_USER_AGENT_LEN: usize = 512;

/// Form factor guessed from the User-Agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Bot,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Bot => "bot",
            DeviceType::Unknown => "unknown",
        }
    }
}

/// Browser / OS / form factor of a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub browser: String,
    pub os: String,
    pub device_type: DeviceType,
}

impl DeviceInfo {
    pub fn unknown() -> Self {
        Self {
            browser: "Unknown".to_string(),
            os: "Unknown".to_string(),
            device_type: DeviceType::Unknown,
        }
    }

    /// Classify a User-Agent string
    ///
    /// Order matters: Edge and Opera embed "Chrome", Chrome embeds "Safari",
    /// Android embeds "Linux" and iPadOS may embed "Mac OS X".
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent;

        if ua.trim().is_empty() {
            return Self::unknown();
        }

        let lower = ua.to_ascii_lowercase();
        if ["bot", "crawler", "spider", "curl/", "wget/"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            return Self {
                browser: "Bot".to_string(),
                os: "Unknown".to_string(),
                device_type: DeviceType::Bot,
            };
        }

        let browser = if ua.contains("Edg/") || ua.contains("Edge/") {
            "Edge"
        } else if ua.contains("OPR/") || ua.contains("Opera") {
            "Opera"
        } else if ua.contains("Firefox/") || ua.contains("FxiOS/") {
            "Firefox"
        } else if ua.contains("Chrome/") || ua.contains("CriOS/") {
            "Chrome"
        } else if ua.contains("Safari/") {
            "Safari"
        } else {
            "Unknown"
        };

        let os = if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
            "iOS"
        } else if ua.contains("Android") {
            "Android"
        } else if ua.contains("Windows") {
            "Windows"
        } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
            "macOS"
        } else if ua.contains("CrOS") {
            "ChromeOS"
        } else if ua.contains("Linux") {
            "Linux"
        } else {
            "Unknown"
        };

        let device_type = if ua.contains("iPad") || ua.contains("Tablet") {
            DeviceType::Tablet
        } else if ua.contains("Android") && !ua.contains("Mobile") {
            DeviceType::Tablet
        } else if ua.contains("Mobile") || ua.contains("iPhone") || ua.contains("iPod") {
            DeviceType::Mobile
        } else if os == "Unknown" {
            DeviceType::Unknown
        } else {
            DeviceType::Desktop
        };

        Self {
            browser: browser.to_string(),
            os: os.to_string(),
            device_type,
        }
    }
}

/// Everything recorded about the client of a request
#[derive(Debug, Clone)]
pub struct ClientMetadata {
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
    pub device: DeviceInfo,
}

impl ClientMetadata {
    /// Build from request headers and the socket peer address
    pub fn from_headers(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect::<String>());

        let device = user_agent
            .as_deref()
            .map(DeviceInfo::from_user_agent)
            .unwrap_or_else(DeviceInfo::unknown);

        Self {
            ip: extract_client_ip(headers, direct_ip),
            user_agent,
            device,
        }
    }

    /// IP as string (for database storage)
    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For first (reverse proxy setups), then falls back to
/// the direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
