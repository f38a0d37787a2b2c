//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and the session gate.

pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extractor::{AuthenticatedUser, ClientInfo, SessionState};
pub use handlers::AuthAppState;
pub use middleware::{PathClass, classify_path, session_gate};
pub use router::auth_router;
