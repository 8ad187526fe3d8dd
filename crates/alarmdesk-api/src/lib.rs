// alarmdesk-api: Async Rust client for the platform's alarm REST endpoints

pub mod alarms;
pub mod auth;
pub mod client;
pub mod error;
pub mod session;
pub mod transport;
pub mod types;

pub use auth::{Credentials, JwtPair};
pub use client::PlatformClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
