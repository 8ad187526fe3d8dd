// ── Runtime connection configuration ──
//
// Describes how to reach the platform. Carries credentials and
// connection tuning but never touches disk; the CLI builds a
// `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the platform.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Username and password, exchanged for a JWT at connect time.
    Password {
        username: String,
        password: SecretString,
    },
    /// A JWT issued elsewhere.
    Token(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    #[default]
    SystemDefaults,
    CustomCa(PathBuf),
    /// Skip verification (self-signed on-prem installs).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single platform instance.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Platform base URL (e.g. `https://iot.example.com`).
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ControllerConfig {
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
