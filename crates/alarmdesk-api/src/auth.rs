use secrecy::SecretString;
use serde::Deserialize;

/// Header carrying the bearer token on every authenticated request.
///
/// The platform does not read the standard `Authorization` header.
pub const AUTH_HEADER: &str = "X-Authorization";

/// Login endpoint (username + password → JWT pair).
pub const LOGIN_PATH: &str = "api/auth/login";

/// Token refresh endpoint (refresh token → new JWT pair).
pub const REFRESH_PATH: &str = "api/auth/token";

/// Credentials for authenticating against the platform.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Username/password login exchanged for a JWT at `POST /api/auth/login`.
    Password {
        username: String,
        password: SecretString,
    },

    /// A pre-issued JWT (e.g. copied from a browser session or a CI secret).
    Token(SecretString),
}

/// JWT pair returned by the login and refresh endpoints.
#[derive(Debug, Clone)]
pub struct JwtPair {
    pub token: SecretString,
    pub refresh_token: Option<SecretString>,
}

/// Wire shape of the login/refresh response body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawJwtPair {
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl From<RawJwtPair> for JwtPair {
    fn from(raw: RawJwtPair) -> Self {
        Self {
            token: SecretString::from(raw.token),
            refresh_token: raw.refresh_token.map(SecretString::from),
        }
    }
}

/// Format the header value for a bearer token.
pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
