// Platform REST client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection and
// error-body decoding. Endpoint groups (session, alarms) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use std::sync::RwLock;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{AUTH_HEADER, bearer};
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::ErrorResponse;

/// Async HTTP client for the platform REST API.
///
/// Holds the JWT obtained at login (or supplied up front) and attaches it
/// as `X-Authorization: Bearer <token>` to every authenticated request.
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
    refresh_token: RwLock<Option<SecretString>>,
}

impl PlatformClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the platform root (e.g. `https://iot.example.com`);
    /// a path prefix such as `https://host/platform` is preserved.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            token: RwLock::new(None),
            refresh_token: RwLock::new(None),
        }
    }

    /// The platform base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install a JWT to use for subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing access token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    pub(crate) fn set_refresh_token(&self, token: Option<SecretString>) {
        *self.refresh_token.write().expect("token lock poisoned") = token;
    }

    pub(crate) fn refresh_token(&self) -> Option<SecretString> {
        self.refresh_token
            .read()
            .expect("token lock poisoned")
            .clone()
    }

    /// Whether a token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Drop the stored tokens.
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
        *self.refresh_token.write().expect("token lock poisoned") = None;
    }

    /// Attach the bearer header, failing if no token is installed.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let guard = self.token.read().expect("token lock poisoned");
        let token = guard.as_ref().ok_or(Error::NotLoggedIn)?;
        let mut value = HeaderValue::from_str(&bearer(token.expose_secret())).map_err(|e| {
            Error::Authentication {
                message: format!("invalid token header value: {e}"),
            }
        })?;
        value.set_sensitive(true);
        Ok(builder.header(AUTH_HEADER, value))
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/alarms"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.authorize(self.http.get(url))?.query(params).send().await?;
        self.handle_response(resp).await
    }

    /// POST without a body. The response payload (if any) is discarded;
    /// servers differ in whether they echo the updated entity.
    pub(crate) async fn post_no_response(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url))?.send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.authorize(self.http.delete(url))?.send().await?;
        self.handle_empty(resp).await
    }

    /// POST a JSON body without a token (login / refresh).
    pub(crate) async fn post_anonymous<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (anonymous)");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            trace!(len = body.len(), "response body received");
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorResponse>(&raw).ok();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            let message = parsed
                .and_then(|e| e.message)
                .unwrap_or_else(|| "unauthorized".into());
            return if self.has_token() {
                debug!("token rejected: {message}");
                Error::SessionExpired
            } else {
                Error::Authentication { message }
            };
        }

        match parsed {
            Some(err) => Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                error_code: err.error_code,
            },
            None => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                },
                error_code: None,
            },
        }
    }
}

/// Ensure the base URL path ends with `/` so relative joins keep any prefix.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
