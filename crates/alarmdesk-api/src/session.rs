// Session endpoints
//
// JWT login, token refresh and the "who am I" lookup. The token obtained
// here is stored on the client and attached to every later request.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::auth::{Credentials, JwtPair, LOGIN_PATH, REFRESH_PATH, RawJwtPair};
use crate::client::PlatformClient;
use crate::error::Error;
use crate::types::UserResponse;

impl PlatformClient {
    /// Exchange username/password for a JWT pair.
    ///
    /// `POST /api/auth/login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<JwtPair, Error> {
        debug!(username, "logging in");
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let raw: RawJwtPair = self.post_anonymous(LOGIN_PATH, &body).await?;
        let pair = JwtPair::from(raw);
        self.set_token(pair.token.clone());
        self.set_refresh_token(pair.refresh_token.clone());

        info!(username, "login successful");
        Ok(pair)
    }

    /// Authenticate with whichever credential kind was configured.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<(), Error> {
        match credentials {
            Credentials::Password { username, password } => {
                self.login(username, password).await?;
            }
            Credentials::Token(token) => {
                debug!("using pre-issued token");
                self.set_token(token.clone());
            }
        }
        Ok(())
    }

    /// Obtain a fresh JWT using the stored refresh token.
    ///
    /// `POST /api/auth/token`
    pub async fn refresh(&self) -> Result<JwtPair, Error> {
        let refresh = self.refresh_token().ok_or(Error::SessionExpired)?;
        debug!("refreshing access token");
        let body = json!({ "refreshToken": refresh.expose_secret() });

        let raw: RawJwtPair = self.post_anonymous(REFRESH_PATH, &body).await?;
        let pair = JwtPair::from(raw);
        self.set_token(pair.token.clone());
        self.set_refresh_token(pair.refresh_token.clone());
        Ok(pair)
    }

    /// The user the current token belongs to.
    ///
    /// `GET /api/auth/user`
    pub async fn current_user(&self) -> Result<UserResponse, Error> {
        self.get("api/auth/user", &[]).await
    }
}
