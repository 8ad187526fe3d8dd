// ── Controller abstraction ──
//
// Facade between the CLI and the platform REST client. Owns the
// authenticated `PlatformClient`, caches the signed-in user and routes
// alarm mutations through the permission rule.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use alarmdesk_api::types::EntityIdRef;
use alarmdesk_api::{Credentials, PlatformClient, TlsMode, TransportConfig};

use crate::command::{Command, CommandResult};
use crate::config::{AuthCredentials, ControllerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{AlarmRecord, AlarmSearchStatus, AlarmStatus, CurrentUser, Page};
use crate::permission::can_modify_alarm;
use crate::query::{AlarmFetcher, AlarmQuery};

/// Main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    client: PlatformClient,
    user: RwLock<Option<CurrentUser>>,
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}

impl Controller {
    /// Create a controller. Does NOT connect; call
    /// [`connect()`](Self::connect) to authenticate.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let client = PlatformClient::new(config.url.clone(), &build_transport(&config))?;
        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                user: RwLock::new(None),
            }),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Authenticate and load the signed-in user.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let credentials = match &self.inner.config.auth {
            AuthCredentials::Password { username, password } => Credentials::Password {
                username: username.clone(),
                password: password.clone(),
            },
            AuthCredentials::Token(token) => Credentials::Token(token.clone()),
        };
        self.inner.client.authenticate(&credentials).await?;

        let user = CurrentUser::try_from(self.inner.client.current_user().await?)?;
        info!(email = %user.email, authority = %user.authority, "connected to platform");
        *self.inner.user.write().await = Some(user);
        Ok(())
    }

    /// The signed-in user, as loaded by [`connect()`](Self::connect).
    pub async fn current_user(&self) -> Result<CurrentUser, CoreError> {
        self.inner
            .user
            .read()
            .await
            .clone()
            .ok_or(CoreError::NotConnected)
    }

    // ── Reads ────────────────────────────────────────────────────

    pub async fn get_alarm(&self, alarm_id: &Uuid) -> Result<AlarmRecord, CoreError> {
        let client = &self.inner.client;
        let raw = self
            .with_refresh(move || client.get_alarm_info(alarm_id))
            .await
            .map_err(|e| match e {
                alarmdesk_api::Error::Api { status: 404, .. } => CoreError::AlarmNotFound {
                    identifier: alarm_id.to_string(),
                },
                other => other.into(),
            })?;
        AlarmRecord::try_from(raw)
    }

    async fn search(&self, query: &AlarmQuery) -> Result<Page<AlarmRecord>, CoreError> {
        let scope = query.scope.as_ref().map(EntityIdRef::from);
        let params = query.to_query_params();
        let (client, scope, params) = (&self.inner.client, scope.as_ref(), &params);
        let page = self
            .with_refresh(move || client.get_alarms(scope, params))
            .await?;
        debug!(
            returned = page.data.len(),
            total = page.total_elements,
            "alarm page received"
        );

        Page::from(page).try_map(AlarmRecord::try_from)
    }

    // ── Command execution ────────────────────────────────────────

    /// Run a mutation against one alarm.
    ///
    /// Acknowledge and clear are refused locally when the signed-in user
    /// may not modify the alarm.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let alarm_id = cmd.alarm_id();

        if cmd.requires_modify_permission() {
            let user = self.current_user().await?;
            let alarm = self.get_alarm(&alarm_id).await?;
            if !can_modify_alarm(&user, &alarm) {
                return Err(CoreError::PermissionDenied {
                    message: format!("{} may not {} alarm {alarm_id}", user.email, cmd.verb()),
                });
            }
            if let Some(reason) = already_done(cmd, alarm.status) {
                return Ok(CommandResult::Unchanged { reason });
            }
        }

        let client = &self.inner.client;
        let alarm_id = &alarm_id;
        match cmd {
            Command::Acknowledge { .. } => {
                self.with_refresh(move || client.ack_alarm(alarm_id)).await?;
            }
            Command::Clear { .. } => {
                self.with_refresh(move || client.clear_alarm(alarm_id)).await?;
            }
            Command::Assign { ref user_id, .. } => {
                self.with_refresh(move || client.assign_alarm(alarm_id, user_id))
                    .await?;
            }
            Command::Unassign { .. } => {
                self.with_refresh(move || client.unassign_alarm(alarm_id)).await?;
            }
        }
        debug!(%alarm_id, action = cmd.verb(), "command applied");
        Ok(CommandResult::Ok)
    }

    /// Run `op`; when the platform reports the access token expired,
    /// refresh it once and run `op` again.
    async fn with_refresh<T, F, Fut>(&self, op: F) -> Result<T, alarmdesk_api::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, alarmdesk_api::Error>>,
    {
        match op().await {
            Err(alarmdesk_api::Error::SessionExpired) => {
                info!("access token expired, refreshing");
                self.inner.client.refresh().await?;
                op().await
            }
            other => other,
        }
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Connect, run the closure, return its result.
    pub async fn oneshot<F, Fut, T>(config: ControllerConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let controller = Controller::new(config)?;
        controller.connect().await?;
        f(controller).await
    }
}

fn already_done(cmd: Command, status: AlarmStatus) -> Option<String> {
    match cmd {
        Command::Acknowledge { .. } if AlarmSearchStatus::Ack.matches(status) => {
            Some("alarm is already acknowledged".into())
        }
        Command::Clear { .. } if AlarmSearchStatus::Cleared.matches(status) => {
            Some("alarm is already cleared".into())
        }
        _ => None,
    }
}

impl AlarmFetcher for Controller {
    async fn fetch_alarms(&self, query: &AlarmQuery) -> Result<Page<AlarmRecord>, CoreError> {
        self.search(query).await.map_err(CoreError::fetch_failed)
    }
}
