//! CLI configuration: thin wrapper around `alarmdesk_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --username, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use alarmdesk_core::{AlarmSearchStatus, AuthCredentials, ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use alarmdesk_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

/// Everything a platform-bound command needs from configuration.
#[derive(Debug)]
pub struct Session {
    pub controller: ControllerConfig,
    pub page_size: u32,
    pub default_status: AlarmSearchStatus,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Build the session from the active profile, or from flags alone when
/// no profile exists.
pub fn resolve_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    match cfg.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, global, &cfg.defaults),
        None => resolve_flags_only(global, &profile_name, &cfg.defaults),
    }
}

/// Translate a `Profile` + global flags into a `Session`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<Session, CliError> {
    // 1. URL (flag > env > profile)
    let url = parse_url(global.url.as_deref().unwrap_or(&profile.url))?;

    // 2. Credentials (token flag > username flag/profile + password chain)
    let auth = if let Some(ref token) = global.token {
        AuthCredentials::Token(SecretString::from(token.clone()))
    } else {
        let username = global
            .username
            .clone()
            .or_else(|| profile.username.clone())
            .ok_or_else(|| CliError::NoCredentials {
                profile: profile_name.into(),
            })?;
        let password = alarmdesk_config::resolve_password(profile, profile_name).ok_or_else(
            || CliError::NoCredentials {
                profile: profile_name.into(),
            },
        )?;
        AuthCredentials::Password { username, password }
    };

    // 3. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        alarmdesk_config::profile_tls(profile, defaults)
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);

    Ok(Session {
        controller: ControllerConfig {
            url,
            auth,
            tls,
            timeout: Duration::from_secs(timeout),
        },
        page_size: profile.page_size.unwrap_or(defaults.page_size),
        default_status: profile.default_status.unwrap_or_default(),
    })
}

/// Build a session from flags and env vars when no profile is configured.
fn resolve_flags_only(
    global: &GlobalOpts,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<Session, CliError> {
    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = parse_url(url_str)?;

    let auth = if let Some(ref token) = global.token {
        AuthCredentials::Token(SecretString::from(token.clone()))
    } else {
        let bare = Profile {
            url: url_str.to_owned(),
            username: global.username.clone(),
            ..Profile::default()
        };
        let (username, password) = alarmdesk_config::resolve_credentials(&bare, profile_name)?;
        AuthCredentials::Password { username, password }
    };

    let tls = if global.insecure || defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(Session {
        controller: ControllerConfig {
            url,
            auth,
            tls,
            timeout: Duration::from_secs(global.timeout.unwrap_or(defaults.timeout)),
        },
        page_size: defaults.page_size,
        default_status: AlarmSearchStatus::default(),
    })
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}
