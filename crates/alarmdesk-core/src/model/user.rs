// ── User-facing identity types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Permission level of the signed-in user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Authority {
    SysAdmin,
    TenantAdmin,
    CustomerUser,
}

/// The signed-in user, passed explicitly to anything that depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub authority: Authority,
    /// Customer the user belongs to; `None` for tenant and system admins.
    pub customer_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Name parts used to derive a display name, initials and avatar color.
///
/// Empty strings stand for missing parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl DisplayUser {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// `true` when either name part is non-empty.
    pub fn has_name(&self) -> bool {
        !self.first_name.is_empty() || !self.last_name.is_empty()
    }
}

impl From<&CurrentUser> for DisplayUser {
    fn from(u: &CurrentUser) -> Self {
        Self {
            first_name: u.first_name.clone().unwrap_or_default(),
            last_name: u.last_name.clone().unwrap_or_default(),
            email: u.email.clone(),
        }
    }
}
