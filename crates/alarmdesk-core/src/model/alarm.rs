// ── Alarm domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use super::entity_id::EntityId;
use super::user::DisplayUser;

/// Alarm severity, most severe first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AlarmSeverity {
    Critical,
    Major,
    Minor,
    Warning,
    Indeterminate,
}

/// Lifecycle status: active/cleared crossed with acknowledged/unacknowledged.
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AlarmStatus {
    ActiveUnack,
    ActiveAck,
    ClearedUnack,
    ClearedAck,
}

impl AlarmStatus {
    /// Derive the status from the `acknowledged` / `cleared` flags newer
    /// servers report instead of a combined status string.
    pub fn from_flags(acknowledged: bool, cleared: bool) -> Self {
        match (cleared, acknowledged) {
            (false, false) => Self::ActiveUnack,
            (false, true) => Self::ActiveAck,
            (true, false) => Self::ClearedUnack,
            (true, true) => Self::ClearedAck,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::ActiveUnack | Self::ActiveAck)
    }

    pub fn is_acknowledged(self) -> bool {
        matches!(self, Self::ActiveAck | Self::ClearedAck)
    }
}

/// Status filter for alarm searches. `Any` places no restriction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AlarmSearchStatus {
    #[default]
    Any,
    Active,
    Cleared,
    Ack,
    Unack,
}

impl AlarmSearchStatus {
    /// Whether an alarm with `status` passes this filter.
    pub fn matches(self, status: AlarmStatus) -> bool {
        match self {
            Self::Any => true,
            Self::Active => status.is_active(),
            Self::Cleared => !status.is_active(),
            Self::Ack => status.is_acknowledged(),
            Self::Unack => !status.is_acknowledged(),
        }
    }
}

/// User an alarm is assigned to, with the names denormalized onto the alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl Assignee {
    pub fn display_user(&self) -> DisplayUser {
        DisplayUser::new(
            self.first_name.clone().unwrap_or_default(),
            self.last_name.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
        )
    }
}

/// One alarm occurrence as shown in the alarm table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmRecord {
    pub id: Uuid,
    pub created_time: DateTime<Utc>,
    pub originator: EntityId,
    pub originator_name: Option<String>,
    pub originator_label: Option<String>,
    /// Owning customer; `None` for tenant-level alarms.
    pub customer_id: Option<Uuid>,
    pub alarm_type: String,
    pub severity: AlarmSeverity,
    pub status: AlarmStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub ack_time: Option<DateTime<Utc>>,
    pub clear_time: Option<DateTime<Utc>>,
    pub assignee: Option<Assignee>,
    pub details: Option<serde_json::Value>,
}
