// ── Command API ──
//
// Every alarm mutation is a `Command` routed through
// `Controller::execute`, which applies the permission rule before
// calling the platform.

use serde::Serialize;
use uuid::Uuid;

/// Write operations on a single alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Acknowledge { alarm_id: Uuid },
    Clear { alarm_id: Uuid },
    Assign { alarm_id: Uuid, user_id: Uuid },
    Unassign { alarm_id: Uuid },
}

impl Command {
    pub fn alarm_id(&self) -> Uuid {
        match *self {
            Self::Acknowledge { alarm_id }
            | Self::Clear { alarm_id }
            | Self::Assign { alarm_id, .. }
            | Self::Unassign { alarm_id } => alarm_id,
        }
    }

    /// Acknowledge and clear are gated by the details-access rule.
    pub fn requires_modify_permission(&self) -> bool {
        matches!(self, Self::Acknowledge { .. } | Self::Clear { .. })
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Acknowledge { .. } => "acknowledge",
            Self::Clear { .. } => "clear",
            Self::Assign { .. } => "assign",
            Self::Unassign { .. } => "unassign",
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum CommandResult {
    Ok,
    /// The alarm already was in the requested state.
    Unchanged { reason: String },
}
