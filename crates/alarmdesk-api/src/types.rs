// Wire types for the platform REST API.
//
// Field names follow the platform's camelCase JSON. Everything the core
// does not strictly need is optional so older/newer servers still parse.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder UUID the platform uses for "no customer" / "no tenant".
pub const NULL_UUID: Uuid = Uuid::from_u128(0x1381_4000_1dd2_11b2_8080_8080_8080_8080);

/// `{ "entityType": "DEVICE", "id": "<uuid>" }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIdRef {
    pub entity_type: String,
    pub id: Uuid,
}

impl EntityIdRef {
    /// `true` when this reference points at the platform's null entity.
    pub fn is_null(&self) -> bool {
        self.id == NULL_UUID
    }
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub has_next: bool,
}

/// Alarm as returned by `GET /api/alarms`, `GET /api/alarm/{type}/{id}`
/// and `GET /api/alarm/info/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmInfoResponse {
    pub id: EntityIdRef,
    pub created_time: i64,
    #[serde(default)]
    pub tenant_id: Option<EntityIdRef>,
    #[serde(default)]
    pub customer_id: Option<EntityIdRef>,
    #[serde(rename = "type")]
    pub alarm_type: String,
    pub originator: EntityIdRef,
    pub severity: String,
    /// Combined lifecycle status (`ACTIVE_UNACK`, ...). Newer servers
    /// may omit it in favor of the `acknowledged` / `cleared` flags.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub acknowledged: Option<bool>,
    #[serde(default)]
    pub cleared: Option<bool>,
    #[serde(default)]
    pub start_ts: Option<i64>,
    #[serde(default)]
    pub end_ts: Option<i64>,
    #[serde(default)]
    pub ack_ts: Option<i64>,
    #[serde(default)]
    pub clear_ts: Option<i64>,
    #[serde(default)]
    pub assign_ts: Option<i64>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub originator_name: Option<String>,
    #[serde(default)]
    pub originator_label: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<EntityIdRef>,
    #[serde(default)]
    pub assignee_first_name: Option<String>,
    #[serde(default)]
    pub assignee_last_name: Option<String>,
    #[serde(default)]
    pub assignee_email: Option<String>,
}

/// The authenticated user, `GET /api/auth/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: EntityIdRef,
    #[serde(default)]
    pub tenant_id: Option<EntityIdRef>,
    #[serde(default)]
    pub customer_id: Option<EntityIdRef>,
    pub email: String,
    pub authority: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Error body shape: `{"status": 401, "message": "...", "errorCode": 10}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}
