// ── API-to-domain type conversions ──
//
// Bridges raw `alarmdesk_api` response types into canonical
// `alarmdesk_core::model` types. Strings become strong enums, epoch
// millis become `DateTime<Utc>`, and the platform's null-UUID
// placeholder becomes `None`.

use chrono::{DateTime, Utc};

use alarmdesk_api::types::{AlarmInfoResponse, EntityIdRef, PageData, UserResponse};

use crate::error::CoreError;
use crate::model::{
    AlarmRecord, AlarmSeverity, AlarmStatus, Assignee, Authority, CurrentUser, EntityId, EntityType,
    Page,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Epoch millis to `DateTime<Utc>`. The platform sends `0` for "never".
fn millis_to_datetime(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis
        .filter(|ms| *ms > 0)
        .and_then(DateTime::from_timestamp_millis)
}

/// Drop null-UUID references.
fn non_null(id: Option<&EntityIdRef>) -> Option<&EntityIdRef> {
    id.filter(|r| !r.is_null())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.is_empty())
}

impl From<EntityIdRef> for EntityId {
    fn from(r: EntityIdRef) -> Self {
        EntityId::new(EntityType::from(r.entity_type), r.id)
    }
}

impl From<&EntityId> for EntityIdRef {
    fn from(id: &EntityId) -> Self {
        EntityIdRef {
            entity_type: id.entity_type.to_string(),
            id: id.id,
        }
    }
}

impl<T> From<PageData<T>> for Page<T> {
    fn from(p: PageData<T>) -> Self {
        Page {
            data: p.data,
            total_pages: u64::try_from(p.total_pages).unwrap_or(0),
            total_elements: u64::try_from(p.total_elements).unwrap_or(0),
            has_next: p.has_next,
        }
    }
}

// ── Alarm ──────────────────────────────────────────────────────────

/// Status from the combined string when present, else from the
/// `acknowledged` / `cleared` flags.
fn alarm_status(raw: &AlarmInfoResponse) -> Result<AlarmStatus, CoreError> {
    match raw.status.as_deref() {
        Some(s) => s.parse().map_err(|_| CoreError::UnexpectedValue {
            field: "status",
            value: s.to_owned(),
        }),
        None => Ok(AlarmStatus::from_flags(
            raw.acknowledged.unwrap_or(false),
            raw.cleared.unwrap_or(false),
        )),
    }
}

impl TryFrom<AlarmInfoResponse> for AlarmRecord {
    type Error = CoreError;

    fn try_from(raw: AlarmInfoResponse) -> Result<Self, Self::Error> {
        let severity: AlarmSeverity =
            raw.severity
                .parse()
                .map_err(|_| CoreError::UnexpectedValue {
                    field: "severity",
                    value: raw.severity.clone(),
                })?;
        let status = alarm_status(&raw)?;
        let created_time = DateTime::from_timestamp_millis(raw.created_time).ok_or_else(|| {
            CoreError::UnexpectedValue {
                field: "createdTime",
                value: raw.created_time.to_string(),
            }
        })?;

        let assignee = non_null(raw.assignee_id.as_ref()).map(|id| Assignee {
            id: id.id,
            first_name: non_empty(raw.assignee_first_name.clone()),
            last_name: non_empty(raw.assignee_last_name.clone()),
            email: non_empty(raw.assignee_email.clone()),
        });

        Ok(AlarmRecord {
            id: raw.id.id,
            created_time,
            originator: raw.originator.into(),
            originator_name: non_empty(raw.originator_name),
            originator_label: non_empty(raw.originator_label),
            customer_id: non_null(raw.customer_id.as_ref()).map(|c| c.id),
            alarm_type: raw.alarm_type,
            severity,
            status,
            start_time: millis_to_datetime(raw.start_ts),
            end_time: millis_to_datetime(raw.end_ts),
            ack_time: millis_to_datetime(raw.ack_ts),
            clear_time: millis_to_datetime(raw.clear_ts),
            assignee,
            details: raw.details.filter(|d| !d.is_null()),
        })
    }
}

// ── User ───────────────────────────────────────────────────────────

impl TryFrom<UserResponse> for CurrentUser {
    type Error = CoreError;

    fn try_from(raw: UserResponse) -> Result<Self, Self::Error> {
        let authority: Authority = raw.authority.parse().map_err(|_| CoreError::UnexpectedValue {
            field: "authority",
            value: raw.authority.clone(),
        })?;
        Ok(CurrentUser {
            id: raw.id.id,
            email: raw.email,
            authority,
            customer_id: non_null(raw.customer_id.as_ref()).map(|c| c.id),
            first_name: non_empty(raw.first_name),
            last_name: non_empty(raw.last_name),
        })
    }
}
