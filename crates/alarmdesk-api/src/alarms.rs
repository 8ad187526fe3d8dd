// Alarm endpoints
//
// Paged alarm search (global or scoped to one entity), single-alarm
// lookup, and the acknowledge / clear / assign mutations the details and
// assignee views trigger.

use tracing::debug;
use uuid::Uuid;

use crate::client::PlatformClient;
use crate::error::Error;
use crate::types::{AlarmInfoResponse, EntityIdRef, PageData};

impl PlatformClient {
    /// Search alarms.
    ///
    /// `GET /api/alarms` when `scope` is `None` (everything the caller's
    /// authority can see), otherwise `GET /api/alarm/{entityType}/{entityId}`.
    /// `params` carries the page link and filters, already encoded.
    pub async fn get_alarms(
        &self,
        scope: Option<&EntityIdRef>,
        params: &[(&str, String)],
    ) -> Result<PageData<AlarmInfoResponse>, Error> {
        let path = match scope {
            Some(entity) => format!("api/alarm/{}/{}", entity.entity_type, entity.id),
            None => "api/alarms".to_owned(),
        };
        debug!(?scope, "searching alarms");
        self.get(&path, params).await
    }

    /// Fetch one alarm with originator and assignee details.
    ///
    /// `GET /api/alarm/info/{alarmId}`
    pub async fn get_alarm_info(&self, alarm_id: &Uuid) -> Result<AlarmInfoResponse, Error> {
        self.get(&format!("api/alarm/info/{alarm_id}"), &[]).await
    }

    /// Acknowledge an alarm.
    ///
    /// `POST /api/alarm/{alarmId}/ack`
    pub async fn ack_alarm(&self, alarm_id: &Uuid) -> Result<(), Error> {
        debug!(%alarm_id, "acknowledging alarm");
        self.post_no_response(&format!("api/alarm/{alarm_id}/ack"))
            .await
    }

    /// Clear an alarm.
    ///
    /// `POST /api/alarm/{alarmId}/clear`
    pub async fn clear_alarm(&self, alarm_id: &Uuid) -> Result<(), Error> {
        debug!(%alarm_id, "clearing alarm");
        self.post_no_response(&format!("api/alarm/{alarm_id}/clear"))
            .await
    }

    /// Assign an alarm to a user.
    ///
    /// `POST /api/alarm/{alarmId}/assign/{assigneeId}`
    pub async fn assign_alarm(&self, alarm_id: &Uuid, assignee_id: &Uuid) -> Result<(), Error> {
        debug!(%alarm_id, %assignee_id, "assigning alarm");
        self.post_no_response(&format!("api/alarm/{alarm_id}/assign/{assignee_id}"))
            .await
    }

    /// Remove the assignee from an alarm.
    ///
    /// `DELETE /api/alarm/{alarmId}/assign`
    pub async fn unassign_alarm(&self, alarm_id: &Uuid) -> Result<(), Error> {
        debug!(%alarm_id, "unassigning alarm");
        self.delete(&format!("api/alarm/{alarm_id}/assign")).await
    }
}
