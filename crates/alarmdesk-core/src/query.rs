// ── Alarm query builder ──
//
// Combines scope, time-windowed page link and status filter into an
// immutable `AlarmQuery`. No I/O happens here; the query is handed to an
// `AlarmFetcher`.

use std::future::Future;

use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{AlarmRecord, AlarmSearchStatus, AlarmStatus, EntityId, Page, TimePageLink};

/// One alarm search, built fresh per fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmQuery {
    /// Entity whose alarms to list; `None` searches everything the caller
    /// is allowed to see.
    pub scope: Option<EntityId>,
    pub page_link: TimePageLink,
    pub search_status: AlarmSearchStatus,
    /// Exact status restriction, narrower than `search_status`.
    pub status: Option<AlarmStatus>,
    pub assignee_id: Option<Uuid>,
    /// Ask the platform to resolve originator display names.
    pub fetch_originator: bool,
}

/// Build the query for one page of the alarm table.
///
/// The page link is not validated; the platform rejects bad ranges.
pub fn build_query(
    scope: Option<EntityId>,
    page_link: TimePageLink,
    search_status: AlarmSearchStatus,
) -> AlarmQuery {
    AlarmQuery {
        scope,
        page_link,
        search_status,
        status: None,
        assignee_id: None,
        fetch_originator: true,
    }
}

impl AlarmQuery {
    #[must_use]
    pub fn with_status(self, status: AlarmStatus) -> Self {
        Self {
            status: Some(status),
            ..self
        }
    }

    #[must_use]
    pub fn with_assignee(self, assignee_id: Uuid) -> Self {
        Self {
            assignee_id: Some(assignee_id),
            ..self
        }
    }

    /// Wire query-string pairs for the alarm search endpoints.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.page_link.to_query_params();
        params.push(("searchStatus", self.search_status.to_string()));
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(assignee) = self.assignee_id {
            params.push(("assigneeId", assignee.to_string()));
        }
        params.push(("fetchOriginator", self.fetch_originator.to_string()));
        params
    }
}

// ── Fetch collaborator ───────────────────────────────────────────────

/// Anything that can run an [`AlarmQuery`] and return one page.
///
/// One request, one response. Errors come back as
/// [`CoreError::FetchFailed`] and are not retried here.
pub trait AlarmFetcher: Send + Sync {
    fn fetch_alarms(
        &self,
        query: &AlarmQuery,
    ) -> impl Future<Output = Result<Page<AlarmRecord>, CoreError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Direction, SortOrder, history_interval};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn thirty_day_link() -> TimePageLink {
        let t0 = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        TimePageLink::from_window(history_interval(Duration::days(30)), t0 + Duration::days(30), 10, 0)
    }

    #[test]
    fn unscoped_any_query_requests_originator_names() {
        let link = thirty_day_link();
        let query = build_query(None, link.clone(), AlarmSearchStatus::Any);

        assert_eq!(query.scope, None);
        assert_eq!(query.search_status, AlarmSearchStatus::Any);
        assert!(query.fetch_originator);
        assert_eq!(query.page_link, link);
        assert_eq!(
            query.page_link.start_time.unwrap().timestamp_millis(),
            1_700_000_000_000
        );
    }

    #[test]
    fn scoped_query_keeps_entity() {
        let device: EntityId = "DEVICE:4e2a1f10-1111-4c1e-9a0b-2c3d4e5f6a7b".parse().unwrap();
        let query = build_query(Some(device.clone()), thirty_day_link(), AlarmSearchStatus::Active);
        assert_eq!(query.scope, Some(device));
        assert_eq!(query.search_status, AlarmSearchStatus::Active);
    }

    #[test]
    fn query_params_cover_filters() {
        let assignee = Uuid::parse_str("9b2b0a66-4f5e-4d1c-8a77-1c2d3e4f5a6b").unwrap();
        let link = TimePageLink::new(20, 1)
            .with_search("temp")
            .with_sort(SortOrder::new("createdTime", Direction::Desc));
        let query = build_query(None, link, AlarmSearchStatus::Unack)
            .with_status(AlarmStatus::ActiveUnack)
            .with_assignee(assignee);

        assert_eq!(
            query.to_query_params(),
            vec![
                ("pageSize", "20".to_owned()),
                ("page", "1".to_owned()),
                ("textSearch", "temp".to_owned()),
                ("sortProperty", "createdTime".to_owned()),
                ("sortOrder", "DESC".to_owned()),
                ("searchStatus", "UNACK".to_owned()),
                ("status", "ACTIVE_UNACK".to_owned()),
                ("assigneeId", assignee.to_string()),
                ("fetchOriginator", "true".to_owned()),
            ]
        );
    }
}
