// ── Alarm table ──
//
// Plain composition of everything the alarm list needs: column set,
// default sort and time window, current status filter, fetch wiring,
// per-row presentation values and the details / assignee action
// requests. Rendering is left to the caller.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::display::{self, Color, Translations};
use crate::error::CoreError;
use crate::model::{
    AlarmRecord, AlarmSearchStatus, AlarmStatus, CurrentUser, Direction, EntityId, Page, SortOrder,
    TimePageLink, TimeWindow, history_interval,
};
use crate::permission::can_modify_alarm;
use crate::query::{AlarmFetcher, build_query};

/// Default history window of the alarm table.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Property the table sorts by unless told otherwise.
pub const DEFAULT_SORT_PROPERTY: &str = "createdTime";

// ── Columns ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnWidth {
    Px(u16),
    Percent(u8),
}

/// One table column: the record property it shows and its header key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub title_key: &'static str,
    pub width: ColumnWidth,
    pub sortable: bool,
}

impl Column {
    const fn new(key: &'static str, title_key: &'static str, width: ColumnWidth, sortable: bool) -> Self {
        Self {
            key,
            title_key,
            width,
            sortable,
        }
    }
}

pub const COLUMNS: [Column; 6] = [
    Column::new("createdTime", "alarm.created-time", ColumnWidth::Px(150), true),
    Column::new("originatorName", "alarm.originator", ColumnWidth::Percent(25), false),
    Column::new("type", "alarm.type", ColumnWidth::Percent(25), true),
    Column::new("severity", "alarm.severity", ColumnWidth::Percent(25), true),
    Column::new("assigneeEmail", "alarm.assignee", ColumnWidth::Px(200), false),
    Column::new("status", "alarm.status", ColumnWidth::Percent(25), true),
];

// ── Row values ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeCell {
    pub display_name: String,
    pub initials: String,
    #[serde(serialize_with = "serialize_color")]
    pub avatar_color: Color,
}

/// Presentation values derived from one alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmRow {
    pub id: Uuid,
    pub created_time: DateTime<Utc>,
    pub originator: String,
    pub alarm_type: String,
    pub severity: String,
    #[serde(serialize_with = "serialize_color")]
    pub severity_color: Color,
    /// `None` renders the unassigned placeholder.
    pub assignee: Option<AssigneeCell>,
    pub status: String,
}

impl AlarmRow {
    pub fn derive(record: &AlarmRecord, catalog: &dyn Translations) -> Self {
        Self {
            id: record.id,
            created_time: record.created_time,
            originator: record
                .originator_name
                .clone()
                .unwrap_or_else(|| record.originator.to_string()),
            alarm_type: record.alarm_type.clone(),
            severity: display::severity_label(record, catalog),
            severity_color: display::severity_color(record),
            assignee: record.assignee.as_ref().map(|_| AssigneeCell {
                display_name: display::assignee_display_name(record),
                initials: display::assignee_initials(record),
                avatar_color: display::avatar_color(record),
            }),
            status: display::status_label(record, catalog),
        }
    }
}

fn serialize_color<S: serde::Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&color.to_css())
}

// ── Action requests ──────────────────────────────────────────────────

/// What the details view needs to open for one alarm.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmDetailsRequest {
    pub alarm_id: Uuid,
    pub alarm: AlarmRecord,
    pub allow_acknowledgment: bool,
    pub allow_clear: bool,
    pub display_details: bool,
}

/// What the assignee picker needs to open for one alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssigneePanelRequest {
    pub alarm_id: Uuid,
    pub assignee_id: Option<Uuid>,
}

// ── AlarmTable ───────────────────────────────────────────────────────

/// The alarm list, optionally scoped to one entity.
pub struct AlarmTable<F> {
    fetcher: F,
    scope: Option<EntityId>,
    search_status: AlarmSearchStatus,
    exact_status: Option<AlarmStatus>,
    assignee_id: Option<Uuid>,
    default_window: TimeWindow,
    default_sort: SortOrder,
    latest_request: AtomicU64,
}

impl<F: AlarmFetcher> AlarmTable<F> {
    pub fn new(fetcher: F, scope: Option<EntityId>, search_status: AlarmSearchStatus) -> Self {
        Self {
            fetcher,
            scope,
            search_status,
            exact_status: None,
            assignee_id: None,
            default_window: history_interval(Duration::days(DEFAULT_WINDOW_DAYS)),
            default_sort: SortOrder::new(DEFAULT_SORT_PROPERTY, Direction::Desc),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        &COLUMNS
    }

    pub fn scope(&self) -> Option<&EntityId> {
        self.scope.as_ref()
    }

    pub fn search_status(&self) -> AlarmSearchStatus {
        self.search_status
    }

    pub fn set_search_status(&mut self, status: AlarmSearchStatus) {
        self.search_status = status;
    }

    pub fn default_sort(&self) -> &SortOrder {
        &self.default_sort
    }

    pub fn default_window(&self) -> TimeWindow {
        self.default_window
    }

    /// Narrow every fetch to one exact lifecycle status.
    #[must_use]
    pub fn with_exact_status(mut self, status: AlarmStatus) -> Self {
        self.exact_status = Some(status);
        self
    }

    /// Only alarms assigned to `assignee_id`.
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: Uuid) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.default_window = window;
        self
    }

    /// Page link over the default window and sort, resolved at `now`.
    pub fn page_link(&self, now: DateTime<Utc>, page_size: u32, page: u32) -> TimePageLink {
        TimePageLink::from_window(self.default_window, now, page_size, page)
            .with_sort(self.default_sort.clone())
    }

    /// Fetch one page.
    ///
    /// Returns `Ok(None)` when a newer fetch was started on this table
    /// while this one was in flight; only the latest result counts.
    pub async fn fetch(&self, page_link: TimePageLink) -> Result<Option<Page<AlarmRecord>>, CoreError> {
        let seq = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let mut query = build_query(self.scope.clone(), page_link, self.search_status);
        if let Some(status) = self.exact_status {
            query = query.with_status(status);
        }
        if let Some(assignee_id) = self.assignee_id {
            query = query.with_assignee(assignee_id);
        }
        debug!(seq, page = query.page_link.page, status = %query.search_status, "fetching alarms");

        let result = self.fetcher.fetch_alarms(&query).await;

        if self.latest_request.load(Ordering::SeqCst) != seq {
            warn!(seq, "discarding stale alarm page");
            return Ok(None);
        }
        match result {
            Ok(page) => Ok(Some(page)),
            Err(e @ CoreError::FetchFailed { .. }) => Err(e),
            Err(e) => Err(CoreError::fetch_failed(e)),
        }
    }

    pub fn rows(&self, page: &Page<AlarmRecord>, catalog: &dyn Translations) -> Vec<AlarmRow> {
        page.data.iter().map(|r| AlarmRow::derive(r, catalog)).collect()
    }

    pub fn details_request(&self, record: &AlarmRecord, user: &CurrentUser) -> AlarmDetailsRequest {
        let allowed = can_modify_alarm(user, record);
        AlarmDetailsRequest {
            alarm_id: record.id,
            alarm: record.clone(),
            allow_acknowledgment: allowed,
            allow_clear: allowed,
            display_details: true,
        }
    }

    pub fn assignee_request(&self, record: &AlarmRecord) -> AssigneePanelRequest {
        AssigneePanelRequest {
            alarm_id: record.id,
            assignee_id: record.assignee.as_ref().map(|a| a.id),
        }
    }

    /// Whether to re-fetch after the details view closed.
    pub fn on_details_closed(&self, changed: bool) -> bool {
        changed
    }

    /// The assignee picker may have changed the alarm; always re-fetch.
    pub fn on_assignee_panel_closed(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::display::EnglishCatalog;
    use crate::model::{AlarmSeverity, Assignee, Authority, EntityType};
    use crate::query::AlarmQuery;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn alarm(n: u128, severity: AlarmSeverity, assignee: Option<Assignee>) -> AlarmRecord {
        AlarmRecord {
            id: Uuid::from_u128(n),
            created_time: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            originator: EntityId::new(EntityType::Device, Uuid::from_u128(100 + n)),
            originator_name: Some(format!("Sensor {n}")),
            originator_label: None,
            customer_id: Some(Uuid::from_u128(0xc1)),
            alarm_type: "Overheat".into(),
            severity,
            status: AlarmStatus::ActiveUnack,
            start_time: None,
            end_time: None,
            ack_time: None,
            clear_time: None,
            assignee,
            details: None,
        }
    }

    fn page(data: Vec<AlarmRecord>) -> Page<AlarmRecord> {
        Page {
            total_elements: data.len() as u64,
            total_pages: 1,
            has_next: false,
            data,
        }
    }

    /// Returns a page whose single alarm id is the requested page number,
    /// after a delay that shrinks with the page number.
    #[derive(Default)]
    struct FakeFetcher {
        seen: Mutex<Vec<AlarmQuery>>,
        fail: bool,
    }

    impl AlarmFetcher for FakeFetcher {
        async fn fetch_alarms(&self, query: &AlarmQuery) -> Result<Page<AlarmRecord>, CoreError> {
            self.seen.lock().unwrap().push(query.clone());
            let n = query.page_link.page;
            tokio::time::sleep(std::time::Duration::from_millis(u64::from(100 / (n + 1)))).await;
            if self.fail {
                return Err(alarmdesk_api::Error::SessionExpired.into());
            }
            Ok(page(vec![alarm(u128::from(n), AlarmSeverity::Minor, None)]))
        }
    }

    #[test]
    fn defaults_match_alarm_list() {
        let table = AlarmTable::new(FakeFetcher::default(), None, AlarmSearchStatus::Any);
        assert_eq!(table.default_sort(), &SortOrder::new("createdTime", Direction::Desc));
        assert_eq!(table.default_window().span, Duration::days(30));
        assert_eq!(table.columns().len(), 6);
        assert_eq!(table.columns()[0].key, "createdTime");
        assert!(!table.columns()[1].sortable);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_builds_query_from_table_state() {
        let device: EntityId = "DEVICE:4e2a1f10-1111-4c1e-9a0b-2c3d4e5f6a7b".parse().unwrap();
        let mut table = AlarmTable::new(FakeFetcher::default(), Some(device.clone()), AlarmSearchStatus::Any);
        table.set_search_status(AlarmSearchStatus::Active);

        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let got = table.fetch(table.page_link(now, 10, 0)).await.unwrap();
        assert_eq!(got.unwrap().data.len(), 1);

        let seen = table.fetcher.seen.lock().unwrap();
        assert_eq!(seen[0].scope, Some(device));
        assert_eq!(seen[0].search_status, AlarmSearchStatus::Active);
        assert!(seen[0].fetch_originator);
        assert_eq!(seen[0].page_link.end_time, Some(now));
        assert_eq!(seen[0].page_link.sort_order.as_ref().unwrap().property, "createdTime");
    }

    #[tokio::test(start_paused = true)]
    async fn optional_filters_reach_the_query() {
        let table = AlarmTable::new(FakeFetcher::default(), None, AlarmSearchStatus::Any)
            .with_exact_status(AlarmStatus::ClearedUnack)
            .with_assignee(Uuid::from_u128(77));
        table.fetch(TimePageLink::new(10, 0)).await.unwrap();

        let unfiltered = AlarmTable::new(FakeFetcher::default(), None, AlarmSearchStatus::Any);
        unfiltered.fetch(TimePageLink::new(10, 0)).await.unwrap();

        let seen = table.fetcher.seen.lock().unwrap();
        assert_eq!(seen[0].status, Some(AlarmStatus::ClearedUnack));
        assert_eq!(seen[0].assignee_id, Some(Uuid::from_u128(77)));
        let plain = unfiltered.fetcher.seen.lock().unwrap();
        assert_eq!(plain[0].status, None);
        assert_eq!(plain[0].assignee_id, None);
    }

    #[tokio::test(start_paused = true)]
    async fn last_request_wins() {
        let table = AlarmTable::new(FakeFetcher::default(), None, AlarmSearchStatus::Any);
        let (slow, fast) = tokio::join!(
            table.fetch(TimePageLink::new(10, 0)),
            table.fetch(TimePageLink::new(10, 4)),
        );
        assert!(slow.unwrap().is_none());
        assert_eq!(fast.unwrap().unwrap().data[0].id, Uuid::from_u128(4));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_errors_surface_as_fetch_failed() {
        let fetcher = FakeFetcher {
            fail: true,
            ..FakeFetcher::default()
        };
        let table = AlarmTable::new(fetcher, None, AlarmSearchStatus::Any);
        let err = table.fetch(TimePageLink::new(10, 0)).await.unwrap_err();
        assert!(matches!(err, CoreError::FetchFailed { .. }));
    }

    #[test]
    fn rows_derive_every_column() {
        let table = AlarmTable::new(FakeFetcher::default(), None, AlarmSearchStatus::Any);
        let assigned = alarm(
            1,
            AlarmSeverity::Critical,
            Some(Assignee {
                id: Uuid::from_u128(50),
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                email: Some("ada@x.com".into()),
            }),
        );
        let mut unnamed = alarm(2, AlarmSeverity::Warning, None);
        unnamed.originator_name = None;

        let rows = table.rows(&page(vec![assigned, unnamed]), &EnglishCatalog);

        assert_eq!(rows[0].severity, "Critical");
        assert_eq!(rows[0].status, "Active Unacknowledged");
        assert_eq!(rows[0].severity_color, Color::Rgb(0xff, 0, 0));
        let cell = rows[0].assignee.as_ref().unwrap();
        assert_eq!(cell.display_name, "Ada Lovelace");
        assert_eq!(cell.initials, "AL");

        assert!(rows[1].assignee.is_none());
        assert_eq!(rows[1].originator, format!("DEVICE:{}", Uuid::from_u128(102)));
    }

    #[test]
    fn details_request_follows_permission_rule() {
        let table = AlarmTable::new(FakeFetcher::default(), None, AlarmSearchStatus::Any);
        let record = alarm(1, AlarmSeverity::Major, None);
        let foreign = CurrentUser {
            id: Uuid::from_u128(9),
            email: "c2@x.com".into(),
            authority: Authority::CustomerUser,
            customer_id: Some(Uuid::from_u128(0xc2)),
            first_name: None,
            last_name: None,
        };

        let req = table.details_request(&record, &foreign);
        assert_eq!(req.alarm_id, record.id);
        assert!(!req.allow_acknowledgment);
        assert!(!req.allow_clear);
        assert!(req.display_details);

        let admin = CurrentUser {
            authority: Authority::TenantAdmin,
            customer_id: None,
            ..foreign
        };
        assert!(table.details_request(&record, &admin).allow_clear);
    }

    #[test]
    fn assignee_request_and_refresh_contract() {
        let table = AlarmTable::new(FakeFetcher::default(), None, AlarmSearchStatus::Any);
        let record = alarm(
            3,
            AlarmSeverity::Minor,
            Some(Assignee {
                id: Uuid::from_u128(77),
                first_name: None,
                last_name: None,
                email: Some("ops@x.com".into()),
            }),
        );
        let req = table.assignee_request(&record);
        assert_eq!(req.alarm_id, Uuid::from_u128(3));
        assert_eq!(req.assignee_id, Some(Uuid::from_u128(77)));

        assert!(table.on_details_closed(true));
        assert!(!table.on_details_closed(false));
        assert!(table.on_assignee_panel_closed());
    }
}
