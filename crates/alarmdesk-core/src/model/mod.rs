// ── Domain model ──
//
// Canonical types shared by the query builder, formatter, permission
// rule and table. Wire types from `alarmdesk-api` are converted into
// these in `convert.rs`.

pub mod alarm;
pub mod entity_id;
pub mod page;
pub mod user;

pub use alarm::{AlarmRecord, AlarmSearchStatus, AlarmSeverity, AlarmStatus, Assignee};
pub use entity_id::{EntityId, EntityType, ParseEntityIdError};
pub use page::{Direction, Page, SortOrder, TimePageLink, TimeWindow, history_interval};
pub use user::{Authority, CurrentUser, DisplayUser};
