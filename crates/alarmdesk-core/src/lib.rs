//! Alarm list logic between `alarmdesk-api` and the CLI.
//!
//! - **Query builder** ([`query`]): [`build_query`] turns a scope, a
//!   [`TimePageLink`] and an [`AlarmSearchStatus`] into an immutable
//!   [`AlarmQuery`]; [`AlarmFetcher`] is the seam that runs it.
//!
//! - **Display formatter** ([`display`]): pure functions for severity and
//!   status labels, severity colors, and assignee name / initials /
//!   avatar color.
//!
//! - **Permission rule** ([`permission`]): [`can_modify_alarm`] decides
//!   whether the details view offers acknowledge and clear.
//!
//! - **[`AlarmTable`]**: columns, default sort and window, row derivation,
//!   action requests and last-request-wins fetching.
//!
//! - **[`Controller`]**: authenticated facade over the REST client that
//!   implements [`AlarmFetcher`] and executes [`Command`]s.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod display;
pub mod error;
pub mod model;
pub mod permission;
pub mod query;
pub mod table;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{AuthCredentials, ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use display::{Color, EnglishCatalog, Translations};
pub use error::CoreError;
pub use permission::can_modify_alarm;
pub use query::{AlarmFetcher, AlarmQuery, build_query};
pub use table::{AlarmDetailsRequest, AlarmRow, AlarmTable, AssigneeCell, AssigneePanelRequest};

pub use model::{
    AlarmRecord, AlarmSearchStatus, AlarmSeverity, AlarmStatus, Assignee, Authority, CurrentUser,
    Direction, DisplayUser, EntityId, EntityType, Page, SortOrder, TimePageLink, TimeWindow,
    history_interval,
};
