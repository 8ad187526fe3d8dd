//! Alarm command handlers.

use std::fmt::Write as _;

use chrono::{Duration, Utc};
use tabled::builder::Builder;
use tabled::settings::Style;

use alarmdesk_core::display::{display_name, translate_required};
use alarmdesk_core::table::{Column, DEFAULT_SORT_PROPERTY};
use alarmdesk_core::{
    AlarmDetailsRequest, AlarmRow, AlarmSearchStatus, AlarmStatus, AlarmTable,
    Command as CoreCommand, CommandResult, Controller, Direction, DisplayUser, EnglishCatalog,
    EntityId, Page, SortOrder, history_interval,
};

use crate::cli::{AlarmsArgs, AlarmsCommand, ExactStatus, GlobalOpts, OutputFormat, StatusFilter};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

impl From<StatusFilter> for AlarmSearchStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Any => Self::Any,
            StatusFilter::Active => Self::Active,
            StatusFilter::Cleared => Self::Cleared,
            StatusFilter::Ack => Self::Ack,
            StatusFilter::Unack => Self::Unack,
        }
    }
}

impl From<ExactStatus> for AlarmStatus {
    fn from(status: ExactStatus) -> Self {
        match status {
            ExactStatus::ActiveUnack => Self::ActiveUnack,
            ExactStatus::ActiveAck => Self::ActiveAck,
            ExactStatus::ClearedUnack => Self::ClearedUnack,
            ExactStatus::ClearedAck => Self::ClearedAck,
        }
    }
}

fn parse_entity(raw: &str) -> Result<EntityId, CliError> {
    raw.parse().map_err(|e: alarmdesk_core::model::ParseEntityIdError| CliError::Validation {
        field: "entity".into(),
        reason: e.to_string(),
    })
}

// ── Table rendering ─────────────────────────────────────────────────

fn unassigned(color: bool) -> String {
    let label = translate_required(&EnglishCatalog, "alarm.unassigned");
    if color { output::dim(&label) } else { label }
}

fn assignee_cell(row: &AlarmRow, color: bool) -> String {
    match &row.assignee {
        None => unassigned(color),
        Some(cell) if color => format!(
            "{} {}",
            output::paint_badge(&cell.initials, cell.avatar_color),
            cell.display_name
        ),
        Some(cell) => format!("[{}] {}", cell.initials, cell.display_name),
    }
}

fn cell(row: &AlarmRow, key: &str, color: bool) -> String {
    match key {
        "createdTime" => row.created_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        "originatorName" => row.originator.clone(),
        "type" => row.alarm_type.clone(),
        "severity" if color => output::paint_fg(&row.severity, row.severity_color),
        "severity" => row.severity.clone(),
        "assigneeEmail" => assignee_cell(row, color),
        "status" => row.status.clone(),
        _ => String::new(),
    }
}

fn render_alarm_table(columns: &[Column], rows: &[AlarmRow], color: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        columns
            .iter()
            .map(|c| translate_required(&EnglishCatalog, c.title_key)),
    );
    for row in rows {
        builder.push_record(columns.iter().map(|c| cell(row, c.key, color)));
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn render_details(request: &AlarmDetailsRequest, viewer: &str, color: bool) -> String {
    let row = AlarmRow::derive(&request.alarm, &EnglishCatalog);
    let alarm = &request.alarm;
    let severity = if color {
        output::paint_fg(&row.severity, row.severity_color)
    } else {
        row.severity.clone()
    };

    let mut actions = Vec::new();
    if request.allow_acknowledgment && !alarm.status.is_acknowledged() {
        actions.push("ack");
    }
    if request.allow_clear && alarm.status.is_active() {
        actions.push("clear");
    }
    actions.extend(["assign", "unassign"]);

    let mut out = String::new();
    let _ = writeln!(out, "Alarm:       {}", request.alarm_id);
    let _ = writeln!(out, "Type:        {}", row.alarm_type);
    let _ = writeln!(out, "Severity:    {severity}");
    let _ = writeln!(out, "Status:      {}", row.status);
    let _ = writeln!(out, "Originator:  {} ({})", row.originator, alarm.originator);
    let _ = writeln!(out, "Created:     {}", row.created_time.format("%Y-%m-%d %H:%M:%S"));
    if let Some(ack) = alarm.ack_time {
        let _ = writeln!(out, "Acked:       {}", ack.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(clear) = alarm.clear_time {
        let _ = writeln!(out, "Cleared:     {}", clear.format("%Y-%m-%d %H:%M:%S"));
    }
    let _ = writeln!(out, "Assignee:    {}", assignee_cell(&row, color));
    if let Some(details) = &alarm.details {
        let _ = writeln!(out, "Details:     {details}");
    }
    let _ = writeln!(out, "Actions:     {}", actions.join(", "));
    let _ = write!(out, "Viewed by:   {viewer}");
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    session: &Session,
    args: AlarmsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        AlarmsCommand::List {
            entity,
            status,
            exact_status,
            assignee,
            days,
            page,
            page_size,
            search,
            sort_asc,
        } => {
            let scope = entity.as_deref().map(parse_entity).transpose()?;
            let status = status.map_or(session.default_status, AlarmSearchStatus::from);
            let mut table = AlarmTable::new(controller.clone(), scope, status)
                .with_window(history_interval(Duration::days(i64::from(days))));
            if let Some(exact) = exact_status {
                table = table.with_exact_status(exact.into());
            }
            if let Some(raw) = assignee.as_deref() {
                table = table.with_assignee(util::parse_uuid("assignee", raw)?);
            }

            let mut link = table.page_link(Utc::now(), page_size.unwrap_or(session.page_size), page);
            if let Some(text) = search {
                link = link.with_search(text);
            }
            if sort_asc {
                link = link.with_sort(SortOrder::new(DEFAULT_SORT_PROPERTY, Direction::Asc));
            }

            let spinner = util::spinner("Fetching alarms...", global.quiet);
            let next = link.next_page();
            let fetched = table.fetch(link).await;
            spinner.finish_and_clear();
            let alarms = fetched?.unwrap_or_else(Page::empty);

            let rows = table.rows(&alarms, &EnglishCatalog);
            let out = output::render_list_with(
                &global.output,
                &rows,
                |rows| render_alarm_table(table.columns(), rows, color),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);

            if matches!(global.output, OutputFormat::Table) && !global.quiet {
                eprintln!(
                    "Page {} of {} ({} alarms, status {})",
                    page + 1,
                    alarms.total_pages.max(1),
                    alarms.total_elements,
                    translate_required(
                        &EnglishCatalog,
                        &format!("alarm.search-status.{}", table.search_status())
                    ),
                );
                if alarms.has_next {
                    eprintln!("More alarms: --page {}", next.page);
                }
            }
            Ok(())
        }

        AlarmsCommand::Get { id } => {
            let alarm_id = util::parse_uuid("id", &id)?;
            let alarm = controller.get_alarm(&alarm_id).await?;
            let user = controller.current_user().await?;
            let table = AlarmTable::new(controller.clone(), None, session.default_status);
            let request = table.details_request(&alarm, &user);
            let viewer = display_name(&DisplayUser::from(&user));

            let out = output::render_single(
                &global.output,
                &request,
                |r| render_details(r, &viewer, color),
                |r| r.alarm_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlarmsCommand::Ack { id } => {
            let alarm_id = util::parse_uuid("id", &id)?;
            run(controller, CoreCommand::Acknowledge { alarm_id }, global).await
        }

        AlarmsCommand::Clear { id } => {
            let alarm_id = util::parse_uuid("id", &id)?;
            if !util::confirm(&format!("Clear alarm {alarm_id}?"), "clear", global.yes)? {
                return Ok(());
            }
            run(controller, CoreCommand::Clear { alarm_id }, global).await
        }

        AlarmsCommand::Assign { id, user_id } => {
            let alarm_id = util::parse_uuid("id", &id)?;
            let user_id = util::parse_uuid("user_id", &user_id)?;
            run(controller, CoreCommand::Assign { alarm_id, user_id }, global).await
        }

        AlarmsCommand::Unassign { id } => {
            let alarm_id = util::parse_uuid("id", &id)?;
            run(controller, CoreCommand::Unassign { alarm_id }, global).await
        }
    }
}

fn past_tense(cmd: CoreCommand) -> &'static str {
    match cmd {
        CoreCommand::Acknowledge { .. } => "acknowledged",
        CoreCommand::Clear { .. } => "cleared",
        CoreCommand::Assign { .. } => "assigned",
        CoreCommand::Unassign { .. } => "unassigned",
    }
}

async fn run(controller: &Controller, cmd: CoreCommand, global: &GlobalOpts) -> Result<(), CliError> {
    let result = controller.execute(cmd).await?;

    match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            if !global.quiet {
                match &result {
                    CommandResult::Ok => eprintln!("Alarm {} {}", cmd.alarm_id(), past_tense(cmd)),
                    CommandResult::Unchanged { reason } => eprintln!("Nothing to do: {reason}"),
                }
            }
        }
        _ => {
            let out =
                output::render_single(&global.output, &result, |_| String::new(), |_| String::new())?;
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alarmdesk_core::table::COLUMNS;
    use alarmdesk_core::{AlarmRecord, AlarmSeverity, AlarmStatus, Assignee, EntityType};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn record(assignee: Option<Assignee>) -> AlarmRecord {
        AlarmRecord {
            id: Uuid::from_u128(1),
            created_time: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            originator: EntityId::new(EntityType::Device, Uuid::from_u128(2)),
            originator_name: Some("Boiler".into()),
            originator_label: None,
            customer_id: None,
            alarm_type: "High Temperature".into(),
            severity: AlarmSeverity::Major,
            status: AlarmStatus::ActiveUnack,
            start_time: None,
            end_time: None,
            ack_time: None,
            clear_time: None,
            assignee,
            details: None,
        }
    }

    #[test]
    fn status_filter_maps_to_search_status() {
        assert_eq!(AlarmSearchStatus::from(StatusFilter::Unack), AlarmSearchStatus::Unack);
        assert_eq!(AlarmSearchStatus::from(StatusFilter::Any), AlarmSearchStatus::Any);
    }

    #[test]
    fn exact_status_maps_to_alarm_status() {
        assert_eq!(AlarmStatus::from(ExactStatus::ClearedUnack), AlarmStatus::ClearedUnack);
        assert_eq!(AlarmStatus::from(ExactStatus::ActiveAck), AlarmStatus::ActiveAck);
    }

    #[test]
    fn details_name_the_viewer() {
        let request = AlarmDetailsRequest {
            alarm_id: Uuid::from_u128(1),
            alarm: record(None),
            allow_acknowledgment: true,
            allow_clear: false,
            display_details: true,
        };
        let out = render_details(&request, "Grace Hopper", false);
        assert!(out.contains("Actions:     ack, assign, unassign"));
        assert!(out.ends_with("Viewed by:   Grace Hopper"));
    }

    #[test]
    fn entity_must_be_type_and_uuid() {
        assert!(parse_entity("DEVICE:784f394c-42b6-435a-983c-b7beff2784f9").is_ok());
        assert!(matches!(parse_entity("device-1"), Err(CliError::Validation { .. })));
    }

    #[test]
    fn plain_table_has_translated_headers_and_placeholder() {
        let rows = vec![AlarmRow::derive(&record(None), &EnglishCatalog)];
        let out = render_alarm_table(&COLUMNS, &rows, false);
        assert!(out.contains("Created time"));
        assert!(out.contains("Assignee"));
        assert!(out.contains("Boiler"));
        assert!(out.contains("Major"));
        assert!(out.contains("Unassigned"));
        assert!(out.contains("2023-11-14 22:13:20"));
    }

    #[test]
    fn assignee_cell_shows_initials_and_name() {
        let assignee = Assignee {
            id: Uuid::from_u128(9),
            first_name: Some("Grace".into()),
            last_name: Some("Hopper".into()),
            email: Some("grace@x.com".into()),
        };
        let row = AlarmRow::derive(&record(Some(assignee)), &EnglishCatalog);
        assert_eq!(assignee_cell(&row, false), "[GH] Grace Hopper");
    }
}
