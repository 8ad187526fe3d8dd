//! Integration tests for the `alarmdesk` CLI binary.
//!
//! Argument parsing, help output, completions, config handling and error
//! exit codes, plus a few end-to-end runs against a wiremock platform.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALARM_ID: &str = "784f394c-42b6-435a-983c-b7beff2784f9";
const CUSTOMER_A: &str = "0f0e0d0c-0b0a-4909-8807-060504030201";
const CUSTOMER_B: &str = "1a1b1c1d-2e2f-4a4b-8c8d-9e9f0a0b0c0d";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `alarmdesk` binary with env isolation.
///
/// Clears all `ALARMDESK_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn alarmdesk_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("alarmdesk");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("ALARMDESK_PROFILE")
        .env_remove("ALARMDESK_URL")
        .env_remove("ALARMDESK_USERNAME")
        .env_remove("ALARMDESK_PASSWORD")
        .env_remove("ALARMDESK_TOKEN")
        .env_remove("ALARMDESK_OUTPUT")
        .env_remove("ALARMDESK_INSECURE")
        .env_remove("ALARMDESK_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn alarm_json(customer: &str, status: &str) -> serde_json::Value {
    json!({
        "id": { "entityType": "ALARM", "id": ALARM_ID },
        "createdTime": 1_700_000_000_000_i64,
        "customerId": { "entityType": "CUSTOMER", "id": customer },
        "type": "High Temperature",
        "originator": { "entityType": "DEVICE", "id": "4e2a1f10-1111-4c1e-9a0b-2c3d4e5f6a7b" },
        "originatorName": "Boiler 3",
        "severity": "MAJOR",
        "status": status
    })
}

async fn platform(authority: &str, customer: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": { "entityType": "USER", "id": "9b2b0a66-4f5e-4d1c-8a77-1c2d3e4f5a6b" },
            "customerId": { "entityType": "CUSTOMER", "id": customer },
            "email": "someone@example.com",
            "authority": authority
        })))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = alarmdesk_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("alarms")
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_alarms_help_lists_actions() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .args(["alarms", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("ack"))
                .and(predicate::str::contains("clear"))
                .and(predicate::str::contains("assign")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("alarmdesk"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alarmdesk"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .arg("devices")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .args(["-o", "xml", "config", "show"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_days_out_of_range_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    for days in ["0", "36501", "4294967295"] {
        alarmdesk_cmd(home.path())
            .args(["--url", "http://127.0.0.1:9", "--token", "jwt-1"])
            .args(["alarms", "list", "--days", days])
            .assert()
            .failure()
            .code(2);
    }
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_alarms_without_config_points_to_init() {
    let home = tempfile::tempdir().unwrap();
    let output = alarmdesk_cmd(home.path())
        .args(["alarms", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("config init"));
}

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .args(["config", "set", "url", "https://iot.example.com"])
        .assert()
        .success();
    alarmdesk_cmd(home.path())
        .args(["config", "set", "default_status", "active"])
        .assert()
        .success();

    alarmdesk_cmd(home.path())
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://iot.example.com/")
                .and(predicate::str::contains("ACTIVE")),
        );
}

#[test]
fn test_config_set_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .args(["config", "set", "site", "default"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn test_config_use_missing_profile() {
    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .args(["config", "use", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

// ── Against a platform ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_renders_json_rows() {
    let server = platform("TENANT_ADMIN", CUSTOMER_A).await;
    Mock::given(method("GET"))
        .and(path("/api/alarms"))
        .and(query_param("searchStatus", "UNACK"))
        .and(query_param("pageSize", "5"))
        .and(query_param("sortOrder", "DESC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [alarm_json(CUSTOMER_A, "ACTIVE_UNACK")],
            "totalPages": 1,
            "totalElements": 1,
            "hasNext": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = alarmdesk_cmd(home.path())
        .args(["--url", &server.uri(), "--token", "jwt-1", "-o", "json"])
        .args(["alarms", "list", "--status", "unack", "-l", "5"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["originator"], "Boiler 3");
    assert_eq!(rows[0]["severity"], "Major");
    assert_eq!(rows[0]["severity_color"], "#ffa500");
    assert_eq!(rows[0]["status"], "Active Unacknowledged");
    assert!(rows[0]["assignee"].is_null());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ack_denied_for_foreign_customer() {
    let server = platform("CUSTOMER_USER", CUSTOMER_B).await;
    Mock::given(method("GET"))
        .and(path(format!("/api/alarm/info/{ALARM_ID}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(alarm_json(CUSTOMER_A, "ACTIVE_UNACK")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/alarm/{ALARM_ID}/ack")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .args(["--url", &server.uri(), "--token", "jwt-1"])
        .args(["alarms", "ack", ALARM_ID])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("Permission denied"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_shows_allowed_actions() {
    let server = platform("CUSTOMER_USER", CUSTOMER_A).await;
    Mock::given(method("GET"))
        .and(path(format!("/api/alarm/info/{ALARM_ID}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(alarm_json(CUSTOMER_A, "ACTIVE_UNACK")),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = alarmdesk_cmd(home.path())
        .args(["--url", &server.uri(), "--token", "jwt-1", "-o", "json"])
        .args(["alarms", "get", ALARM_ID])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let details: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(details["alarm_id"], ALARM_ID);
    assert_eq!(details["allow_acknowledgment"], true);
    assert_eq!(details["allow_clear"], true);
    assert_eq!(details["display_details"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clear_requires_yes_when_not_interactive() {
    let server = platform("TENANT_ADMIN", CUSTOMER_A).await;

    let home = tempfile::tempdir().unwrap();
    alarmdesk_cmd(home.path())
        .args(["--url", &server.uri(), "--token", "jwt-1"])
        .args(["alarms", "clear", ALARM_ID])
        .write_stdin("")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_filters_by_exact_status_and_assignee() {
    let assignee = "5a0e4f3c-2222-4d2e-8b1c-3d4e5f6a7b8c";
    let server = platform("TENANT_ADMIN", CUSTOMER_A).await;
    Mock::given(method("GET"))
        .and(path("/api/alarms"))
        .and(query_param("status", "ACTIVE_ACK"))
        .and(query_param("assigneeId", assignee))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [alarm_json(CUSTOMER_A, "ACTIVE_ACK")],
            "totalPages": 3,
            "totalElements": 25,
            "hasNext": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = alarmdesk_cmd(home.path())
        .args(["--url", &server.uri(), "--token", "jwt-1"])
        .args(["alarms", "list", "--exact-status", "active-ack"])
        .args(["--assignee", assignee, "--page", "1"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Page 2 of 3"));
    assert!(stderr.contains("More alarms: --page 2"));
}
