//! Integration tests for the `pulseboard` CLI binary.
//!
//! Argument parsing, help output, completions, and config handling run
//! without a backend; the data commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `pulseboard` binary with env isolation.
///
/// Clears all `PULSEBOARD_*` env vars and points config directories at
/// `config_home` so tests never touch the user's real configuration.
fn pulseboard_cmd_in(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pulseboard");
    cmd.env("HOME", config_home)
        .env("XDG_CONFIG_HOME", config_home)
        .env("NO_COLOR", "1")
        .env_remove("PULSEBOARD_PROFILE")
        .env_remove("PULSEBOARD_URL")
        .env_remove("PULSEBOARD_OUTPUT")
        .env_remove("PULSEBOARD_INSECURE")
        .env_remove("PULSEBOARD_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn pulseboard_cmd() -> assert_cmd::Command {
    pulseboard_cmd_in(Path::new("/tmp/pulseboard-cli-test-nonexistent"))
}

/// Write `contents` as the config file under `config_home`.
fn write_config(config_home: &Path, contents: &str) {
    let dir = config_home.join("pulseboard");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = pulseboard_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    pulseboard_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("pulseboard")
            .and(predicate::str::contains("summary"))
            .and(predicate::str::contains("metrics"))
            .and(predicate::str::contains("notifications"))
            .and(predicate::str::contains("health")),
    );
}

#[test]
fn test_version_flag() {
    pulseboard_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pulseboard"));
}

#[test]
fn test_invalid_output_format() {
    let output = pulseboard_cmd()
        .args(["-o", "xml", "health"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("xml"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    pulseboard_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    pulseboard_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pulseboard"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    pulseboard_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    pulseboard_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]").and(predicate::str::contains("per_page")));
}

#[test]
fn test_config_profiles_from_file() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "lab"

[profiles.lab]
api_url = "http://lab.internal:5000"
"#,
    );

    pulseboard_cmd_in(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab").and(predicate::str::contains("lab.internal")));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let output = pulseboard_cmd()
        .args(["--profile", "missing", "health"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("missing"));
}

// ── Backend errors ──────────────────────────────────────────────────

#[test]
fn test_unreachable_backend_exits_with_connection_code() {
    let output = pulseboard_cmd()
        .args(["--url", "http://127.0.0.1:9", "--timeout", "5", "health"])
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(7),
        "{}",
        combined_output(&output)
    );
}

#[test]
fn test_bad_filter_date_fails_before_request() {
    let output = pulseboard_cmd()
        .args(["--url", "http://127.0.0.1:9", "metrics", "--start", "Jan 5"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("YYYY-MM-DD"));
}

// ── Against a mock backend ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_metrics_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/metrics"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "timestamp": "2024-01-01T08:15:00",
                "uptime": 99.5,
                "users_connected": 12,
                "activity": "Normal"
            }],
            "pagination": { "page": 2, "pages": 3, "total": 21 }
        })))
        .mount(&server)
        .await;

    let output = pulseboard_cmd()
        .args(["--url", &server.uri(), "-o", "json", "metrics", "--page", "2"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["pagination"]["page"], 2);
    assert_eq!(value["data"][0]["users_connected"], 12);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_notifications_table_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "timestamp": "2024-01-02T00:00:00",
                "event_type": "Unauthorized Access Attempt",
                "description": "Suspicious activity detected"
            }],
            "pagination": { "page": 1, "pages": 1, "total": 1 }
        })))
        .mount(&server)
        .await;

    pulseboard_cmd()
        .args(["--url", &server.uri(), "notifications"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Event Type")
                .and(predicate::str::contains("Unauthorized Access Attempt"))
                .and(predicate::str::contains("Page 1 of 1 (1 total records)")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unhealthy_backend_exits_nine() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "unhealthy",
            "error": "database unavailable"
        })))
        .mount(&server)
        .await;

    let output = pulseboard_cmd()
        .args(["--url", &server.uri(), "health"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9));
    let text = combined_output(&output);
    assert!(text.contains("Unhealthy"), "{text}");
    assert!(text.contains("database unavailable"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_healthy_backend_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .mount(&server)
        .await;

    pulseboard_cmd()
        .args(["--url", &server.uri(), "-o", "plain", "health"])
        .assert()
        .success()
        .stdout("healthy\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_summary_uses_days_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/metrics/summary"))
        .and(query_param("days", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "avg_uptime": 97.0,
            "max_concurrent_users": 50,
            "avg_users": 21.4,
            "suspicious_activities": 2
        })))
        .mount(&server)
        .await;

    pulseboard_cmd()
        .args(["--url", &server.uri(), "summary", "--days", "30"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("97.0%")
                .and(predicate::str::contains("Suspicious Activities"))
                .and(predicate::str::contains("Last 30 day(s)")),
        );
}
