//! Integration tests for the `stockdesk` CLI binary.
//!
//! Argument parsing, help, completions, and config handling run without a
//! backend; list and session behaviour run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `stockdesk` binary with env isolation.
///
/// Clears all `STOCKDESK_*` env vars and points config and data
/// directories into `home` so tests never touch the user's real files.
fn stockdesk_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("stockdesk");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("STOCKDESK_PROFILE")
        .env_remove("STOCKDESK_API_URL")
        .env_remove("STOCKDESK_TOKEN")
        .env_remove("STOCKDESK_OUTPUT")
        .env_remove("STOCKDESK_INSECURE")
        .env_remove("STOCKDESK_TIMEOUT")
        .env_remove("STOCKDESK_LOG_FILE");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn branch(id: i64, code: &str, name: &str, head: bool) -> Value {
    json!({
        "id": id,
        "branch_code": code,
        "branch_name": name,
        "is_head_branch": head,
        "regional_hub": if head { code } else { "JKT" },
        "is_active": true
    })
}

async fn backend_with_branches() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/branches"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                branch(1, "JKT", "Jakarta", true),
                branch(2, "BDG", "Bandung", false),
                branch(3, "SBY", "Surabaya", true),
                branch(4, "BGR", "Bogor", false),
            ]
        })))
        .mount(&server)
        .await;
    server
}

fn api_args(server: &MockServer) -> [String; 4] {
    [
        "--api-url".into(),
        format!("{}/api/", server.uri()),
        "--token".into(),
        "test-token".into(),
    ]
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = stockdesk_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("certificate")
            .and(predicate::str::contains("branches"))
            .and(predicate::str::contains("teachers"))
            .and(predicate::str::contains("stock")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stockdesk"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
    stockdesk_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = stockdesk_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_branches_list_without_config() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path())
        .args(["branches", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_unknown_sort_key_is_usage_error() {
    let home = TempDir::new().unwrap();
    // Rejected before any request is made, so the port never matters.
    stockdesk_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9/api/", "branches", "list", "--sort", "colour"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn test_stock_form_errors_are_usage_errors() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path())
        .args([
            "--api-url",
            "http://127.0.0.1:9/api/",
            "stock",
            "migrate",
            "--from",
            "JKT",
            "--to",
            "jkt",
            "--certificates",
            "5",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must differ"));
}

#[test]
fn test_logs_reject_unbounded_page() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9/api/", "logs", "--all"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("paged by the server"));
}

// ── Config & client state ───────────────────────────────────────────

#[test]
fn test_config_set_and_profiles() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path())
        .args(["config", "set", "api_url", "https://stock.example.com/api"])
        .assert()
        .success();
    stockdesk_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
    stockdesk_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "api_url = \"https://stock.example.com/api/\"",
        ));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path())
        .args(["config", "use", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_theme_toggle_persists() {
    let home = TempDir::new().unwrap();
    stockdesk_cmd(home.path())
        .args(["theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));
    stockdesk_cmd(home.path())
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));
    stockdesk_cmd(home.path())
        .args(["-o", "json-compact", "theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"theme":"dark"}"#));
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_branches_list_sorted_json() {
    let server = backend_with_branches().await;
    let home = TempDir::new().unwrap();

    let output = stockdesk_cmd(home.path())
        .args(api_args(&server))
        .args(["-o", "json", "branches", "list", "--sort", "name", "--page-size", "3"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let page: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 4);
    assert_eq!(page["total_pages"], 2);
    let codes: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["BDG", "BGR", "JKT"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_branches_filter_and_plain_output() {
    let server = backend_with_branches().await;
    let home = TempDir::new().unwrap();

    stockdesk_cmd(home.path())
        .args(api_args(&server))
        .args([
            "-o",
            "plain",
            "branches",
            "list",
            "--filter",
            "is_head_branch=true",
            "--sort",
            "code",
            "--desc",
        ])
        .assert()
        .success()
        .stdout("SBY\nJKT\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_page_past_the_end_resets() {
    let server = backend_with_branches().await;
    let home = TempDir::new().unwrap();

    stockdesk_cmd(home.path())
        .args(api_args(&server))
        .args(["-o", "plain", "branches", "list", "--search", "bandung", "--page", "3"])
        .assert()
        .success()
        .stdout("BDG\n")
        .stderr(predicate::str::contains("out of range"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/teachers"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "jwt expired"
        })))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    stockdesk_cmd(home.path())
        .args(api_args(&server))
        .args(["teachers", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_record_names_the_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/modules/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "not found"
        })))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    stockdesk_cmd(home.path())
        .args(api_args(&server))
        .args(["modules", "get", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("99"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logs_are_paged_by_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "1"))
        .and(query_param("action", "MIGRATE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": 8,
                "action": "MIGRATE",
                "description": "Moved 10 certificates from JKT to BDG",
                "actor": "admin"
            }],
            "meta": { "pagination": { "total": 3, "totalPages": 3, "page": 2 } }
        })))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let output = stockdesk_cmd(home.path())
        .args(api_args(&server))
        .args([
            "-o",
            "json-compact",
            "logs",
            "--action",
            "migrate",
            "--page",
            "2",
            "--page-size",
            "1",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let page: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 2);
    assert_eq!(page["items"][0]["action"], "MIGRATE");
}
