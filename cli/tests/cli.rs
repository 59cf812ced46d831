use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `sheetnav` running in an empty directory with no user config
fn sheetnav(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sheetnav").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("CLICOLOR_FORCE")
        .env_remove("SHEETNAV_ANALYTICS_ID")
        .env_remove("SHEETNAV_CASE_SENSITIVE");
    cmd
}

#[test]
fn resolve_sheet_path() {
    let dir = TempDir::new().unwrap();
    sheetnav(&dir)
        .args(["resolve", "/sheets/abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(page Sheet)"))
        .stdout(predicate::str::contains("sheetid=abc123"));
}

#[test]
fn resolve_root_as_json_follows_redirect() {
    let dir = TempDir::new().unwrap();
    let output = sheetnav(&dir)
        .args(["--json", "resolve", "/#top"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let route = &value[0]["route"];
    assert_eq!(route["name"], "sheets");
    assert_eq!(route["page"], "SheetIndex");
    assert_eq!(route["redirected_from"], "home");
    assert_eq!(route["hash"], "top");
}

#[test]
fn resolve_fails_without_catch_all() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("sheetnav.json"),
        r#"{ "routes": [ { "path": "/sheets", "name": "sheets", "page": "SheetIndex" } ] }"#,
    )
    .unwrap();

    sheetnav(&dir)
        .args(["resolve", "/sheets", "/missing"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No route matches path '/missing'"))
        .stderr(predicate::str::contains("1 of 2 path(s) did not resolve"));
}

#[test]
fn check_builtin_configuration() {
    let dir = TempDir::new().unwrap();
    sheetnav(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid (builtin route table)"))
        .stdout(predicate::str::contains("Redirects: 1"))
        .stdout(predicate::str::contains("Analytics: disabled"));
}

#[test]
fn check_rejects_redirect_cycle() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("cycle.json");
    fs::write(
        &config,
        r#"{
            "routes": [
                { "path": "/a", "name": "a", "redirect": "b" },
                { "path": "/b", "name": "b", "redirect": "a" }
            ]
        }"#,
    )
    .unwrap();

    sheetnav(&dir)
        .arg("--config")
        .arg(&config)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Redirect chain does not terminate"));
}

#[test]
fn check_reports_analytics_override() {
    let dir = TempDir::new().unwrap();
    sheetnav(&dir)
        .args(["--analytics-id", "G-TEST123", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Analytics: enabled (G-TEST123)"));
}

#[test]
fn href_builds_named_path() {
    let dir = TempDir::new().unwrap();
    sheetnav(&dir)
        .args(["href", "sheet", "-p", "sheetid=pets"])
        .assert()
        .success()
        .stdout("/sheets/pets\n");
}

#[test]
fn href_requires_parameters() {
    let dir = TempDir::new().unwrap();
    sheetnav(&dir)
        .args(["href", "sheet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires parameter 'sheetid'"));
}

#[test]
fn routes_lists_table_in_match_order() {
    let dir = TempDir::new().unwrap();
    sheetnav(&dir)
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)home.*sheets.*sheet-section.*not-found").unwrap());
}

#[test]
fn interactive_session() {
    let dir = TempDir::new().unwrap();
    sheetnav(&dir)
        .write_stdin("go /sheets/pets\nback\ncurrent\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sheet: pets"))
        .stdout(predicate::str::contains("/sheets (sheets) SheetIndex"));
}
