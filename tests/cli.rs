use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn briefly(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("briefly").unwrap();
    cmd.env("BRIEFLY_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("BRIEFLY_BASE_URL")
        .env_remove("BRIEFLY_LOG");
    cmd
}

fn write_session(home: &Path, json: &str) {
    std::fs::write(home.join("session.json"), json).unwrap();
}

#[test]
fn status_when_logged_out_offers_login_and_register() {
    let home = tempfile::tempdir().unwrap();
    briefly(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"))
        .stdout(predicate::str::contains("Login"))
        .stdout(predicate::str::contains("Register"))
        .stdout(predicate::str::contains("Logout").not());
}

#[test]
fn naked_run_prints_status() {
    let home = tempfile::tempdir().unwrap();
    briefly(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn stale_admin_flag_without_token_shows_no_admin_panel() {
    let home = tempfile::tempdir().unwrap();
    write_session(home.path(), r#"{"token":null,"is_admin":true}"#);

    briefly(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"))
        .stdout(predicate::str::contains("Admin Panel").not());
}

#[test]
fn admin_session_shows_admin_panel() {
    let home = tempfile::tempdir().unwrap();
    write_session(home.path(), r#"{"token":"tok","is_admin":true}"#);

    briefly(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as admin"))
        .stdout(predicate::str::contains("Admin Panel"))
        .stdout(predicate::str::contains("Logout"));
}

#[test]
fn logout_clears_session_and_is_idempotent() {
    let home = tempfile::tempdir().unwrap();
    write_session(home.path(), r#"{"token":"tok","is_admin":false}"#);

    briefly(home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!home.path().join("session.json").exists());

    briefly(home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn protected_commands_require_login() {
    let home = tempfile::tempdir().unwrap();
    for args in [
        vec!["notes", "list"],
        vec!["history", "list"],
        vec!["admin"],
        vec!["subscribe", "premium"],
        vec!["refresh"],
    ] {
        briefly(home.path())
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Error: User not authenticated. Please log in.",
            ));
    }
}

#[test]
fn invalid_registration_lists_every_field_and_reports_the_primary() {
    let home = tempfile::tempdir().unwrap();
    briefly(home.path())
        .args([
            "register",
            "--username",
            "ab",
            "--email",
            "not-an-email",
            "--password",
            "Abc12345!",
            "--confirm",
            "Abc12345",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: Username must be at least 3 characters",
        ))
        .stderr(predicate::str::contains("email: Enter a valid email"))
        .stderr(predicate::str::contains("confirm: Passwords do not match"))
        .stderr(predicate::str::contains("password:").not());
}

#[test]
fn login_with_empty_password_is_rejected_locally() {
    let home = tempfile::tempdir().unwrap();
    briefly(home.path())
        .env("BRIEFLY_BASE_URL", "http://127.0.0.1:9")
        .args(["login", "--username", "reader"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Please fill out this field"));
}

#[test]
fn unreachable_backend_is_a_network_error() {
    let home = tempfile::tempdir().unwrap();
    write_session(home.path(), r#"{"token":"tok","is_admin":false}"#);

    briefly(home.path())
        .env("BRIEFLY_BASE_URL", "http://127.0.0.1:9")
        .args(["notes", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: Network error. Please try again later.",
        ));
}

#[test]
fn summarize_without_a_readable_file_asks_for_all_fields() {
    let home = tempfile::tempdir().unwrap();
    write_session(home.path(), r#"{"token":"tok","is_admin":false}"#);

    briefly(home.path())
        .args(["summarize", "does-not-exist.pdf", "--length", "long"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Please fill in all fields."));
}

#[test]
fn config_set_and_show() {
    let home = tempfile::tempdir().unwrap();

    briefly(home.path())
        .args(["config", "base-url", "https://api.example.com/"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "base-url set to https://api.example.com",
        ));

    briefly(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("base-url = https://api.example.com"))
        .stdout(predicate::str::contains("password-policy = strict"))
        .stdout(predicate::str::contains("poll-interval = 1000"));

    briefly(home.path())
        .args(["config", "password-policy", "lenient"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown password policy"));
}

#[test]
fn standard_policy_accepts_password_without_special_character() {
    let home = tempfile::tempdir().unwrap();
    briefly(home.path())
        .args(["config", "password-policy", "standard"])
        .assert()
        .success();

    // Passes local validation, so the failure comes from the unreachable backend.
    briefly(home.path())
        .env("BRIEFLY_BASE_URL", "http://127.0.0.1:9")
        .args([
            "reset-password",
            "--token",
            "reset-1",
            "--password",
            "Valid1Aa",
            "--confirm",
            "Valid1Aa",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));
}

#[test]
fn summarize_checks_the_file_before_the_session() {
    let home = tempfile::tempdir().unwrap();
    briefly(home.path())
        .args(["summarize", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Please fill in all fields."));

    let pdf = home.path().join("paper.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();
    briefly(home.path())
        .arg("summarize")
        .arg(&pdf)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: User not authenticated. Please log in.",
        ));
}
