//! CLI surface tests: exit codes and user-facing output.
//!
//! These stay network-free; the mocked-catalog flows live in
//! descry-core's integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn descry() -> Command {
    let mut cmd = Command::cargo_bin("descry").expect("binary builds");
    cmd.env_remove("DESCRY_BASE_URL")
        .env_remove("DESCRY_CLIENT_ID")
        .env_remove("DESCRY_CLIENT_SECRET")
        .env_remove("DESCRY_TIMEOUT")
        .env_remove("DESCRY_PARALLELISM");
    cmd
}

#[test]
fn no_files_found_exits_zero() {
    let dir = tempfile::tempdir().unwrap();

    descry()
        .env("DESCRY_CLIENT_ID", "id")
        .env("DESCRY_CLIENT_SECRET", "secret")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No descriptor files found to validate",
        ));
}

#[test]
fn missing_credentials_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("svc.yaml"),
        "identifier: svc-1\nblueprint: service\n",
    )
    .unwrap();

    descry()
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("❌"))
        .stdout(predicate::str::contains("client id not set"));
}

#[test]
fn credentials_checked_even_with_no_files() {
    // Config validation happens at client construction, before discovery.
    let dir = tempfile::tempdir().unwrap();

    descry()
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("configuration error"));
}

#[test]
fn bad_path_warning_is_non_fatal() {
    let dir = tempfile::tempdir().unwrap();

    descry()
        .env("DESCRY_CLIENT_ID", "id")
        .env("DESCRY_CLIENT_SECRET", "secret")
        .arg(dir.path().join("nope.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("is not a YAML file or directory"))
        .stdout(predicate::str::contains(
            "No descriptor files found to validate",
        ));
}

#[test]
fn help_mentions_paths_and_flags() {
    descry()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--client-id"))
        .stdout(predicate::str::contains("PATHS"));
}
