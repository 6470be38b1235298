//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("mosaic")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scrape"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn batch_dry_run_reports_missing_configuration() {
    Command::cargo_bin("mosaic")
        .unwrap()
        .env_remove("MOSAIC_SEARCH_API_KEY")
        .env("MOSAIC_TAGS_FILE", "/definitely/missing/Tags.json")
        .args(["batch", "--dry-run"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("issues found"));
}

#[test]
fn batch_dry_run_succeeds_with_complete_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let tags = dir.path().join("Tags.json");
    std::fs::write(
        &tags,
        r#"{"namespace":"ai-content","custom_tags":[]}"#,
    )
    .unwrap();

    Command::cargo_bin("mosaic")
        .unwrap()
        .env("MOSAIC_SEARCH_API_KEY", "test-key")
        .env("MOSAIC_LLM_URL", "http://localhost:8000")
        .env("MOSAIC_DB", dir.path().join("records.sqlite"))
        .env("MOSAIC_TAGS_FILE", &tags)
        .args(["batch", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("looks good"));
}
