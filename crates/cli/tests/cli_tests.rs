use assert_cmd::Command;
use predicates::prelude::*;

fn eventboard() -> Command {
    let mut cmd = Command::cargo_bin("eventboard").unwrap();
    cmd.env_remove("DATABASE_URL").env_remove("API_URL").env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_cli_help() {
    eventboard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local wargame event board"))
        .stdout(predicate::str::contains("newsletter-cron"));
}

#[test]
fn test_cli_serve_help() {
    eventboard().arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_scrape_help() {
    eventboard()
        .args(["scrape", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--facebook-page"))
        .stdout(predicate::str::contains("--discord-guild"));
}

#[test]
fn test_unknown_subcommand_fails() {
    eventboard().arg("frobnicate").assert().failure();
}

#[test]
fn test_cron_skips_other_days() {
    eventboard()
        .args(["newsletter-cron", "--date", "2026-10-19"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));
}

#[test]
fn test_cron_requires_api_url() {
    // 2026-10-24 is the second-to-last Saturday of October 2026.
    eventboard()
        .args(["newsletter-cron", "--date", "2026-10-24"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_URL"));
}

#[test]
fn test_import_empty_directory_reports_zeros() {
    let tmp = tempfile::TempDir::new().unwrap();
    eventboard()
        .arg("import")
        .arg("--data-dir")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"processed\": 0"));
}

#[test]
fn test_preview_email_writes_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = tmp.path().join("preview.html");
    eventboard().arg("preview-email").arg("--out").arg(&out).assert().success();
    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("<html lang=\"en\">"));
}

#[test]
fn test_scrape_without_sources_writes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out_dir = tmp.path().join("scraped");
    eventboard()
        .env_remove("FACEBOOK_ACCESS_TOKEN")
        .env_remove("DISCORD_BOT_TOKEN")
        .arg("scrape")
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No events found"));
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
}
