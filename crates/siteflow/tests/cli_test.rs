use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn write_site_kdl(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.kdl");
    fs::write(&path, content).unwrap();
    (dir, path)
}

const BASIC_SITE: &str = r#"
site "my-website" {
    stack "dev"
    website {
        tags {
            environment "dev"
        }
    }
}
"#;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("siteflow").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("siteflow").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("siteflow"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("siteflow").unwrap();
    cmd.arg("provision").assert().failure();
}

#[test]
fn test_preview_help() {
    let mut cmd = Command::cargo_bin("siteflow").unwrap();
    cmd.arg("preview")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_validate_reports_resource_count() {
    let (_dir, path) = write_site_kdl(BASIC_SITE);

    let mut cmd = Command::cargo_bin("siteflow").unwrap();
    cmd.arg("validate")
        .arg("-c")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration valid: 6 resources"));
}

#[test]
fn test_validate_rejects_half_configured_certificate() {
    let (_dir, path) = write_site_kdl(
        r#"
site "my-website" {
    website {
        custom-domain "www.example.com"
    }
}
"#,
    );

    let mut cmd = Command::cargo_bin("siteflow").unwrap();
    cmd.arg("validate")
        .arg("-c")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("acm-certificate-arn"));
}

#[test]
fn test_preview_shows_plan_and_outputs() {
    let (_dir, path) = write_site_kdl(BASIC_SITE);

    let mut cmd = Command::cargo_bin("siteflow").unwrap();
    cmd.arg("preview")
        .arg("-c")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("aws:s3:bucket"))
        .stdout(predicate::str::contains("aws:cloudfront:distribution"))
        .stdout(predicate::str::contains("5 resources to create, 1 components"))
        .stdout(predicate::str::contains("bucketName"))
        .stdout(predicate::str::contains(".cloudfront.net"));
}

#[test]
fn test_export_emits_declaration_set() {
    let (_dir, path) = write_site_kdl(BASIC_SITE);

    let mut cmd = Command::cargo_bin("siteflow").unwrap();
    let output = cmd
        .arg("export")
        .arg("-c")
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let set: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(set["project"], "my-website");
    assert_eq!(set["stack"], "dev");
    assert_eq!(set["resources"].as_array().unwrap().len(), 6);
}

#[test]
fn test_export_is_deterministic() {
    let (_dir, path) = write_site_kdl(BASIC_SITE);

    let run = || {
        let mut cmd = Command::cargo_bin("siteflow").unwrap();
        let output = cmd
            .arg("export")
            .arg("-c")
            .arg(&path)
            .assert()
            .success()
            .get_output()
            .clone();
        String::from_utf8(output.stdout).unwrap()
    };

    assert_eq!(run(), run());
}
