//! CLI integration tests (offline commands only)
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("medscout")
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--quality"))
        .stdout(predicate::str::contains("--keywords"));
}

#[test]
fn test_cli_version() {
    cmd().arg("--version").assert().success().stdout(predicate::str::contains("medscout"));
}

#[test]
fn test_cli_list_sources() {
    cmd()
        .arg("--list-sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ministerio de Salud"))
        .stdout(predicate::str::contains("Google News"))
        .stdout(predicate::str::contains("https://www.infobae.com/salud/"));
}

#[test]
fn test_cli_print_catalog() {
    let assert = cmd().arg("--print-catalog").env("XDG_CONFIG_HOME", TempDir::new().unwrap().path()).assert().success();
    let catalog: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(catalog["version"], "ar-2");
    assert!(catalog["equipment_terms"].as_array().unwrap().iter().any(|t| t == "tomógrafo"));
}

#[test]
fn test_cli_print_catalog_with_keywords() {
    let assert = cmd()
        .args(["--print-catalog", "-k", "litotritor, densitómetro"])
        .env("XDG_CONFIG_HOME", TempDir::new().unwrap().path())
        .assert()
        .success();
    let catalog: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let terms = catalog["equipment_terms"].as_array().unwrap();
    assert!(terms.iter().any(|t| t == "litotritor"));
    assert!(terms.iter().any(|t| t == "densitómetro"));
}

#[test]
fn test_cli_custom_catalog_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{
            "version": "test-1",
            "equipment_terms": ["litotritor"],
            "brand_terms": ["Dornier"],
            "facility_terms": ["Hospital"],
            "modality_map": []
        }"#,
    )
    .unwrap();

    cmd()
        .args(["--print-catalog", "--catalog", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("test-1"))
        .stdout(predicate::str::contains("Dornier"));
}

#[test]
fn test_cli_invalid_catalog_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.json");
    std::fs::write(&path, "{ not json").unwrap();

    cmd()
        .args(["--print-catalog", "--catalog", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load catalog"));
}

#[test]
fn test_cli_missing_catalog_file() {
    cmd().args(["--print-catalog", "--catalog", "/nonexistent/catalog.json"]).assert().failure();
}

#[test]
fn test_cli_unknown_source() {
    cmd()
        .args(["--source", "Diario Inexistente"])
        .env("XDG_CONFIG_HOME", TempDir::new().unwrap().path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source"));
}

#[test]
fn test_cli_invalid_adhoc_url() {
    cmd().args(["--url", "sin-separador"]).assert().failure().stderr(predicate::str::contains("--url"));
}

#[test]
fn test_cli_invalid_format() {
    cmd().args(["--format", "xml", "--list-sources"]).assert().failure();
}
