//! CLI smoke tests that need no network

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::TempDir;

const FOODS: &str = r#"[
    {"id": "1", "name": "Chicken Breast", "nova_group": 1,
     "nutrients": {"calories": 165, "protein": 31, "carbs": 0, "fat": 3.6},
     "servingSize": "100g"},
    {"id": "2", "name": "Chicken Thigh", "nova_group": 1}
]"#;

/// Command isolated from any config file on the host
fn foodsearch(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("foodsearch").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("FOODSEARCH_CONFIG")
        .env_remove("FOODSEARCH_STORE_URL")
        .env_remove("FOODSEARCH_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

fn foods_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("foods.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(FOODS.as_bytes()).unwrap();
    path
}

#[test]
fn test_serving_json() {
    let dir = TempDir::new().unwrap();
    let output = foodsearch(&dir)
        .args(["serving", "250g", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["quantity"], 250.0);
    assert_eq!(info["unit"], "g");
    assert_eq!(info["original"], "250g");
}

#[test]
fn test_serving_unparseable() {
    let dir = TempDir::new().unwrap();
    foodsearch(&dir)
        .args(["serving", "approx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity: -"))
        .stdout(predicate::str::contains("original: approx"));
}

#[test]
fn test_explain_json() {
    let dir = TempDir::new().unwrap();
    let output = foodsearch(&dir)
        .args(["explain", "Chicken Nuggets Breaded", "chicken breast", "-f", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let explanation: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(explanation["source"], "external");
    assert_eq!(explanation["total"], explanation["breakdown"]["total"]);
}

#[test]
fn test_explain_text() {
    let dir = TempDir::new().unwrap();
    foodsearch(&dir)
        .args(["explain", "Apple", "apple", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name relevance"))
        .stdout(predicate::str::contains("Kept"));
}

#[test]
fn test_offline_search_with_local_file() {
    let dir = TempDir::new().unwrap();
    let foods = foods_file(&dir);

    let output = foodsearch(&dir)
        .args(["search", "chicken breast", "--offline", "--format", "json", "--local-file"])
        .arg(&foods)
        .output()
        .unwrap();

    assert!(output.status.success());
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Chicken Breast");
    assert_eq!(results[0]["source"], "local");
    assert_eq!(results[0]["defaultServing"]["quantity"], 100.0);
}

#[test]
fn test_offline_search_without_matches() {
    let dir = TempDir::new().unwrap();
    let foods = foods_file(&dir);

    foodsearch(&dir)
        .args(["search", "tofu", "--offline", "--local-file"])
        .arg(&foods)
        .assert()
        .success()
        .stdout(predicate::str::contains("No results"));
}

#[test]
fn test_missing_local_file() {
    let dir = TempDir::new().unwrap();
    foodsearch(&dir)
        .args(["search", "rice", "--offline", "--local-file", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_config_defaults() {
    let dir = TempDir::new().unwrap();
    foodsearch(&dir)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_results = 25"))
        .stdout(predicate::str::contains("[external]"));

    foodsearch(&dir)
        .args(["config", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(defaults)"));
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".foodsearch.toml"), "[search]\nmax_results = 5\n").unwrap();

    foodsearch(&dir)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_results = 5"));
}

#[test]
fn test_missing_explicit_config_exit_code() {
    let dir = TempDir::new().unwrap();
    foodsearch(&dir)
        .args(["--config", "missing.toml", "config"])
        .assert()
        .code(3);
}

#[test]
fn test_invalid_config_exit_code() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.toml"), "[search]\nmax_results = 0\n").unwrap();

    foodsearch(&dir)
        .args(["--config", "bad.toml", "serving", "1 cup"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("max_results"));
}
