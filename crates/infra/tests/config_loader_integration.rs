//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading settings from files and
//! validating them into a client configuration.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use armory_domain::{ArmoryError, ClientConfig, ErrorKind, Locale, Region};
use armory_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    (temp_file, path)
}

#[test]
fn test_load_config_from_json_file() {
    let (_temp, path) = write_config(
        r#"{
            "client_id": "json-client",
            "client_secret": "json-secret",
            "region": "EU",
            "locale": "fr_FR",
            "api_base_url": "http://127.0.0.1:9000/wow/",
            "request_timeout_secs": 12,
            "max_concurrency": 6
        }"#,
        "json",
    );

    let settings = config::load_from_file(Some(path.clone())).expect("Failed to load JSON file");
    let config = ClientConfig::try_from(settings).expect("valid configuration");

    assert_eq!(config.region, Region::Eu);
    assert_eq!(config.locale, Locale::FrFr);
    assert_eq!(config.api_base_url, "http://127.0.0.1:9000/wow");
    assert_eq!(config.auth_url, "https://eu.battle.net/oauth/token");
    assert_eq!(config.request_timeout, Duration::from_secs(12));
    assert_eq!(config.max_concurrency, Some(6));
    assert_eq!(config.token_cache_path, None);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let (_temp, path) = write_config(
        r#"
client_id = "toml-client"
client_secret = "toml-secret"
region = "tw"
locale = "zh_TW"
token_cache_path = "/tmp/armory-toml-token.json"
token_safety_margin_secs = 30
retry_attempts = 3
"#,
        "toml",
    );

    let settings = config::load_from_file(Some(path.clone())).expect("Failed to load TOML file");
    let config = ClientConfig::try_from(settings).expect("valid configuration");

    assert_eq!(config.region, Region::Tw);
    assert_eq!(config.locale, Locale::ZhTw);
    assert_eq!(config.token_cache_path, Some(PathBuf::from("/tmp/armory-toml-token.json")));
    assert_eq!(config.token_safety_margin_secs, 30);
    assert_eq!(config.retry_attempts, 3);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_unknown_locale_in_file_fails_validation() {
    let (_temp, path) = write_config(
        r#"{ "client_id": "id", "client_secret": "secret", "region": "us", "locale": "en_GB" }"#,
        "json",
    );

    let settings = config::load_from_file(Some(path.clone())).expect("file parses");
    let err = ClientConfig::try_from(settings).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/armory.json".into()));

    match result {
        Err(ArmoryError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let (_temp, path) = write_config(r#"{ "client_id": "not closed" "#, "json");

    match config::load_from_file(Some(path.clone())) {
        Err(ArmoryError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }

    std::fs::remove_file(path).ok();
}
