//! Tests for config loading

use super::*;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_missing_file_returns_defaults_without_warning() {
    let dir = TempDir::new().unwrap();
    let result = load_config_from(&dir.path().join("config.toml"));

    assert_eq!(result.config, Config::default());
    assert!(result.warning.is_none());
}

#[test]
fn test_valid_file_is_loaded() {
    let (_dir, path) = write_config("[cache]\ncapacity = 7\n");
    let result = load_config_from(&path);

    assert_eq!(result.config.cache.capacity, 7);
    assert!(result.warning.is_none());
}

#[test]
fn test_malformed_toml_missing_bracket() {
    let (_dir, path) = write_config("[search\ndebounce_ms = 100");
    let result = load_config_from(&path);

    assert_eq!(result.config, Config::default());
    let warning = result.warning.unwrap();
    assert!(warning.starts_with("Invalid config:"), "got: {}", warning);
}

#[test]
fn test_malformed_toml_missing_quotes() {
    let (_dir, path) = write_config("[search]\nendpoint = http://localhost");
    let result = load_config_from(&path);

    assert_eq!(result.config, Config::default());
    assert!(result.warning.is_some());
}

#[test]
fn test_malformed_toml_missing_value() {
    let (_dir, path) = write_config("[cache]\n capacity");
    let result = load_config_from(&path);

    assert!(result.warning.is_some());
}

#[test]
fn test_unreadable_path_warns() {
    // A directory exists but cannot be read as a file
    let dir = TempDir::new().unwrap();
    let result = load_config_from(dir.path());

    assert_eq!(result.config, Config::default());
    let warning = result.warning.unwrap();
    assert!(warning.starts_with("Failed to read config:"), "got: {}", warning);
}

#[test]
fn test_config_path_consistency() {
    let path1 = get_config_path();
    let path2 = get_config_path();

    assert_eq!(path1, path2, "Config path should be consistent");

    let path_str = path1.to_string_lossy();
    assert!(
        path_str.ends_with("typeahead/config.toml") || path_str.ends_with("typeahead\\config.toml"),
        "Config path should end with typeahead/config.toml, got: {}",
        path_str
    );
}
