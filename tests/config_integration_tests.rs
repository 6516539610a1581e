//! Integration tests for ConfigManager and settings file handling
//!
//! These tests verify:
//! - Settings loading and saving
//! - Defaults when no file exists
//! - Environment variable overrides
//! - Invalid YAML handling

use camino::Utf8PathBuf;
use makemyqrcode::ConfigManager;
use makemyqrcode::models::AppSettings;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(manager.settings_path(), config_path.join("makemyqrcode.yaml"));
}

#[test]
fn test_load_default_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap().without_env();

    let settings = manager.load_settings().unwrap();

    assert_eq!(settings.api_base_url, "http://localhost:5000");
    assert_eq!(settings.export_delay(), Duration::from_millis(100));
    assert_eq!(settings.copy_reset(), Duration::from_secs(2));
    assert_eq!(settings.request_timeout(), None);
    assert_eq!(settings.viewport_width, 1280);
}

#[test]
fn test_save_and_load_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap().without_env();

    let settings = AppSettings {
        api_base_url: "https://qr.example.org".to_string(),
        output_dir: Utf8PathBuf::from("downloads"),
        request_timeout_secs: Some(15),
        copy_reset_ms: 500,
        ..AppSettings::default()
    };
    manager.save_settings(&settings).unwrap();

    let loaded = manager.load_settings().unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap().without_env();

    fs::write(manager.settings_path(), "viewport_width: 390\n").unwrap();

    let settings = manager.load_settings().unwrap();
    assert_eq!(settings.viewport_width, 390);
    assert_eq!(settings.api_base_url, "http://localhost:5000");
    assert_eq!(settings.export_delay_ms, 100);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path)
        .unwrap()
        .with_env_prefix("MAKEMYQR_ENVTEST");

    fs::write(
        manager.settings_path(),
        "api_base_url: http://file.example\nexport_delay_ms: 250\n",
    )
    .unwrap();

    // SAFETY: the prefix is unique to this test
    unsafe {
        std::env::set_var("MAKEMYQR_ENVTEST_API_BASE_URL", "http://env.example");
    }

    let settings = manager.load_settings().unwrap();

    unsafe {
        std::env::remove_var("MAKEMYQR_ENVTEST_API_BASE_URL");
    }

    assert_eq!(settings.api_base_url, "http://env.example");
    assert_eq!(settings.export_delay_ms, 250);
}

#[test]
fn test_config_directory_creation() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("nested/settings");

    assert!(!nested.exists());
    let manager = ConfigManager::new(&nested).unwrap();
    assert!(manager.config_dir().exists());
}

#[test]
fn test_invalid_yaml_handling() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap().without_env();

    fs::write(manager.settings_path(), "viewport_width: [not, a, number\n").unwrap();

    assert!(manager.load_settings().is_err());
}
