//! Tests for layered settings loading

use pretty_assertions::assert_eq;
use restoremill_config::{ConfigError, RestoreSettings, Settings, SettingsLoader, CONFIG_FILE_NAME};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &std::path::Path, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(CONFIG_FILE_NAME);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults_when_no_files_exist() {
    let temp = TempDir::new().unwrap();
    let settings = SettingsLoader::new(temp.path())
        .with_user_config(None)
        .without_env()
        .load()
        .unwrap();

    assert_eq!(settings.sources, RestoreSettings::default().sources);
    assert!(settings.config_file_paths().is_empty());
}

#[test]
fn test_closer_file_wins_and_paths_are_recorded() {
    let temp = TempDir::new().unwrap();
    let outer = write_config(
        temp.path(),
        r#"
global_packages_folder = "/outer/packages"
fallback_folders = ["/outer/fallback"]
"#,
    );
    let solution_dir = temp.path().join("src").join("solution");
    let inner = write_config(
        &solution_dir,
        r#"
global_packages_folder = "/inner/packages"

[[sources]]
name = "local"
source = "/feeds/local"
"#,
    );

    let settings = SettingsLoader::new(&solution_dir)
        .with_user_config(None)
        .without_env()
        .load()
        .unwrap();

    assert_eq!(
        settings.global_packages_folder(),
        Some(PathBuf::from("/inner/packages"))
    );
    assert_eq!(settings.fallback_folders(), vec!["/outer/fallback".to_string()]);
    assert_eq!(settings.enabled_sources()[0].source, "/feeds/local");
    assert_eq!(settings.config_file_paths(), vec![inner, outer]);
}

#[test]
fn test_user_config_is_least_specific() {
    let temp = TempDir::new().unwrap();
    let user = write_config(
        &temp.path().join("user"),
        r#"
fallback_folders = ["/user/fallback"]
"#,
    );
    let solution_dir = temp.path().join("solution");
    fs::create_dir_all(&solution_dir).unwrap();

    let loader = SettingsLoader::new(&solution_dir)
        .with_user_config(Some(user.clone()))
        .without_env();
    let settings = loader.load().unwrap();

    assert_eq!(settings.fallback_folders, vec!["/user/fallback".to_string()]);
    assert_eq!(settings.config_file_paths, vec![user]);
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        r#"
[logging]
level = "chatty"
"#,
    );

    let result = SettingsLoader::new(temp.path())
        .with_user_config(None)
        .without_env()
        .load();
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_malformed_file_is_a_load_error() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "global_packages_folder = [");

    let result = SettingsLoader::new(temp.path())
        .with_user_config(None)
        .without_env()
        .load();
    assert!(matches!(result, Err(ConfigError::Load { .. })));
}

#[test]
#[serial]
fn test_environment_overrides_files() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), r#"global_packages_folder = "/from/file""#);

    std::env::set_var("RESTOREMILL__GLOBAL_PACKAGES_FOLDER", "/from/env");
    let result = SettingsLoader::new(temp.path()).with_user_config(None).load();
    std::env::remove_var("RESTOREMILL__GLOBAL_PACKAGES_FOLDER");

    let settings = result.unwrap();
    assert_eq!(
        settings.global_packages_folder,
        Some(PathBuf::from("/from/env"))
    );
}

#[test]
fn test_save_round_trips_through_loader() {
    let temp = TempDir::new().unwrap();
    let mut settings = RestoreSettings::default();
    settings.global_packages_folder = Some(PathBuf::from("/saved/packages"));
    settings.fallback_folders = vec!["/saved/fallback".to_string()];
    settings.save(&temp.path().join(CONFIG_FILE_NAME)).unwrap();

    let loaded = SettingsLoader::new(temp.path())
        .with_user_config(None)
        .without_env()
        .load()
        .unwrap();
    assert_eq!(loaded.global_packages_folder, settings.global_packages_folder);
    assert_eq!(loaded.fallback_folders, settings.fallback_folders);
    assert_eq!(loaded.sources, settings.sources);
}
