use super::settings::Settings;
use super::{IdentifierScope, load_config};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.delivery.identifier_scope, IdentifierScope::Topic);
    assert!(settings.delivery.warn_on_unmatched_release);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn load_config_without_sources_uses_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    let cfg = temp_env::with_vars_unset(
        [
            "MQTT_DELIVERY__IDENTIFIER_SCOPE",
            "MQTT_DELIVERY__WARN_ON_UNMATCHED_RELEASE",
            "MQTT_LOGGING__LEVEL",
        ],
        load_config,
    );

    env::set_current_dir(orig).expect("restore cwd");
    assert_eq!(cfg.expect("load_config failed"), Settings::default());
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // Create a temporary directory and set it as current dir so load_config
    // will pick up config/default.toml from there.
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [delivery]
        identifier_scope = "global"
        warn_on_unmatched_release = false

        [logging]
        level = "debug"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();

    // restore cwd
    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.delivery.identifier_scope, IdentifierScope::Global);
    assert!(!cfg.delivery.warn_on_unmatched_release);
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
#[serial]
fn load_config_from_env_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    let cfg = temp_env::with_vars(
        [
            ("MQTT_DELIVERY__IDENTIFIER_SCOPE", Some("global")),
            ("MQTT_DELIVERY__WARN_ON_UNMATCHED_RELEASE", Some("false")),
            ("MQTT_LOGGING__LEVEL", Some("trace")),
        ],
        load_config,
    );

    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.delivery.identifier_scope, IdentifierScope::Global);
    assert!(!cfg.delivery.warn_on_unmatched_release);
    assert_eq!(cfg.logging.level, "trace");
}

#[test]
#[serial]
fn load_config_keeps_defaults_for_missing_keys() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    let cfg = temp_env::with_vars(
        [
            ("MQTT_LOGGING__LEVEL", Some("warn")),
            ("MQTT_DELIVERY__IDENTIFIER_SCOPE", None),
            ("MQTT_DELIVERY__WARN_ON_UNMATCHED_RELEASE", None),
        ],
        load_config,
    );

    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.logging.level, "warn");
    assert_eq!(cfg.delivery.identifier_scope, IdentifierScope::Topic);
    assert!(cfg.delivery.warn_on_unmatched_release);
}
