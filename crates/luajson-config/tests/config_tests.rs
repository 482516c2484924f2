//! Config precedence tests
//!
//! These tests mutate process environment variables, so every one of them is
//! `#[serial]`.

use std::path::{Path, PathBuf};

use luajson_config::{
    ConfigOverrides, RunConfig, ENV_EXPORT_MODE, ENV_LUA_VERSION, ENV_OUTPUT_DIR, ENV_SOURCE_DIR,
    ENV_TEST_MODE,
};
use serial_test::serial;
use tempfile::TempDir;

const ALL_VARS: [&str; 4] = [ENV_SOURCE_DIR, ENV_OUTPUT_DIR, ENV_LUA_VERSION, ENV_EXPORT_MODE];

/// Clears the `LUAJSON_*` variables on creation and again on drop
struct EnvGuard;

impl EnvGuard {
    fn new() -> Self {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
        std::env::set_var(ENV_TEST_MODE, "1");
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
        std::env::remove_var(ENV_TEST_MODE);
    }
}

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
#[serial]
fn test_load_without_file_gives_defaults() {
    let _env = EnvGuard::new();

    let config = RunConfig::load(None, ConfigOverrides::default()).unwrap();

    assert_eq!(config, RunConfig::default());
}

#[test]
#[serial]
fn test_file_values_override_defaults() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
source_dir = "data/lua"
lua_version = "52"
"#,
    );

    let config = RunConfig::load(Some(&path), ConfigOverrides::default()).unwrap();

    assert_eq!(config.source_dir, Some(PathBuf::from("data/lua")));
    assert_eq!(config.output_dir, None);
    assert_eq!(config.lua_version, "52");
    assert_eq!(config.export_mode, "all");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "lua_version = \"52\"\nexport_mode = \"min\"\n");
    std::env::set_var(ENV_LUA_VERSION, "53");
    std::env::set_var(ENV_OUTPUT_DIR, "/tmp/json");

    let config = RunConfig::load(Some(&path), ConfigOverrides::default()).unwrap();

    assert_eq!(config.lua_version, "53");
    assert_eq!(config.export_mode, "min");
    assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/json")));
}

#[test]
#[serial]
fn test_overrides_beat_env() {
    let _env = EnvGuard::new();
    std::env::set_var(ENV_EXPORT_MODE, "format");
    std::env::set_var(ENV_SOURCE_DIR, "env-src");

    let config = RunConfig::load(
        None,
        ConfigOverrides {
            export_mode: Some("min".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(config.export_mode, "min");
    assert_eq!(config.source_dir, Some(PathBuf::from("env-src")));
}

#[test]
#[serial]
fn test_saved_config_is_reused() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("luajson/config.toml");

    let first = RunConfig::load(
        Some(&path),
        ConfigOverrides {
            source_dir: Some(PathBuf::from("lua")),
            output_dir: Some(PathBuf::from("json")),
            lua_version: Some("53".to_string()),
            export_mode: None,
        },
    )
    .unwrap();
    first.save(&path).unwrap();

    let second = RunConfig::load(Some(&path), ConfigOverrides::default()).unwrap();
    assert_eq!(second, first);
}

#[test]
#[serial]
fn test_toml_omits_unset_directories() {
    let _env = EnvGuard::new();

    let text = RunConfig::default().display_as_toml().unwrap();

    assert!(!text.contains("source_dir"));
    assert!(text.contains("lua_version = \"54\""));
    assert!(text.contains("export_mode = \"all\""));
}
