use c3dp_kernel::config::{ConfigError, load_config};
use c3dp_kernel::domain::config::ToolConfig;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

#[test]
#[serial]
fn loads_settings_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("c3dp.toml");
    fs::write(
        &path,
        r#"
[codec]
max_depth = 32

[logging]
level = "debug"

[registry]
preload = ["web.flag", "app.extra.run"]
"#,
    )?;

    let cfg: ToolConfig = load_config(Some(&path))?;

    assert_eq!(cfg.codec.max_depth, 32);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.console, "unset fields keep their defaults");
    assert_eq!(cfg.registry.preload, vec!["web.flag", "app.extra.run"]);
    Ok(())
}

#[test]
#[serial]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let result: Result<ToolConfig, ConfigError> = load_config(Some(dir.path().join("absent.toml")));

    assert!(matches!(result, Err(ConfigError::Config { .. })));
}

#[test]
#[serial]
fn default_file_is_optional() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let previous = std::env::current_dir()?;
    std::env::set_current_dir(dir.path())?;

    let without: Result<ToolConfig, ConfigError> = load_config(None::<&str>);
    fs::write(dir.path().join("c3dp.toml"), "[codec]\nmax_depth = 9\n")?;
    let with: Result<ToolConfig, ConfigError> = load_config(None::<&str>);

    std::env::set_current_dir(previous)?;

    assert_eq!(without?.codec.max_depth, 128);
    assert_eq!(with?.codec.max_depth, 9);
    Ok(())
}
