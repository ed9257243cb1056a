//! Coverage for config parsing, precedence and path resolution.

use std::io::Write;
use std::path::PathBuf;

use labelgate::config::{
    config_dir, LabelgateConfig, TranslationConfig, XattrConfig, CONFIG_FILE_NAME,
    DEFAULT_SETRANS_PATH,
};

#[test]
fn defaults_match_stock_paths() {
    let config = LabelgateConfig::default();
    assert_eq!(config.translation, TranslationConfig::default());
    assert_eq!(config.translation.path, PathBuf::from(DEFAULT_SETRANS_PATH));
    assert_eq!(config.xattr, XattrConfig::default());
    assert_eq!(config.xattr.attribute, "security.selinux");
    assert_eq!(config.xattr.max_size, 4096);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn parse_full_toml() {
    let toml_str = r#"
[translation]
path = "/opt/policy/setrans.conf"
strict = true

[xattr]
attribute = "user.label"
max_size = 512

[logging]
level = "debug"
dir = "/var/log/labelgate"
"#;
    let config = match LabelgateConfig::from_toml(toml_str) {
        Ok(config) => config,
        Err(err) => panic!("full config should parse: {err}"),
    };
    assert_eq!(
        config.translation.path,
        PathBuf::from("/opt/policy/setrans.conf")
    );
    assert!(config.translation.strict);
    assert_eq!(config.xattr.attribute, "user.label");
    assert_eq!(config.xattr.max_size, 512);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.logging.dir.as_deref(),
        Some(std::path::Path::new("/var/log/labelgate"))
    );
}

#[test]
fn parse_partial_toml_uses_defaults() {
    let config = match LabelgateConfig::from_toml("[xattr]\nmax_size = 128\n") {
        Ok(config) => config,
        Err(err) => panic!("partial config should parse: {err}"),
    };
    assert_eq!(config.xattr.max_size, 128);
    assert_eq!(config.xattr.attribute, "security.selinux");
    assert_eq!(config.translation, TranslationConfig::default());
}

#[test]
fn invalid_toml_returns_error() {
    assert!(LabelgateConfig::from_toml("this is {{ not valid toml").is_err());
    assert!(LabelgateConfig::from_toml("[xattr]\nmax_size = \"big\"\n").is_err());
}

#[test]
fn env_overrides_file_values() {
    let toml_str = r#"
[translation]
path = "/from/toml/setrans.conf"

[xattr]
max_size = 1024
"#;
    let mut config = match LabelgateConfig::from_toml(toml_str) {
        Ok(config) => config,
        Err(err) => panic!("config should parse: {err}"),
    };

    config.apply_overrides(|key| match key {
        "LABELGATE_SETRANS_PATH" => Some("/from/env/setrans.conf".to_string()),
        "LABELGATE_SETRANS_STRICT" => Some("true".to_string()),
        "LABELGATE_LOG_LEVEL" => Some("trace".to_string()),
        "LABELGATE_LOG_DIR" => Some("/tmp/labelgate-logs".to_string()),
        _ => None,
    });

    // Env wins over file.
    assert_eq!(
        config.translation.path,
        PathBuf::from("/from/env/setrans.conf")
    );
    assert!(config.translation.strict);
    assert_eq!(config.logging.level, "trace");
    assert_eq!(
        config.logging.dir,
        Some(PathBuf::from("/tmp/labelgate-logs"))
    );

    // File value kept when no env override.
    assert_eq!(config.xattr.max_size, 1024);
}

#[test]
fn xattr_max_override() {
    let mut config = LabelgateConfig::default();
    config.apply_overrides(|key| match key {
        "LABELGATE_XATTR_MAX" => Some("256".to_string()),
        _ => None,
    });
    assert_eq!(config.xattr.max_size, 256);
}

#[test]
fn config_path_uses_env_var() -> Result<(), Box<dyn std::error::Error>> {
    let path = LabelgateConfig::config_path_with(|key| match key {
        "LABELGATE_CONFIG_PATH" => Some("/custom/labelgate.toml".to_string()),
        _ => None,
    })?;
    assert_eq!(path, PathBuf::from("/custom/labelgate.toml"));
    Ok(())
}

#[test]
fn config_path_defaults_to_config_dir() -> Result<(), Box<dyn std::error::Error>> {
    let path = LabelgateConfig::config_path_with(|_| None)?;
    assert!(path.ends_with(CONFIG_FILE_NAME));
    assert!(config_dir()?.ends_with("labelgate"));
    Ok(())
}

#[test]
fn missing_file_yields_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = LabelgateConfig::load_from(&dir.path().join("absent.toml"))?;
    assert_eq!(config.xattr, XattrConfig::default());
    Ok(())
}

#[test]
fn load_from_reads_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[translation]\nstrict = true")?;
    let config = LabelgateConfig::load_from(file.path())?;
    assert!(config.translation.strict);
    assert_eq!(config.translation.path, PathBuf::from(DEFAULT_SETRANS_PATH));
    Ok(())
}

#[test]
fn malformed_file_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[translation\nstrict = ")?;
    assert!(LabelgateConfig::load_from(file.path()).is_err());
    Ok(())
}
