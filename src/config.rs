//! Configuration loading.
//!
//! Loads `labelgate.toml` from `$LABELGATE_CONFIG_PATH`, falling back to the
//! per-user config directory. A missing file yields defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// File name looked up inside [`config_dir`].
pub const CONFIG_FILE_NAME: &str = "labelgate.toml";

/// Stock setrans location on targeted-policy systems.
pub const DEFAULT_SETRANS_PATH: &str = "/etc/selinux/targeted/setrans.conf";

/// Attribute that carries the SELinux label.
pub const DEFAULT_XATTR_NAME: &str = "security.selinux";

/// Largest label the reader accepts by default, in bytes.
pub const DEFAULT_XATTR_MAX: usize = 4096;

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelgateConfig {
    /// Vernacular translation table (`[translation]`).
    pub translation: TranslationConfig,
    /// Extended attribute reader (`[xattr]`).
    pub xattr: XattrConfig,
    /// Log output (`[logging]`).
    pub logging: LoggingConfig,
}

impl LabelgateConfig {
    /// Load with precedence env vars > TOML file > defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let path = Self::config_path_with(env)?;
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(env);
        Ok(config)
    }

    /// Load from an explicit file, without env overrides. A missing file
    /// yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
                    .with_context(|| format!("invalid config at {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => {
                Err(e).with_context(|| format!("failed to read config at {}", path.display()))
            }
        }
    }

    /// Parse a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or mistyped values.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Resolve the config file path using a custom env resolver.
    ///
    /// # Errors
    ///
    /// Returns an error when no override is set and the home directory
    /// cannot be determined.
    pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
        if let Some(p) = env("LABELGATE_CONFIG_PATH") {
            return Ok(PathBuf::from(p));
        }
        Ok(config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function so tests avoid mutating the process env.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        // Translation.
        if let Some(v) = env("LABELGATE_SETRANS_PATH") {
            self.translation.path = PathBuf::from(v);
        }
        if let Some(v) = env("LABELGATE_SETRANS_STRICT") {
            match v.parse() {
                Ok(strict) => self.translation.strict = strict,
                Err(_) => tracing::warn!(
                    var = "LABELGATE_SETRANS_STRICT",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }

        // Xattr.
        if let Some(v) = env("LABELGATE_XATTR_MAX") {
            match v.parse() {
                Ok(n) => self.xattr.max_size = n,
                Err(_) => tracing::warn!(
                    var = "LABELGATE_XATTR_MAX",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }

        // Logging.
        if let Some(v) = env("LABELGATE_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = env("LABELGATE_LOG_DIR") {
            self.logging.dir = Some(PathBuf::from(v));
        }
    }
}

// ── Translation config ──────────────────────────────────────────

/// Where the setrans table comes from and how strictly it is ingested.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Path to the setrans file.
    pub path: PathBuf,
    /// Reject the whole table on the first parser disagreement.
    pub strict: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SETRANS_PATH),
            strict: false,
        }
    }
}

// ── Xattr config ────────────────────────────────────────────────

/// Extended attribute reader limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct XattrConfig {
    /// Attribute name to read.
    pub attribute: String,
    /// Upper bound on the attribute size in bytes.
    pub max_size: usize,
}

impl Default for XattrConfig {
    fn default() -> Self {
        Self {
            attribute: DEFAULT_XATTR_NAME.to_string(),
            max_size: DEFAULT_XATTR_MAX,
        }
    }
}

// ── Logging config ──────────────────────────────────────────────

/// Log filter and optional file output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for rotated JSON logs. Stderr only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

/// Resolve the default config directory (`$XDG_CONFIG_HOME/labelgate` on
/// Linux).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf> {
    let base = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(base.config_dir().join("labelgate"))
}
