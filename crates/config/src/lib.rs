//! Configuration for tvsync.
//!
//! Layers, lowest priority first:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. a configuration file (TOML, YAML or JSON, see [`discover`]),
//! 3. environment variables prefixed with `TVSYNC_`, using `__` to separate
//!    nested keys (`TVSYNC_SONARR__API_KEY`),
//! 4. whatever the caller merges on top of [`Config::figment`] (command-line
//!    flags, usually).

pub mod error;
mod file;

pub use crate::file::{CONFIG_FILE_STEM, discover};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "TVSYNC_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub sonarr: SonarrConfig,
    pub app: AppConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    pub no_color: bool,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            no_color: std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonarrConfig {
    /// API root of the Sonarr instance, e.g. `http://localhost:8989/api/v3`.
    pub api_url: String,
    pub api_key: String,
    /// Library root on the Sonarr host; series are registered beneath it.
    pub tv_path: String,
}
impl Default for SonarrConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            tv_path: "/tv shows".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local media directory, one subdirectory per series.
    pub path: PathBuf,
}
impl Default for AppConfig {
    fn default() -> Self {
        Self { path: PathBuf::from(".") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// How many series are processed at once.
    pub concurrency: usize,
}
impl Default for SyncConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl Config {
    /// Build the layered [`Figment`] (defaults, `file`, environment). Merge
    /// further providers on top before calling [`from_figment`](Self::from_figment).
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(file::provider(path)?);
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract the configuration from a figment. Does not [`validate`](Self::validate).
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        figment.extract().or_raise(|| ErrorKind::Load)
    }

    /// Convenience wrapper: [`figment`](Self::figment) then
    /// [`from_figment`](Self::from_figment).
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(file)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app.path.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("app.path is required"));
        }
        if self.sonarr.api_url.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("sonarr.api_url is required"));
        }
        if self.sonarr.api_key.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("sonarr.api_key is required"));
        }
        if self.sync.concurrency == 0 {
            exn::bail!(ErrorKind::Invalid("sync.concurrency must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn valid() -> Config {
        let mut config = Config::default();
        config.sonarr.api_url = "http://localhost:8989/api/v3".to_string();
        config.sonarr.api_key = "secret".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.sonarr.tv_path, "/tv shows");
        assert_eq!(config.app.path, PathBuf::from("."));
        assert_eq!(config.sync.concurrency, 1);
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "tvsync.toml",
                r#"
                    [sonarr]
                    api_url = "http://sonarr:8989/api/v3"
                    api_key = "from-file"

                    [app]
                    path = "/media/tv"
                "#,
            )?;
            jail.set_env("TVSYNC_SONARR__API_KEY", "from-env");
            jail.set_env("TVSYNC_SYNC__CONCURRENCY", "4");

            let config = Config::load(Some(Path::new("tvsync.toml"))).unwrap();
            assert_eq!(config.sonarr.api_url, "http://sonarr:8989/api/v3");
            assert_eq!(config.sonarr.api_key, "from-env");
            assert_eq!(config.sonarr.tv_path, "/tv shows");
            assert_eq!(config.app.path, PathBuf::from("/media/tv"));
            assert_eq!(config.sync.concurrency, 4);
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("tvsync.yaml", "log:\n  format: text\n  level: debug\nsonarr:\n  tv_path: /tv\n")?;
            let config = Config::load(Some(Path::new("tvsync.yaml"))).unwrap();
            assert_eq!(config.log.format, LogFormat::Text);
            assert_eq!(config.log.level, "debug");
            assert_eq!(config.sonarr.tv_path, "/tv");
            Ok(())
        });
    }

    #[test]
    fn test_overrides_win() {
        Jail::expect_with(|jail| {
            jail.set_env("TVSYNC_APP__PATH", "/from/env");
            let figment = Config::figment(None).unwrap().merge(("app.path", "/from/cli"));
            let config = Config::from_figment(&figment).unwrap();
            assert_eq!(config.app.path, PathBuf::from("/from/cli"));
            Ok(())
        });
    }

    #[test]
    fn test_bad_value_fails_to_load() {
        Jail::expect_with(|jail| {
            jail.set_env("TVSYNC_SYNC__CONCURRENCY", "lots");
            let err = Config::load(None).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let mut missing_url = valid();
        missing_url.sonarr.api_url = "  ".to_string();
        let mut missing_key = valid();
        missing_key.sonarr.api_key.clear();
        let mut missing_path = valid();
        missing_path.app.path = PathBuf::new();
        let mut no_workers = valid();
        no_workers.sync.concurrency = 0;

        for config in [missing_url, missing_key, missing_path, no_workers] {
            let err = config.validate().unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid(_)));
        }
    }
}
