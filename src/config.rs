//! Runtime configuration loaded from `config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::backend::{BackendResult, Directory};
use crate::list_detail::ListDetailOptions;
use crate::model::Breakpoint;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default configuration embedded in the binary.
const DEFAULT_CONFIG: &str = r#"
[storage]

[lookup]
first_by_default = true
initial_select_delay_ms = 0
dialog_breakpoints = ["base", "sm"]

[log]
filter = "info"
"#;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub lookup: LookupConfig,
    pub log: LogConfig,
    /// File the configuration was read from; `None` for the embedded default.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory root; the XDG data directory when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub first_by_default: bool,
    pub initial_select_delay_ms: u64,
    pub dialog_breakpoints: Vec<Breakpoint>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            first_by_default: true,
            initial_select_delay_ms: 0,
            dialog_breakpoints: vec![Breakpoint::Base, Breakpoint::Sm],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives; `MYSK_LOG` overrides.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `config.toml` from the XDG config directory
    /// (`~/.config/mysk/config.toml`), falling back to the embedded default.
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::parse(DEFAULT_CONFIG),
        }
    }

    /// Loads configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Opens the school directory at the configured location.
    pub fn directory(&self) -> BackendResult<Directory> {
        match &self.storage.path {
            Some(path) => Directory::with_path(path),
            None => Directory::new(),
        }
    }

    /// Options for lookup screens.
    pub fn list_detail_options(&self) -> ListDetailOptions {
        let mut options = ListDetailOptions::default()
            .initial_select_delay(Duration::from_millis(self.lookup.initial_select_delay_ms))
            .dialog_breakpoints(self.lookup.dialog_breakpoints.iter().copied());
        options.first_by_default = self.lookup.first_by_default;
        options
    }
}

/// Returns `~/.config/mysk/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mysk").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn default_config_loads() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.storage.path, None);
        assert!(config.lookup.first_by_default);
        assert_eq!(
            config.lookup.dialog_breakpoints,
            vec![Breakpoint::Base, Breakpoint::Sm]
        );
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn embedded_default_matches_struct_default() {
        assert_eq!(Config::parse(DEFAULT_CONFIG).unwrap(), Config::default());
    }

    #[test]
    fn empty_text_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config = Config::parse("[lookup]\ninitial_select_delay_ms = 250\n").unwrap();
        assert_eq!(config.lookup.initial_select_delay_ms, 250);
        assert!(config.lookup.first_by_default);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn unknown_breakpoint_is_rejected() {
        let result = Config::parse("[lookup]\ndialog_breakpoints = [\"huge\"]\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_records_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\npath = \"/srv/mysk\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(config.storage.path, Some(PathBuf::from("/srv/mysk")));
    }

    #[test]
    fn load_from_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn directory_uses_configured_path() {
        let dir = tempdir().unwrap();
        let config = Config {
            storage: StorageConfig {
                path: Some(dir.path().join("data")),
            },
            ..Config::default()
        };
        let directory = config.directory().unwrap();
        assert_eq!(directory.base_path(), dir.path().join("data"));
    }

    #[test]
    fn list_detail_options_follow_lookup_section() {
        let config = Config::parse(
            "[lookup]\nfirst_by_default = false\ninitial_select_delay_ms = 40\ndialog_breakpoints = [\"md\"]\n",
        )
        .unwrap();
        let options = config.list_detail_options();
        assert!(!options.first_by_default);
        assert_eq!(options.initial_select_delay, Duration::from_millis(40));
        assert_eq!(options.dialog_breakpoints, vec![Breakpoint::Md]);
        assert_eq!(options.initial_id, None);
    }
}
