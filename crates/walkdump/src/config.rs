//! Configuration file support for walkdump.
//!
//! Loads optional settings from `<config dir>/walkdump/config.toml`, or from the
//! file passed with `--config`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use walkdump_reader::{RenderStyle, DEFAULT_LOG_FILE};

/// Settings loaded from the configuration file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    /// Log file to read when `--file` is not given
    pub log_file: Option<PathBuf>,
    /// Indentation used when rendering dumps
    #[serde(default)]
    pub indent: IndentConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IndentConfig {
    /// Prefix for every body line
    pub base: Option<String>,
    /// Added once per nesting level
    pub level: Option<String>,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

impl ReaderConfig {
    /// Where the config file lives when `--config` is not given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("walkdump").join(CONFIG_FILE_NAME))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist and parse. The default path is optional:
    /// when it does not exist the defaults apply, but a file that exists and
    /// fails to parse is still a hard error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: ReaderConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Effective log file.
    /// Priority: `--file` > config `log_file` > the appliance default
    pub fn log_file(&self, cli_file: Option<&Path>) -> PathBuf {
        cli_file
            .map(Path::to_path_buf)
            .or_else(|| self.log_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    pub fn render_style(&self) -> RenderStyle {
        let defaults = RenderStyle::default();
        RenderStyle {
            base_indent: self.indent.base.clone().unwrap_or(defaults.base_indent),
            level_indent: self.indent.level.clone().unwrap_or(defaults.level_indent),
        }
    }
}
