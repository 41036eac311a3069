use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_SUFFIX};
use crate::error::{Result, ZipCleanError};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Where the cleaned spreadsheet goes
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Write a sibling file with the configured suffix before the extension
    #[default]
    Suffixed,
    /// Overwrite the input file
    InPlace,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file_name: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl Config {
    /// Loads `path` when given (it must exist), else `zipclean.toml` from the
    /// working directory when present, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ZipCleanError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.output.mode == OutputMode::Suffixed && config.output.suffix.is_empty() {
            return Err(ZipCleanError::Config(
                "output.suffix must not be empty when output.mode is \"suffixed\"".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.mode, OutputMode::Suffixed);
        assert_eq!(config.output.suffix, "_cleaned");
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = Config::from_toml(
            r#"
            [output]
            mode = "in_place"

            [logging]
            file_name = "batch.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.mode, OutputMode::InPlace);
        assert_eq!(config.output.suffix, "_cleaned");
        assert_eq!(config.logging.file_name, "batch.log");
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(
            Config::from_toml("[output]\nmode = \"sideways\"\n"),
            Err(ZipCleanError::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml("[output]\nsuffix = \"\"\n"),
            Err(ZipCleanError::Config(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ZipCleanError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zipclean.toml");
        std::fs::write(&path, "[output]\nsuffix = \"_zip5\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output.suffix, "_zip5");
    }
}
