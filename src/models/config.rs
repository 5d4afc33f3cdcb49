//! Configuration data model and validation

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the report file is written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(AppError::config("Output directory cannot be empty"));
        }

        // A missing directory is reported when the report is written, not here
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(AppError::config(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(output_dir) = std::env::var("DIAG_OUTPUT_DIR") {
            let output_dir = output_dir.trim();
            if !output_dir.is_empty() {
                self.output_dir = PathBuf::from(output_dir);
            }
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color
                .trim()
                .parse()
                .map_err(|e| {
                    AppError::config(format!(
                        "Invalid ENABLE_COLOR value '{}': {}",
                        enable_color, e
                    ))
                })?;
        }

        Ok(())
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_OUTPUT_DIR)
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.enable_color);
        assert!(!config.verbose);
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_output_dir_is_rejected() {
        let config = Config {
            output_dir: PathBuf::new(),
            ..Config::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_file_as_output_dir_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            output_dir: file.path().to_path_buf(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_output_dir_passes_validation() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            output_dir: dir.path().join("not-created-yet"),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.enable_color);

        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("output_dir"));
    }
}
