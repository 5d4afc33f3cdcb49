//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

pub const ENV_FILE: &str = ".env";

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Whether a .env file sits in the working directory
    pub fn env_file_present() -> bool {
        Path::new(ENV_FILE).exists()
    }

    /// Load .env file if it exists. Variables already set in the environment win.
    pub fn load_env_file() -> Result<bool> {
        if !Self::env_file_present() {
            return Ok(false);
        }

        dotenv::from_filename(ENV_FILE)?;
        Ok(true)
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "DIAG_OUTPUT_DIR" => {
                let dir = Path::new(value.trim());
                if value.trim().is_empty() {
                    return Err(AppError::config("DIAG_OUTPUT_DIR cannot be empty"));
                }
                if dir.exists() && !dir.is_dir() {
                    return Err(AppError::config(format!(
                        "DIAG_OUTPUT_DIR is not a directory: {}",
                        value
                    )));
                }
            }
            "ENABLE_COLOR" => {
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|e| {
                        AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e))
                    })?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("DIAG_OUTPUT_DIR", "Directory the report is written into", "."),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Environment variable help shown after a configuration error
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_env_file_reports_whether_it_loaded() {
        let _guard = crate::config::ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        assert_eq!(EnvManager::load_env_file().unwrap(), EnvManager::env_file_present());
    }

    #[test]
    fn test_validate_env_var() {
        let dir = TempDir::new().unwrap();
        let file = NamedTempFile::new().unwrap();

        let dir_path = dir.path().to_str().unwrap();
        let file_path = file.path().to_str().unwrap();

        assert!(EnvManager::validate_env_var("DIAG_OUTPUT_DIR", dir_path).is_ok());
        assert!(EnvManager::validate_env_var("DIAG_OUTPUT_DIR", "reports/not-yet-created").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "false").is_ok());

        assert!(EnvManager::validate_env_var("DIAG_OUTPUT_DIR", "  ").is_err());
        assert!(EnvManager::validate_env_var("DIAG_OUTPUT_DIR", file_path).is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());

        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "anything").is_ok());
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();

        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("DIAG_OUTPUT_DIR"));
        assert!(help.contains("ENABLE_COLOR"));
        assert!(help.contains("Configuration Priority"));
    }

    #[test]
    fn test_validate_current_env_reports_bad_values() {
        let _guard = crate::config::ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var("DIAG_OUTPUT_DIR");
        std::env::set_var("ENABLE_COLOR", "sometimes");

        let warnings = EnvManager::validate_current_env();

        std::env::remove_var("ENABLE_COLOR");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ENABLE_COLOR"));
    }
}
