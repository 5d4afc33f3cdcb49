//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file()?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref output_dir) = self.cli.output_dir {
            config.output_dir = output_dir.clone();
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let summary = [
        format!("Output Directory: {}", config.output_dir.display()),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];

    summary.join("\n")
}
