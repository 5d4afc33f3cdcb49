//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, EnvManager},
    error::{AppError, ErrorReporter, Result},
    logging::{Logger, LoggerFactory},
    models::Config,
    orchestrator::DiagnosticOrchestrator,
    probe::{ProcessRunner, SystemProcessRunner},
    report::ReportWriter,
    types::TestMode,
    ui::{state::COMPLETE_MESSAGE, state::TESTING_MESSAGE, TerminalScreen},
};
use colored::Colorize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

pub const PROMPT_WELCOME: &str = "Welcome to the Diagnostic command line";
pub const PROMPT_QUESTION: &str = "If you would like to run a comprehensive ping test, \
    please type 'yes' and hit enter\notherwise, type 'no'.";

/// How the process was asked to behave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Ask for the test mode on stdin
    Prompt,
    /// Run a fixed diagnostic mode without asking
    Direct(TestMode),
    Maintenance,
    Screen,
}

impl AppMode {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.ui {
            AppMode::Screen
        } else if cli.maintenance {
            AppMode::Maintenance
        } else if let Some(mode) = cli.mode {
            AppMode::Direct(mode)
        } else {
            AppMode::Prompt
        }
    }
}

/// Main application struct that coordinates all components
pub struct App {
    mode: AppMode,
    config: Config,
    use_colors: bool,
    runner: Arc<dyn ProcessRunner>,
}

impl App {
    /// Create a new application instance from parsed CLI arguments
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;

        let mode = AppMode::from_cli(&cli);
        let mut config = load_config(cli.clone())?;
        config.enable_color = config.enable_color && (cli.color || cli.use_colors());

        Ok(Self {
            mode,
            use_colors: config.enable_color,
            config,
            runner: Arc::new(SystemProcessRunner::new()),
        })
    }

    /// Replace the process runner (used to drive the app without touching the host)
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the application against the process's stdin and stdout
    pub async fn run(self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        self.run_with_io(stdin, &mut stdout).await
    }

    /// Run the application with explicit input and output streams
    pub async fn run_with_io<R, W>(self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let logger = self.create_logger().await;

        if self.config.debug {
            logger
                .debug("Configuration loaded")
                .field("summary", display_config_summary(&self.config))
                .field("env_file_loaded", EnvManager::env_file_present())
                .field("mode", format!("{:?}", self.mode))
                .log()
                .await;
            for warning in EnvManager::validate_current_env() {
                crate::log_warn!(logger, "{}", warning);
            }
        }
        crate::log_info!(logger, "Starting in {:?} mode", self.mode);

        let orchestrator = DiagnosticOrchestrator::new(
            self.runner.clone(),
            ReportWriter::new(self.config.output_dir.clone()),
            logger,
        );

        match self.mode {
            AppMode::Prompt => self.run_prompt(&orchestrator, input, out).await,
            AppMode::Direct(mode) => {
                writeln!(out, "{}", TESTING_MESSAGE)?;
                let path = orchestrator.run_to_completion(mode).await?;
                self.print_complete(out, &path)
            }
            AppMode::Maintenance => {
                writeln!(out, "Resetting network settings. This takes under a minute.")?;
                let path = orchestrator.run_maintenance_to_completion().await?;
                self.print_complete(out, &path)
            }
            AppMode::Screen => {
                TerminalScreen::new(&orchestrator, self.use_colors)
                    .run(input, out)
                    .await
            }
        }
    }

    async fn create_logger(&self) -> Arc<Logger> {
        let factory = LoggerFactory::new(self.config.clone());
        Arc::new(factory.create_logger(crate::PKG_NAME).await)
    }

    /// Prompt mode: ask once, run, report. Never fails on a lost report.
    async fn run_prompt<R, W>(
        &self,
        orchestrator: &DiagnosticOrchestrator,
        input: R,
        out: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{}", PROMPT_WELCOME)?;
        writeln!(out, "{}", PROMPT_QUESTION)?;
        out.flush()?;

        // Anything unreadable counts as a "no"
        let mut answer = Vec::new();
        let mut input = input;
        if input.read_until(b'\n', &mut answer).await.is_err() {
            answer.clear();
        }

        let mode = TestMode::from_prompt_answer(&String::from_utf8_lossy(&answer));
        writeln!(out, "Running the {} test.", mode)?;
        writeln!(out, "{}", TESTING_MESSAGE)?;
        out.flush()?;

        match orchestrator.run_to_completion(mode).await {
            Ok(path) => self.print_complete(out, &path),
            Err(e) => {
                ErrorReporter::new(self.use_colors, self.config.verbose).report_error(&e);
                Ok(())
            }
        }
    }

    fn print_complete<W: Write>(&self, out: &mut W, path: &Path) -> Result<()> {
        if self.use_colors {
            writeln!(out, "{}", COMPLETE_MESSAGE.green().bold())?;
        } else {
            writeln!(out, "{}", COMPLETE_MESSAGE)?;
        }
        writeln!(out, "Results saved to {}", path.display())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use crate::probe::testing::FakeProcessRunner;
    use clap::Parser;
    use tempfile::TempDir;

    fn app(args: &[&str], dir: &Path, fake: Arc<FakeProcessRunner>) -> App {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var("DIAG_OUTPUT_DIR");
        std::env::remove_var("ENABLE_COLOR");

        let mut argv = vec!["test", "--no-color", "--output-dir", dir.to_str().unwrap()];
        argv.extend_from_slice(args);
        App::new(Cli::parse_from(argv)).unwrap().with_runner(fake)
    }

    fn fake() -> Arc<FakeProcessRunner> {
        Arc::new(
            FakeProcessRunner::new()
                .with_output("ifconfig", "cfgText")
                .with_output("ipconfig", "cfgText")
                .with_output("ping", "pingText"),
        )
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(AppMode::from_cli(&Cli::parse_from(["test"])), AppMode::Prompt);
        assert_eq!(AppMode::from_cli(&Cli::parse_from(["test", "--ui"])), AppMode::Screen);
        assert_eq!(
            AppMode::from_cli(&Cli::parse_from(["test", "--maintenance"])),
            AppMode::Maintenance
        );
        assert_eq!(
            AppMode::from_cli(&Cli::parse_from(["test", "--mode", "full"])),
            AppMode::Direct(TestMode::Comprehensive)
        );
    }

    #[test]
    fn test_conflicting_flags_are_rejected() {
        let error = App::new(Cli::parse_from(["test", "--ui", "--maintenance"])).err().unwrap();
        assert_eq!(error.category(), "VALIDATION");
    }

    #[tokio::test]
    async fn test_prompt_yes_runs_comprehensive() {
        let dir = TempDir::new().unwrap();
        let fake = fake();
        let app = app(&[], dir.path(), fake.clone());
        let mut out = Vec::new();

        app.run_with_io(&b"yes\n"[..], &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(PROMPT_WELCOME));
        assert!(out.contains("Running the comprehensive test."));
        assert!(out.contains(COMPLETE_MESSAGE));
        assert!(fake.calls()[1].contains(&"1000".to_string()));
    }

    #[tokio::test]
    async fn test_prompt_anything_else_runs_basic() {
        let dir = TempDir::new().unwrap();
        let fake = fake();
        let app = app(&[], dir.path(), fake.clone());
        let mut out = Vec::new();

        app.run_with_io(&b"Yes please\n"[..], &mut out).await.unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Running the basic test."));
        assert!(fake.calls()[1].contains(&"10".to_string()));
        let reports: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(reports.len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_non_utf8_answer_runs_basic() {
        let dir = TempDir::new().unwrap();
        let fake = fake();
        let app = app(&[], dir.path(), fake.clone());
        let mut out = Vec::new();

        app.run_with_io(&b"\xffyes\n"[..], &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Running the basic test."));
        assert!(out.contains(COMPLETE_MESSAGE));
        assert_eq!(fake.calls().len(), 3);
        assert!(fake.calls()[1].contains(&"10".to_string()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_mode_swallows_persistence_failure() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let app = app(&[], &missing, fake());
        let mut out = Vec::new();

        let result = app.run_with_io(&b"no\n"[..], &mut out).await;

        assert!(result.is_ok());
        assert!(!String::from_utf8(out).unwrap().contains(COMPLETE_MESSAGE));
    }

    #[tokio::test]
    async fn test_direct_mode_propagates_persistence_failure() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let app = app(&["--mode", "basic"], &missing, fake());
        let mut out = Vec::new();

        let error = app.run_with_io(&b""[..], &mut out).await.unwrap_err();

        assert!(matches!(error, AppError::Persistence(_)));
        assert_eq!(error.exit_code(), 5);
    }
}
