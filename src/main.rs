//! Uniserve Diagnostic Collector - command-line entry point
//!
//! Collects adapter configuration, latency and path-trace output into a
//! timestamped report that can be emailed to customer care.

use clap::Parser;
use std::process;
use uniserve_diagnostic::{
    app::App,
    cli::Cli,
    config::EnvManager,
    error::{AppError, Result},
    PKG_NAME, VERSION,
};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please send this message to customercare@uniserve.com");
        process::exit(1);
    }));

    let cli = Cli::parse();
    let use_colors = cli.use_colors();

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_colors));
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!(
            "Built {} for {} ({})",
            env!("BUILD_TIME"),
            env!("TARGET_TRIPLE"),
            env!("GIT_COMMIT")
        );
        println!("Debug mode enabled");
        println!();
    }

    App::new(cli)?.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!();
            eprint!("{}", EnvManager::display_env_help());
        }
        AppError::Persistence(_) => {
            eprintln!();
            eprintln!("Report help:");
            eprintln!("  - Make sure the output directory exists and is writable");
            eprintln!("  - Choose another location with --output-dir");
        }
        AppError::Process(_) => {
            eprintln!();
            eprintln!("Command help:");
            eprintln!("  - On Windows, run network reset from an administrator prompt");
            eprintln!("  - On Linux and macOS, install the ping and traceroute utilities");
        }
        _ => {}
    }
}
