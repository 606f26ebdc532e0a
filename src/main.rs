/// OneClickContent API Diagnostic - Main entry point
///
/// Runs the fixed probe sequence against the OneClickContent service and
/// prints a summary table, per-probe details, and a copy-pasteable support
/// report. Exit code is 0 when every probe passed, 1 otherwise.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use occ_diag::{
    config::DiagnosticConfig,
    init_logging,
    report,
    DiagnosticRunner,
};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config/occ_diag.yaml")]
    config: String,

    /// License key to test (overrides config file and environment)
    #[arg(short, long)]
    license_key: Option<String>,

    /// Site URL the license is registered for
    #[arg(short, long)]
    site_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit the result records as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand)]
enum Commands {
    /// Generate default configuration
    Init,

    /// Run the diagnostic probes
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up OCC_* variables from a local .env if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Init => init_config(&cli),
        Commands::Run => run_diagnostics(&cli).await,
    }
}

/// Write a default configuration file for the operator to edit.
fn init_config(cli: &Cli) -> Result<()> {
    info!("Initializing default configuration at {}", cli.config);

    let config = DiagnosticConfig::default();
    config.save(&cli.config)?;

    info!("Default configuration generated successfully");
    info!("Edit the license_key and site_url fields, then run the diagnostics");
    Ok(())
}

/// Load configuration, run the probe sequence, and render the results.
async fn run_diagnostics(cli: &Cli) -> Result<()> {
    let mut config = DiagnosticConfig::load(&cli.config)?;
    config.apply_env_overrides();

    if let Some(key) = &cli.license_key {
        config.license_key = key.clone();
    }
    if let Some(url) = &cli.site_url {
        config.site_url = url.clone();
    }

    info!("Testing {} for site {}", config.base_url, config.site_url);

    let runner = DiagnosticRunner::new(&config)
        .context("Failed to construct the diagnostic runner")?;
    let results = runner.run_all().await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results)
                .context("Failed to serialize results")?
        );
    } else {
        println!("{}", report::render_table(&results));
        println!("{}", report::render_details(&results));
        println!("{}", report::render_support_report(&results));
    }

    if results.iter().any(|result| !result.passed) {
        std::process::exit(1);
    }
    Ok(())
}
