use anyhow::{Context, Result};
use attendance_tiers::{run_file, AppConfig, OutputFormat, Report, SOURCE_NOT_FOUND_MESSAGE};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "attendance-tiers",
    about = "Score check-in logs into GOLD / SILVER / NORMAL tiers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON configuration file
    #[arg(short, long, global = true, env = "ATTENDANCE_CONFIG")]
    config: Option<PathBuf>,

    /// Check-in file (`<name> <day>` per line)
    #[arg(short, long, global = true, env = "ATTENDANCE_INPUT")]
    input: Option<PathBuf>,

    /// Stop after this many input lines
    #[arg(long, global = true, env = "ATTENDANCE_MAX_RECORDS")]
    max_records: Option<usize>,

    /// JSON scoring policy (bonus rules and tier thresholds)
    #[arg(long, global = true, env = "ATTENDANCE_POLICY")]
    policy: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, env = "ATTENDANCE_FORMAT")]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the report (default)
    Report,

    /// Browse the report interactively
    #[cfg(feature = "tui")]
    Ui,
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if self.max_records.is_some() {
            config.max_records = self.max_records;
        }
        if let Some(policy) = &self.policy {
            config.policy_file = Some(policy.clone());
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = cli.resolve_config()?;
    tracing::debug!(?config, "resolved configuration");

    let Some(report) = load_report(&config, &mut io::stdout().lock())? else {
        return Ok(());
    };

    match cli.command {
        None | Some(Commands::Report) => print_report(&report, config.format),
        #[cfg(feature = "tui")]
        Some(Commands::Ui) => run_ui_mode(report),
    }
}

/// `None` when the source is missing: the fixed message is written to `out`
/// and no report follows.
fn load_report<W: Write>(config: &AppConfig, out: &mut W) -> Result<Option<Report>> {
    let options = config.run_options()?;
    match run_file(&config.input, &options) {
        Ok(report) => Ok(Some(report)),
        Err(e) if e.is_source_not_found() => {
            tracing::warn!(path = ?config.input, "check-in source not found");
            writeln!(out, "{}", SOURCE_NOT_FOUND_MESSAGE)?;
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to score check-ins"),
    }
}

fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => report.write_text(&mut out)?,
        OutputFormat::Csv => report.write_csv(&mut out)?,
        OutputFormat::Json => {
            writeln!(out, "{}", report.to_json()?)?;
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(report: Report) -> Result<()> {
    let mut app = attendance_tiers::ui::App::new(report);
    attendance_tiers::ui::run_ui(&mut app)
}
