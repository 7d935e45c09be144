//! Binary entry point for the wpfcheck CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Report convention violations under a project directory
//! wpfcheck check src/
//!
//! # Same, as a JSON response, ignoring one check
//! wpfcheck check --format json --disable WPF0012 src/
//!
//! # Dump every resolved registration and routed event
//! wpfcheck registrations src/Controls
//! ```

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use wpfcheck::checks::CheckId;
use wpfcheck::cli::{run_check, run_registrations, RunOptions};
use wpfcheck_core::config::Config;
use wpfcheck_core::error::{CheckError, OutputErrorCode};
use wpfcheck_core::output::{emit_response, ErrorResponse, OutputFormat};
use wpfcheck_core::CancellationToken;

// ============================================================================
// CLI Structure
// ============================================================================

/// Static analysis of WPF dependency-property conventions in C# source.
#[derive(Parser, Debug)]
#[command(name = "wpfcheck", version, about = "Check WPF dependency-property conventions")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Workspace root directory (default: current directory).
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Configuration file (default: wpfcheck.toml in the workspace).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Additional exclusion glob, relative to the workspace. Repeatable.
    #[arg(long, global = true)]
    exclude: Vec<String>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Output format for findings.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report dependency-property convention violations.
    ///
    /// Exits with code 5 when any finding is reported.
    Check {
        /// Files or directories to analyze.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format (default: from configuration, else text).
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Check id to skip, such as WPF0012. Repeatable.
        #[arg(long)]
        disable: Vec<String>,
    },

    /// Print every resolved registration and routed event as JSON.
    Registrations {
        /// Files or directories to analyze.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_format);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            // Errors go to stdout as JSON, like every other response.
            let response = ErrorResponse::from(&err);
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();
            ExitCode::from(err.error_code().code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<ExitCode, CheckError> {
    match cli.command {
        Command::Check {
            paths,
            format,
            disable,
        } => execute_check(&cli.global, paths, format, disable),
        Command::Registrations { paths } => execute_registrations(&cli.global, paths),
    }
}

/// Load configuration and merge command-line overrides into it.
fn resolve_options(global: &GlobalArgs, paths: Vec<PathBuf>) -> Result<RunOptions, CheckError> {
    let workspace = match &global.workspace {
        Some(dir) => dir.clone(),
        None => env::current_dir().map_err(|e| CheckError::internal(e.to_string()))?,
    };
    if !workspace.is_dir() {
        return Err(CheckError::invalid_args(format!(
            "workspace is not a directory: {}",
            workspace.display()
        )));
    }

    let mut config = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&workspace)?,
    };
    config.wpfcheck.exclude.extend(global.exclude.iter().cloned());

    Ok(RunOptions {
        workspace,
        paths,
        config,
    })
}

fn execute_check(
    global: &GlobalArgs,
    paths: Vec<PathBuf>,
    format: Option<Format>,
    disable: Vec<String>,
) -> Result<ExitCode, CheckError> {
    for id in &disable {
        if CheckId::from_id(id).is_none() {
            return Err(CheckError::invalid_args(format!("unknown check id '{}'", id)));
        }
    }

    let mut options = resolve_options(global, paths)?;
    options.config.wpfcheck.disabled.extend(disable);
    let format = format
        .map(OutputFormat::from)
        .or(options.config.wpfcheck.format)
        .unwrap_or_default();

    let response = run_check(&options, &CancellationToken::new())?;

    let mut stdout = io::stdout();
    let written = match format {
        OutputFormat::Json => emit_response(&response, &mut stdout),
        OutputFormat::Text => response
            .findings
            .iter()
            .try_for_each(|finding| writeln!(stdout, "{}", finding.to_text_line())),
    };
    written.map_err(|e| CheckError::internal(format!("failed to write output: {}", e)))?;
    let _ = stdout.flush();

    if response.findings.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(OutputErrorCode::FindingsReported.code()))
    }
}

fn execute_registrations(global: &GlobalArgs, paths: Vec<PathBuf>) -> Result<ExitCode, CheckError> {
    let options = resolve_options(global, paths)?;
    let response = run_registrations(&options, &CancellationToken::new())?;
    emit_response(&response, &mut io::stdout())
        .map_err(|e| CheckError::internal(format!("failed to write output: {}", e)))?;
    let _ = io::stdout().flush();
    Ok(ExitCode::SUCCESS)
}
