// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use tmconnector::app_config::{self, Config};
use tmconnector::app_controller::{Controller, JobOperation};
use tmconnector::errors::AppError;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a job file to the vendor
    Submit {
        /// Job file (JSON)
        job: PathBuf,
    },

    /// Check a submitted job file and import the translation when ready
    Check {
        /// Job file (JSON)
        job: PathBuf,
    },

    /// Cancel a submitted job file
    Cancel {
        /// Job file (JSON)
        job: PathBuf,
    },

    /// Release a finished job file on the vendor side
    Remove {
        /// Job file (JSON)
        job: PathBuf,
    },

    /// Print the XLIFF document a submit would send
    Export {
        /// Job file (JSON)
        job: PathBuf,
    },

    /// Show the selected connector
    Status,

    /// Check every submitted job file under a directory once
    Sweep {
        /// Directory holding job files
        jobs_dir: PathBuf,
    },

    /// Generate shell completions for tmconnector
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Translation job connector
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json", env = "TMCONNECTOR_CONFIG")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (marker, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger with the most verbose level, the effective
    // level is lowered with set_max_level once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "tmconnector", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)
        .with_context(|| format!("Failed to load config from {:?}", cli.config_path))?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(LevelFilter::from(&config.log_level));

    let controller = Controller::with_config(config)
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    match cli.command {
        Commands::Submit { job } => run_operation(&controller, JobOperation::Submit, job).await,
        Commands::Check { job } => run_operation(&controller, JobOperation::Check, job).await,
        Commands::Cancel { job } => run_operation(&controller, JobOperation::Cancel, job).await,
        Commands::Remove { job } => run_operation(&controller, JobOperation::Remove, job).await,
        Commands::Export { job } => {
            print!("{}", controller.export(&job)?);
            Ok(())
        }
        Commands::Status => {
            let status = controller.status();
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
        Commands::Sweep { jobs_dir } => run_sweep(&controller, jobs_dir).await,
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_operation(controller: &Controller, operation: JobOperation, path: PathBuf) -> Result<()> {
    let outcome = controller.run_operation(operation, &path).await?;
    let job = outcome.job();

    match outcome.cause() {
        None => {
            info!("{} of job {} succeeded, state is now '{}'", operation, job.id, job.state);
            Ok(())
        }
        Some(cause) if cause.is_not_ready() => {
            info!("Job {} is still in translation", job.id);
            Ok(())
        }
        Some(_) => {
            error!("{} of job {} failed, state is '{}'", operation, job.id, job.state);
            match outcome.into_result() {
                Ok(_) => Ok(()),
                Err(cause) => Err(AppError::from(cause).into()),
            }
        }
    }
}

async fn run_sweep(controller: &Controller, jobs_dir: PathBuf) -> Result<()> {
    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} jobs checked")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let bar = progress_bar.clone();
    let report = controller
        .sweep(&jobs_dir, move |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        })
        .await?;
    progress_bar.finish_and_clear();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
