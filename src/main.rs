// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use subframe::app_config::{self, Config};
use subframe::app_controller::{BatchSummary, Controller};

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
    /// Turn every episode's subtitle tracks into line artifacts
    Process {
        /// Reprocess tracks even when their line artifact is up to date
        #[arg(short, long)]
        force: bool,
    },

    /// Extract one frame per subtitle line for every processed episode
    Grab,

    /// Generate shell completions for subframe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subframe - subtitle lines to video frames
#[derive(Parser, Debug)]
#[command(name = "subframe")]
#[command(version)]
#[command(about = "Turn subtitle tracks into clean dialogue lines and matching video frames")]
#[command(long_about = "subframe reads the subtitle tracks extracted for each episode, builds clean
time-ordered dialogue lines, and saves one video frame per line.

EXAMPLES:
    subframe process                      # Build line artifacts for all episodes
    subframe process --force              # Rebuild every line artifact
    subframe grab                         # Extract frames for processed episodes
    subframe --log-level debug grab       # Extract frames with debug logging
    subframe completions bash > subframe.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json", env = "SUBFRAME_CONFIG")]
    config: PathBuf,

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
        // Records are filtered by the global max level, which can change later
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => "",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subframe", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let controller = Controller::with_config(config)?;

    let cancelled = controller.cancellation_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing running episodes");
            cancelled.store(true, Ordering::SeqCst);
        }
    });

    let summary = match cli.command {
        Commands::Process { force } => controller.run_process(force).await?,
        Commands::Grab => controller.run_grab().await?,
        Commands::Completions { .. } => return Ok(()),
    };

    report(&summary)
}

/// Load or create the configuration and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    // Apply the command line level first so config loading is logged with it
    if let Some(cli_level) = &cli.log_level {
        let level: app_config::LogLevel = cli_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config)
        .with_context(|| format!("Failed to load config file: {:?}", cli.config))?;

    match &cli.log_level {
        Some(cli_level) => config.log_level = cli_level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    info!(
        "Using media info from {:?}, frames in {:?}",
        config.mediainfo_dir, config.frames_dir
    );

    Ok(config)
}

fn report(summary: &BatchSummary) -> Result<()> {
    if summary.failed > 0 {
        error!("{} of {} episode(s) failed, see the log above", summary.failed, summary.total());
        return Err(anyhow!("{} episode(s) failed", summary.failed));
    }
    Ok(())
}
