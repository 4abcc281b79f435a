// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use az305_sync::app_config::{Config, LogLevel};
use az305_sync::fetcher::HttpFetcher;
use az305_sync::{Controller, SyncOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refresh the exam objectives document (default command)
    Sync(SyncArgs),

    /// Download architecture diagrams into the images directory
    Diagrams(DiagramArgs),

    /// Generate shell completions for az305-sync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
struct SyncArgs {
    /// Exam page listing the skills measured
    #[arg(long, env = "EXAM_URL")]
    exam_url: Option<String>,

    /// Markdown document holding the objectives section
    #[arg(short, long)]
    objectives_file: Option<PathBuf>,

    /// Message carried into the pull request title and body
    #[arg(short = 'm', long, env = "UPDATE_MESSAGE")]
    update_message: Option<String>,

    /// Write the pull request draft JSON to this file
    #[arg(long)]
    pr_draft: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,
}

impl SyncArgs {
    // @returns: Subcommand values, falling back to the ones given before it
    fn merged_with(self, outer: SyncArgs) -> SyncArgs {
        SyncArgs {
            exam_url: self.exam_url.or(outer.exam_url),
            objectives_file: self.objectives_file.or(outer.objectives_file),
            update_message: self.update_message.or(outer.update_message),
            pr_draft: self.pr_draft.or(outer.pr_draft),
            dry_run: self.dry_run || outer.dry_run,
        }
    }
}

#[derive(Args, Debug)]
struct DiagramArgs {
    /// Directory the images are saved to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Pause between downloads in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

/// az305-sync - keeps the AZ-305 study corpus in step with Microsoft Learn
#[derive(Parser, Debug)]
#[command(name = "az305-sync")]
#[command(version)]
#[command(about = "Sync AZ-305 exam objectives and architecture diagrams")]
#[command(long_about = "az305-sync fetches the AZ-305 \"Skills measured\" page, rewrites the objectives
section of the study guide and prepares a pull request draft for CI.

EXAMPLES:
    az305-sync                                    # Sync using sync.json
    az305-sync sync -n                            # Dry run, write nothing
    az305-sync sync -m \"October refresh\" --pr-draft pr.json
    az305-sync diagrams -o images                 # Download architecture diagrams
    az305-sync completions bash > az305-sync.bash

CONFIGURATION:
    Configuration is stored in sync.json by default. If the file doesn't exist,
    defaults are used and written out after the first successful run.
    EXAM_URL and UPDATE_MESSAGE override the corresponding settings.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    sync: SyncArgs,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "sync.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Logger writing coloured, timestamped lines to stderr
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let (colour, tag) = Self::style_for_level(record.level());
        let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the level is adjusted once CLI and config are known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: LogLevel = level.clone().into();
        log::set_max_level((&level).into());
    }
    let level_from_cli = cli.log_level.is_some();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "az305-sync", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Diagrams(args)) => run_diagrams(&cli.config_path, level_from_cli, args).await,
        Some(Commands::Sync(args)) => {
            run_sync(&cli.config_path, level_from_cli, args.merged_with(cli.sync)).await
        }
        None => run_sync(&cli.config_path, level_from_cli, cli.sync).await,
    }
}

fn load_config(config_path: &Path, level_from_cli: bool) -> Result<Config> {
    let config = Config::load_or_default(config_path)?;

    // If log level was not set via command line, take it from config
    if !level_from_cli {
        log::set_max_level((&config.log_level).into());
    }

    Ok(config)
}

// @writes: Default config file after a successful run, if none existed
fn save_default_config(config_path: &Path, existed: bool) -> Result<()> {
    if !existed {
        Config::default().save(config_path)?;
        info!("Wrote default config to {:?}", config_path);
    }
    Ok(())
}

async fn run_sync(config_path: &Path, level_from_cli: bool, args: SyncArgs) -> Result<()> {
    let config_existed = config_path.exists();
    let mut config = load_config(config_path, level_from_cli)?;

    if let Some(url) = args.exam_url {
        config.exam_url = url;
    }
    if let Some(path) = args.objectives_file {
        config.objectives_file = path;
    }
    if let Some(path) = args.pr_draft {
        config.pr_draft_file = Some(path);
    }

    let controller = Controller::with_config(config)?;
    let fetcher = HttpFetcher::new(&controller.config().http)?;

    let options = SyncOptions {
        update_message: args.update_message,
        dry_run: args.dry_run,
    };
    let outcome = controller.sync(&fetcher, &options).await?;

    if !options.dry_run {
        save_default_config(config_path, config_existed)?;
    }

    if !outcome.changed {
        info!("No changes; no pull request needed");
        return Ok(());
    }

    info!(
        "{} objectives added, {} removed",
        outcome.diff.added.len(),
        outcome.diff.removed.len()
    );

    // Without a draft file the draft goes to stdout for the CI step to pick up
    if controller.config().pr_draft_file.is_none() || options.dry_run {
        if let Some(draft) = &outcome.pr_draft {
            let json = draft.to_json().context("Failed to serialize pull request draft")?;
            println!("{}", json);
        }
    }

    Ok(())
}

async fn run_diagrams(config_path: &Path, level_from_cli: bool, args: DiagramArgs) -> Result<()> {
    let config_existed = config_path.exists();
    let mut config = load_config(config_path, level_from_cli)?;

    if let Some(dir) = args.output_dir {
        config.diagrams.output_dir = dir;
    }
    if let Some(delay) = args.delay_ms {
        config.diagrams.delay_ms = delay;
    }

    let controller = Controller::with_config(config)?;
    let fetcher = HttpFetcher::new(&controller.config().http)?;
    let report = controller.download_diagrams(&fetcher).await?;
    save_default_config(config_path, config_existed)?;

    println!(
        "Processed {} pages, downloaded {} images, {} failures",
        report.pages_processed, report.images_downloaded, report.failures
    );

    Ok(())
}
