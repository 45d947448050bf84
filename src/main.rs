//! leadwatch CLI
//!
//! Monitors discussion-group feeds, scores content for sales-lead
//! relevance, resolves author contacts from an operator-supplied mapping
//! file, and maintains a running customer ledger for one session.

use clap::{Parser, Subcommand};

use leadwatch::{error::Result, models::Config, pipeline};

/// leadwatch - Discussion-group lead monitor
#[derive(Parser, Debug)]
#[command(name = "leadwatch", version, about = "Discussion-group lead monitor")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the access token against the caller's own profile
    Test,

    /// Ingest the configured groups once and write reports
    Fetch {
        /// Additional older pages to load per group after the first
        #[arg(long, default_value_t = 0)]
        pages: u32,

        /// Resolve author contacts against the mapping file
        #[arg(long)]
        resolve: bool,
    },

    /// Ingest, then keep refreshing automatically until Ctrl-C
    Watch {
        /// Resolve author contacts against the mapping file
        #[arg(long)]
        resolve: bool,
    },

    /// Resolve a single author identifier against the mapping file
    Resolve {
        /// Author identifier to look up
        author_id: String,
    },

    /// Validate configuration and operator files
    Validate,
}

/// Initialize logging from the configured level and verbosity flag.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config);
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init_logging(level);

    log::info!("leadwatch starting...");

    match cli.command {
        Command::Test => pipeline::run_test(&config).await?,
        Command::Fetch { pages, resolve } => pipeline::run_fetch(&config, pages, resolve).await?,
        Command::Watch { resolve } => pipeline::run_watch(&config, resolve).await?,
        Command::Resolve { author_id } => pipeline::run_resolve(&config, &author_id).await?,
        Command::Validate => pipeline::run_validate(&config).await?,
    }

    Ok(())
}
