use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;

use crate::commands::CommandContext;
use crate::config::ScribeConfig;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Writing suggestions for plain text
#[derive(Parser, Debug)]
#[command(name = "scribe", about = "Spelling, grammar and style suggestions for plain text")]
pub struct Cli {
    /// Path to configuration file (TOML, overrides $SCRIBE_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// How `check` prints its findings
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Subcommands for configuration inspection and setup
#[derive(Subcommand, Debug)]
#[command(about = "Inspect or create the configuration file")]
pub enum ConfigCommands {
    /// Show current effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Top-level commands for scribe
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report issues found in a file ("-" reads stdin)
    Check {
        input: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Keep one issue per rule and span
        #[arg(long)]
        dedup: bool,

        /// Run providers one after another instead of concurrently
        #[arg(long)]
        sequential: bool,
    },

    /// Apply the first suggestion of every issue
    Fix {
        input: String,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze stdin line by line as it is typed
    Watch {
        /// Stream label printed with each result
        #[arg(long, default_value = "input")]
        stream: String,
    },

    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let config = ScribeConfig::resolve_config(cli.config.clone())?;

    // Create command context
    let ctx = CommandContext::new(config)?;

    // Dispatch commands
    match cli.command {
        Commands::Check { input, format, dedup, sequential } => {
            commands::check::run_check(&ctx, &input, format, dedup, sequential).await?;
        }
        Commands::Fix { input, output } => {
            commands::fix::run_fix(&ctx, &input, output.as_deref()).await?;
        }
        Commands::Watch { stream } => {
            commands::watch::run_watch(&ctx, &stream).await?;
        }
        Commands::Config { command } => {
            commands::config::handle_config_command(&ctx, command, cli.config.as_deref())?;
        }
    }

    Ok(())
}
