//! Notewire CLI, the main entry point.
//!
//! Commands:
//! - `serve`   : Start the HTTP webhook server
//! - `invoke`  : Handle one serverless event from a file or stdin
//! - `extract` : Run extraction on a piece of text and print the reply
//! - `doctor`  : Check configuration and Telegram reachability
//! - `config`  : Print a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "notewire",
    about = "Notewire: turn Telegram messages into structured notes",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "NOTEWIRE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// Handle a single function event and print the response
    Invoke {
        /// Read the event from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Extract a note from text without sending anything
    Extract {
        /// The note text
        text: String,

        /// Print the unvalidated JSON instead of the rendered reply
        #[arg(long)]
        raw: bool,
    },

    /// Diagnose configuration
    Doctor,

    /// Print a default config file
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(config_path, port, host).await?,
        Commands::Invoke { file } => commands::invoke::run(config_path, file).await?,
        Commands::Extract { text, raw } => commands::extract::run(config_path, &text, raw).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Config => commands::config_cmd::run(),
    }

    Ok(())
}
