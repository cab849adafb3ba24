mod commands;

use clap::Parser;
use commands::{execute_command, Commands};
use label_catalog::CatalogConfig;
use std::path::PathBuf;

/// Build a music-label catalog from a YouTube channel
#[derive(Parser)]
#[command(
    name = "label-catalog",
    about = "Build a music-label catalog from a YouTube channel",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.config/label-catalog/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.verbose {
        eprintln!("🔍 Verbose mode enabled");
    }

    let config = match CatalogConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    if args.verbose {
        eprintln!("🏷️  Label: {}", config.label_name);
    }

    if let Err(e) = execute_command(args.command, config).await {
        eprintln!("❌ Command failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
