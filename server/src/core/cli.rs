use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DATA_DIR, ENV_HOST, ENV_PORT, ENV_RELOAD_SECS};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(version, about = "Cinema ticket-sales reporting server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Directory containing the five source CSV relations
    #[arg(long, short = 'd', global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Snapshot staleness window in seconds (0 disables background reloads)
    #[arg(long, global = true, env = ENV_RELOAD_SECS)]
    pub reload_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default when no subcommand is given)
    Start,
    /// Validate the dataset: load once, report row counts, and exit
    Check,
}

/// Configuration values extracted from CLI arguments and environment
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub reload_secs: Option<u64>,
}

/// Parse CLI arguments into config values and an optional subcommand
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();

    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        data_dir: cli.data_dir,
        reload_secs: cli.reload_secs,
    };

    (config, cli.command)
}
