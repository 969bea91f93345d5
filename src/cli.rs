use std::path::PathBuf;

use clap::Parser;

/// Month-grid calendar for the terminal. Events are kept in a local JSON file.
#[derive(Parser, Debug)]
#[command(name = "datebook", version, about)]
pub struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the events file, overriding `[storage] dir`.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
