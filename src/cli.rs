//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dynatail")]
#[command(version)]
#[command(
    about = "A terminal dashboard for browsing Dynatrace logs",
    long_about = "Browse Dynatrace logs in the terminal: run DQL queries, keep saved queries \
and history, search inside the results and export them to CSV.\n\n\
Live mode reads DYNATRACE_BASE_URL and DYNATRACE_TOKEN from the environment. \
Use --development to work with generated sample data instead."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use generated sample data instead of querying Dynatrace
    #[arg(long = "development", visible_alias = "offline")]
    pub development: bool,

    /// Initial time range (30m, 60m, 2h, 6h, today, yesterday, 24h, 7d)
    #[arg(long = "time-range", value_name = "TOKEN")]
    pub time_range: Option<String>,

    /// Config file to use instead of the discovered one
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write diagnostics to dynatail.log in the data directory
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Config file commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Validate the config file
    Validate,
    /// Show effective configuration
    Show,
}
