//! Non-interactive subcommands.

pub mod config;
