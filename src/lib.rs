//! dynatail: browse Dynatrace logs in the terminal.
//!
//! The binary is a thin shell around [`app::App`]; everything it drives is
//! exposed here so the pieces can be tested without a terminal.

pub mod api;
pub mod app;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod fixtures;
pub mod handlers;
pub mod history;
pub mod logging;
pub mod query;
pub mod record;
pub mod saved_queries;
pub mod search;
pub mod signal;
pub mod storage;
pub mod store;
pub mod timerange;
pub mod tui;
pub mod view;

#[cfg(test)]
mod test_utils;
