//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod list;
pub mod output;
pub mod process;
pub mod remove;
pub mod upload;
